//! Byte-offset cursor shared by every construct parser.

use std::collections::HashSet;

/// Default maximum nesting depth for recursive constructs.
pub const DEFAULT_NEST_LIMIT: usize = 20;

/// Hard ceiling on any configured nest limit. Larger values are clamped so
/// deeply nested input cannot exhaust the stack.
pub const MAX_NEST_LIMIT: usize = 128;

/// A saved cursor position, handed back to [`Cursor::restore`] on failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

/// A cursor for codepoint-by-codepoint parsing with backtracking.
///
/// Besides the position it carries the recursion depth and the link-label
/// mode, so one parse call owns all of its state.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    s: &'a str,
    i: usize,
    depth: usize,
    nest_limit: usize,
    link_label: bool,
    /// Delimited scans known to fail: (offset, delimiter, depth, link label).
    failed: HashSet<(usize, &'static str, usize, bool)>,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor at the start of `s`. `nest_limit` is clamped to
    /// [`MAX_NEST_LIMIT`].
    pub fn new(s: &'a str, nest_limit: usize) -> Self {
        Self {
            s,
            i: 0,
            depth: 0,
            nest_limit: nest_limit.min(MAX_NEST_LIMIT),
            link_label: false,
            failed: HashSet::new(),
        }
    }

    /// Creates a cursor over extracted text (a quote or center body) that
    /// continues at this cursor's depth. Link-label mode does not carry over.
    pub fn child<'b>(&self, s: &'b str) -> Cursor<'b> {
        Cursor {
            s,
            i: 0,
            depth: self.depth,
            nest_limit: self.nest_limit,
            link_label: false,
            failed: HashSet::new(),
        }
    }

    /// Current byte offset.
    pub fn pos(&self) -> usize {
        self.i
    }

    pub fn eof(&self) -> bool {
        self.i >= self.s.len()
    }

    /// Unconsumed input.
    pub fn rest(&self) -> &'a str {
        &self.s[self.i..]
    }

    /// Input between two offsets previously returned by [`Cursor::pos`].
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.s[start..end]
    }

    /// Peeks at the current codepoint without advancing.
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// The codepoint just before the cursor.
    pub fn prev(&self) -> Option<char> {
        self.s[..self.i].chars().next_back()
    }

    /// True when the previous codepoint is an ASCII letter or digit.
    pub fn after_alphanumeric(&self) -> bool {
        self.prev().is_some_and(|c| c.is_ascii_alphanumeric())
    }

    pub fn at_line_start(&self) -> bool {
        self.i == 0 || self.s.as_bytes()[self.i - 1] == b'\n'
    }

    pub fn starts_with(&self, pat: &str) -> bool {
        self.rest().starts_with(pat)
    }

    /// Consumes `pat` if the remaining input starts with it.
    pub fn eat(&mut self, pat: &str) -> bool {
        if self.starts_with(pat) {
            self.i += pat.len();
            true
        } else {
            false
        }
    }

    /// Advances by one codepoint, returning it.
    pub fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.i += c.len_utf8();
        Some(c)
    }

    /// Advances while `pred` holds, returning the consumed text.
    pub fn bump_while(&mut self, mut pred: impl FnMut(char) -> bool) -> &'a str {
        let start = self.i;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.i += c.len_utf8();
        }
        &self.s[start..self.i]
    }

    /// Advances by `n` bytes. `n` must land on a char boundary.
    pub fn bump_n(&mut self, n: usize) {
        self.i += n;
    }

    /// Moves back to an earlier offset, e.g. to hand trailing characters
    /// back to the text that follows a construct.
    pub fn rewind_to(&mut self, pos: usize) {
        debug_assert!(pos <= self.i);
        self.i = pos;
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.i)
    }

    pub fn restore(&mut self, cp: Checkpoint) {
        self.i = cp.0;
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn nest_limit(&self) -> usize {
        self.nest_limit
    }

    /// True if a scan for `end` from here, in the current depth and label
    /// mode, already failed once.
    pub fn known_failure(&self, end: &'static str) -> bool {
        self.failed.contains(&(self.i, end, self.depth, self.link_label))
    }

    /// Records that a scan for `end` starting at `start` failed.
    pub fn record_failure(&mut self, start: usize, end: &'static str) {
        self.failed.insert((start, end, self.depth, self.link_label));
    }

    pub fn in_link_label(&self) -> bool {
        self.link_label
    }

    /// Runs `f` one nesting level deeper, or returns `None` without calling
    /// it once the nest limit is reached.
    pub fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        if self.depth >= self.nest_limit {
            log::trace!(
                "nest limit {} reached at byte {}, falling back to text",
                self.nest_limit,
                self.i
            );
            return None;
        }
        self.depth += 1;
        let out = f(self);
        self.depth -= 1;
        out
    }

    /// Runs `f` with mention, hashtag and URL recognition disabled.
    pub fn in_label<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let old = std::mem::replace(&mut self.link_label, true);
        let out = f(self);
        self.link_label = old;
        out
    }
}
