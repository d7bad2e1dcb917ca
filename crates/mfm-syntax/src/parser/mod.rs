//! # Parser - Driver and Entry Points
//!
//! The driver walks the input with a [`Cursor`] and, at every position, asks
//! the grammar for a node:
//!
//! ```text
//! at line start?  ── yes ──> block rules  ──┐
//!        │                                  │ no match
//!        └──────────────────> inline rules <┘
//!                                  │ no match
//!                                  v
//!                     one codepoint as literal text
//! ```
//!
//! Every branch advances by at least one codepoint, so the loop always
//! terminates, and because the fallback accepts anything, parsing is total:
//! there is no input for which [`parse`] fails.
//!
//! ## Variants
//!
//! - [`full`] - blocks and inlines; the top level and quote bodies
//! - [`inline`] - inlines only; center bodies
//! - [`inline_until`] - inlines up to a closing delimiter; every container
//!   construct (`**`, `<b>`, `$[`, link labels, ...) parses its body this way
//!
//! Text nodes are merged as they are pushed, so no node list produced here
//! ever holds two adjacent text nodes.

mod grammar;

use crate::cursor::{Cursor, DEFAULT_NEST_LIMIT, MAX_NEST_LIMIT};
use crate::node::{Node, push_merged};

/// Knobs for a parse call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum nesting depth of recursive constructs. Openers past this depth
    /// are kept as literal text. Values above [`MAX_NEST_LIMIT`] are clamped.
    pub nest_limit: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            nest_limit: DEFAULT_NEST_LIMIT,
        }
    }
}

/// Parse MFM source into a node tree.
///
/// ```
/// use mfm_syntax::{parse, Node};
///
/// let nodes = parse("**abc**");
/// assert_eq!(nodes, vec![Node::Bold { children: vec![Node::text("abc")] }]);
/// ```
pub fn parse(source: &str) -> Vec<Node> {
    parse_with(source, &ParseOptions::default())
}

/// Parse with explicit [`ParseOptions`].
pub fn parse_with(source: &str, options: &ParseOptions) -> Vec<Node> {
    let mut cur = Cursor::new(source, options.nest_limit);
    full(&mut cur)
}

/// Parse only inline syntax; block constructs such as quotes and code blocks
/// are left as text. Suited to single-line fields like display names.
pub fn parse_inline(source: &str) -> Vec<Node> {
    let mut cur = Cursor::new(source, DEFAULT_NEST_LIMIT);
    inline(&mut cur)
}

pub(crate) fn full(cur: &mut Cursor<'_>) -> Vec<Node> {
    let mut nodes = Vec::new();
    while !cur.eof() {
        let node = grammar::block(cur)
            .or_else(|| grammar::inline(cur))
            .unwrap_or_else(|| literal(cur));
        push_merged(&mut nodes, node);
    }
    nodes
}

pub(crate) fn inline(cur: &mut Cursor<'_>) -> Vec<Node> {
    let mut nodes = Vec::new();
    while !cur.eof() {
        let node = grammar::inline(cur).unwrap_or_else(|| literal(cur));
        push_merged(&mut nodes, node);
    }
    nodes
}

/// Parse inline content up to and including `end`.
///
/// Returns `None` if input runs out before `end` or the nest limit is
/// reached. The cursor is left wherever parsing stopped; callers restore
/// their own checkpoint on failure.
///
/// Failures are remembered per offset, delimiter, depth and label mode, so a
/// run of unclosed openers scans each tail once per depth instead of once
/// per combination of enclosing openers.
pub(crate) fn inline_until(cur: &mut Cursor<'_>, end: &'static str) -> Option<Vec<Node>> {
    if cur.known_failure(end) {
        return None;
    }
    let start = cur.pos();
    let result = cur.nested(|cur| {
        let mut nodes = Vec::new();
        while !cur.eof() {
            if cur.eat(end) {
                return Some(nodes);
            }
            let node = grammar::inline(cur).unwrap_or_else(|| literal(cur));
            push_merged(&mut nodes, node);
        }
        None
    });
    if result.is_none() {
        cur.record_failure(start, end);
    }
    result
}

/// Consume one codepoint as text.
fn literal(cur: &mut Cursor<'_>) -> Node {
    let start = cur.pos();
    cur.bump();
    Node::text(cur.slice(start, cur.pos()))
}
