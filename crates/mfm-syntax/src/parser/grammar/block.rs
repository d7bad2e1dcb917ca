//! Block-level grammar rules.
//!
//! Block rules are only tried at the start of a line. Quote and center bodies
//! are cut out of the input and parsed again through a child cursor, which
//! counts as one level of nesting.

use crate::cursor::Cursor;
use crate::node::Node;
use crate::parser;

const QUOTE: &str = ">";
const FENCE: &str = "```";
const MATH_OPEN: &str = "\\[";
const MATH_CLOSE: &str = "\\]";
const CENTER_OPEN: &str = "<center>";
const CENTER_CLOSE: &str = "</center>";

/// Line endings that turn the whole line into a search box, tried in order.
const SEARCH_SUFFIXES: &[&str] = &[
    " Search",
    " search",
    " 検索",
    " [Search]",
    " [search]",
    " [検索]",
];

/// `> quoted` lines, re-parsed as a nested document.
pub fn quote(cur: &mut Cursor<'_>) -> Option<Node> {
    if !cur.starts_with(QUOTE) {
        return None;
    }
    cur.nested(|cur| {
        let mut lines = Vec::new();
        while cur.eat(QUOTE) {
            cur.eat(" ");
            lines.push(cur.bump_while(|c| c != '\n'));
            cur.eat("\n");
        }
        let body = lines.join("\n");
        let children = parser::full(&mut cur.child(&body));
        Some(Node::Quote { children })
    })
}

/// Fenced code block with an optional language tag.
pub fn code_block(cur: &mut Cursor<'_>) -> Option<Node> {
    let cp = cur.checkpoint();
    if !cur.eat(FENCE) {
        return None;
    }
    let Some(header_len) = cur.rest().find('\n') else {
        cur.restore(cp);
        return None;
    };
    let lang = cur.rest()[..header_len].trim();
    cur.bump_n(header_len + 1);

    let body = cur.rest();
    let Some(close) = closing_fence(body) else {
        cur.restore(cp);
        return None;
    };
    cur.bump_n(close + 1 + FENCE.len());
    cur.eat("\n");

    Some(Node::BlockCode {
        code: body[..close].to_string(),
        lang: (!lang.is_empty()).then(|| lang.to_string()),
    })
}

/// Offset of the newline that starts the closing fence: "\n```" not followed
/// by a fourth backtick. Longer runs are part of the code.
fn closing_fence(body: &str) -> Option<usize> {
    let mut from = 0;
    while let Some(idx) = body[from..].find("\n```") {
        let at = from + idx;
        let after = at + 1 + FENCE.len();
        if body[after..].starts_with('`') {
            from = after;
            continue;
        }
        return Some(at);
    }
    None
}

/// `\[ formula \]`.
pub fn math_block(cur: &mut Cursor<'_>) -> Option<Node> {
    let cp = cur.checkpoint();
    if !cur.eat(MATH_OPEN) {
        return None;
    }
    cur.eat("\n");
    let Some(end) = cur.rest().find(MATH_CLOSE) else {
        cur.restore(cp);
        return None;
    };
    let formula = cur.rest()[..end].trim_end_matches('\n').to_string();
    cur.bump_n(end + MATH_CLOSE.len());
    Some(Node::MathBlock { formula })
}

/// `<center>…</center>`; the body is inline-only.
pub fn center(cur: &mut Cursor<'_>) -> Option<Node> {
    let cp = cur.checkpoint();
    if !cur.eat(CENTER_OPEN) {
        return None;
    }
    cur.eat("\n");
    let Some(end) = cur.rest().find(CENTER_CLOSE) else {
        cur.restore(cp);
        return None;
    };
    let body = cur.rest()[..end].trim_end_matches('\n');
    let Some(children) = cur.nested(|cur| Some(parser::inline(&mut cur.child(body)))) else {
        cur.restore(cp);
        return None;
    };
    cur.bump_n(end + CENTER_CLOSE.len());
    Some(Node::Center { children })
}

/// A whole line ending in one of [`SEARCH_SUFFIXES`].
pub fn search(cur: &mut Cursor<'_>) -> Option<Node> {
    let rest = cur.rest();
    let line = rest.split('\n').next().unwrap_or(rest);
    let query = SEARCH_SUFFIXES
        .iter()
        .filter_map(|suffix| line.strip_suffix(suffix))
        .find(|query| !query.is_empty())?;

    cur.bump_n(line.len());
    cur.eat("\n");
    Some(Node::Search {
        query: query.to_string(),
        content: line.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closing_fence_skips_longer_runs() {
        assert_eq!(closing_fence("a\n````\nb\n```"), Some(8));
        assert_eq!(closing_fence("a\n```"), Some(1));
        assert_eq!(closing_fence("a\n````"), None);
        assert_eq!(closing_fence("```"), None);
    }

    #[test]
    fn failed_block_rules_leave_cursor_untouched() {
        for input in ["```js no newline", "```\nunclosed", "\\[ x", "<center>x", "> "] {
            let mut cur = Cursor::new(input, 20);
            let before = cur.pos();
            let _ = code_block(&mut cur);
            let _ = math_block(&mut cur);
            let _ = center(&mut cur);
            let _ = search(&mut cur);
            assert_eq!(cur.pos(), before, "cursor moved for {input:?}");
        }
    }

    #[test]
    fn search_needs_a_query() {
        let mut cur = Cursor::new(" Search", 20);
        assert_eq!(search(&mut cur), None);
        assert_eq!(cur.pos(), 0);
    }

    #[test]
    fn search_consumes_line_break() {
        let mut cur = Cursor::new("misskey search\nnext", 20);
        assert_eq!(
            search(&mut cur),
            Some(Node::Search {
                query: "misskey".into(),
                content: "misskey search".into(),
            })
        );
        assert_eq!(cur.rest(), "next");
    }

    #[test]
    fn quote_fails_at_nest_limit() {
        let mut cur = Cursor::new("> a", 0);
        assert_eq!(quote(&mut cur), None);
        assert_eq!(cur.pos(), 0);
    }
}
