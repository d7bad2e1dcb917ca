//! # Inline-Level Grammar
//!
//! Inline rules are tried at every position, in the order of
//! `INLINE_RULES`. Each one either consumes a complete construct or
//! leaves the cursor untouched.
//!
//! ## Word Boundaries
//!
//! Several constructs refuse to start right after an ASCII letter or digit,
//! so ordinary prose and identifiers are not misread:
//!
//! | Input | Why it stays text |
//! |-------|-------------------|
//! | `snake_case_name` | `_` after a letter |
//! | `abc@example.com` | `@` after a letter |
//! | `12:34:56` | `:` after a digit |
//! | `issue#12` | `#` after a letter |
//!
//! ## Link Labels
//!
//! While a link label `[…]` is being parsed, mentions, hashtags and URLs are
//! switched off. Otherwise a label such as `[see https://x](https://y)` would
//! swallow the `](` that ends it.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::cursor::Cursor;
use crate::emoji;
use crate::node::{FnArg, Node};
use crate::parser;

const HTTPS: &str = "https://";
const HTTP: &str = "http://";

/// Characters that end a hashtag outright.
const HASHTAG_STOP: &[char] = &[' ', '\n', '\t', '.', ',', '!', '?', '\'', '"', '#'];

/// Bracket pairs a hashtag may contain when balanced.
const HASHTAG_BRACKETS: &[(char, char)] = &[('(', ')'), ('[', ']'), ('「', '」'), ('（', '）')];

pub fn unicode_emoji(cur: &mut Cursor<'_>) -> Option<Node> {
    let len = emoji::match_len(cur.rest())?;
    let emoji = cur.rest()[..len].to_string();
    cur.bump_n(len);
    Some(Node::UnicodeEmoji { emoji })
}

/// `<https://…>`: everything up to the first `>` is the URL.
pub fn url_alt(cur: &mut Cursor<'_>) -> Option<Node> {
    if cur.in_link_label() {
        return None;
    }
    let inner = cur.rest().strip_prefix('<')?;
    scheme_len(inner)?;
    let end = inner.find('>')?;
    let url = inner[..end].to_string();
    cur.bump_n(1 + end + 1);
    Some(Node::Url { url })
}

pub fn small_tag(cur: &mut Cursor<'_>) -> Option<Node> {
    enclosed(cur, "<small>", "</small>", true, |children| Node::Small {
        children,
    })
}

/// `<plain>`: the body is kept verbatim, no inline parsing.
pub fn plain_tag(cur: &mut Cursor<'_>) -> Option<Node> {
    const OPEN: &str = "<plain>";
    const CLOSE: &str = "</plain>";

    let body = cur.rest().strip_prefix(OPEN)?;
    let end = body.find(CLOSE)?;
    let text = &body[..end];
    let text = text.strip_prefix('\n').unwrap_or(text);
    let text = text.strip_suffix('\n').unwrap_or(text);
    cur.bump_n(OPEN.len() + end + CLOSE.len());
    Some(Node::Plain {
        children: vec![Node::text(text)],
    })
}

pub fn bold_tag(cur: &mut Cursor<'_>) -> Option<Node> {
    enclosed(cur, "<b>", "</b>", true, |children| Node::Bold { children })
}

pub fn italic_tag(cur: &mut Cursor<'_>) -> Option<Node> {
    enclosed(cur, "<i>", "</i>", true, |children| Node::Italic { children })
}

pub fn strike_tag(cur: &mut Cursor<'_>) -> Option<Node> {
    enclosed(cur, "<s>", "</s>", true, |children| Node::Strike { children })
}

/// `***big***`, encoded as the `tada` function.
pub fn big(cur: &mut Cursor<'_>) -> Option<Node> {
    enclosed(cur, "***", "***", false, |children| Node::Fn {
        name: "tada".to_string(),
        args: BTreeMap::new(),
        children,
    })
}

pub fn bold_asta(cur: &mut Cursor<'_>) -> Option<Node> {
    enclosed(cur, "**", "**", false, |children| Node::Bold { children })
}

pub fn italic_asta(cur: &mut Cursor<'_>) -> Option<Node> {
    simple_italic(cur, "*")
}

pub fn bold_under(cur: &mut Cursor<'_>) -> Option<Node> {
    enclosed(cur, "__", "__", false, |children| Node::Bold { children })
}

pub fn italic_under(cur: &mut Cursor<'_>) -> Option<Node> {
    simple_italic(cur, "_")
}

pub fn strike_wave(cur: &mut Cursor<'_>) -> Option<Node> {
    enclosed(cur, "~~", "~~", false, |children| Node::Strike { children })
}

/// `` `code` `` on a single line.
pub fn inline_code(cur: &mut Cursor<'_>) -> Option<Node> {
    let cp = cur.checkpoint();
    if !cur.eat("`") {
        return None;
    }
    let code = cur.bump_while(|c| c != '`' && c != '\n');
    if code.is_empty() || !cur.eat("`") {
        cur.restore(cp);
        return None;
    }
    Some(Node::InlineCode {
        code: code.to_string(),
    })
}

/// `\( formula \)`.
pub fn math_inline(cur: &mut Cursor<'_>) -> Option<Node> {
    let body = cur.rest().strip_prefix("\\(")?;
    let end = body.find("\\)")?;
    let formula = body[..end].to_string();
    cur.bump_n(2 + end + 2);
    Some(Node::MathInline { formula })
}

/// `$[name.key=value,flag body]`.
pub fn fn_call(cur: &mut Cursor<'_>) -> Option<Node> {
    let cp = cur.checkpoint();
    if !cur.eat("$[") {
        return None;
    }
    let name = cur.bump_while(|c| !matches!(c, ' ' | '.' | '\n' | ']'));
    if name.is_empty() {
        cur.restore(cp);
        return None;
    }

    let mut args = BTreeMap::new();
    if cur.eat(".") {
        let raw = cur.bump_while(|c| !matches!(c, ' ' | '\n' | ']'));
        for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match part.split_once('=') {
                Some((key, value)) => args.insert(key.to_string(), FnArg::Value(value.to_string())),
                None => args.insert(part.to_string(), FnArg::Flag),
            };
        }
    }

    if !cur.eat(" ") {
        cur.restore(cp);
        return None;
    }
    let Some(children) = parser::inline_until(cur, "]") else {
        cur.restore(cp);
        return None;
    };
    Some(Node::Fn {
        name: name.to_string(),
        args,
        children,
    })
}

/// `@user` or `@user@host`.
pub fn mention(cur: &mut Cursor<'_>) -> Option<Node> {
    if cur.in_link_label() || cur.after_alphanumeric() {
        return None;
    }
    let cp = cur.checkpoint();
    if !cur.eat("@") || matches!(cur.peek(), Some('-' | '.')) {
        cur.restore(cp);
        return None;
    }

    let start = cur.pos();
    let username = cur
        .bump_while(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        .trim_end_matches(['-', '.']);
    if username.is_empty() {
        cur.restore(cp);
        return None;
    }
    cur.rewind_to(start + username.len());

    let at = cur.checkpoint();
    let mut host = None;
    if cur.eat("@") {
        let host_start = cur.pos();
        let raw = cur.bump_while(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
        let trimmed = raw.trim_end_matches('.');
        if trimmed.is_empty() {
            cur.restore(at);
        } else {
            cur.rewind_to(host_start + trimmed.len());
            host = Some(trimmed.to_string());
        }
    }
    Some(Node::mention(username, host))
}

/// `#tag`, allowing balanced brackets inside.
pub fn hashtag(cur: &mut Cursor<'_>) -> Option<Node> {
    if cur.in_link_label() || cur.after_alphanumeric() {
        return None;
    }
    let cp = cur.checkpoint();
    if !cur.eat("#") {
        return None;
    }

    let start = cur.pos();
    let mut open: Vec<char> = Vec::new();
    while let Some(c) = cur.peek() {
        if HASHTAG_STOP.contains(&c) {
            break;
        }
        if let Some(&(_, close)) = HASHTAG_BRACKETS.iter().find(|(o, _)| *o == c) {
            open.push(close);
        } else if HASHTAG_BRACKETS.iter().any(|&(_, close)| close == c) {
            if open.last() != Some(&c) {
                break;
            }
            open.pop();
        }
        cur.bump();
    }

    let tag = cur.slice(start, cur.pos());
    if tag.is_empty() || is_decimal_number(tag) {
        cur.restore(cp);
        return None;
    }
    Some(Node::Hashtag {
        hashtag: tag.to_string(),
    })
}

/// True when `tag` is only decimal digits (Unicode `Nd`, full-width included).
/// Other numerics such as `½` or `Ⅻ` still make a valid tag.
fn is_decimal_number(tag: &str) -> bool {
    static DECIMAL_REGEX: OnceLock<Regex> = OnceLock::new();
    let decimal_regex =
        DECIMAL_REGEX.get_or_init(|| Regex::new(r"^\p{Nd}+$").expect("Invalid decimal regex"));
    decimal_regex.is_match(tag)
}

/// `:custom_emoji:`.
pub fn emoji_code(cur: &mut Cursor<'_>) -> Option<Node> {
    if cur.after_alphanumeric() {
        return None;
    }
    let cp = cur.checkpoint();
    if !cur.eat(":") {
        return None;
    }
    let name = cur.bump_while(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '+' | '-'));
    if name.is_empty() || !cur.eat(":") || cur.peek().is_some_and(|c| c.is_ascii_alphanumeric()) {
        cur.restore(cp);
        return None;
    }
    Some(Node::EmojiCode {
        name: name.to_string(),
    })
}

/// `[label](url)`, or `?[label](url)` for a silent link.
pub fn link(cur: &mut Cursor<'_>) -> Option<Node> {
    let cp = cur.checkpoint();
    let silent = cur.eat("?");
    if !cur.eat("[") {
        cur.restore(cp);
        return None;
    }
    let Some(children) = cur.in_label(|cur| parser::inline_until(cur, "]")) else {
        cur.restore(cp);
        return None;
    };
    if !cur.eat("(") {
        cur.restore(cp);
        return None;
    }
    let url = cur.bump_while(|c| !matches!(c, ')' | ' ' | '\n'));
    if !cur.eat(")") {
        cur.restore(cp);
        return None;
    }
    Some(Node::Link {
        url: url.to_string(),
        silent,
        children,
    })
}

/// Bare `https://` / `http://` URL.
pub fn url(cur: &mut Cursor<'_>) -> Option<Node> {
    if cur.in_link_label() {
        return None;
    }
    let scheme = scheme_len(cur.rest())?;
    let start = cur.pos();
    cur.bump_n(scheme);

    let mut parens = 0usize;
    while let Some(c) = cur.peek() {
        match c {
            '(' => parens += 1,
            ')' if parens > 0 => parens -= 1,
            ')' => break,
            c if c <= ' ' || matches!(c, '"' | '<' | '>' | '[' | ']') => break,
            _ => {}
        }
        cur.bump();
    }

    let url = cur.slice(start, cur.pos()).trim_end_matches(['.', ',']);
    if url.len() <= scheme {
        cur.rewind_to(start);
        return None;
    }
    cur.rewind_to(start + url.len());
    Some(Node::Url {
        url: url.to_string(),
    })
}

fn scheme_len(s: &str) -> Option<usize> {
    [HTTPS, HTTP]
        .into_iter()
        .find(|scheme| s.starts_with(scheme))
        .map(str::len)
}

/// `open` + inline content + `close`. With `allow_empty` unset an empty body
/// is a failed match, so `****` stays text.
fn enclosed(
    cur: &mut Cursor<'_>,
    open: &str,
    close: &'static str,
    allow_empty: bool,
    build: fn(Vec<Node>) -> Node,
) -> Option<Node> {
    let cp = cur.checkpoint();
    if !cur.eat(open) {
        return None;
    }
    match parser::inline_until(cur, close) {
        Some(children) if allow_empty || !children.is_empty() => Some(build(children)),
        _ => {
            cur.restore(cp);
            None
        }
    }
}

/// `*abc*` / `_abc_`: letters, digits, spaces and newlines only, and never
/// directly after a letter or digit.
fn simple_italic(cur: &mut Cursor<'_>, marker: &str) -> Option<Node> {
    if cur.after_alphanumeric() {
        return None;
    }
    let cp = cur.checkpoint();
    if !cur.eat(marker) {
        return None;
    }
    let body = cur.bump_while(|c| c.is_ascii_alphanumeric() || c == ' ' || c == '\n');
    if body.is_empty() || !cur.eat(marker) {
        cur.restore(cp);
        return None;
    }
    Some(Node::Italic {
        children: vec![Node::text(body)],
    })
}
