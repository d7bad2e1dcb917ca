//! Indented, human-readable rendering of a node tree.
//!
//! One line per node: the type tag, then its props as `key=value` pairs with
//! strings in quoted, escaped form. Children follow, indented two spaces.
//!
//! ```text
//! fn name="tada" args={}
//!   bold
//!     text "Hello"
//! ```

use crate::node::{FnArg, Node};

/// Render `nodes` as an indented tree.
pub fn format_tree(nodes: &[Node]) -> String {
    let mut result = String::new();
    for node in nodes {
        format_node(&mut result, node, 0);
    }
    result
}

fn format_node(result: &mut String, node: &Node, indent: usize) {
    result.push_str(&"  ".repeat(indent));
    result.push_str(node.kind().as_str());
    for (key, value) in props(node) {
        if key.is_empty() {
            result.push_str(&format!(" {value}"));
        } else {
            result.push_str(&format!(" {key}={value}"));
        }
    }
    result.push('\n');

    for child in node.children() {
        format_node(result, child, indent + 1);
    }
}

/// Props in serialization order. Text carries its content unlabelled.
fn props(node: &Node) -> Vec<(&'static str, String)> {
    let quoted = |s: &str| format!("{s:?}");
    let optional = |s: &Option<String>| s.as_deref().map_or_else(|| "null".to_string(), quoted);

    match node {
        Node::Text { text } => vec![("", quoted(text))],
        Node::BlockCode { code, lang } => vec![("code", quoted(code)), ("lang", optional(lang))],
        Node::InlineCode { code } => vec![("code", quoted(code))],
        Node::MathBlock { formula } | Node::MathInline { formula } => {
            vec![("formula", quoted(formula))]
        }
        Node::EmojiCode { name } => vec![("name", quoted(name))],
        Node::UnicodeEmoji { emoji } => vec![("emoji", quoted(emoji))],
        Node::Mention {
            username,
            host,
            acct,
        } => vec![
            ("username", quoted(username)),
            ("host", optional(host)),
            ("acct", quoted(acct)),
        ],
        Node::Hashtag { hashtag } => vec![("hashtag", quoted(hashtag))],
        Node::Url { url } => vec![("url", quoted(url))],
        Node::Link { url, silent, .. } => vec![("url", quoted(url)), ("silent", silent.to_string())],
        Node::Fn { name, args, .. } => {
            let args: Vec<String> = args
                .iter()
                .map(|(key, arg)| match arg {
                    FnArg::Value(value) => format!("{key}={value:?}"),
                    FnArg::Flag => key.clone(),
                })
                .collect();
            vec![
                ("name", quoted(name)),
                ("args", format!("{{{}}}", args.join(", "))),
            ]
        }
        Node::Search { query, content } => {
            vec![("query", quoted(query)), ("content", quoted(content))]
        }
        Node::Bold { .. }
        | Node::Italic { .. }
        | Node::Strike { .. }
        | Node::Small { .. }
        | Node::Plain { .. }
        | Node::Quote { .. }
        | Node::Center { .. } => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn leaf_props_are_quoted() {
        let nodes = vec![
            Node::text("a\nb"),
            Node::mention("ai", None),
            Node::Link {
                url: "https://x".into(),
                silent: true,
                children: vec![Node::text("x")],
            },
        ];
        assert_eq!(
            format_tree(&nodes),
            "text \"a\\nb\"\n\
             mention username=\"ai\" host=null acct=\"@ai\"\n\
             link url=\"https://x\" silent=true\n  text \"x\"\n"
        );
    }

    #[test]
    fn fn_args_render_inline() {
        let mut args = BTreeMap::new();
        args.insert("speed".to_string(), FnArg::Value("2s".into()));
        args.insert("left".to_string(), FnArg::Flag);
        let node = Node::Fn {
            name: "spin".into(),
            args,
            children: vec![],
        };
        assert_eq!(
            format_tree(&[node]),
            "fn name=\"spin\" args={left, speed=\"2s\"}\n"
        );
    }

    #[test]
    fn empty_tree_renders_nothing() {
        assert_eq!(format_tree(&[]), "");
    }
}
