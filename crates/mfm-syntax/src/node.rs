//! # Node - The MFM Syntax Tree
//!
//! Every construct the parser recognizes becomes one [`Node`] variant carrying
//! exactly the fields that construct needs. Container variants own their
//! children; leaf variants own their payload strings. The tree is plain owned
//! data, so it is `Send + Sync` and cheap to move between threads.
//!
//! ## Serialization Contract
//!
//! Renderers consume the tree as JSON in the shape
//!
//! ```text
//! { "type": "mention", "props": { "username": "ai", "host": null, "acct": "@ai" }, "children": [] }
//! ```
//!
//! The `props` object always carries the full key set for its type. Optional
//! values serialize as `null` rather than being omitted.

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

/// One node of a parsed MFM document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text {
        text: String,
    },
    Bold {
        children: Vec<Node>,
    },
    Italic {
        children: Vec<Node>,
    },
    Strike {
        children: Vec<Node>,
    },
    Small {
        children: Vec<Node>,
    },
    /// `<plain>` body, kept verbatim as a single text child.
    Plain {
        children: Vec<Node>,
    },
    Quote {
        children: Vec<Node>,
    },
    Center {
        children: Vec<Node>,
    },
    BlockCode {
        code: String,
        lang: Option<String>,
    },
    InlineCode {
        code: String,
    },
    MathBlock {
        formula: String,
    },
    MathInline {
        formula: String,
    },
    /// Custom emoji shortcode, `:name:`.
    EmojiCode {
        name: String,
    },
    /// A complete Unicode emoji sequence (never split mid-cluster).
    UnicodeEmoji {
        emoji: String,
    },
    Mention {
        username: String,
        host: Option<String>,
        /// `@username` or `@username@host`.
        acct: String,
    },
    Hashtag {
        hashtag: String,
    },
    Url {
        url: String,
    },
    Link {
        url: String,
        /// Set by the `?[label](url)` form; renderers suppress previews.
        silent: bool,
        children: Vec<Node>,
    },
    /// Function call `$[name.args body]`. `***big***` is also encoded here
    /// as `tada` with no args.
    Fn {
        name: String,
        args: BTreeMap<String, FnArg>,
        children: Vec<Node>,
    },
    Search {
        query: String,
        content: String,
    },
}

/// Value of a function-call argument: `key=value` or a bare `key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FnArg {
    Value(String),
    Flag,
}

/// The type tag of a [`Node`], as it appears in the serialized tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Text,
    Bold,
    Italic,
    Strike,
    Small,
    Plain,
    Quote,
    Center,
    BlockCode,
    InlineCode,
    MathBlock,
    MathInline,
    EmojiCode,
    UnicodeEmoji,
    Mention,
    Hashtag,
    Url,
    Link,
    Fn,
    Search,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Text => "text",
            NodeKind::Bold => "bold",
            NodeKind::Italic => "italic",
            NodeKind::Strike => "strike",
            NodeKind::Small => "small",
            NodeKind::Plain => "plain",
            NodeKind::Quote => "quote",
            NodeKind::Center => "center",
            NodeKind::BlockCode => "blockCode",
            NodeKind::InlineCode => "inlineCode",
            NodeKind::MathBlock => "mathBlock",
            NodeKind::MathInline => "mathInline",
            NodeKind::EmojiCode => "emojiCode",
            NodeKind::UnicodeEmoji => "unicodeEmoji",
            NodeKind::Mention => "mention",
            NodeKind::Hashtag => "hashtag",
            NodeKind::Url => "url",
            NodeKind::Link => "link",
            NodeKind::Fn => "fn",
            NodeKind::Search => "search",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Node {
    /// Creates a text node.
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text { text: text.into() }
    }

    /// Builds a mention, deriving `acct` from the parts.
    pub fn mention(username: impl Into<String>, host: Option<String>) -> Self {
        let username = username.into();
        let acct = match &host {
            Some(host) => format!("@{username}@{host}"),
            None => format!("@{username}"),
        };
        Node::Mention {
            username,
            host,
            acct,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Text { .. } => NodeKind::Text,
            Node::Bold { .. } => NodeKind::Bold,
            Node::Italic { .. } => NodeKind::Italic,
            Node::Strike { .. } => NodeKind::Strike,
            Node::Small { .. } => NodeKind::Small,
            Node::Plain { .. } => NodeKind::Plain,
            Node::Quote { .. } => NodeKind::Quote,
            Node::Center { .. } => NodeKind::Center,
            Node::BlockCode { .. } => NodeKind::BlockCode,
            Node::InlineCode { .. } => NodeKind::InlineCode,
            Node::MathBlock { .. } => NodeKind::MathBlock,
            Node::MathInline { .. } => NodeKind::MathInline,
            Node::EmojiCode { .. } => NodeKind::EmojiCode,
            Node::UnicodeEmoji { .. } => NodeKind::UnicodeEmoji,
            Node::Mention { .. } => NodeKind::Mention,
            Node::Hashtag { .. } => NodeKind::Hashtag,
            Node::Url { .. } => NodeKind::Url,
            Node::Link { .. } => NodeKind::Link,
            Node::Fn { .. } => NodeKind::Fn,
            Node::Search { .. } => NodeKind::Search,
        }
    }

    /// Child nodes; empty for leaf variants.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Bold { children }
            | Node::Italic { children }
            | Node::Strike { children }
            | Node::Small { children }
            | Node::Plain { children }
            | Node::Quote { children }
            | Node::Center { children }
            | Node::Link { children, .. }
            | Node::Fn { children, .. } => children,
            _ => &[],
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text { text } => Some(text),
            _ => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text { .. })
    }
}

/// Appends `node`, folding it into the previous node when both are text.
///
/// Every node list the parser builds goes through here, which is what keeps
/// adjacent text nodes from ever appearing in the output.
pub(crate) fn push_merged(nodes: &mut Vec<Node>, node: Node) {
    if let Node::Text { text } = &node
        && let Some(Node::Text { text: last }) = nodes.last_mut()
    {
        last.push_str(text);
        return;
    }
    nodes.push(node);
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Node", 3)?;
        state.serialize_field("type", self.kind().as_str())?;
        state.serialize_field("props", &Props(self))?;
        state.serialize_field("children", self.children())?;
        state.end()
    }
}

impl Serialize for FnArg {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FnArg::Value(value) => serializer.serialize_str(value),
            FnArg::Flag => serializer.serialize_bool(true),
        }
    }
}

/// The `props` object of a node.
struct Props<'a>(&'a Node);

impl Serialize for Props<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        match self.0 {
            Node::Text { text } => map.serialize_entry("text", text)?,
            Node::BlockCode { code, lang } => {
                map.serialize_entry("code", code)?;
                map.serialize_entry("lang", lang)?;
            }
            Node::InlineCode { code } => map.serialize_entry("code", code)?,
            Node::MathBlock { formula } | Node::MathInline { formula } => {
                map.serialize_entry("formula", formula)?
            }
            Node::EmojiCode { name } => map.serialize_entry("name", name)?,
            Node::UnicodeEmoji { emoji } => map.serialize_entry("emoji", emoji)?,
            Node::Mention {
                username,
                host,
                acct,
            } => {
                map.serialize_entry("username", username)?;
                map.serialize_entry("host", host)?;
                map.serialize_entry("acct", acct)?;
            }
            Node::Hashtag { hashtag } => map.serialize_entry("hashtag", hashtag)?,
            Node::Url { url } => map.serialize_entry("url", url)?,
            Node::Link { url, silent, .. } => {
                map.serialize_entry("url", url)?;
                map.serialize_entry("silent", silent)?;
            }
            Node::Fn { name, args, .. } => {
                map.serialize_entry("name", name)?;
                map.serialize_entry("args", args)?;
            }
            Node::Search { query, content } => {
                map.serialize_entry("query", query)?;
                map.serialize_entry("content", content)?;
            }
            Node::Bold { .. }
            | Node::Italic { .. }
            | Node::Strike { .. }
            | Node::Small { .. }
            | Node::Plain { .. }
            | Node::Quote { .. }
            | Node::Center { .. } => {}
        }
        map.end()
    }
}
