//! # mfm-syntax
//!
//! A parser for MFM, the markup language of Misskey posts, producing a typed
//! node tree ready for JSON serialization.
//!
//! ## What Makes MFM Different
//!
//! MFM mixes Markdown-like emphasis with HTML-style tags, fediverse mentions,
//! hashtags, custom emoji shortcodes and animated "function" blocks:
//!
//! ```text
//! <center>$[tada **Hello** @ai@misskey.io :blobcat:]</center>
//! ```
//!
//! Posts are written by people, not tools, so the parser has to accept
//! anything. Unclosed or malformed syntax is never an error: it simply stays
//! text. There is no input for which [`parse`] fails or panics.
//!
//! ## Architecture Overview
//!
//! ```text
//! Source Text → Cursor → Block / Inline Rules → Vec<Node>
//!               (checkpoint,   (ordered tables,
//!                depth)         first match wins)
//! ```
//!
//! ### 1. Cursor ([`cursor`] module)
//!
//! A byte position over the source plus per-call state: the nesting depth
//! and whether a link label is being parsed. Rules take a checkpoint before
//! trying a construct and restore it when the construct does not close.
//!
//! ### 2. Grammar ([`parser`] module)
//!
//! Block rules (quote, code block, math block, center, search) are tried at
//! line starts, then inline rules in a fixed priority order. When nothing
//! matches, one codepoint is taken as literal text.
//!
//! ### 3. Nodes ([`node`] module)
//!
//! One [`Node`] variant per construct. Adjacent text is merged as it is
//! pushed, and [`Node`] serializes to the `{type, props, children}` JSON shape
//! renderers expect.
//!
//! ## Module Structure
//!
//! ```text
//! mfm-syntax/
//! ├── lib.rs           # This file - public API and snapshot tests
//! ├── node.rs          # Node enum and its JSON serialization
//! ├── cursor.rs        # Position, checkpoints, depth guard
//! ├── emoji.rs         # Unicode emoji sequence matching
//! ├── dump.rs          # Indented tree rendering
//! └── parser/
//!     ├── mod.rs       # Driver loops and public parse functions
//!     └── grammar/
//!         ├── mod.rs   # Ordered rule tables
//!         ├── block.rs # Line-start constructs
//!         └── inline.rs# Everything else
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use mfm_syntax::{parse, Node};
//!
//! let nodes = parse("hello @ai");
//! assert_eq!(nodes[0], Node::text("hello "));
//! assert_eq!(nodes[1], Node::mention("ai", None));
//! ```
//!
//! ## Nesting
//!
//! Every construct that parses a body counts one level of nesting. Past
//! [`DEFAULT_NEST_LIMIT`] levels (configurable via [`ParseOptions`]), openers
//! are kept as literal text, which bounds recursion on hostile input. Limits
//! above [`MAX_NEST_LIMIT`] are clamped.

pub mod cursor;
pub mod dump;
pub mod emoji;
pub mod node;
pub mod parser;

pub use cursor::{DEFAULT_NEST_LIMIT, MAX_NEST_LIMIT};
pub use dump::format_tree;
pub use node::{FnArg, Node, NodeKind};
pub use parser::{ParseOptions, parse, parse_inline, parse_with};
