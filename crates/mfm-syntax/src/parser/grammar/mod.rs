//! # Grammar Rules
//!
//! Each rule is an attempt function over the [`Cursor`]:
//!
//! ```ignore
//! fn rule(cur: &mut Cursor<'_>) -> Option<Node> {
//!     let cp = cur.checkpoint();     // 1. Remember where we started
//!     if !cur.eat("~~") {            // 2. Cheap rejection before any work
//!         return None;
//!     }
//!     match parser::inline_until(cur, "~~") {
//!         Some(children) => Some(Node::Strike { children }), // 3. Commit
//!         None => {
//!             cur.restore(cp);       // 4. Or put everything back
//!             None
//!         }
//!     }
//! }
//! ```
//!
//! A rule that returns `None` must leave the cursor exactly where it found
//! it. The dispatcher then tries the next rule in the table.
//!
//! ## Rule Order
//!
//! The tables below are not just a list of supported syntax: their order is
//! how ambiguous input is resolved. `***` is tried before `**` before `*`;
//! HTML-style tags before the emphasis markers; mentions, hashtags and emoji
//! codes before links and bare URLs. Reordering changes the parse of
//! existing posts.

mod block;
mod inline;

use crate::cursor::Cursor;
use crate::node::Node;

type Rule = fn(&mut Cursor<'_>) -> Option<Node>;

const BLOCK_RULES: &[Rule] = &[
    block::quote,
    block::code_block,
    block::math_block,
    block::center,
    block::search,
];

const INLINE_RULES: &[Rule] = &[
    inline::unicode_emoji,
    inline::url_alt,
    inline::small_tag,
    inline::plain_tag,
    inline::bold_tag,
    inline::italic_tag,
    inline::strike_tag,
    inline::big,
    inline::bold_asta,
    inline::italic_asta,
    inline::bold_under,
    inline::italic_under,
    inline::inline_code,
    inline::math_inline,
    inline::strike_wave,
    inline::fn_call,
    inline::mention,
    inline::hashtag,
    inline::emoji_code,
    inline::link,
    inline::url,
];

/// Try the block rules. Blocks only start at the beginning of a line.
pub fn block(cur: &mut Cursor<'_>) -> Option<Node> {
    if !cur.at_line_start() {
        return None;
    }
    BLOCK_RULES.iter().find_map(|rule| rule(cur))
}

/// Try the inline rules in priority order.
pub fn inline(cur: &mut Cursor<'_>) -> Option<Node> {
    INLINE_RULES.iter().find_map(|rule| rule(cur))
}
