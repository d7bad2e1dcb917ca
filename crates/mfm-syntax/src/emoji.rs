//! # Unicode Emoji Recognition
//!
//! Emoji are matched as whole sequences so a rendered glyph cluster never
//! ends up split across nodes:
//!
//! | Sequence | Example |
//! |----------|---------|
//! | keycap | `1` `U+FE0F` `U+20E3` |
//! | flag | two regional indicators |
//! | ZWJ chain | `👩` `ZWJ` `💻` |
//! | modifiers | `👍` `🏽`, trailing variation selectors, tag characters |
//!
//! Eligibility is a fixed table of Unicode block ranges rather than the full
//! `Emoji` property; it matches what the reference grammar accepts.

use std::iter::Peekable;
use std::str::CharIndices;

const ZWJ: char = '\u{200D}';
const VS16: char = '\u{FE0F}';
const KEYCAP: char = '\u{20E3}';

/// Returns true if `c` may start or continue an emoji sequence.
pub fn is_emoji(c: char) -> bool {
    matches!(c,
        '\u{1F600}'..='\u{1F64F}'   // emoticons
        | '\u{1F300}'..='\u{1F5FF}' // misc symbols & pictographs, incl. skin tones
        | '\u{1F680}'..='\u{1F6FF}' // transport & map
        | '\u{1F700}'..='\u{1F77F}' // alchemical
        | '\u{1F780}'..='\u{1F7FF}' // geometric shapes extended
        | '\u{1F800}'..='\u{1F8FF}' // supplemental arrows-c
        | '\u{1F900}'..='\u{1F9FF}' // supplemental symbols & pictographs
        | '\u{1FA00}'..='\u{1FA6F}' // chess
        | '\u{1FA70}'..='\u{1FAFF}' // symbols & pictographs extended-a
        | '\u{2600}'..='\u{26FF}'   // misc symbols
        | '\u{2700}'..='\u{27BF}'   // dingbats
        | '\u{2300}'..='\u{23FF}'   // misc technical
        | '\u{2B50}'..='\u{2B55}'
        | '\u{1F1E0}'..='\u{1F1FF}' // regional indicators
        | ZWJ
        | '\u{FE00}'..='\u{FE0F}'
        | KEYCAP
        | '\u{E0020}'..='\u{E007F}'
        | '\u{00A9}' | '\u{00AE}'
        | '\u{203C}' | '\u{2049}'
        | '\u{2100}'..='\u{21FF}'   // letterlike symbols & arrows
    )
}

pub fn is_skin_tone(c: char) -> bool {
    ('\u{1F3FB}'..='\u{1F3FF}').contains(&c)
}

pub fn is_regional_indicator(c: char) -> bool {
    ('\u{1F1E6}'..='\u{1F1FF}').contains(&c)
}

pub fn is_variation_selector(c: char) -> bool {
    ('\u{FE00}'..='\u{FE0F}').contains(&c)
}

fn is_tag(c: char) -> bool {
    ('\u{E0020}'..='\u{E007F}').contains(&c)
}

/// Offset of the next unconsumed char, or `len` when exhausted.
fn end_after(chars: &mut Peekable<CharIndices<'_>>, len: usize) -> usize {
    chars.peek().map_or(len, |&(i, _)| i)
}

/// Byte length of the emoji sequence at the start of `s`, if there is one.
pub fn match_len(s: &str) -> Option<usize> {
    let mut chars = s.char_indices().peekable();
    let (_, first) = chars.next()?;

    if first == '#' || first == '*' || first.is_ascii_digit() {
        chars.next_if(|&(_, c)| c == VS16);
        chars.next_if(|&(_, c)| c == KEYCAP)?;
        return Some(end_after(&mut chars, s.len()));
    }

    if !is_emoji(first) || is_variation_selector(first) {
        return None;
    }

    if is_regional_indicator(first) {
        chars.next_if(|&(_, c)| is_regional_indicator(c));
        chars.next_if(|&(_, c)| c == VS16);
        return Some(end_after(&mut chars, s.len()));
    }

    while let Some(&(_, c)) = chars.peek() {
        if c == ZWJ {
            chars.next();
            chars.next_if(|&(_, c)| is_emoji(c) || c >= '\u{2600}');
        } else if is_variation_selector(c) || is_skin_tone(c) || c == KEYCAP || is_tag(c) {
            chars.next();
        } else {
            break;
        }
    }
    Some(end_after(&mut chars, s.len()))
}
