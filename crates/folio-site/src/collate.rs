//! Case- and width-insensitive string ordering.
//!
//! Used for sorting documents by slug and sidebar entries by label. Fullwidth
//! ASCII variants (`Ａ`, `１`, ideographic space) compare equal to their ASCII
//! counterparts and letter case is ignored. Strings that compare equal after
//! folding are ordered the way English locale collation does it: lowercase
//! before uppercase, ASCII before fullwidth, then by code point.

use std::cmp::Ordering;

/// Compare two strings for display ordering.
#[must_use]
pub fn compare(a: &str, b: &str) -> Ordering {
    fold(a)
        .cmp(fold(b))
        .then_with(|| a.chars().map(variant_rank).cmp(b.chars().map(variant_rank)))
        .then_with(|| a.cmp(b))
}

/// Tie-break rank of a character among its folded equals.
fn variant_rank(c: char) -> u8 {
    let wide = fold_width(c) != c;
    u8::from(wide) * 2 + u8::from(c.is_uppercase())
}

fn fold(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars().map(fold_width).flat_map(char::to_lowercase)
}

fn fold_width(c: char) -> char {
    match c {
        '\u{3000}' => ' ',
        '\u{FF01}'..='\u{FF5E}' => char::from_u32(u32::from(c) - 0xFEE0).unwrap_or(c),
        _ => c,
    }
}
