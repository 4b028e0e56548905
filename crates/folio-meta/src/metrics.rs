//! Word count and reading time estimation.
//!
//! Counting works on the markdown body, not on rendered HTML. Code is
//! excluded, links count by their visible label, and each logographic
//! character counts as a word of its own.

use std::sync::LazyLock;

use regex::Regex;

/// Reading speed used by [`reading_time`].
pub const WORDS_PER_MINUTE: usize = 300;

static FENCED_CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"```[\s\S]*?```").unwrap());

static INLINE_CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`[^`]*`").unwrap());

static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*)\]\([^)]*\)").unwrap());

static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[#*_~`>|]").unwrap());

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Whether `c` belongs to the CJK ideograph blocks counted per character.
fn is_wide(c: char) -> bool {
    matches!(c, '\u{4E00}'..='\u{9FFF}' | '\u{3400}'..='\u{4DBF}' | '\u{F900}'..='\u{FAFF}')
}

/// Count words in a markdown body.
///
/// Each wide character counts as one word; the remaining text is split on
/// whitespace.
#[must_use]
pub fn word_count(body: &str) -> usize {
    let text = FENCED_CODE_RE.replace_all(body, "");
    let text = INLINE_CODE_RE.replace_all(&text, "");
    let text = LINK_RE.replace_all(&text, "$1");
    let text = MARKER_RE.replace_all(&text, "");
    let text = WHITESPACE_RE.replace_all(&text, " ");
    let text = text.trim();

    let wide = text.chars().filter(|c| is_wide(*c)).count();
    let rest = text
        .chars()
        .map(|c| if is_wide(c) { ' ' } else { c })
        .collect::<String>();

    wide + rest.split_whitespace().count()
}

/// Estimated reading time in whole minutes, never less than one.
#[must_use]
pub fn reading_time(word_count: usize) -> usize {
    word_count.div_ceil(WORDS_PER_MINUTE).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_words() {
        assert_eq!(word_count("one two  three\nfour"), 4);
    }

    #[test]
    fn test_empty_body() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("   \n\t"), 0);
    }

    #[test]
    fn test_fenced_code_excluded() {
        let body = "Before\n\n```rust\nfn main() { let a = 1; }\n```\n\nAfter";
        assert_eq!(word_count(body), 2);
    }

    #[test]
    fn test_inline_code_excluded() {
        assert_eq!(word_count("Run `cargo build --release` now"), 2);
    }

    #[test]
    fn test_link_counts_label_only() {
        assert_eq!(
            word_count("See [the guide](https://example.com/a very long url)"),
            3
        );
    }

    #[test]
    fn test_markers_removed() {
        assert_eq!(word_count("# Title\n\n> **bold** _it_ ~~gone~~ | cell |"), 5);
    }

    #[test]
    fn test_bullet_markers_removed() {
        assert_eq!(word_count("* one\n* two"), 2);
    }

    #[test]
    fn test_wide_characters_count_individually() {
        assert_eq!(word_count("文档系统"), 4);
    }

    #[test]
    fn test_mixed_scripts() {
        assert_eq!(word_count("使用 Rust 构建"), 5);
        assert_eq!(word_count("中文English混合"), 5);
    }

    #[test]
    fn test_reading_time_minimum_one() {
        assert_eq!(reading_time(0), 1);
        assert_eq!(reading_time(1), 1);
        assert_eq!(reading_time(300), 1);
    }

    #[test]
    fn test_reading_time_rounds_up() {
        assert_eq!(reading_time(301), 2);
        assert_eq!(reading_time(600), 2);
        assert_eq!(reading_time(601), 3);
    }

    #[test]
    fn test_reading_time_matches_ceiling() {
        for count in [0_usize, 1, 299, 300, 301, 899, 900, 12_345] {
            let expected = count.div_ceil(WORDS_PER_MINUTE).max(1);
            assert_eq!(reading_time(count), expected);
            assert!(reading_time(count) >= 1);
        }
    }
}
