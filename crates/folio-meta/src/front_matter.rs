//! Front matter extraction.
//!
//! A document may open with a metadata block:
//!
//! ```text
//! ---
//! title: Getting Started
//! lastUpdated: "2024-05-01"
//! ---
//! # Body starts here
//! ```
//!
//! Only flat `key: value` lines are understood. Anything else inside the
//! block is skipped without error.

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use serde::Serialize;

/// Matches a `---` delimited block anchored at the very start of the input.
///
/// The body of the block is optional so that `---\n---\n` is accepted as an
/// empty block.
static FRONT_MATTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\A---[ \t]*\r?\n(?:([\s\S]*?)\r?\n)?---[ \t]*(?:\r?\n|\z)").unwrap()
});

/// Ordered `key: value` metadata from a document's front matter.
///
/// Keys keep the position of their first occurrence; a repeated key takes the
/// value of its last occurrence.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FrontMatter {
    entries: IndexMap<String, String>,
}

impl FrontMatter {
    /// Create empty metadata.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Insert or replace a value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries were parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Strip a leading byte-order mark left behind by some editors.
#[must_use]
pub fn normalize_source(raw: &str) -> &str {
    raw.strip_prefix('\u{FEFF}').unwrap_or(raw)
}

/// Split front matter off the head of `raw`.
///
/// Returns the parsed metadata and the remaining body. When `raw` does not
/// start with a delimiter line the metadata is empty and the body is `raw`
/// unchanged.
#[must_use]
pub fn parse_front_matter(raw: &str) -> (FrontMatter, &str) {
    let Some(caps) = FRONT_MATTER_RE.captures(raw) else {
        return (FrontMatter::new(), raw);
    };

    let mut meta = FrontMatter::new();
    if let Some(block) = caps.get(1) {
        for line in block.as_str().lines() {
            if let Some((key, value)) = parse_line(line) {
                meta.insert(key, value);
            }
        }
    }

    let end = caps.get(0).map_or(0, |m| m.end());
    (meta, &raw[end..])
}

/// Parse one `key: value` line. Lines without a key before the colon are skipped.
fn parse_line(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(':')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, strip_quotes(value.trim())))
}

/// Remove one quote character from each end, independently.
fn strip_quotes(value: &str) -> &str {
    let value = value.strip_prefix(['"', '\'']).unwrap_or(value);
    value.strip_suffix(['"', '\'']).unwrap_or(value)
}
