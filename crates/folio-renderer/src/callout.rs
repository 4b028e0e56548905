//! Call-out (admonition) blocks.
//!
//! A blockquote whose first paragraph starts with `[!tip]`, `[!info]`,
//! `[!warning]`, `[!danger]` or `[!note]` becomes a titled call-out:
//!
//! ```markdown
//! > [!warning] Heads up
//! >
//! > The rest of the quote renders inside the call-out.
//! ```
//!
//! Markers are matched case-insensitively and removed from the visible text.
//! Any other `[!...]` marker, including GitHub's `[!IMPORTANT]` and
//! `[!CAUTION]`, leaves the quotation as it is.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

static MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\[!(tip|info|warning|danger|note)\]\s*").unwrap());

const ICON_TIP: &str = r#"<svg viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2"><path d="M9 18h6M10 22h4M12 2v1M12 6a4 4 0 0 1 4 4c0 1.5-.8 2.8-2 3.5V15H10v-1.5C8.8 12.8 8 11.5 8 10a4 4 0 0 1 4-4z"/></svg>"#;
const ICON_INFO: &str = r#"<svg viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2"><circle cx="12" cy="12" r="10"/><line x1="12" y1="16" x2="12" y2="12"/><line x1="12" y1="8" x2="12.01" y2="8"/></svg>"#;
const ICON_WARNING: &str = r#"<svg viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2"><path d="M10.29 3.86L1.82 18a2 2 0 0 0 1.71 3h16.94a2 2 0 0 0 1.71-3L13.71 3.86a2 2 0 0 0-3.42 0z"/><line x1="12" y1="9" x2="12" y2="13"/><line x1="12" y1="17" x2="12.01" y2="17"/></svg>"#;
const ICON_DANGER: &str = r#"<svg viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2"><circle cx="12" cy="12" r="10"/><line x1="15" y1="9" x2="9" y2="15"/><line x1="9" y1="9" x2="15" y2="15"/></svg>"#;
const ICON_NOTE: &str = r#"<svg viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2"><path d="M14 2H6a2 2 0 0 0-2 2v16a2 2 0 0 0 2 2h12a2 2 0 0 0 2-2V8z"/><polyline points="14 2 14 8 20 8"/><line x1="16" y1="13" x2="8" y2="13"/><line x1="16" y1="17" x2="8" y2="17"/></svg>"#;

/// Call-out type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CalloutKind {
    Tip,
    Info,
    Warning,
    Danger,
    Note,
}

impl CalloutKind {
    /// Lowercase name used in CSS classes.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tip => "tip",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Danger => "danger",
            Self::Note => "note",
        }
    }

    /// Inline SVG icon.
    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Self::Tip => ICON_TIP,
            Self::Info => ICON_INFO,
            Self::Warning => ICON_WARNING,
            Self::Danger => ICON_DANGER,
            Self::Note => ICON_NOTE,
        }
    }

    /// Display title in the given locale.
    #[must_use]
    pub fn title(self, locale: Locale) -> &'static str {
        match (locale, self) {
            (Locale::En, Self::Tip) => "Tip",
            (Locale::En, Self::Info) => "Info",
            (Locale::En, Self::Warning) => "Warning",
            (Locale::En, Self::Danger) => "Danger",
            (Locale::En, Self::Note) => "Note",
            (Locale::Zh, Self::Tip) => "提示",
            (Locale::Zh, Self::Info) => "信息",
            (Locale::Zh, Self::Warning) => "警告",
            (Locale::Zh, Self::Danger) => "危险",
            (Locale::Zh, Self::Note) => "注意",
        }
    }

    fn from_marker(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "tip" => Some(Self::Tip),
            "info" => Some(Self::Info),
            "warning" => Some(Self::Warning),
            "danger" => Some(Self::Danger),
            "note" => Some(Self::Note),
            _ => None,
        }
    }
}

/// Language of generated labels such as call-out titles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    En,
    Zh,
}

/// Error returned when parsing an unsupported locale tag.
#[derive(Debug, thiserror::Error)]
#[error("unsupported locale '{0}' (expected 'en' or 'zh')")]
pub struct UnknownLocale(String);

impl FromStr for Locale {
    type Err = UnknownLocale;

    /// Accepts a bare language (`zh`) or a tag with region (`zh-CN`, `en_US`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let language = s.split(['-', '_']).next().unwrap_or_default();
        match language.to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "zh" => Ok(Self::Zh),
            _ => Err(UnknownLocale(s.to_owned())),
        }
    }
}

/// Match a call-out marker at the start of `text`.
///
/// Returns the kind and the byte length of the marker including trailing
/// whitespace.
#[must_use]
pub fn match_marker(text: &str) -> Option<(CalloutKind, usize)> {
    let caps = MARKER_RE.captures(text)?;
    let kind = CalloutKind::from_marker(caps.get(1)?.as_str())?;
    Some((kind, caps.get(0)?.end()))
}
