//! Title resolution.

use folio_meta::FrontMatter;

/// Derive a display title from a path or filename.
///
/// Splits on path separators, underscores and hyphens, capitalizes the first
/// character of each segment and joins the segments with spaces:
/// `getting-started` becomes `Getting Started`.
#[must_use]
pub fn derive_title(name: &str) -> String {
    name.split(['\\', '/', '_', '-'])
        .filter(|segment| !segment.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Resolve a document title.
///
/// Precedence: non-blank `title` metadata, then the first-level heading, then
/// a title derived from `file_stem`.
pub(crate) fn resolve_title(
    front_matter: &FrontMatter,
    heading: Option<String>,
    file_stem: &str,
) -> String {
    front_matter
        .get("title")
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .map(ToOwned::to_owned)
        .or(heading)
        .unwrap_or_else(|| derive_title(file_stem))
}

/// Last-updated date from metadata, accepting `last_updated` as an alias.
pub(crate) fn last_updated(front_matter: &FrontMatter) -> Option<String> {
    ["lastUpdated", "last_updated"]
        .into_iter()
        .filter_map(|key| front_matter.get(key))
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(ToOwned::to_owned)
}
