//! Per-document processing.
//!
//! Turns the raw text of one source into a [`DocumentRecord`]: front matter,
//! slug, title, rendered HTML and text metrics.

use folio_config::RenderConfig;
use folio_meta::{FrontMatter, normalize_source, parse_front_matter, reading_time, word_count};
use folio_renderer::{
    DEFAULT_DIAGRAM_LANGUAGE, DiagramProcessor, HtmlBackend, Locale, MarkdownRenderer, TocEntry,
};
use serde::Serialize;

use crate::title::{last_updated, resolve_title};

/// Rendering settings shared by every document of a load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    /// Locale for call-out titles.
    pub locale: Locale,
    /// Fence keyword emitted as a client-side diagram.
    pub diagram_language: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            diagram_language: DEFAULT_DIAGRAM_LANGUAGE.to_owned(),
        }
    }
}

impl From<&RenderConfig> for RenderOptions {
    fn from(config: &RenderConfig) -> Self {
        Self {
            locale: config.locale,
            diagram_language: config.diagram_language.clone(),
        }
    }
}

/// A loaded and rendered document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    /// Path-derived identifier without extension (e.g., "guide/intro").
    pub slug: String,
    /// First slug segment.
    pub section: String,
    /// Resolved title.
    pub title: String,
    /// Body text after the front matter block, serialized as `raw`.
    pub raw: String,
    /// Rendered HTML fragment.
    pub html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    pub word_count: usize,
    /// Estimated reading time in minutes, at least 1.
    pub reading_time: usize,
    pub front_matter: FrontMatter,
    /// Headings below the title.
    pub toc: Vec<TocEntry>,
}

impl DocumentRecord {
    /// Build a record from the raw text of the source at `path`.
    pub(crate) fn build(path: &str, raw: &str, options: &RenderOptions) -> Self {
        let (front_matter, body) = parse_front_matter(normalize_source(raw));

        let slug = slug_from_path(path);
        let section = section_of(&slug).to_owned();
        let (dir, stem) = slug.rsplit_once('/').unwrap_or(("", slug.as_str()));

        let result = MarkdownRenderer::<HtmlBackend>::new()
            .with_title_extraction()
            .with_base_path(dir)
            .with_locale(options.locale)
            .with_processor(DiagramProcessor::new(options.diagram_language.as_str()))
            .render_markdown(body);

        let title = resolve_title(&front_matter, result.title, stem);
        let words = word_count(body);

        Self {
            section,
            title,
            raw: body.to_owned(),
            html: result.html,
            last_updated: last_updated(&front_matter),
            word_count: words,
            reading_time: reading_time(words),
            front_matter,
            toc: result.toc,
            slug,
        }
    }
}

/// Derive a slug from a storage path.
///
/// Normalizes `\` to `/` and strips a trailing `.md` in any letter case.
#[must_use]
pub fn slug_from_path(path: &str) -> String {
    let mut slug = path.replace('\\', "/");
    let ext_start = slug.len().saturating_sub(3);
    if slug
        .get(ext_start..)
        .is_some_and(|ext| ext.eq_ignore_ascii_case(".md"))
    {
        slug.truncate(ext_start);
    }
    slug
}

fn section_of(slug: &str) -> &str {
    slug.split('/').next().unwrap_or(slug)
}
