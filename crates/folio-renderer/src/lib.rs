//! Markdown to HTML rendering for documentation pages.
//!
//! This crate provides a generic [`MarkdownRenderer`] that walks
//! `pulldown-cmark` events and delegates format-specific markup to a
//! [`RenderBackend`]. [`HtmlBackend`] produces the HTML5 fragments served to
//! the documentation browser.
//!
//! Beyond CommonMark the renderer handles:
//! - Call-out blocks (`> [!warning] ...`) with localized titles
//! - Highlighted code blocks with line numbers
//! - Diagram passthrough through [`DiagramProcessor`]
//! - Footnotes, task lists, definition lists and math
//! - Bare `http(s)://` and `www.` URLs turned into links
//!
//! # Example
//!
//! ```
//! use folio_renderer::{HtmlBackend, MarkdownRenderer};
//!
//! let result = MarkdownRenderer::<HtmlBackend>::new()
//!     .with_title_extraction()
//!     .render_markdown("# Hello\n\n> [!tip]\n> **Bold** text");
//!
//! assert_eq!(result.title.as_deref(), Some("Hello"));
//! assert!(result.html.contains("callout--tip"));
//! ```

mod backend;
mod callout;
mod code_block;
mod diagram;
mod highlight;
mod html;
mod linkify;
mod renderer;
mod state;
mod util;

pub use backend::RenderBackend;
pub use callout::{CalloutKind, Locale, UnknownLocale};
pub use code_block::CodeBlockProcessor;
pub use diagram::{DEFAULT_DIAGRAM_LANGUAGE, DiagramProcessor};
pub use highlight::{HighlightedCode, HighlightedLine, highlight, is_known_language};
pub use html::HtmlBackend;
pub use renderer::{MarkdownRenderer, RenderResult};
pub use state::{TocEntry, escape_html, slugify};
