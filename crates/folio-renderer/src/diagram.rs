//! Diagram passthrough.
//!
//! Fenced blocks tagged with the diagram keyword skip highlighting and are
//! emitted as escaped source inside a container that a client-side library
//! (mermaid by default) picks up and renders.

use crate::code_block::CodeBlockProcessor;
use crate::state::escape_html;

/// Default diagram keyword.
pub const DEFAULT_DIAGRAM_LANGUAGE: &str = "mermaid";

/// Emits `<div class="{keyword}">source</div>` for diagram code blocks.
#[derive(Debug, Clone)]
pub struct DiagramProcessor {
    language: String,
}

impl DiagramProcessor {
    /// Create a processor for the given fence keyword.
    #[must_use]
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
        }
    }
}

impl Default for DiagramProcessor {
    fn default() -> Self {
        Self::new(DEFAULT_DIAGRAM_LANGUAGE)
    }
}

impl CodeBlockProcessor for DiagramProcessor {
    fn process(&self, language: &str, source: &str) -> Option<String> {
        language.eq_ignore_ascii_case(&self.language).then(|| {
            format!(
                r#"<div class="{}">{}</div>"#,
                escape_html(&self.language),
                escape_html(source.trim())
            )
        })
    }
}
