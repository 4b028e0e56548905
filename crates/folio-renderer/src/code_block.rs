//! Hook for replacing fenced code blocks before highlighting.

/// Replaces selected code blocks with custom HTML.
///
/// Processors registered with
/// [`MarkdownRenderer::with_processor`](crate::MarkdownRenderer::with_processor)
/// are asked in order about every code block with a fence language. The first
/// one returning markup wins and the block skips highlighting.
pub trait CodeBlockProcessor {
    /// Markup replacing a block tagged `language`, or `None` to leave it to
    /// the backend.
    fn process(&self, language: &str, source: &str) -> Option<String>;
}

/// Language word of a fence info string (`rust ignore` → `rust`).
pub(crate) fn fence_language(info: &str) -> Option<&str> {
    info.split_whitespace().next()
}
