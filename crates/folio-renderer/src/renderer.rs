//! Generic markdown renderer with pluggable backend.

use std::collections::VecDeque;
use std::fmt::Write;
use std::marker::PhantomData;

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd, TextMergeStream};

use crate::backend::RenderBackend;
use crate::callout::{CalloutKind, Locale, match_marker};
use crate::code_block::{CodeBlockProcessor, fence_language};
use crate::linkify::linkify;
use crate::state::{
    Capture, FootnoteState, Headings, Table, TaskListState, TocEntry, escape_html,
};
use crate::util::heading_level_to_num;

/// Result of rendering markdown.
#[derive(Clone, Debug)]
pub struct RenderResult {
    /// Rendered HTML fragment.
    pub html: String,
    /// Title extracted from first H1 heading (if `extract_title` was enabled).
    pub title: Option<String>,
    /// Table of contents entries.
    pub toc: Vec<TocEntry>,
}

/// Generic markdown renderer with pluggable backend.
///
/// Uses the [`RenderBackend`] trait to delegate format-specific rendering
/// while handling common elements (tables, lists, inline formatting) generically.
///
/// Events are buffered before rendering so that block quotations can be
/// classified as call-outs by looking at their first paragraph before any
/// markup is written.
pub struct MarkdownRenderer<B: RenderBackend> {
    output: String,
    /// Code block or image alt text being collected.
    capture: Option<Capture>,
    table: Table,
    headings: Headings,
    footnotes: FootnoteState,
    tasks: TaskListState,
    base_path: Option<String>,
    processors: Vec<Box<dyn CodeBlockProcessor>>,
    /// Open links, markdown or raw `<a>`; bare URLs inside are not linkified.
    link_depth: usize,
    gfm: bool,
    locale: Locale,
    /// One entry per open block quotation; `None` for a plain quotation.
    callout_stack: Vec<Option<CalloutKind>>,
    _backend: PhantomData<B>,
}

impl<B: RenderBackend> MarkdownRenderer<B> {
    /// Create a new renderer with GFM enabled by default.
    #[must_use]
    pub fn new() -> Self {
        Self {
            output: String::with_capacity(4096),
            capture: None,
            table: Table::default(),
            headings: Headings::new(false),
            footnotes: FootnoteState::default(),
            tasks: TaskListState::default(),
            base_path: None,
            processors: Vec::new(),
            link_depth: 0,
            gfm: true,
            locale: Locale::default(),
            callout_stack: Vec::new(),
            _backend: PhantomData,
        }
    }

    /// Enable title extraction from first H1 heading.
    ///
    /// The heading is still rendered but left out of the table of contents.
    #[must_use]
    pub fn with_title_extraction(mut self) -> Self {
        self.headings = Headings::new(true);
        self
    }

    /// Set base path for resolving relative links.
    ///
    /// This is the directory of the rendered document, e.g. `guide` for
    /// `guide/intro.md`.
    #[must_use]
    pub fn with_base_path(mut self, path: impl Into<String>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Enable or disable GitHub Flavored Markdown features.
    ///
    /// GFM is enabled by default. When enabled, the parser supports:
    /// - Tables
    /// - Strikethrough (`~~text~~`)
    /// - Task lists (`- [ ] item`)
    ///
    /// GitHub's typed block quotes (`> [!IMPORTANT]`) are not among them;
    /// call-outs use their own marker set.
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Set the locale used for call-out titles.
    #[must_use]
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Get parser options based on GFM configuration.
    ///
    /// Footnotes, definition lists, math and smart punctuation are always on.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        let base = Options::ENABLE_FOOTNOTES
            | Options::ENABLE_DEFINITION_LIST
            | Options::ENABLE_MATH
            | Options::ENABLE_SMART_PUNCTUATION;
        if self.gfm {
            base | Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
        } else {
            base
        }
    }

    /// Create a configured parser for the given markdown text.
    #[must_use]
    pub fn create_parser<'a>(&self, markdown: &'a str) -> Parser<'a> {
        Parser::new_ext(markdown, self.parser_options())
    }

    /// Render markdown text directly using configured parser options.
    pub fn render_markdown(&mut self, markdown: &str) -> RenderResult {
        self.render(self.create_parser(markdown))
    }

    /// Add a code block processor.
    ///
    /// Processors are asked in registration order; the first one returning
    /// markup replaces the block.
    ///
    /// # Example
    ///
    /// ```
    /// use folio_renderer::{DiagramProcessor, HtmlBackend, MarkdownRenderer};
    ///
    /// let mut renderer = MarkdownRenderer::<HtmlBackend>::new()
    ///     .with_processor(DiagramProcessor::default());
    /// let result = renderer.render_markdown("```mermaid\ngraph TD\n```");
    /// assert_eq!(result.html, r#"<div class="mermaid">graph TD</div>"#);
    /// ```
    #[must_use]
    pub fn with_processor<P: CodeBlockProcessor + 'static>(mut self, processor: P) -> Self {
        self.processors.push(Box::new(processor));
        self
    }

    /// Write inline markup to the open heading or the output.
    ///
    /// Markup inside image alt text is dropped; the alt keeps plain text only.
    fn push_inline(&mut self, content: &str) {
        if self.capture.is_some() {
            return;
        }
        if self.headings.is_open() {
            self.headings.push("", content);
        } else {
            self.output.push_str(content);
        }
    }

    /// Render markdown events and return the result.
    pub fn render<'a, I>(&mut self, events: I) -> RenderResult
    where
        I: Iterator<Item = Event<'a>>,
    {
        let mut queue: VecDeque<Event<'a>> = TextMergeStream::new(events).collect();

        while let Some(event) = queue.pop_front() {
            match event {
                Event::Start(tag) => self.start_tag(tag, &mut queue),
                Event::End(tag) => self.end_tag(tag),
                Event::Text(text) => self.text(&text),
                Event::Code(code) => self.inline_code(&code),
                Event::Html(html) => self.output.push_str(&html),
                Event::InlineHtml(html) => self.inline_html(&html),
                Event::SoftBreak => self.soft_break(),
                Event::HardBreak => self.hard_break(),
                Event::Rule => B::horizontal_rule(&mut self.output),
                Event::TaskListMarker(checked) => self.task_list_marker(checked),
                Event::FootnoteReference(label) => self.footnote_reference(&label),
                Event::InlineMath(source) => self.math(&source, false),
                Event::DisplayMath(source) => self.math(&source, true),
            }
        }

        let notes = self.footnotes.take_notes();
        if !notes.is_empty() {
            B::footnote_section(&notes, &mut self.output);
        }

        let (title, toc) = self.headings.take();
        RenderResult {
            html: std::mem::take(&mut self.output),
            title,
            toc,
        }
    }

    /// Open a block element or inline span.
    ///
    /// `queue` holds the events after `tag`; block quotations and list items
    /// look ahead into it.
    #[allow(clippy::too_many_lines)]
    fn start_tag<'a>(&mut self, tag: Tag<'a>, queue: &mut VecDeque<Event<'a>>) {
        match tag {
            Tag::Paragraph => self.output.push_str("<p>"),
            Tag::Heading { level, .. } => {
                // Opening tag is written in end_tag after we have the ID.
                self.headings.open(heading_level_to_num(level));
            }
            Tag::BlockQuote(_) => {
                let kind = take_callout_marker(queue);
                self.callout_stack.push(kind);
                match kind {
                    Some(kind) => {
                        B::callout_start(kind, kind.title(self.locale), &mut self.output);
                    }
                    None => B::blockquote_start(&mut self.output),
                }
            }
            Tag::CodeBlock(kind) => {
                let language = match kind {
                    CodeBlockKind::Fenced(info) => fence_language(&info).map(ToOwned::to_owned),
                    CodeBlockKind::Indented => None,
                };
                self.capture = Some(Capture::Code {
                    language,
                    source: String::new(),
                });
            }
            Tag::List(start) => {
                self.close_task_label();
                match start {
                    Some(1) => self.output.push_str("<ol>"),
                    Some(n) => write!(self.output, r#"<ol start="{n}">"#).unwrap(),
                    None => self.output.push_str("<ul>"),
                }
            }
            Tag::Item => {
                if starts_task_item(queue) {
                    B::task_item_start(&mut self.output);
                } else {
                    self.output.push_str("<li>");
                }
            }
            Tag::FootnoteDefinition(label) => {
                let saved = std::mem::take(&mut self.output);
                self.footnotes.begin_definition(&label, saved);
            }
            Tag::HtmlBlock | Tag::MetadataBlock(_) => {}
            Tag::DefinitionList => self.output.push_str("<dl>"),
            Tag::DefinitionListTitle => self.output.push_str("<dt>"),
            Tag::DefinitionListDefinition => self.output.push_str("<dd>"),
            Tag::Table(alignments) => {
                self.table = Table::new(alignments);
                self.output.push_str("<table>");
            }
            Tag::TableHead => {
                self.table.begin_head();
                self.output.push_str("<thead><tr>");
            }
            Tag::TableRow => {
                self.table.begin_row();
                self.output.push_str("<tr>");
            }
            Tag::TableCell => self.table.open_cell(&mut self.output),
            Tag::Emphasis => self.push_inline("<em>"),
            Tag::Strong => self.push_inline("<strong>"),
            Tag::Strikethrough => self.push_inline("<s>"),
            Tag::Link { dest_url, .. } => {
                self.link_depth += 1;
                let href = B::transform_link(&dest_url, self.base_path.as_deref());
                let link_tag = format!(r#"<a href="{}">"#, escape_html(&href));
                self.push_inline(&link_tag);
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                if let Some(Capture::ImageAlt { nested, .. }) = &mut self.capture {
                    *nested += 1;
                } else {
                    self.capture = Some(Capture::ImageAlt {
                        src: dest_url.into_string(),
                        title: title.into_string(),
                        alt: String::new(),
                        nested: 0,
                    });
                }
            }
            Tag::Superscript => self.push_inline("<sup>"),
            Tag::Subscript => self.push_inline("<sub>"),
        }
    }

    #[allow(clippy::too_many_lines)]
    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                self.close_task_label();
                self.output.push_str("</p>");
            }
            TagEnd::Heading(_level) => {
                if let Some(heading) = self.headings.close() {
                    write!(
                        self.output,
                        r#"<h{0} id="{1}">{2}</h{0}>"#,
                        heading.level, heading.id, heading.html
                    )
                    .unwrap();
                }
            }
            TagEnd::BlockQuote(_) => match self.callout_stack.pop() {
                Some(Some(kind)) => B::callout_end(kind, &mut self.output),
                _ => B::blockquote_end(&mut self.output),
            },
            TagEnd::CodeBlock => {
                if let Some(Capture::Code { language, source }) = self.capture.take() {
                    self.code_block(language.as_deref(), &source);
                }
            }
            TagEnd::List(ordered) => {
                self.output
                    .push_str(if ordered { "</ol>" } else { "</ul>" });
            }
            TagEnd::Item => {
                self.close_task_label();
                self.output.push_str("</li>");
            }
            TagEnd::FootnoteDefinition => {
                let body = std::mem::take(&mut self.output);
                self.output = self.footnotes.end_definition(body);
            }
            TagEnd::HtmlBlock | TagEnd::MetadataBlock(_) => {}
            TagEnd::Image => self.end_image(),
            TagEnd::DefinitionList => self.output.push_str("</dl>"),
            TagEnd::DefinitionListTitle => self.output.push_str("</dt>"),
            TagEnd::DefinitionListDefinition => self.output.push_str("</dd>"),
            TagEnd::Table => self.output.push_str("</tbody></table>"),
            TagEnd::TableHead => {
                self.output.push_str("</tr></thead><tbody>");
                self.table.begin_body();
            }
            TagEnd::TableRow => self.output.push_str("</tr>"),
            TagEnd::TableCell => self.table.close_cell(&mut self.output),
            TagEnd::Emphasis => self.push_inline("</em>"),
            TagEnd::Strong => self.push_inline("</strong>"),
            TagEnd::Strikethrough => self.push_inline("</s>"),
            TagEnd::Link => {
                self.push_inline("</a>");
                self.link_depth = self.link_depth.saturating_sub(1);
            }
            TagEnd::Superscript => self.push_inline("</sup>"),
            TagEnd::Subscript => self.push_inline("</sub>"),
        }
    }

    /// Hand a finished code block to the processors, then to the backend.
    fn code_block(&mut self, language: Option<&str>, source: &str) {
        let replaced = language.and_then(|language| {
            self.processors
                .iter()
                .find_map(|processor| processor.process(language, source))
        });
        match replaced {
            Some(html) => self.output.push_str(&html),
            None => B::code_block(language, source, &mut self.output),
        }
    }

    fn end_image(&mut self) {
        if let Some(Capture::ImageAlt { nested, .. }) = &mut self.capture
            && *nested > 0
        {
            *nested -= 1;
            return;
        }
        if let Some(Capture::ImageAlt {
            src, title, alt, ..
        }) = self.capture.take()
        {
            let mut html = String::new();
            B::image(&src, &alt, &title, &mut html);
            self.push_inline(&html);
        }
    }

    fn text(&mut self, text: &str) {
        if let Some(capture) = &mut self.capture {
            capture.push(text);
        } else if self.headings.is_open() {
            self.headings.push(text, &escape_html(text));
        } else if self.link_depth > 0 {
            self.output.push_str(&escape_html(text));
        } else {
            self.output.push_str(&linkify(text));
        }
    }

    fn inline_code(&mut self, code: &str) {
        if let Some(capture) = &mut self.capture {
            capture.push(code);
            return;
        }
        let html = format!("<code>{}</code>", escape_html(code));
        if self.headings.is_open() {
            self.headings.push(code, &html);
        } else {
            self.output.push_str(&html);
        }
    }

    fn inline_html(&mut self, html: &str) {
        match anchor_tag(html) {
            Some(true) => self.link_depth += 1,
            Some(false) => self.link_depth = self.link_depth.saturating_sub(1),
            None => {}
        }
        self.push_inline(html);
    }

    fn soft_break(&mut self) {
        if let Some(capture) = &mut self.capture {
            capture.push_break();
        } else if self.headings.is_open() {
            self.headings.push(" ", "\n");
        } else {
            self.output.push('\n');
        }
    }

    fn hard_break(&mut self) {
        if let Some(capture) = &mut self.capture {
            capture.push_break();
            return;
        }
        let mut html = String::new();
        B::hard_break(&mut html);
        self.push_inline(&html);
    }

    fn task_list_marker(&mut self, checked: bool) {
        let id = self.tasks.next_marker();
        B::task_list_marker(checked, id, &mut self.output);
    }

    fn close_task_label(&mut self) {
        if self.tasks.take_open_label() {
            B::task_label_end(&mut self.output);
        }
    }

    fn footnote_reference(&mut self, label: &str) {
        let (number, occurrence) = self.footnotes.reference(label);
        let mut html = String::new();
        B::footnote_reference(number, occurrence, &mut html);
        self.push_inline(&html);
    }

    fn math(&mut self, source: &str, display: bool) {
        let mut html = String::new();
        B::math(source, display, &mut html);
        if self.headings.is_open() {
            self.headings.push(source, &html);
        } else {
            self.push_inline(&html);
        }
    }
}

impl<B: RenderBackend> Default for MarkdownRenderer<B> {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip a call-out marker from the first paragraph of a block quotation.
///
/// `queue` holds the events following the quotation's start tag. When the
/// first paragraph begins with a marker, the marker text is removed (along
/// with the line break after it, and the paragraph itself if nothing is left)
/// and the call-out kind is returned.
fn take_callout_marker(queue: &mut VecDeque<Event<'_>>) -> Option<CalloutKind> {
    if !matches!(queue.front(), Some(Event::Start(Tag::Paragraph))) {
        return None;
    }
    let Some(Event::Text(text)) = queue.get(1) else {
        return None;
    };
    let (kind, len) = match_marker(text)?;
    let rest = text[len..].to_owned();

    if rest.is_empty() {
        queue.remove(1);
        if matches!(queue.get(1), Some(Event::SoftBreak | Event::HardBreak)) {
            queue.remove(1);
        }
        if matches!(queue.get(1), Some(Event::End(TagEnd::Paragraph))) {
            queue.remove(1);
            queue.pop_front();
        }
    } else {
        queue[1] = Event::Text(rest.into());
    }

    Some(kind)
}

/// Whether the list item whose start tag was just taken carries a task marker.
fn starts_task_item(queue: &VecDeque<Event<'_>>) -> bool {
    match queue.front() {
        Some(Event::TaskListMarker(_)) => true,
        Some(Event::Start(Tag::Paragraph)) => {
            matches!(queue.get(1), Some(Event::TaskListMarker(_)))
        }
        _ => false,
    }
}

/// Classify raw inline HTML as an `<a>` open tag (`true`) or close tag (`false`).
fn anchor_tag(html: &str) -> Option<bool> {
    let tag = html.strip_prefix('<')?;
    let (name, opening) = match tag.strip_prefix('/') {
        Some(name) => (name, false),
        None => (tag, true),
    };
    let mut chars = name.chars();
    let is_anchor = chars.next().is_some_and(|c| c.eq_ignore_ascii_case(&'a'))
        && chars.next().is_none_or(|c| c == '>' || c.is_ascii_whitespace());
    is_anchor.then_some(opening)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{DiagramProcessor, HtmlBackend};

    fn render_html(markdown: &str) -> RenderResult {
        MarkdownRenderer::<HtmlBackend>::new().render_markdown(markdown)
    }

    fn render_html_with_title(markdown: &str) -> RenderResult {
        MarkdownRenderer::<HtmlBackend>::new()
            .with_title_extraction()
            .render_markdown(markdown)
    }

    fn render_with_base_path(markdown: &str, base_path: &str) -> RenderResult {
        MarkdownRenderer::<HtmlBackend>::new()
            .with_base_path(base_path)
            .render_markdown(markdown)
    }

    #[test]
    fn test_html_basic_paragraph() {
        let result = render_html("Hello, world!");
        assert_eq!(result.html, "<p>Hello, world!</p>");
    }

    #[test]
    fn test_html_heading_with_id() {
        let result = render_html("## Section Title");
        assert_eq!(result.html, r#"<h2 id="section-title">Section Title</h2>"#);
        assert_eq!(result.toc.len(), 1);
        assert_eq!(result.toc[0].level, 2);
        assert_eq!(result.toc[0].title, "Section Title");
        assert_eq!(result.toc[0].id, "section-title");
    }

    #[test]
    fn test_html_title_extraction() {
        let markdown = "# My Title\n\nSome content\n\n## Section";
        let result = render_html_with_title(markdown);

        assert_eq!(result.title, Some("My Title".to_owned()));
        assert!(result.html.contains(r#"<h1 id="my-title">My Title</h1>"#));
        // ToC excludes title but includes other headings
        assert_eq!(result.toc.len(), 1);
        assert_eq!(result.toc[0].level, 2);
    }

    #[test]
    fn test_title_not_extracted_by_default() {
        let result = render_html("# My Title");
        assert_eq!(result.title, None);
        assert_eq!(result.toc.len(), 1);
    }

    #[test]
    fn test_html_code_block() {
        let result = render_html("```rust\nfn main() {}\n```");
        assert!(result.html.starts_with(r#"<pre class="code-block"><span class="code-language">rust</span>"#));
        assert!(result.html.contains(r#"<code class="hljs language-rust">"#));
        assert!(result.html.contains("main"));
    }

    #[test]
    fn test_code_block_unknown_language() {
        let result = render_html("```foo\nbar\n```");
        assert_eq!(
            result.html,
            r#"<pre class="code-block"><div class="code-wrapper"><div class="line-numbers"><span class="line-number">1</span></div><code class="hljs"><span class="code-line">bar</span></code></div></pre>"#
        );
    }

    #[test]
    fn test_indented_code_block() {
        let result = render_html("    plain code\n");
        assert!(result.html.contains(r#"<code class="hljs">"#));
        assert!(result.html.contains("plain code"));
    }

    #[test]
    fn test_mermaid_block() {
        let mut renderer =
            MarkdownRenderer::<HtmlBackend>::new().with_processor(DiagramProcessor::default());
        let result = renderer.render_markdown("```mermaid\ngraph TD\n  A-->B\n```");
        assert_eq!(
            result.html,
            "<div class=\"mermaid\">graph TD\n  A--&gt;B</div>"
        );
    }

    #[test]
    fn test_html_blockquote() {
        let result = render_html("> Note");
        assert_eq!(result.html, "<blockquote><p>Note</p></blockquote>");
    }

    #[test]
    fn test_callout_with_inline_title_text() {
        let result = render_html("> [!warning] Heads up\n>\n> more text");

        assert!(result.html.starts_with(r#"<div class="callout callout--warning">"#));
        assert!(result.html.contains(r#"<div class="callout__title">Warning</div>"#));
        assert!(result.html.contains("<p>Heads up</p>"));
        assert!(result.html.contains("<p>more text</p>"));
        assert!(result.html.ends_with("</div></div>"));
        assert!(!result.html.contains("[!warning]"));
        assert!(!result.html.contains("blockquote"));
    }

    #[test]
    fn test_callout_marker_on_own_line() {
        let result = render_html("> [!tip]\n> Use the **cache**.");

        assert!(result.html.contains("callout--tip"));
        assert!(result.html.contains("<p>Use the <strong>cache</strong>.</p>"));
        assert!(!result.html.contains("[!tip]"));
    }

    #[test]
    fn test_callout_kinds() {
        for (marker, class) in [
            ("[!info]", "callout--info"),
            ("[!danger]", "callout--danger"),
            ("[!note]", "callout--note"),
            ("[!INFO]", "callout--info"),
            ("[!Danger]", "callout--danger"),
        ] {
            let result = render_html(&format!("> {marker}\n> body"));
            assert!(result.html.contains(class), "{marker}: {}", result.html);
            assert!(!result.html.contains(marker), "{marker}: {}", result.html);
        }
    }

    #[test]
    fn test_github_alert_markers_render_literally() {
        let result = render_html("> [!caution]\n> text");
        assert_eq!(result.html, "<blockquote><p>[!caution]\ntext</p></blockquote>");

        let result = render_html("> [!IMPORTANT]\n> Critical information.");
        assert_eq!(
            result.html,
            "<blockquote><p>[!IMPORTANT]\nCritical information.</p></blockquote>"
        );

        let result = render_html("> [!caution] text");
        assert_eq!(result.html, "<blockquote><p>[!caution] text</p></blockquote>");
    }

    #[test]
    fn test_shared_markers_on_own_line_still_callouts() {
        for (marker, class) in [("[!NOTE]", "callout--note"), ("[!Warning]", "callout--warning")] {
            let result = render_html(&format!("> {marker}\n> body"));
            assert!(result.html.contains(class), "{marker}: {}", result.html);
            assert!(result.html.contains("<p>body</p>"), "{marker}: {}", result.html);
        }
    }

    #[test]
    fn test_callout_marker_alone_drops_paragraph() {
        let result = render_html("> [!danger]\n\n");
        assert!(result.html.contains("callout--danger"));
        assert!(!result.html.contains("<p>"));
    }

    #[test]
    fn test_callout_localized_title() {
        let mut renderer = MarkdownRenderer::<HtmlBackend>::new().with_locale(Locale::Zh);
        let result = renderer.render_markdown("> [!warning]\n> 小心");
        assert!(result.html.contains(r#"<div class="callout__title">警告</div>"#));
    }

    #[test]
    fn test_nested_quote_inside_callout() {
        let result = render_html("> [!note]\n> outer\n>\n> > inner");

        assert!(result.html.contains("callout--note"));
        assert!(result.html.contains("<blockquote><p>inner</p></blockquote></div></div>"));
    }

    #[test]
    fn test_callout_inside_quote() {
        let result = render_html("> outer\n>\n> > [!tip]\n> > inner");

        assert!(result.html.starts_with("<blockquote><p>outer</p>"));
        assert!(result.html.contains("callout--tip"));
        assert!(result.html.ends_with("</div></div></blockquote>"));
    }

    #[test]
    fn test_unknown_marker_renders_literally() {
        let result = render_html("> [!bogus] text");
        assert!(result.html.starts_with("<blockquote>"));
        assert!(result.html.contains("[!bogus] text"));
    }

    #[test]
    fn test_callout_with_list() {
        let result = render_html("> [!warning]\n> Be careful:\n> - Item 1\n> - Item 2");
        assert!(result.html.contains("callout--warning"));
        assert!(result.html.contains("<ul>"));
        assert!(result.html.contains("<li>Item 1</li>"));
    }

    #[test]
    fn test_html_image() {
        let result = render_html("![Alt text](image.png)");
        assert_eq!(result.html, r#"<p><img src="image.png" alt="Alt text"></p>"#);
    }

    #[test]
    fn test_html_table() {
        let result = render_html("| A | B |\n|---|---|\n| 1 | 2 |");
        assert_eq!(
            result.html,
            "<table><thead><tr><th>A</th><th>B</th></tr></thead><tbody><tr><td>1</td><td>2</td></tr></tbody></table>"
        );
    }

    #[test]
    fn test_html_link_with_base_path() {
        let result = render_with_base_path("[Link](./page.md)", "base/path");
        assert!(result.html.contains(r#"href="/base/path/page""#));
    }

    #[test]
    fn test_duplicate_heading_ids() {
        let result = render_html("## FAQ\n\n## FAQ\n\n## FAQ");
        assert_eq!(result.toc.len(), 3);
        assert_eq!(result.toc[0].id, "faq");
        assert_eq!(result.toc[1].id, "faq-1");
        assert_eq!(result.toc[2].id, "faq-2");
    }

    #[test]
    fn test_heading_with_inline_code() {
        let result = render_html("## Install `npm`");
        assert!(result.html.contains("<code>npm</code>"));
        assert_eq!(result.toc[0].title, "Install npm");
    }

    #[test]
    fn test_emphasis_and_strikethrough() {
        let result = render_html("*italic* and **bold** and ~~deleted~~");
        assert!(result.html.contains("<em>italic</em>"));
        assert!(result.html.contains("<strong>bold</strong>"));
        assert!(result.html.contains("<s>deleted</s>"));
    }

    #[test]
    fn test_smart_punctuation() {
        let result = render_html("\"quoted\" -- dash");
        assert_eq!(result.html, "<p>\u{201c}quoted\u{201d} \u{2013} dash</p>");
    }

    #[test]
    fn test_lists() {
        let result = render_html("- Item 1\n- Item 2");
        assert_eq!(result.html, "<ul><li>Item 1</li><li>Item 2</li></ul>");

        let result = render_html("3. Third\n4. Fourth");
        assert!(result.html.starts_with(r#"<ol start="3">"#));
    }

    #[test]
    fn test_task_list() {
        let result = render_html("- [ ] Unchecked\n- [x] Checked");
        assert_eq!(
            result.html,
            concat!(
                r#"<ul><li class="task-list-item"><input class="task-list-item-checkbox" type="checkbox" disabled id="task-item-1">"#,
                r#"<label class="task-list-item-label" for="task-item-1">Unchecked</label></li>"#,
                r#"<li class="task-list-item"><input class="task-list-item-checkbox" type="checkbox" disabled checked id="task-item-2">"#,
                r#"<label class="task-list-item-label" for="task-item-2">Checked</label></li></ul>"#,
            )
        );
    }

    #[test]
    fn test_task_list_with_nested_list() {
        let result = render_html("- [ ] Parent\n  - Child");
        assert!(result.html.contains("Parent</label><ul><li>Child</li></ul></li>"));
    }

    #[test]
    fn test_task_ids_deterministic() {
        let markdown = "- [ ] a\n- [ ] b";
        assert_eq!(render_html(markdown).html, render_html(markdown).html);
    }

    #[test]
    fn test_plain_items_next_to_tasks() {
        let result = render_html("- plain\n- [x] done");
        assert!(result.html.starts_with("<ul><li>plain</li>"));
        assert!(result.html.contains(r#"<li class="task-list-item">"#));
    }

    #[test]
    fn test_footnotes() {
        let result = render_html("Text[^a] and more[^b].\n\n[^b]: Second.\n\n[^a]: First.");

        assert!(result.html.starts_with(
            r##"<p>Text<sup class="footnote-ref"><a href="#fn1" id="fnref1">[1]</a></sup> and more<sup class="footnote-ref"><a href="#fn2" id="fnref2">[2]</a></sup>.</p>"##
        ));
        assert!(result.html.ends_with(concat!(
            r#"<hr class="footnotes-sep"><section class="footnotes"><ol class="footnotes-list">"#,
            r##"<li id="fn1" class="footnote-item"><p>First. <a href="#fnref1" class="footnote-backref">↩︎</a></p></li>"##,
            r##"<li id="fn2" class="footnote-item"><p>Second. <a href="#fnref2" class="footnote-backref">↩︎</a></p></li>"##,
            "</ol></section>",
        )));
    }

    #[test]
    fn test_repeated_footnote_reference() {
        let result = render_html("One[^n] two[^n]\n\n[^n]: Note.");
        assert!(result.html.contains(r#"id="fnref1">[1]"#));
        assert!(result.html.contains(r#"id="fnref1:1">[1]"#));
        assert_eq!(result.html.matches(r#"<li id="fn1""#).count(), 1);
    }

    #[test]
    fn test_unreferenced_footnote_omitted() {
        let result = render_html("No refs.\n\n[^x]: Orphan.");
        assert_eq!(result.html, "<p>No refs.</p>");
    }

    #[test]
    fn test_math() {
        let result = render_html("Inline $a<b$ and\n\n$$x^2$$");
        assert!(result.html.contains(r#"<span class="math math-inline">\(a&lt;b\)</span>"#));
        assert!(result.html.contains(r#"<span class="math math-display">\[x^2\]</span>"#));
    }

    #[test]
    fn test_definition_list() {
        let result = render_html("Term\n: Definition");
        assert!(result.html.starts_with("<dl><dt>Term</dt><dd>"));
        assert!(result.html.contains("Definition"));
        assert!(result.html.ends_with("</dd></dl>"));
    }

    #[test]
    fn test_gfm_disabled() {
        let mut renderer = MarkdownRenderer::<HtmlBackend>::new().with_gfm(false);
        let result = renderer.render_markdown("~~not struck~~");
        assert!(!result.html.contains("<s>"));
    }

    #[test]
    fn test_default_renderer() {
        let parser = Parser::new("Hello");
        let mut renderer = MarkdownRenderer::<HtmlBackend>::default();
        let result = renderer.render(parser);
        assert_eq!(result.html, "<p>Hello</p>");
    }

    #[test]
    fn test_image_in_heading_stays_inside() {
        let result = render_html("# Title ![x](a.png)");
        assert_eq!(
            result.html,
            r#"<h1 id="title">Title <img src="a.png" alt="x"></h1>"#
        );
        assert_eq!(result.toc[0].title, "Title");
    }

    #[test]
    fn test_image_alt_is_plain_text() {
        let result = render_html("![a *b* `c`](x.png)");
        assert_eq!(result.html, r#"<p><img src="x.png" alt="a b c"></p>"#);
    }

    #[test]
    fn test_image_inside_image_alt() {
        let result = render_html("![outer ![inner](i.png) end](o.png) after");
        assert_eq!(
            result.html,
            r#"<p><img src="o.png" alt="outer inner end"> after</p>"#
        );
    }

    #[test]
    fn test_bare_url_linkified() {
        let result = render_html("See https://example.com for more.");
        assert_eq!(
            result.html,
            r#"<p>See <a href="https://example.com">https://example.com</a> for more.</p>"#
        );
    }

    #[test]
    fn test_www_url_linkified_in_list() {
        let result = render_html("- visit www.example.org.");
        assert_eq!(
            result.html,
            r#"<ul><li>visit <a href="http://www.example.org">www.example.org</a>.</li></ul>"#
        );
    }

    #[test]
    fn test_urls_in_code_and_links_untouched() {
        let result = render_html("`https://a.io`");
        assert_eq!(result.html, "<p><code>https://a.io</code></p>");

        let result = render_html("[https://a.io](https://b.io)");
        assert_eq!(result.html.matches("<a ").count(), 1);
        assert!(result.html.contains(">https://a.io</a>"));

        let result = render_html(r#"Go <a href="/x">https://a.io</a> now https://c.io"#);
        assert_eq!(result.html.matches("<a ").count(), 2);
        assert!(result.html.contains(r#"<a href="/x">https://a.io</a>"#));
        assert!(result.html.contains(r#"<a href="https://c.io">https://c.io</a>"#));

        let result = render_html("```
https://a.io
```");
        assert!(!result.html.contains("<a "));
    }

    #[test]
    fn test_url_in_heading_not_linkified() {
        let result = render_html("## Mirror at https://a.io");
        assert!(!result.html.contains("<a "));
        assert_eq!(result.toc[0].title, "Mirror at https://a.io");
    }

    #[test]
    fn test_untagged_code_block_detected() {
        let result = render_html("```
fn main() { let x = 1; }
```");
        assert!(result.html.contains("hljs-"), "{}", result.html);
        assert!(!result.html.contains("code-language"));
        assert!(result.html.contains(r#"<code class="hljs">"#));
    }

    #[test]
    fn test_anchor_tag() {
        assert_eq!(anchor_tag(r#"<a href="/x">"#), Some(true));
        assert_eq!(anchor_tag("<A>"), Some(true));
        assert_eq!(anchor_tag("</a>"), Some(false));
        assert_eq!(anchor_tag("<abbr>"), None);
        assert_eq!(anchor_tag("<br>"), None);
    }

    // Code block processors

    struct Shout;

    impl CodeBlockProcessor for Shout {
        fn process(&self, language: &str, source: &str) -> Option<String> {
            (language == "shout").then(|| format!("<pre>{}</pre>", source.trim().to_uppercase()))
        }
    }

    struct Whisper;

    impl CodeBlockProcessor for Whisper {
        fn process(&self, _language: &str, source: &str) -> Option<String> {
            Some(format!("<small>{}</small>", source.trim()))
        }
    }

    #[test]
    fn test_processor_replaces_matching_block() {
        let mut renderer = MarkdownRenderer::<HtmlBackend>::new().with_processor(Shout);
        let result = renderer.render_markdown("```shout extra=words\nhi there\n```");

        assert_eq!(result.html, "<pre>HI THERE</pre>");
    }

    #[test]
    fn test_processor_declines_other_languages() {
        let mut renderer = MarkdownRenderer::<HtmlBackend>::new().with_processor(Shout);
        let result = renderer.render_markdown("```rust\nfn main() {}\n```");

        assert!(result.html.contains("language-rust"));
    }

    #[test]
    fn test_first_processor_wins() {
        let mut renderer = MarkdownRenderer::<HtmlBackend>::new()
            .with_processor(Shout)
            .with_processor(Whisper);

        assert_eq!(renderer.render_markdown("```shout\na\n```").html, "<pre>A</pre>");
        let mut renderer = MarkdownRenderer::<HtmlBackend>::new()
            .with_processor(Shout)
            .with_processor(Whisper);
        assert_eq!(renderer.render_markdown("```js\nb\n```").html, "<small>b</small>");
    }

    #[test]
    fn test_processors_skip_blocks_without_language() {
        let mut renderer = MarkdownRenderer::<HtmlBackend>::new().with_processor(Whisper);
        let result = renderer.render_markdown("    indented\n");

        assert!(!result.html.contains("<small>"));
        assert!(result.html.contains("indented"));
    }
}
