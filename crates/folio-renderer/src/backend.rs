//! Render backend trait for format-specific rendering.
//!
//! The generic [`MarkdownRenderer`](crate::MarkdownRenderer) handles document
//! structure (paragraphs, lists, tables, inline formatting) and delegates the
//! elements whose markup is a styling contract to a backend.

use std::borrow::Cow;
use std::fmt::Write;

use crate::callout::CalloutKind;
use crate::state::escape_html;

/// Backend trait for format-specific rendering operations.
///
/// Implementations provide markup for:
/// - Code blocks (highlighting, line numbers, language label)
/// - Blockquotes and call-outs
/// - Images and link transformation
/// - Task list checkboxes, footnotes and math
pub trait RenderBackend {
    /// Render a code block.
    ///
    /// # Arguments
    ///
    /// * `lang` - Optional language identifier from the fence (e.g., "rust")
    /// * `content` - The code content, usually ending with a newline
    /// * `out` - Output buffer to write to
    fn code_block(lang: Option<&str>, content: &str, out: &mut String);

    /// Render blockquote start tag.
    fn blockquote_start(out: &mut String);

    /// Render blockquote end tag.
    fn blockquote_end(out: &mut String);

    /// Open a call-out container with its icon and title.
    fn callout_start(kind: CalloutKind, title: &str, out: &mut String);

    /// Close a call-out container opened by [`callout_start`](Self::callout_start).
    fn callout_end(kind: CalloutKind, out: &mut String);

    /// Render an image.
    fn image(src: &str, alt: &str, title: &str, out: &mut String);

    /// Transform a link URL.
    ///
    /// Default implementation returns the URL unchanged.
    #[must_use]
    fn transform_link<'a>(url: &'a str, _base_path: Option<&str>) -> Cow<'a, str> {
        Cow::Borrowed(url)
    }

    /// Render a hard break.
    fn hard_break(out: &mut String) {
        out.push_str("<br>");
    }

    /// Render a horizontal rule.
    fn horizontal_rule(out: &mut String) {
        out.push_str("<hr>");
    }

    /// Open a list item that carries a task checkbox.
    fn task_item_start(out: &mut String) {
        out.push_str(r#"<li class="task-list-item">"#);
    }

    /// Render a disabled checkbox and open the label wrapping the item text.
    fn task_list_marker(checked: bool, id: usize, out: &mut String) {
        let checked = if checked { " checked" } else { "" };
        write!(
            out,
            r#"<input class="task-list-item-checkbox" type="checkbox" disabled{checked} id="task-item-{id}"><label class="task-list-item-label" for="task-item-{id}">"#
        )
        .unwrap();
    }

    /// Close the label opened by [`task_list_marker`](Self::task_list_marker).
    fn task_label_end(out: &mut String) {
        out.push_str("</label>");
    }

    /// Render a footnote reference.
    ///
    /// `occurrence` counts earlier references to the same note; only the
    /// first one gets the plain `fnrefN` id targeted by the back link.
    fn footnote_reference(number: usize, occurrence: usize, out: &mut String) {
        if occurrence == 0 {
            write!(
                out,
                r##"<sup class="footnote-ref"><a href="#fn{number}" id="fnref{number}">[{number}]</a></sup>"##
            )
            .unwrap();
        } else {
            write!(
                out,
                r##"<sup class="footnote-ref"><a href="#fn{number}" id="fnref{number}:{occurrence}">[{number}]</a></sup>"##
            )
            .unwrap();
        }
    }

    /// Render collected footnote definitions at the end of the document.
    fn footnote_section(notes: &[(usize, String)], out: &mut String) {
        out.push_str(r#"<hr class="footnotes-sep"><section class="footnotes"><ol class="footnotes-list">"#);
        for (number, body) in notes {
            let backref =
                format!(r##" <a href="#fnref{number}" class="footnote-backref">↩︎</a>"##);
            write!(out, r#"<li id="fn{number}" class="footnote-item">"#).unwrap();
            match body.strip_suffix("</p>") {
                Some(head) => {
                    out.push_str(head);
                    out.push_str(&backref);
                    out.push_str("</p>");
                }
                None => {
                    out.push_str(body);
                    out.push_str(&backref);
                }
            }
            out.push_str("</li>");
        }
        out.push_str("</ol></section>");
    }

    /// Render a math expression for client-side typesetting.
    fn math(source: &str, display: bool, out: &mut String) {
        if display {
            write!(
                out,
                r#"<span class="math math-display">\[{}\]</span>"#,
                escape_html(source)
            )
            .unwrap();
        } else {
            write!(
                out,
                r#"<span class="math math-inline">\({}\)</span>"#,
                escape_html(source)
            )
            .unwrap();
        }
    }
}
