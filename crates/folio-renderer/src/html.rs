//! HTML backend for markdown rendering.
//!
//! Produces HTML5 fragments for embedding in the documentation browser. The
//! class names on code blocks and call-outs are relied on by the stylesheet
//! and must stay stable.

use std::borrow::Cow;
use std::fmt::Write;

use crate::backend::RenderBackend;
use crate::callout::CalloutKind;
use crate::highlight::highlight;
use crate::state::escape_html;

/// HTML render backend.
///
/// Produces:
/// - `<pre class="code-block">` with line numbers and highlighted lines
/// - `<div class="callout callout--{type}">` for call-outs
/// - `<blockquote>` for plain quotations
/// - Relative `.md` link resolution to `/slug` URLs
pub struct HtmlBackend;

impl RenderBackend for HtmlBackend {
    fn code_block(lang: Option<&str>, content: &str, out: &mut String) {
        let code = highlight(lang, content);

        out.push_str(r#"<pre class="code-block">"#);
        if let Some(lang) = &code.language {
            write!(
                out,
                r#"<span class="code-language">{}</span>"#,
                escape_html(lang)
            )
            .unwrap();
        }

        out.push_str(r#"<div class="code-wrapper"><div class="line-numbers">"#);
        for number in 1..=code.lines.len() {
            write!(out, r#"<span class="line-number">{number}</span>"#).unwrap();
        }
        out.push_str("</div>");

        match &code.language {
            Some(lang) => write!(
                out,
                r#"<code class="hljs language-{}">"#,
                escape_html(lang)
            )
            .unwrap(),
            None => out.push_str(r#"<code class="hljs">"#),
        }
        for (i, line) in code.lines.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            let html = if line.is_blank { " " } else { line.html.as_str() };
            write!(out, r#"<span class="code-line">{html}</span>"#).unwrap();
        }
        out.push_str("</code></div></pre>");
    }

    fn blockquote_start(out: &mut String) {
        out.push_str("<blockquote>");
    }

    fn blockquote_end(out: &mut String) {
        out.push_str("</blockquote>");
    }

    fn callout_start(kind: CalloutKind, title: &str, out: &mut String) {
        write!(
            out,
            r#"<div class="callout callout--{}"><div class="callout__icon">{}</div><div class="callout__content"><div class="callout__title">{}</div>"#,
            kind.as_str(),
            kind.icon(),
            escape_html(title)
        )
        .unwrap();
    }

    fn callout_end(_kind: CalloutKind, out: &mut String) {
        out.push_str("</div></div>");
    }

    fn image(src: &str, alt: &str, title: &str, out: &mut String) {
        let title_attr = if title.is_empty() {
            String::new()
        } else {
            format!(r#" title="{}""#, escape_html(title))
        };
        write!(
            out,
            r#"<img src="{}"{title_attr} alt="{}">"#,
            escape_html(src),
            escape_html(alt)
        )
        .unwrap();
    }

    fn transform_link<'a>(url: &'a str, base_path: Option<&str>) -> Cow<'a, str> {
        match base_path {
            Some(base) => Cow::Owned(resolve_link(url, base)),
            None => Cow::Borrowed(url),
        }
    }
}

/// Resolve a markdown link URL relative to the linking document's directory.
///
/// Relative `.md` links become slug URLs:
/// - `./sibling.md` → `/guide/sibling`
/// - `../other.md` → `/other`
/// - `sub/page.md#part` → `/guide/sub/page#part`
///
/// External links, fragment-only links, and non-markdown links are returned unchanged.
#[allow(clippy::case_sensitive_file_extension_comparisons)]
fn resolve_link(url: &str, base_path: &str) -> String {
    if url.starts_with("http://")
        || url.starts_with("https://")
        || url.starts_with("//")
        || url.starts_with("mailto:")
        || url.starts_with("tel:")
        || url.starts_with('#')
    {
        return url.to_owned();
    }

    let (path_part, fragment) = match url.find('#') {
        Some(hash_pos) => (&url[..hash_pos], Some(&url[hash_pos..])),
        None => (url, None),
    };

    if !path_part.ends_with(".md") {
        return url.to_owned();
    }

    let resolved = if path_part.starts_with('/') {
        path_part.trim_start_matches('/').to_owned()
    } else {
        resolve_relative_path(path_part, base_path)
    };
    let slug = resolved.strip_suffix(".md").unwrap_or(&resolved);

    match fragment {
        Some(frag) => format!("/{slug}{frag}"),
        None => format!("/{slug}"),
    }
}

/// Resolve a relative path against a base directory.
///
/// `..` above the root is clamped to the root.
fn resolve_relative_path(relative: &str, base: &str) -> String {
    let mut segments: Vec<&str> = base.split('/').filter(|s| !s.is_empty()).collect();

    for component in relative.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            _ => segments.push(component),
        }
    }

    segments.join("/")
}
