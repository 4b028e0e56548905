//! Bare URLs in running text become links.
//!
//! Only `http://`, `https://` and `www.` addresses are recognized. Trailing
//! sentence punctuation is left outside the link, as is a closing bracket
//! without a matching opening one inside the URL.

use std::fmt::Write;
use std::sync::LazyLock;

use regex::Regex;

use crate::state::escape_html;

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\b(?:https?://|www\.)[^\s<>"]+"#).unwrap());

/// Escape `text` for HTML, wrapping bare URLs in anchors.
pub(crate) fn linkify(text: &str) -> String {
    let mut html = String::with_capacity(text.len());
    let mut written = 0;

    for found in URL_RE.find_iter(text) {
        let url = trim_trailing(found.as_str());
        if !has_host(url) {
            continue;
        }

        html.push_str(&escape_html(&text[written..found.start()]));
        let href = if url.get(..4).is_some_and(|p| p.eq_ignore_ascii_case("www.")) {
            format!("http://{url}")
        } else {
            url.to_owned()
        };
        write!(
            html,
            r#"<a href="{}">{}</a>"#,
            escape_html(&href),
            escape_html(url)
        )
        .unwrap();
        written = found.start() + url.len();
    }

    html.push_str(&escape_html(&text[written..]));
    html
}

fn trim_trailing(mut url: &str) -> &str {
    while let Some(last) = url.chars().next_back() {
        let trim = match last {
            '.' | ',' | ':' | ';' | '!' | '?' | '\'' | '*' | '~' => true,
            ')' => unbalanced(url, '(', ')'),
            ']' => unbalanced(url, '[', ']'),
            '}' => unbalanced(url, '{', '}'),
            _ => false,
        };
        if !trim {
            break;
        }
        url = &url[..url.len() - last.len_utf8()];
    }
    url
}

fn unbalanced(url: &str, open: char, close: char) -> bool {
    url.matches(open).count() < url.matches(close).count()
}

/// Whether the host part looks like a domain name or `localhost`.
fn has_host(url: &str) -> bool {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host = authority.rsplit_once(':').map_or(authority, |(host, _)| host);

    host.eq_ignore_ascii_case("localhost")
        || (host.contains('.') && !host.starts_with('.') && !host.ends_with('.'))
}
