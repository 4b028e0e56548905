//! Context carried across parser events while rendering.

use std::collections::{HashMap, HashSet};
use std::fmt::Write;

use pulldown_cmark::Alignment;

/// Text diverted from the output until its element closes.
pub(crate) enum Capture {
    /// Body of a fenced or indented code block.
    Code {
        language: Option<String>,
        source: String,
    },
    /// Alt text of an image. `nested` counts images opened inside the alt.
    ImageAlt {
        src: String,
        title: String,
        alt: String,
        nested: usize,
    },
}

impl Capture {
    pub(crate) fn push(&mut self, text: &str) {
        match self {
            Self::Code { source, .. } => source.push_str(text),
            Self::ImageAlt { alt, .. } => alt.push_str(text),
        }
    }

    /// Line break inside the captured text.
    pub(crate) fn push_break(&mut self) {
        match self {
            Self::Code { source, .. } => source.push('\n'),
            Self::ImageAlt { alt, .. } => alt.push(' '),
        }
    }
}

/// Column alignments and cursor of the table being written.
#[derive(Default)]
pub(crate) struct Table {
    alignments: Vec<Alignment>,
    column: usize,
    in_head: bool,
}

impl Table {
    pub(crate) fn new(alignments: Vec<Alignment>) -> Self {
        Self {
            alignments,
            ..Self::default()
        }
    }

    pub(crate) fn begin_head(&mut self) {
        self.in_head = true;
        self.column = 0;
    }

    pub(crate) fn begin_body(&mut self) {
        self.in_head = false;
    }

    pub(crate) fn begin_row(&mut self) {
        self.column = 0;
    }

    /// Write the opening tag of the cell under the cursor.
    pub(crate) fn open_cell(&self, out: &mut String) {
        let align = match self.alignments.get(self.column) {
            Some(Alignment::Left) => "left",
            Some(Alignment::Center) => "center",
            Some(Alignment::Right) => "right",
            Some(Alignment::None) | None => {
                write!(out, "<{}>", self.cell_tag()).unwrap();
                return;
            }
        };
        write!(out, r#"<{} style="text-align:{align}">"#, self.cell_tag()).unwrap();
    }

    /// Write the closing tag and advance to the next column.
    pub(crate) fn close_cell(&mut self, out: &mut String) {
        write!(out, "</{}>", self.cell_tag()).unwrap();
        self.column += 1;
    }

    fn cell_tag(&self) -> &'static str {
        if self.in_head { "th" } else { "td" }
    }
}

/// Table of contents entry.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TocEntry {
    /// Heading level (1-6).
    pub level: u8,
    /// Heading text without markup.
    pub title: String,
    /// Anchor id of the heading element.
    pub id: String,
}

struct OpenHeading {
    level: u8,
    text: String,
    html: String,
}

/// A heading ready to be written.
pub(crate) struct Heading {
    pub level: u8,
    pub id: String,
    pub html: String,
}

/// Heading anchors, table of contents and the extracted title.
pub(crate) struct Headings {
    extract_title: bool,
    title: Option<String>,
    open: Option<OpenHeading>,
    toc: Vec<TocEntry>,
    ids: HashSet<String>,
}

impl Headings {
    pub(crate) fn new(extract_title: bool) -> Self {
        Self {
            extract_title,
            title: None,
            open: None,
            toc: Vec::new(),
            ids: HashSet::new(),
        }
    }

    pub(crate) fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub(crate) fn open(&mut self, level: u8) {
        self.open = Some(OpenHeading {
            level,
            text: String::new(),
            html: String::new(),
        });
    }

    /// Append to the open heading. `plain` feeds the anchor and the table of
    /// contents, `html` the rendered element.
    pub(crate) fn push(&mut self, plain: &str, html: &str) {
        if let Some(open) = &mut self.open {
            open.text.push_str(plain);
            open.html.push_str(html);
        }
    }

    /// Close the open heading.
    ///
    /// The first H1 becomes the title when extraction is on; every other
    /// heading gets a table of contents entry.
    pub(crate) fn close(&mut self) -> Option<Heading> {
        let OpenHeading { level, text, html } = self.open.take()?;
        let text = text.trim();
        let id = self.unique_id(text);

        if self.extract_title && level == 1 && self.title.is_none() {
            self.title = Some(text.to_owned());
        } else {
            self.toc.push(TocEntry {
                level,
                title: text.to_owned(),
                id: id.clone(),
            });
        }

        Some(Heading {
            level,
            id,
            html: html.trim().to_owned(),
        })
    }

    /// Slug of `text`, suffixed with `-1`, `-2`, ... until unused.
    fn unique_id(&mut self, text: &str) -> String {
        let mut base = slugify(text);
        if base.is_empty() {
            base.push_str("section");
        }

        let mut id = base.clone();
        let mut suffix = 0;
        while self.ids.contains(&id) {
            suffix += 1;
            id = format!("{base}-{suffix}");
        }
        self.ids.insert(id.clone());
        id
    }

    /// Take the extracted title and the table of contents.
    pub(crate) fn take(&mut self) -> (Option<String>, Vec<TocEntry>) {
        (self.title.take(), std::mem::take(&mut self.toc))
    }
}

/// Footnote numbering and collected definitions.
///
/// Notes are numbered in order of first reference. Definitions are rendered
/// into a side buffer and emitted together at the end of the document.
#[derive(Default)]
pub(crate) struct FootnoteState {
    numbers: HashMap<String, usize>,
    references: HashMap<String, usize>,
    definitions: HashMap<String, String>,
    /// Label of the definition being rendered and the output it displaced.
    open: Option<(String, String)>,
}

impl FootnoteState {
    /// Register a reference to `label`.
    ///
    /// Returns the note number and how many times it was referenced before.
    pub(crate) fn reference(&mut self, label: &str) -> (usize, usize) {
        let key = label.to_lowercase();
        let next = self.numbers.len() + 1;
        let number = *self.numbers.entry(key.clone()).or_insert(next);
        let seen = self.references.entry(key).or_default();
        let occurrence = *seen;
        *seen += 1;
        (number, occurrence)
    }

    /// Start collecting a definition; `saved` is the output it interrupts.
    pub(crate) fn begin_definition(&mut self, label: &str, saved: String) {
        self.open = Some((label.to_lowercase(), saved));
    }

    /// Finish the open definition with its rendered `body`.
    ///
    /// Returns the output buffer to continue writing into.
    pub(crate) fn end_definition(&mut self, body: String) -> String {
        match self.open.take() {
            Some((label, saved)) => {
                self.definitions.insert(label, body);
                saved
            }
            None => body,
        }
    }

    /// Take referenced notes that have a definition, ordered by number.
    pub(crate) fn take_notes(&mut self) -> Vec<(usize, String)> {
        let mut notes: Vec<(usize, String)> = self
            .numbers
            .drain()
            .filter_map(|(label, number)| {
                self.definitions
                    .remove(&label)
                    .map(|body| (number, body))
            })
            .collect();
        notes.sort_by_key(|(number, _)| *number);
        notes
    }
}

/// Task list checkbox numbering and label tracking.
#[derive(Default)]
pub(crate) struct TaskListState {
    count: usize,
    label_open: bool,
}

impl TaskListState {
    /// Allocate the next checkbox id and mark its label as open.
    pub(crate) fn next_marker(&mut self) -> usize {
        self.count += 1;
        self.label_open = true;
        self.count
    }

    /// Whether a label was opened and not closed yet. Resets the flag.
    pub(crate) fn take_open_label(&mut self) -> bool {
        std::mem::take(&mut self.label_open)
    }
}

/// Convert heading text to an anchor id.
///
/// Words are split on whitespace, `-` and `_`, stripped of everything but
/// letters and digits, lowercased and joined with single dashes. Letters
/// outside ASCII are kept.
#[must_use]
pub fn slugify(text: &str) -> String {
    text.split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .map(|word| {
            word.chars()
                .filter(|c| c.is_alphanumeric())
                .flat_map(char::to_lowercase)
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Escape `&`, `<`, `>`, `"` and `'` for use in HTML text and attributes.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find(['&', '<', '>', '"', '\'']) {
        escaped.push_str(&rest[..pos]);
        escaped.push_str(match rest.as_bytes()[pos] {
            b'&' => "&amp;",
            b'<' => "&lt;",
            b'>' => "&gt;",
            b'"' => "&quot;",
            _ => "&#x27;",
        });
        rest = &rest[pos + 1..];
    }
    escaped.push_str(rest);
    escaped
}
