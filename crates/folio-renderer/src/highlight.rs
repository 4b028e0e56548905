//! Syntax highlighting for code blocks.
//!
//! Highlighting uses syntect's bundled grammars and emits class-based spans
//! (`hljs-` prefixed scope names) so styling stays in CSS. Output is split per
//! source line and every line is self-contained: scopes still open at the end
//! of a line are closed there and reopened at the start of the next one.

use std::sync::LazyLock;

use syntect::html::{ClassStyle, line_tokens_to_classed_spans};
use syntect::parsing::{ParseState, ScopeStack, ScopeStackOp, SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use crate::state::escape_html;

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);

const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "hljs-" };

/// Fence tags that name a bundled grammar under another token.
const ALIASES: &[(&str, &str)] = &[
    ("typescript", "js"),
    ("ts", "js"),
    ("tsx", "js"),
    ("jsx", "js"),
    ("vue", "html"),
    ("svelte", "html"),
    ("shell", "sh"),
    ("zsh", "sh"),
    ("console", "sh"),
    ("text", "txt"),
    ("plaintext", "txt"),
];

/// One highlighted source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightedLine {
    /// Balanced HTML for the line.
    pub html: String,
    /// Whether the source line had no content.
    pub is_blank: bool,
}

/// Highlighted code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightedCode {
    /// The fence language when it resolved to a known grammar.
    pub language: Option<String>,
    pub lines: Vec<HighlightedLine>,
}

/// Highlight `code`, selecting a grammar from `lang` when it is recognized
/// and detecting one otherwise.
///
/// Never fails: without a grammar, or if the grammar engine reports an error,
/// the lines are emitted as escaped plain text.
#[must_use]
pub fn highlight(lang: Option<&str>, code: &str) -> HighlightedCode {
    let set = &*SYNTAX_SET;
    let known = lang.and_then(|lang| find_syntax(set, lang));
    let lines = known
        .or_else(|| detect_syntax(set, code))
        .and_then(|syntax| highlight_lines(set, syntax, code))
        .unwrap_or_else(|| plain_lines(code));

    HighlightedCode {
        language: known.and(lang).map(ToOwned::to_owned),
        lines,
    }
}

/// Whether `lang` names a grammar that [`highlight`] would use.
#[must_use]
pub fn is_known_language(lang: &str) -> bool {
    find_syntax(&SYNTAX_SET, lang).is_some()
}

fn find_syntax<'a>(set: &'a SyntaxSet, lang: &str) -> Option<&'a SyntaxReference> {
    let lang = lang.trim();
    if lang.is_empty() {
        return None;
    }
    let lower = lang.to_ascii_lowercase();
    let token = ALIASES
        .iter()
        .find(|(alias, _)| *alias == lower)
        .map_or(lower.as_str(), |(_, target)| target);
    set.find_syntax_by_token(token)
}

/// Grammars tried, in tie-break order, when a block has no usable tag.
const DETECT_CANDIDATES: &[&str] = &[
    "rs", "py", "js", "json", "sh", "go", "java", "c", "cpp", "cs", "rb", "php", "html", "css",
    "sql", "yaml",
];

/// Lines of a block looked at when scoring candidates.
const DETECT_LINE_LIMIT: usize = 40;

/// Scored tokens needed before a guess is trusted.
const DETECT_MIN_SCORE: usize = 2;

/// Scope prefixes that only appear when a grammar actually recognized
/// something. Identifiers, plain words and meta scopes don't count.
const SIGNIFICANT_SCOPES: &[&str] = &[
    "keyword.",
    "storage.",
    "constant.numeric",
    "constant.language",
    "entity.name.function",
    "support.function",
    "punctuation.definition.string.begin",
];

/// Best-effort detection for blocks without a recognized tag.
///
/// A shebang, modeline or XML prolog on the first line decides outright.
/// Otherwise every candidate grammar parses the start of the block and the
/// one producing the most significant tokens wins, if it reaches
/// [`DETECT_MIN_SCORE`].
fn detect_syntax<'a>(set: &'a SyntaxSet, code: &str) -> Option<&'a SyntaxReference> {
    let first_line = code.lines().find(|line| !line.trim().is_empty())?;
    if let Some(syntax) = set.find_syntax_by_first_line(first_line) {
        return Some(syntax);
    }

    let mut best: Option<(&SyntaxReference, usize)> = None;
    for syntax in DETECT_CANDIDATES
        .iter()
        .filter_map(|token| set.find_syntax_by_token(token))
    {
        let score = relevance(set, syntax, code);
        if score >= DETECT_MIN_SCORE && best.is_none_or(|(_, top)| score > top) {
            best = Some((syntax, score));
        }
    }
    best.map(|(syntax, _)| syntax)
}

/// Count significant scopes pushed while parsing the start of `code`.
fn relevance(set: &SyntaxSet, syntax: &SyntaxReference, code: &str) -> usize {
    let mut state = ParseState::new(syntax);
    let mut score = 0;
    for line in LinesWithEndings::from(code).take(DETECT_LINE_LIMIT) {
        let Ok(ops) = state.parse_line(line, set) else {
            return 0;
        };
        score += ops
            .iter()
            .filter(|(_, op)| match op {
                ScopeStackOp::Push(scope) => {
                    let name = scope.build_string();
                    SIGNIFICANT_SCOPES
                        .iter()
                        .any(|prefix| name.starts_with(prefix))
                }
                _ => false,
            })
            .count();
    }
    score
}

fn highlight_lines(
    set: &SyntaxSet,
    syntax: &SyntaxReference,
    code: &str,
) -> Option<Vec<HighlightedLine>> {
    let mut state = ParseState::new(syntax);
    let mut stack = ScopeStack::new();
    let mut lines = Vec::new();

    for line in LinesWithEndings::from(code) {
        let ops = state.parse_line(line, set).ok()?;
        let content = line.trim_end_matches(['\n', '\r']);
        let ops: Vec<_> = ops
            .into_iter()
            .map(|(index, op)| (index.min(content.len()), op))
            .collect();

        let mut html = open_spans(&stack);
        let (spans, _) = line_tokens_to_classed_spans(content, &ops, CLASS_STYLE, &mut stack).ok()?;
        html.push_str(&spans);
        for _ in 0..stack.len() {
            html.push_str("</span>");
        }

        lines.push(HighlightedLine {
            html,
            is_blank: content.is_empty(),
        });
    }

    Some(lines)
}

/// Reopen spans for scopes carried over from the previous line.
fn open_spans(stack: &ScopeStack) -> String {
    let mut html = String::new();
    for scope in stack.as_slice() {
        let classes = scope
            .build_string()
            .split('.')
            .map(|atom| format!("hljs-{atom}"))
            .collect::<Vec<_>>()
            .join(" ");
        html.push_str(&format!(r#"<span class="{classes}">"#));
    }
    html
}

fn plain_lines(code: &str) -> Vec<HighlightedLine> {
    code.lines()
        .map(|line| HighlightedLine {
            html: escape_html(line),
            is_blank: line.is_empty(),
        })
        .collect()
}
