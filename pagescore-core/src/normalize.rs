//! Document normalization
//!
//! Converts raw wiki-style markup into the unified evaluable form the rule
//! engine consumes:
//!
//! ```text
//! raw markup
//!     ↓
//! strip references scaffold, comments, citation markup
//!     ↓
//! NormalizedDocument (text + char length + template inventory + lede)
//!     ↓
//! [Rule Evaluator]
//! ```
//!
//! Stripping guarantees that text inside comments or reference scaffolding
//! can never satisfy a pattern trigger. Each stripped region is replaced by
//! a single space so adjacent tokens never fuse.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

// Stripping order matters. Self-closing forms go before paired forms so a
// stray self-closing tag can't start a bogus paired span, and the references
// scaffold goes before comments so a scaffold containing comment or citation
// markup disappears atomically.
static REFERENCES_STUB: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<references[^>]*/\s*>").expect("valid references stub pattern"));
static REFERENCES_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<references[^>]*>.*?(</references\s*>|\z)")
        .expect("valid references block pattern")
});
static HTML_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?(-->|\z)").expect("valid comment pattern"));
static REF_SELF_CLOSING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<ref[^>]*/\s*>").expect("valid self-closing ref pattern"));
static REF_PAIRED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<ref[^>]*>.*?(</ref\s*>|\z)").expect("valid paired ref pattern")
});

static TEMPLATE_HEAD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([^{}|\n]+)").expect("valid template head pattern"));
static BOLD_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'''(.+?)'''").expect("valid bold span pattern"));

/// A document body normalized for rule evaluation. Built once per
/// evaluation; every clause runs against the same normalized view.
#[derive(Debug, Clone)]
pub struct NormalizedDocument {
    text: String,
    char_len: usize,
    templates: HashSet<String>,
    lede: Option<String>,
}

impl NormalizedDocument {
    pub fn new(raw: &str) -> Self {
        let text = strip_markup(raw);
        let char_len = text.chars().count();
        let templates = TEMPLATE_HEAD
            .captures_iter(&text)
            .map(|caps| normalize_template_name(&caps[1]))
            .collect();
        let lede = extract_lede(&text);

        Self {
            text,
            char_len,
            templates,
            lede,
        }
    }

    /// The normalized text pattern triggers run against.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Character count of the normalized text — the `$SIZE` operand.
    /// Characters, not bytes: multi-byte text must measure the same as its
    /// ASCII transliteration would.
    pub fn char_len(&self) -> usize {
        self.char_len
    }

    /// Whether the document transcludes the named template.
    /// `normalized_name` must already be in normalized form.
    pub fn transcludes(&self, normalized_name: &str) -> bool {
        self.templates.contains(normalized_name)
    }

    /// The opening emphasized line, if the document has one.
    pub fn lede(&self) -> Option<&str> {
        self.lede.as_deref()
    }
}

fn strip_markup(raw: &str) -> String {
    let pass = REFERENCES_STUB.replace_all(raw, " ");
    let pass = REFERENCES_BLOCK.replace_all(&pass, " ");
    let pass = HTML_COMMENT.replace_all(&pass, " ");
    let pass = REF_SELF_CLOSING.replace_all(&pass, " ");
    let pass = REF_PAIRED.replace_all(&pass, " ");
    pass.into_owned()
}

/// Canonical form for template name comparison: trimmed, lowercased,
/// underscore/whitespace runs collapsed to a single space.
pub fn normalize_template_name(raw: &str) -> String {
    let mut name = String::with_capacity(raw.len());
    let mut pending_space = false;
    for ch in raw.trim().chars() {
        if ch == '_' || ch.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space && !name.is_empty() {
            name.push(' ');
        }
        pending_space = false;
        name.extend(ch.to_lowercase());
    }
    name
}

/// The lede is the full text of the first line containing a complete
/// `'''…'''` bold span — conventionally the article's opening restatement
/// of its subject.
fn extract_lede(text: &str) -> Option<String> {
    let span = BOLD_SPAN.find(text)?;
    let line_start = text[..span.start()]
        .rfind('\n')
        .map(|i| i + 1)
        .unwrap_or(0);
    let line_end = text[span.start()..]
        .find('\n')
        .map(|i| span.start() + i)
        .unwrap_or(text.len());
    Some(text[line_start..line_end].trim().to_string())
}
