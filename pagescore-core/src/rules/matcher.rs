// Matcher - the single predicate type behind triggers and inhibitors.
// One tagged variant per predicate kind keeps the compiler and evaluator
// match-complete; adding a fourth kind is a localized change.

use crate::normalize::NormalizedDocument;
use crate::types::RuleKind;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Comparison operator of a `$SIZE` predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SizeOp {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
}

impl SizeOp {
    pub fn apply(self, len: usize, threshold: usize) -> bool {
        match self {
            SizeOp::Lt => len < threshold,
            SizeOp::Le => len <= threshold,
            SizeOp::Gt => len > threshold,
            SizeOp::Ge => len >= threshold,
            SizeOp::Eq => len == threshold,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            SizeOp::Lt => "<",
            SizeOp::Le => "<=",
            SizeOp::Gt => ">",
            SizeOp::Ge => ">=",
            SizeOp::Eq => "==",
        }
    }
}

/// One compiled matcher, usable as a clause trigger or inhibitor.
/// `source` fields retain the author's spelling for report rendering.
#[derive(Debug, Clone)]
pub enum Matcher {
    Pattern { regex: Regex, source: String },
    Size { op: SizeOp, threshold: usize },
    Template { name: String, source: String },
}

impl Matcher {
    pub fn kind(&self) -> RuleKind {
        match self {
            Matcher::Pattern { .. } => RuleKind::Pattern,
            Matcher::Size { .. } => RuleKind::SizePredicate,
            Matcher::Template { .. } => RuleKind::TemplatePredicate,
        }
    }

    /// Whether this matcher fires against the normalized document.
    pub fn matches(&self, doc: &NormalizedDocument) -> bool {
        match self {
            Matcher::Pattern { regex, .. } => regex.is_match(doc.text()),
            Matcher::Size { op, threshold } => op.apply(doc.char_len(), *threshold),
            Matcher::Template { name, .. } => doc.transcludes(name),
        }
    }

    /// Pattern-only check against an arbitrary text span (the lede pass).
    /// Size and template matchers never fire here.
    pub fn matches_text(&self, text: &str) -> bool {
        match self {
            Matcher::Pattern { regex, .. } => regex.is_match(text),
            Matcher::Size { .. } | Matcher::Template { .. } => false,
        }
    }

    /// Display form for diagnostics and report rows.
    pub fn display(&self) -> String {
        match self {
            Matcher::Pattern { source, .. } => format!("/{source}/"),
            Matcher::Size { op, threshold } => format!("/$SIZE{}{}/", op.symbol(), threshold),
            Matcher::Template { source, .. } => format!("$${source}$$"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_op_semantics() {
        assert!(SizeOp::Lt.apply(9, 10));
        assert!(!SizeOp::Lt.apply(10, 10));
        assert!(SizeOp::Le.apply(10, 10));
        assert!(SizeOp::Gt.apply(11, 10));
        assert!(!SizeOp::Gt.apply(10, 10));
        assert!(SizeOp::Ge.apply(10, 10));
        assert!(SizeOp::Eq.apply(10, 10));
        assert!(!SizeOp::Eq.apply(11, 10));
    }

    #[test]
    fn matches_text_fires_patterns_only() {
        let pattern = Matcher::Pattern {
            regex: Regex::new("topic").unwrap(),
            source: "topic".to_string(),
        };
        let size = Matcher::Size {
            op: SizeOp::Gt,
            threshold: 0,
        };
        let template = Matcher::Template {
            name: "stub".to_string(),
            source: "Stub".to_string(),
        };

        assert!(pattern.matches_text("the topic at hand"));
        assert!(!size.matches_text("any text"));
        assert!(!template.matches_text("{{Stub}}"));
    }

    #[test]
    fn display_round_trips_author_spelling() {
        let size = Matcher::Size {
            op: SizeOp::Ge,
            threshold: 2000,
        };
        assert_eq!(size.display(), "/$SIZE>=2000/");

        let template = Matcher::Template {
            name: "test template".to_string(),
            source: "Test_Template".to_string(),
        };
        assert_eq!(template.display(), "$$Test_Template$$");
    }
}
