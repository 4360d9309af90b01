use crate::rules::matcher::Matcher;
use serde::{Deserialize, Serialize};

/// Score contributed by a rule line that carries no explicit weight.
pub const DEFAULT_SCORE: i64 = 10;
/// Total a report must reach before a ruleset considers it actionable.
pub const DEFAULT_MIN_SCORE: i64 = 10;

// ===== RULE MODEL =====
// A ruleset is compiled exactly once; everything below is immutable after
// compilation and safe to share read-only across concurrent evaluations.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleKind {
    Pattern,
    SizePredicate,
    TemplatePredicate,
}

/// One parsed line of the rule language.
#[derive(Debug, Clone)]
pub struct RuleClause {
    /// Signed score contribution when the clause fires un-vetoed
    pub weight: i64,
    /// Primary matcher; must fire for the clause to be eligible to score
    pub trigger: Matcher,
    /// Secondary matchers; ANY firing vetoes the clause entirely
    pub inhibitors: Vec<Matcher>,
    /// 1-based line number in the ruleset source, for diagnostics
    pub source_line: u32,
}

impl RuleClause {
    pub fn kind(&self) -> RuleKind {
        self.trigger.kind()
    }
}

#[derive(Debug, Clone)]
pub struct CompiledRuleSet {
    pub name: String,
    /// Declaration order from source; evaluation and result ordering follow it
    pub clauses: Vec<RuleClause>,
    pub min_score: i64,
    /// Per-line parse diagnostics; non-empty means not safe to evaluate
    pub errors: Vec<CompileDiagnostic>,
}

impl CompiledRuleSet {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// One malformed-line diagnostic. Plain data, never control flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileDiagnostic {
    pub line: u32,
    pub message: String,
}

// ===== SCORE REPORTS =====

/// One clause that fired and was not inhibited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleMatch {
    /// Index into CompiledRuleSet::clauses
    pub clause: usize,
    /// Source line of the matched clause
    pub line: u32,
    /// Display form of the trigger, for report rendering
    pub trigger: String,
    /// Base weight contributed by this clause
    pub score: i64,
}

/// Result of one evaluation. Fresh per call, never mutated after return.
/// `total_score` always equals the sum of match scores plus `lede_bonus`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub matches: Vec<RuleMatch>,
    pub lede_bonus: i64,
    pub total_score: i64,
}

impl ScoreReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
