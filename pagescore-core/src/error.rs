use crate::types::CompileDiagnostic;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EvaluateError {
    /// Evaluating a ruleset that failed to compile is a caller contract
    /// violation; the engine refuses rather than produce a partial score.
    #[error("ruleset '{name}' has {count} compile error(s) and cannot be evaluated")]
    ErroringRuleSet { name: String, count: usize },
}

/// Returned when a scorer is asked to wrap a ruleset that did not compile
/// cleanly. Carries the diagnostics so callers can render them.
#[derive(Debug, Error)]
#[error("ruleset '{name}' failed to compile with {} diagnostic(s)", .diagnostics.len())]
pub struct CompileFailure {
    pub name: String,
    pub diagnostics: Vec<CompileDiagnostic>,
}
