use crate::config::ScoringConfig;
use crate::error::CompileFailure;
use crate::rules::{RuleCompiler, RuleEvaluator};
use crate::types::{CompiledRuleSet, ScoreReport};

/// Compile-once / score-many orchestration. A scorer holds one validated
/// ruleset and evaluates it against any number of documents; it is
/// immutable after construction and shareable across worker threads.
pub struct RuleSetScorer {
    ruleset: CompiledRuleSet,
    evaluator: RuleEvaluator,
}

impl RuleSetScorer {
    /// Wrap an already-compiled ruleset. Refuses one that carries
    /// diagnostics, returning them to the caller for rendering.
    pub fn new(ruleset: CompiledRuleSet, config: &ScoringConfig) -> Result<Self, CompileFailure> {
        if !ruleset.is_valid() {
            return Err(CompileFailure {
                name: ruleset.name,
                diagnostics: ruleset.errors,
            });
        }
        Ok(Self {
            ruleset,
            evaluator: RuleEvaluator::new(config),
        })
    }

    /// Compile `source` and build a scorer in one step.
    pub fn from_source(
        name: &str,
        source: &str,
        config: &ScoringConfig,
    ) -> Result<Self, CompileFailure> {
        let ruleset = RuleCompiler::new(config).compile(name, source);
        Self::new(ruleset, config)
    }

    pub fn score(&self, document: &str) -> ScoreReport {
        // validity was established at construction
        self.evaluator.evaluate_unchecked(&self.ruleset, document)
    }

    /// Whether a report clears the ruleset's actionability threshold.
    pub fn is_actionable(&self, report: &ScoreReport) -> bool {
        report.total_score >= self.ruleset.min_score
    }

    pub fn name(&self) -> &str {
        &self.ruleset.name
    }

    pub fn ruleset(&self) -> &CompiledRuleSet {
        &self.ruleset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_refuses_erroring_rulesets() {
        let config = ScoringConfig::default();
        let failure = RuleSetScorer::from_source("bad", "/broken\n/also broken", &config)
            .err()
            .expect("should refuse");
        assert_eq!(failure.name, "bad");
        assert_eq!(failure.diagnostics.len(), 2);
    }

    #[test]
    fn actionability_uses_the_ruleset_threshold() {
        let config = ScoringConfig::default();
        let scorer = RuleSetScorer::from_source("test", "/signal/", &config).unwrap();

        let strong = scorer.score("a clear signal here");
        assert!(scorer.is_actionable(&strong));

        let silent = scorer.score("nothing of note");
        assert!(!scorer.is_actionable(&silent));
    }

    #[test]
    fn scorer_is_shareable_across_threads() {
        let config = ScoringConfig::default();
        let scorer = RuleSetScorer::from_source("test", "/signal/", &config).unwrap();

        let report = std::thread::scope(|scope| {
            scope
                .spawn(|| scorer.score("signal from another thread"))
                .join()
                .expect("thread panicked")
        });
        assert_eq!(report.matches.len(), 1);
    }
}
