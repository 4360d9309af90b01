// RuleEvaluator - scores one normalized document against a compiled ruleset.
//
// Three passes, all pure: trigger evaluation in declaration order, inhibitor
// vetoes, then the lede bonus over the surviving matches. No clause is ever
// mutated; repeated evaluation of the same (ruleset, document) pair yields
// an identical report.

use crate::config::{LedeBonusPolicy, ScoringConfig};
use crate::error::EvaluateError;
use crate::normalize::NormalizedDocument;
use crate::types::{CompiledRuleSet, RuleMatch, ScoreReport};

pub struct RuleEvaluator {
    config: ScoringConfig,
}

impl RuleEvaluator {
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Score a document. Rulesets carrying compile diagnostics are refused.
    pub fn evaluate(
        &self,
        ruleset: &CompiledRuleSet,
        document: &str,
    ) -> Result<ScoreReport, EvaluateError> {
        if !ruleset.is_valid() {
            return Err(EvaluateError::ErroringRuleSet {
                name: ruleset.name.clone(),
                count: ruleset.errors.len(),
            });
        }
        Ok(self.evaluate_unchecked(ruleset, document))
    }

    /// Evaluation body; the validity precondition is already established.
    pub(crate) fn evaluate_unchecked(
        &self,
        ruleset: &CompiledRuleSet,
        document: &str,
    ) -> ScoreReport {
        let doc = NormalizedDocument::new(document);

        let mut matches = Vec::new();
        for (index, clause) in ruleset.clauses.iter().enumerate() {
            if !clause.trigger.matches(&doc) {
                continue;
            }
            // any firing inhibitor vetoes the clause outright
            if clause
                .inhibitors
                .iter()
                .any(|inhibitor| inhibitor.matches(&doc))
            {
                continue;
            }
            matches.push(RuleMatch {
                clause: index,
                line: clause.source_line,
                trigger: clause.trigger.display(),
                score: clause.weight,
            });
        }

        let lede_bonus = self.lede_bonus_for(ruleset, &matches, doc.lede());
        let total_score = matches.iter().map(|m| m.score).sum::<i64>() + lede_bonus;

        ScoreReport {
            matches,
            lede_bonus,
            total_score,
        }
    }

    /// Lede pass over the surviving matches. Only pattern triggers
    /// participate; size and template clauses are never re-checked against
    /// the lede.
    fn lede_bonus_for(
        &self,
        ruleset: &CompiledRuleSet,
        matches: &[RuleMatch],
        lede: Option<&str>,
    ) -> i64 {
        let Some(lede) = lede else {
            return 0;
        };
        match self.config.lede_bonus {
            LedeBonusPolicy::Disabled => 0,
            LedeBonusPolicy::DoubleMatching => matches
                .iter()
                .filter(|m| ruleset.clauses[m.clause].trigger.matches_text(lede))
                .map(|m| m.score)
                .sum(),
            LedeBonusPolicy::Flat(bonus) => {
                let lede_hit = matches
                    .iter()
                    .any(|m| ruleset.clauses[m.clause].trigger.matches_text(lede));
                if lede_hit {
                    bonus
                } else {
                    0
                }
            }
        }
    }
}
