// Report rendering for the CLI - text tables and a JSON envelope.

use anyhow::Result;
use chrono::Utc;
use pagescore_core::ScoreReport;
use serde::Serialize;
use std::fmt::Write;

/// JSON envelope around a core report. The timestamp lives here, outside
/// the core, so evaluation itself stays deterministic.
#[derive(Debug, Serialize)]
struct ReportEnvelope<'a> {
    ruleset: &'a str,
    document: &'a str,
    generated_at: String,
    actionable: bool,
    report: &'a ScoreReport,
}

pub fn render_json(
    ruleset: &str,
    document: &str,
    report: &ScoreReport,
    actionable: bool,
) -> Result<String> {
    let envelope = ReportEnvelope {
        ruleset,
        document,
        generated_at: Utc::now().to_rfc3339(),
        actionable,
        report,
    };
    Ok(serde_json::to_string_pretty(&envelope)?)
}

pub fn render_text(document: &str, report: &ScoreReport, actionable: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n📊 Score report for {document}:");
    for rule_match in &report.matches {
        let _ = writeln!(
            out,
            "   {:.<40} {:>6}  (line {})",
            rule_match.trigger, rule_match.score, rule_match.line
        );
    }
    if report.lede_bonus != 0 {
        let _ = writeln!(out, "   {:.<40} {:>6}", "lede bonus", report.lede_bonus);
    }
    let _ = writeln!(out, "   {:.<40} {:>6}", "Total", report.total_score);
    let _ = writeln!(
        out,
        "   {}",
        if actionable {
            "✅ actionable"
        } else {
            "⏭️  below threshold"
        }
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagescore_core::{RuleSetScorer, ScoringConfig};

    fn sample_report() -> ScoreReport {
        let config = ScoringConfig::default();
        let scorer = RuleSetScorer::from_source("sample", "/signal/", &config).unwrap();
        scorer.score("'''signal''' opens the article")
    }

    #[test]
    fn text_rendering_carries_the_total() {
        let report = sample_report();
        let rendered = render_text("article.txt", &report, true);
        assert!(rendered.contains("article.txt"));
        assert!(rendered.contains("/signal/"));
        assert!(rendered.contains(&report.total_score.to_string()));
    }

    #[test]
    fn json_envelope_round_trips() {
        let report = sample_report();
        let rendered = render_json("sample", "article.txt", &report, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["ruleset"], "sample");
        assert_eq!(value["actionable"], true);
        assert_eq!(value["report"]["total_score"], report.total_score);
        assert!(value["generated_at"].is_string());
    }
}
