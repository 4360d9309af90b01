// Pagescore Core Library
//
// Provides rule-language compilation and document scoring.
// Main interface for scoring wiki-style documents against weighted rulesets.

pub mod config;
pub mod error;
pub mod normalize;
pub mod processor;
pub mod rules;
pub mod types;

// Re-export main types and functions for easy use
pub use config::{LedeBonusPolicy, ScoringConfig};
pub use error::{CompileFailure, EvaluateError};
pub use normalize::NormalizedDocument;
pub use processor::RuleSetScorer;
pub use rules::{Matcher, RuleCompiler, RuleEvaluator, SizeOp};
pub use types::*;
