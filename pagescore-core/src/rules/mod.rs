// Main rules module - delegates to semantic sub-modules
// This file coordinates the rule system but actual implementations are in:
// - compiler.rs: RuleCompiler and the line grammar
// - matcher.rs: Matcher variants and their evaluation
// - evaluator.rs: RuleEvaluator, inhibitor vetoes and the lede pass

pub mod compiler;
pub mod evaluator;
pub mod matcher;

// Re-export the working surface
pub use compiler::RuleCompiler;
pub use evaluator::RuleEvaluator;
pub use matcher::{Matcher, SizeOp};
