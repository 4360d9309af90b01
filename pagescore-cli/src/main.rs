use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fs;
use std::path::Path;

// Import from pagescore-core
use pagescore_core::{RuleCompiler, RuleSetScorer, ScoringConfig};

// Import CLI utilities
use pagescore::render::{render_json, render_text};

#[derive(Parser)]
#[command(name = "pagescore")]
#[command(about = "Score wiki-style documents against a weighted ruleset")]
struct Args {
    /// Path to the ruleset source file
    #[arg(short, long)]
    rules: String,

    /// Documents to score (wiki markup text files)
    documents: Vec<String>,

    /// Ruleset label used in reports (defaults to the rules file stem)
    #[arg(short, long)]
    name: Option<String>,

    /// Path to custom config file (YAML format)
    #[arg(short, long)]
    config: Option<String>,

    /// Output format: text or json
    #[arg(short = 'f', long, default_value = "text")]
    output_format: String,

    /// Compile the ruleset, print diagnostics, and exit without scoring
    #[arg(long)]
    check: bool,

    /// Override the actionability threshold
    #[arg(long)]
    min_score: Option<i64>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("🦀 Pagescore");

    let rules_path = Path::new(&args.rules);
    if !rules_path.exists() {
        println!("⚠️  Ruleset not found at: {}", args.rules);
        println!("   Please check the file path.");
        return Ok(());
    }

    let mut config = match &args.config {
        Some(path) => {
            println!("📁 Loading custom config from: {path}");
            ScoringConfig::from_file(path)?
        }
        None => ScoringConfig::default(),
    };
    if let Some(min_score) = args.min_score {
        config.min_score = min_score;
    }

    let name = args.name.clone().unwrap_or_else(|| {
        rules_path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("ruleset")
            .to_string()
    });

    let source = fs::read_to_string(rules_path)
        .with_context(|| format!("failed to read ruleset: {}", args.rules))?;
    let ruleset = RuleCompiler::new(&config).compile(&name, &source);

    println!(
        "📏 Compiled ruleset '{}': {} clause(s), {} diagnostic(s)",
        name,
        ruleset.clauses.len(),
        ruleset.errors.len()
    );
    for diagnostic in &ruleset.errors {
        println!("   ⚠️  line {}: {}", diagnostic.line, diagnostic.message);
    }

    if args.check {
        if !ruleset.is_valid() {
            bail!("ruleset '{name}' does not compile cleanly");
        }
        println!("✅ Ruleset compiles cleanly");
        return Ok(());
    }

    if args.documents.is_empty() {
        bail!("no documents to score (use --check to validate a ruleset only)");
    }

    let scorer = match RuleSetScorer::new(ruleset, &config) {
        Ok(scorer) => scorer,
        Err(failure) => bail!("{failure}"),
    };

    for document_path in &args.documents {
        let body = fs::read_to_string(document_path)
            .with_context(|| format!("failed to read document: {document_path}"))?;
        let report = scorer.score(&body);
        let actionable = scorer.is_actionable(&report);

        match args.output_format.as_str() {
            "json" => println!(
                "{}",
                render_json(scorer.name(), document_path, &report, actionable)?
            ),
            "text" => print!("{}", render_text(document_path, &report, actionable)),
            other => bail!("unknown output format: {other} (expected text or json)"),
        }
    }

    Ok(())
}
