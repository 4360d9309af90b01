// RuleCompiler - parses ruleset source into an ordered clause list.
//
// Grammar, line by line (blank lines ignored, `<!-- ... -->` annotations
// stripped first):
//
//   [weight] trigger [, inhibitor]*
//
// where each matcher is `/regex/flags`, `/$SIZE<op><int>/`, or `$$Name$$`.
// Malformed lines are recorded as diagnostics and skipped; compilation
// itself never fails, so a partially-valid ruleset is still inspectable.

use crate::config::ScoringConfig;
use crate::normalize::normalize_template_name;
use crate::rules::matcher::{Matcher, SizeOp};
use crate::types::{CompileDiagnostic, CompiledRuleSet, RuleClause};
use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;

static ANNOTATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<!--.*?(-->|$)").expect("valid annotation pattern"));

pub struct RuleCompiler {
    config: ScoringConfig,
}

impl RuleCompiler {
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Compile ruleset source into clauses plus per-line diagnostics.
    pub fn compile(&self, name: &str, source: &str) -> CompiledRuleSet {
        let mut clauses = Vec::new();
        let mut errors = Vec::new();

        for (index, raw_line) in source.lines().enumerate() {
            let line_no = index as u32 + 1;
            let stripped = ANNOTATION.replace_all(raw_line, "");
            let line = stripped.trim();
            if line.is_empty() {
                continue;
            }
            match self.parse_line(line, line_no) {
                Ok(clause) => clauses.push(clause),
                Err(message) => errors.push(CompileDiagnostic {
                    line: line_no,
                    message,
                }),
            }
        }

        CompiledRuleSet {
            name: name.to_string(),
            clauses,
            min_score: self.config.min_score,
            errors,
        }
    }

    fn parse_line(&self, line: &str, line_no: u32) -> Result<RuleClause, String> {
        let (weight, rest) = self.split_weight(line)?;
        let (trigger, mut rest) = self.scan_matcher(rest)?;

        let mut inhibitors = Vec::new();
        loop {
            rest = rest.trim_start();
            if rest.is_empty() {
                break;
            }
            let Some(after_comma) = rest.strip_prefix(',') else {
                return Err(format!("unexpected text after matcher: '{rest}'"));
            };
            let (inhibitor, remainder) = self.scan_matcher(after_comma)?;
            inhibitors.push(inhibitor);
            rest = remainder;
        }

        Ok(RuleClause {
            weight,
            trigger,
            inhibitors,
            source_line: line_no,
        })
    }

    /// Split an optional leading signed integer weight off the line.
    fn split_weight<'a>(&self, line: &'a str) -> Result<(i64, &'a str), String> {
        let digits_start = usize::from(line.starts_with('+') || line.starts_with('-'));
        let digits_end = line[digits_start..]
            .find(|c: char| !c.is_ascii_digit())
            .map(|i| digits_start + i)
            .unwrap_or(line.len());
        if digits_end == digits_start {
            // no leading integer; the whole line is the matcher list
            return Ok((self.config.default_score, line));
        }

        let literal = &line[..digits_end];
        let weight = literal
            .parse::<i64>()
            .map_err(|_| format!("invalid weight integer '{literal}'"))?;
        let rest = line[digits_end..].trim_start();
        if rest.is_empty() {
            return Err("weight without a matcher".to_string());
        }
        Ok((weight, rest))
    }

    /// Scan one matcher from the head of `input` and return it with the
    /// unconsumed remainder. Delimiter-aware: a comma inside a pattern body
    /// is not a separator.
    fn scan_matcher<'a>(&self, input: &'a str) -> Result<(Matcher, &'a str), String> {
        let input = input.trim_start();

        if let Some(body) = input.strip_prefix("$$") {
            let Some(end) = body.find("$$") else {
                return Err("unterminated template marker".to_string());
            };
            let name = body[..end].trim();
            if name.is_empty() {
                return Err("empty template name".to_string());
            }
            let matcher = Matcher::Template {
                name: normalize_template_name(name),
                source: name.to_string(),
            };
            return Ok((matcher, &body[end + 2..]));
        }

        if let Some(after_delim) = input.strip_prefix('/') {
            let (body, after_body) = split_pattern_body(after_delim)?;
            let (flags, rest) = split_flags(after_body);
            let matcher = if let Some(size_expr) = body.strip_prefix("$SIZE") {
                parse_size_predicate(size_expr)?
            } else {
                self.compile_pattern(body, flags)?
            };
            return Ok((matcher, rest));
        }

        Err(format!("unrecognized matcher at '{input}'"))
    }

    fn compile_pattern(&self, body: &str, flags: &str) -> Result<Matcher, String> {
        let mut builder = RegexBuilder::new(body);
        builder.case_insensitive(self.config.case_insensitive);
        for flag in flags.chars() {
            match flag {
                'i' => builder.case_insensitive(true),
                'u' => builder.unicode(true),
                's' => builder.dot_matches_new_line(true),
                'm' => builder.multi_line(true),
                'x' => builder.ignore_whitespace(true),
                other => return Err(format!("unknown pattern flag '{other}'")),
            };
        }
        let regex = builder
            .build()
            .map_err(|e| format!("invalid pattern /{body}/: {e}"))?;
        Ok(Matcher::Pattern {
            regex,
            source: body.to_string(),
        })
    }
}

/// Find the closing delimiter of a pattern body, honoring `\/` escapes.
fn split_pattern_body(input: &str) -> Result<(&str, &str), String> {
    let mut escaped = false;
    for (i, c) in input.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '/' {
            return Ok((&input[..i], &input[i + 1..]));
        }
    }
    Err("unterminated pattern delimiter".to_string())
}

/// Mode flags are the ASCII letters immediately after the closing delimiter.
fn split_flags(input: &str) -> (&str, &str) {
    let end = input
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(input.len());
    (&input[..end], &input[end..])
}

fn parse_size_predicate(expr: &str) -> Result<Matcher, String> {
    let (op, number) = if let Some(rest) = expr.strip_prefix("<=") {
        (SizeOp::Le, rest)
    } else if let Some(rest) = expr.strip_prefix(">=") {
        (SizeOp::Ge, rest)
    } else if let Some(rest) = expr.strip_prefix("==") {
        (SizeOp::Eq, rest)
    } else if let Some(rest) = expr.strip_prefix('<') {
        (SizeOp::Lt, rest)
    } else if let Some(rest) = expr.strip_prefix('>') {
        (SizeOp::Gt, rest)
    } else {
        return Err(format!("invalid size comparison operator in '$SIZE{expr}'"));
    };
    let threshold = number
        .trim()
        .parse::<usize>()
        .map_err(|_| format!("invalid size threshold '{number}'"))?;
    Ok(Matcher::Size { op, threshold })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RuleKind, DEFAULT_SCORE};

    fn compile(source: &str) -> CompiledRuleSet {
        RuleCompiler::new(&ScoringConfig::default()).compile("test", source)
    }

    #[test]
    fn unweighted_line_gets_default_score() {
        let ruleset = compile("/Michigan/");
        assert!(ruleset.is_valid());
        assert_eq!(ruleset.clauses.len(), 1);
        assert_eq!(ruleset.clauses[0].weight, DEFAULT_SCORE);
        assert_eq!(ruleset.clauses[0].kind(), RuleKind::Pattern);
    }

    #[test]
    fn explicit_weights_parse_with_sign() {
        let ruleset = compile("20 /a/\n-5 /b/\n+7 /c/");
        assert!(ruleset.is_valid());
        let weights: Vec<i64> = ruleset.clauses.iter().map(|c| c.weight).collect();
        assert_eq!(weights, vec![20, -5, 7]);
    }

    #[test]
    fn comma_inside_pattern_is_not_a_separator() {
        let ruleset = compile(r"20 /\Wmichigan(-\w+){0,2}-stub\}\}/");
        assert!(ruleset.is_valid(), "diagnostics: {:?}", ruleset.errors);
        assert_eq!(ruleset.clauses.len(), 1);
        assert!(ruleset.clauses[0].inhibitors.is_empty());
    }

    #[test]
    fn commas_between_matchers_build_the_inhibitor_list() {
        let ruleset = compile("-10 /Michigan City/, /Indiana/, $$Disambig$$");
        assert!(ruleset.is_valid());
        let clause = &ruleset.clauses[0];
        assert_eq!(clause.inhibitors.len(), 2);
        assert_eq!(clause.inhibitors[0].kind(), RuleKind::Pattern);
        assert_eq!(clause.inhibitors[1].kind(), RuleKind::TemplatePredicate);
    }

    #[test]
    fn template_marker_lines() {
        let ruleset = compile("$$TestTemplate$$\n15 $$Other_One$$");
        assert!(ruleset.is_valid());
        assert_eq!(ruleset.clauses[0].kind(), RuleKind::TemplatePredicate);
        assert_eq!(ruleset.clauses[0].weight, DEFAULT_SCORE);
        assert_eq!(ruleset.clauses[1].weight, 15);
    }

    #[test]
    fn size_predicates_cover_all_operators() {
        let ruleset = compile(
            "/$SIZE<10/\n/$SIZE<=10/\n/$SIZE>10/\n/$SIZE>=10/\n/$SIZE==10/",
        );
        assert!(ruleset.is_valid(), "diagnostics: {:?}", ruleset.errors);
        assert_eq!(ruleset.clauses.len(), 5);
        for clause in &ruleset.clauses {
            assert_eq!(clause.kind(), RuleKind::SizePredicate);
        }
    }

    #[test]
    fn invalid_size_operator_is_a_diagnostic() {
        let ruleset = compile("/$SIZE!10/");
        assert_eq!(ruleset.clauses.len(), 0);
        assert_eq!(ruleset.errors.len(), 1);
        assert!(ruleset.errors[0].message.contains("size comparison operator"));
    }

    #[test]
    fn invalid_size_threshold_is_a_diagnostic() {
        let ruleset = compile("/$SIZE>ten/");
        assert_eq!(ruleset.errors.len(), 1);
        assert!(ruleset.errors[0].message.contains("size threshold"));
    }

    #[test]
    fn unterminated_pattern_is_a_diagnostic_with_its_line() {
        let ruleset = compile("/ok/\n20 /broken\n/also ok/");
        assert_eq!(ruleset.clauses.len(), 2);
        assert_eq!(ruleset.errors.len(), 1);
        assert_eq!(ruleset.errors[0].line, 2);
        assert!(ruleset.errors[0].message.contains("unterminated"));
    }

    #[test]
    fn invalid_regex_is_a_diagnostic() {
        let ruleset = compile("/val(id/");
        assert_eq!(ruleset.errors.len(), 1);
        assert!(ruleset.errors[0].message.contains("invalid pattern"));
    }

    #[test]
    fn unknown_flag_is_a_diagnostic() {
        let ruleset = compile("/abc/q");
        assert_eq!(ruleset.errors.len(), 1);
        assert!(ruleset.errors[0].message.contains("unknown pattern flag"));
    }

    #[test]
    fn oversized_weight_is_a_diagnostic() {
        let ruleset = compile("99999999999999999999999 /a/");
        assert_eq!(ruleset.errors.len(), 1);
        assert!(ruleset.errors[0].message.contains("invalid weight"));
    }

    #[test]
    fn annotations_and_blank_lines_are_ignored() {
        let ruleset = compile("\n/Michigan/ <!-- the main signal -->\n\n<!-- a whole-line note -->\n");
        assert!(ruleset.is_valid());
        assert_eq!(ruleset.clauses.len(), 1);
        assert_eq!(ruleset.clauses[0].source_line, 2);
    }

    #[test]
    fn escaped_delimiter_stays_in_the_pattern() {
        let ruleset = compile(r"/a\/b/");
        assert!(ruleset.is_valid(), "diagnostics: {:?}", ruleset.errors);
        assert_eq!(ruleset.clauses[0].trigger.display(), r"/a\/b/");
    }

    #[test]
    fn default_matching_is_case_insensitive_unless_configured() {
        let insensitive = compile("/michigan/");
        let Matcher::Pattern { regex, .. } = &insensitive.clauses[0].trigger else {
            panic!("expected pattern");
        };
        assert!(regex.is_match("MICHIGAN"));

        let mut config = ScoringConfig::default();
        config.case_insensitive = false;
        let sensitive = RuleCompiler::new(&config).compile("test", "/michigan/\n/Topeka/i");
        let Matcher::Pattern { regex, .. } = &sensitive.clauses[0].trigger else {
            panic!("expected pattern");
        };
        assert!(!regex.is_match("MICHIGAN"));
        // the `i` flag forces insensitivity back on per pattern
        let Matcher::Pattern { regex, .. } = &sensitive.clauses[1].trigger else {
            panic!("expected pattern");
        };
        assert!(regex.is_match("TOPEKA"));
    }

    #[test]
    fn min_score_comes_from_config() {
        let ruleset = compile("/a/");
        assert_eq!(ruleset.min_score, 10);

        let mut config = ScoringConfig::default();
        config.min_score = 40;
        let ruleset = RuleCompiler::new(&config).compile("test", "/a/");
        assert_eq!(ruleset.min_score, 40);
    }
}
