//! Rule set
//!
//! Everything the tiers look for is data: markers, the ordered high-confidence patterns, the
//! keyword and exclusion lists, and the window sizes. [`RuleSpec`] is the declarative,
//! serde-friendly description (what configuration files deserialize into); [`RuleSet`] is the
//! compiled form the extractor runs against.
//!
//! Compilation is the only place a rule can fail. A bad regular expression is a configuration
//! fault reported once, at startup, never during an extraction call.
//!
//! Order is significant for both `patterns` and `special_cases`: they are kept as `Vec`s and
//! evaluated front to back.

use crate::snippet::tiers::Tier;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_SUMMARY_HEADER: &str = "===== Results summary =====";
pub const DEFAULT_SECTION_DELIMITER: &str = "=====";
pub const DEFAULT_FAILURE_MARKER: &str = "FAILED";
pub const DEFAULT_CONTEXT_LINES: usize = 10;
pub const DEFAULT_FALLBACK_LINES: usize = 20;

/// Built-in high-confidence patterns, highest priority first.
const BUILTIN_PATTERNS: &[(&str, &str)] = &[
    ("make-error", r"make\[\d+\]: \*\*\* .* Error \d+"),
    ("docker-buildx", r"ERROR: failed to solve:"),
    ("fatal-error", r"fatal error:"),
    ("go-panic", r"panic:"),
];

const BUILTIN_KEYWORDS: &[&str] = &["error", "failed", "exit code"];

/// Noise that mentions a keyword without being the failure. Matched case-insensitively.
const BUILTIN_EXCLUSIONS: &[&str] = &[
    r"warning:",
    r"^usage:",
    r"^flags:",
    r"global flags:",
    // usually a symptom of an earlier failure rather than the root cause
    r"unauthorized:",
];

static BUILTIN: Lazy<RuleSet> = Lazy::new(|| {
    RuleSet::compile(RuleSpec::default()).expect("built-in rules are valid")
});

/// Errors raised while compiling a [`RuleSpec`].
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("invalid {tier} pattern '{name}': {source}")]
    InvalidPattern {
        tier: Tier,
        name: String,
        #[source]
        source: regex::Error,
    },

    #[error("{0} must not be empty")]
    EmptyMarker(&'static str),

    #[error("keyword list must contain at least one keyword")]
    NoKeywords,

    #[error("keyword #{0} is empty and would match every line")]
    EmptyKeyword(usize),

    #[error("{0} must be at least 1")]
    ZeroLines(String),
}

/// A named regular expression as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternSpec {
    pub name: String,
    pub regex: String,
}

impl PatternSpec {
    pub fn new(name: impl Into<String>, regex: impl Into<String>) -> Self {
        PatternSpec {
            name: name.into(),
            regex: regex.into(),
        }
    }
}

/// Asymmetric window used when a high-confidence match line contains `marker`.
///
/// Some failures print their explanation after the marker line (a `check-dirty` target prints
/// the offending diff below it), so the window leans forward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialCase {
    pub marker: String,
    pub before: usize,
    pub after: usize,
}

impl SpecialCase {
    pub fn new(marker: impl Into<String>, before: usize, after: usize) -> Self {
        SpecialCase {
            marker: marker.into(),
            before,
            after,
        }
    }
}

/// Declarative description of every rule. `Default` is the built-in rule set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSpec {
    pub summary_header: String,
    pub section_delimiter: String,
    pub failure_marker: String,
    pub context_lines: usize,
    pub patterns: Vec<PatternSpec>,
    pub special_cases: Vec<SpecialCase>,
    pub keywords: Vec<String>,
    pub exclusions: Vec<String>,
    pub fallback_lines: usize,
}

impl Default for RuleSpec {
    fn default() -> Self {
        RuleSpec {
            summary_header: DEFAULT_SUMMARY_HEADER.to_string(),
            section_delimiter: DEFAULT_SECTION_DELIMITER.to_string(),
            failure_marker: DEFAULT_FAILURE_MARKER.to_string(),
            context_lines: DEFAULT_CONTEXT_LINES,
            patterns: BUILTIN_PATTERNS
                .iter()
                .map(|(name, regex)| PatternSpec::new(*name, *regex))
                .collect(),
            special_cases: vec![SpecialCase::new("check-dirty", 5, 50)],
            keywords: BUILTIN_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            exclusions: BUILTIN_EXCLUSIONS.iter().map(|e| e.to_string()).collect(),
            fallback_lines: DEFAULT_FALLBACK_LINES,
        }
    }
}

/// A compiled regular expression tagged with the tier that evaluates it.
#[derive(Debug, Clone)]
pub struct Pattern {
    name: String,
    tier: Tier,
    regex: Regex,
}

impl Pattern {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn is_match(&self, line: &str) -> bool {
        self.regex.is_match(line)
    }
}

/// Markers for the structured results-summary tier.
#[derive(Debug, Clone)]
pub struct SummaryRules {
    pub header: String,
    pub delimiter: String,
    pub failure_marker: String,
}

/// The compiled rules the extractor runs against.
#[derive(Debug, Clone)]
pub struct RuleSet {
    summary: SummaryRules,
    context_lines: usize,
    patterns: Vec<Pattern>,
    special_cases: Vec<SpecialCase>,
    keywords: Vec<String>,
    exclusions: Vec<Pattern>,
    fallback_lines: usize,
}

impl RuleSet {
    /// The built-in rules, compiled once per process.
    pub fn builtin() -> &'static RuleSet {
        &BUILTIN
    }

    pub fn compile(spec: RuleSpec) -> Result<RuleSet, RuleError> {
        if spec.summary_header.is_empty() {
            return Err(RuleError::EmptyMarker("summary header"));
        }
        if spec.section_delimiter.is_empty() {
            return Err(RuleError::EmptyMarker("section delimiter"));
        }
        if spec.failure_marker.is_empty() {
            return Err(RuleError::EmptyMarker("failure marker"));
        }
        if spec.context_lines == 0 {
            return Err(RuleError::ZeroLines("context lines".to_string()));
        }
        if spec.fallback_lines == 0 {
            return Err(RuleError::ZeroLines("fallback lines".to_string()));
        }
        for case in &spec.special_cases {
            if case.marker.is_empty() {
                return Err(RuleError::EmptyMarker("special case marker"));
            }
            if case.after == 0 {
                return Err(RuleError::ZeroLines(format!(
                    "lines after '{}'",
                    case.marker
                )));
            }
        }
        if spec.keywords.is_empty() {
            return Err(RuleError::NoKeywords);
        }
        if let Some(position) = spec.keywords.iter().position(|k| k.is_empty()) {
            return Err(RuleError::EmptyKeyword(position));
        }

        let patterns = spec
            .patterns
            .into_iter()
            .map(|p| compile_pattern(p.name, &p.regex, Tier::HighConfidence, false))
            .collect::<Result<Vec<_>, _>>()?;

        let exclusions = spec
            .exclusions
            .into_iter()
            .enumerate()
            .map(|(i, regex)| {
                compile_pattern(format!("exclusion-{}", i + 1), &regex, Tier::Keyword, true)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RuleSet {
            summary: SummaryRules {
                header: spec.summary_header,
                delimiter: spec.section_delimiter,
                failure_marker: spec.failure_marker,
            },
            context_lines: spec.context_lines,
            patterns,
            special_cases: spec.special_cases,
            keywords: spec.keywords.iter().map(|k| k.to_lowercase()).collect(),
            exclusions,
            fallback_lines: spec.fallback_lines,
        })
    }

    pub fn summary(&self) -> &SummaryRules {
        &self.summary
    }

    /// Symmetric margin used by the high-confidence and keyword tiers.
    pub fn context_lines(&self) -> usize {
        self.context_lines
    }

    /// High-confidence patterns, highest priority first.
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn special_cases(&self) -> &[SpecialCase] {
        &self.special_cases
    }

    /// The first special case whose marker appears on `line`.
    pub fn special_case_for(&self, line: &str) -> Option<&SpecialCase> {
        self.special_cases
            .iter()
            .find(|case| line.contains(case.marker.as_str()))
    }

    /// Lowercase failure keywords.
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn exclusions(&self) -> &[Pattern] {
        &self.exclusions
    }

    pub fn fallback_lines(&self) -> usize {
        self.fallback_lines
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        RuleSet::builtin().clone()
    }
}

fn compile_pattern(
    name: String,
    regex: &str,
    tier: Tier,
    case_insensitive: bool,
) -> Result<Pattern, RuleError> {
    match RegexBuilder::new(regex)
        .case_insensitive(case_insensitive)
        .build()
    {
        Ok(regex) => Ok(Pattern { name, tier, regex }),
        Err(source) => Err(RuleError::InvalidPattern { tier, name, source }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_pattern_order() {
        let names: Vec<_> = RuleSet::builtin()
            .patterns()
            .iter()
            .map(|p| p.name())
            .collect();
        assert_eq!(
            names,
            vec!["make-error", "docker-buildx", "fatal-error", "go-panic"]
        );
    }

    #[test]
    fn test_builtin_make_pattern() {
        let make = &RuleSet::builtin().patterns()[0];
        assert!(make.is_match("make[2]: *** [Makefile:42: build] Error 2"));
        assert!(!make.is_match("make: Nothing to be done for 'all'."));
        assert_eq!(make.tier(), Tier::HighConfidence);
    }

    #[test]
    fn test_exclusions_are_case_insensitive() {
        let rules = RuleSet::builtin();
        let excluded = |line: &str| rules.exclusions().iter().any(|p| p.is_match(line));
        assert!(excluded("WARNING: error budget exceeded"));
        assert!(excluded("Usage: tool [flags]"));
        assert!(!excluded("  usage: indented help is not anchored"));
        assert!(!excluded("error: linker failed"));
    }

    #[test]
    fn test_keywords_are_lowercased() {
        let spec = RuleSpec {
            keywords: vec!["Exit Code".to_string()],
            ..RuleSpec::default()
        };
        let rules = RuleSet::compile(spec).unwrap();
        assert_eq!(rules.keywords(), &["exit code".to_string()]);
    }

    #[test]
    fn test_invalid_pattern_is_reported_with_name() {
        let spec = RuleSpec {
            patterns: vec![PatternSpec::new("broken", "make[")],
            ..RuleSpec::default()
        };
        let err = RuleSet::compile(spec).unwrap_err();
        match &err {
            RuleError::InvalidPattern { tier, name, .. } => {
                assert_eq!(*tier, Tier::HighConfidence);
                assert_eq!(name, "broken");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().starts_with("invalid high-confidence pattern 'broken'"));
    }

    #[test]
    fn test_invalid_exclusion_is_reported() {
        let spec = RuleSpec {
            exclusions: vec!["(unclosed".to_string()],
            ..RuleSpec::default()
        };
        assert!(matches!(
            RuleSet::compile(spec),
            Err(RuleError::InvalidPattern {
                tier: Tier::Keyword,
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_degenerate_specs() {
        let no_keywords = RuleSpec {
            keywords: Vec::new(),
            ..RuleSpec::default()
        };
        assert!(matches!(
            RuleSet::compile(no_keywords),
            Err(RuleError::NoKeywords)
        ));

        let empty_keyword = RuleSpec {
            keywords: vec!["error".to_string(), String::new()],
            ..RuleSpec::default()
        };
        assert!(matches!(
            RuleSet::compile(empty_keyword),
            Err(RuleError::EmptyKeyword(1))
        ));

        let zero_tail = RuleSpec {
            fallback_lines: 0,
            ..RuleSpec::default()
        };
        assert!(matches!(
            RuleSet::compile(zero_tail),
            Err(RuleError::ZeroLines(_))
        ));

        let no_header = RuleSpec {
            summary_header: String::new(),
            ..RuleSpec::default()
        };
        assert!(matches!(
            RuleSet::compile(no_header),
            Err(RuleError::EmptyMarker("summary header"))
        ));
    }

    #[test]
    fn test_special_case_lookup_uses_list_order() {
        let spec = RuleSpec {
            special_cases: vec![SpecialCase::new("lint", 1, 2), SpecialCase::new("check", 3, 4)],
            ..RuleSpec::default()
        };
        let rules = RuleSet::compile(spec).unwrap();
        let case = rules.special_case_for("make check lint").unwrap();
        assert_eq!(case.marker, "lint");
        assert!(rules.special_case_for("make build").is_none());
    }
}
