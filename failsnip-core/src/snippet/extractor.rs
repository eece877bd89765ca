//! Tier dispatch
//!
//! [`Extractor::extract`] builds a [`LogDocument`], walks [`Tier::ALL`] in order and returns the
//! first tier's window as an [`Excerpt`]. The fallback tier always matches, so the only way to
//! get no excerpt is an empty log.

use crate::snippet::document::LogDocument;
use crate::snippet::rules::RuleSet;
use crate::snippet::tiers::{Tier, TierMatch};
use crate::snippet::window::Window;
use once_cell::sync::Lazy;
use serde::Serialize;
use tracing::{debug, info};

static DEFAULT_EXTRACTOR: Lazy<Extractor> = Lazy::new(Extractor::default);

/// `Some(excerpt)` for any non-empty log, `None` for an empty one.
pub type ExtractionResult = Option<Excerpt>;

/// Extract with the built-in rules.
pub fn extract(raw: &str) -> ExtractionResult {
    DEFAULT_EXTRACTOR.extract(raw)
}

/// The excerpt chosen for a log, with enough provenance to explain the choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Excerpt {
    pub tier: Tier,
    pub window: Window,
    /// Matched line (0-based) when the tier matched a specific line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    pub text: String,
}

impl Excerpt {
    fn new(tier: Tier, found: TierMatch, doc: &LogDocument<'_>) -> Self {
        Excerpt {
            tier,
            text: doc.text(found.window),
            window: found.window,
            anchor: found.anchor,
            pattern: found.pattern,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of log lines in the excerpt.
    pub fn line_count(&self) -> usize {
        self.window.len()
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

/// Runs the tier cascade with a fixed [`RuleSet`]. Cheap to share across threads.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    rules: RuleSet,
}

impl Extractor {
    pub fn new(rules: RuleSet) -> Self {
        Extractor { rules }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn extract(&self, raw: &str) -> ExtractionResult {
        if raw.is_empty() {
            debug!("empty log, nothing to extract");
            return None;
        }

        let doc = LogDocument::new(raw);
        for tier in Tier::ALL {
            debug!(%tier, lines = doc.len(), "trying tier");
            if let Some(found) = tier.find(&doc, &self.rules) {
                info!(
                    %tier,
                    window = %found.window,
                    anchor = ?found.anchor,
                    pattern = ?found.pattern,
                    "extracted snippet"
                );
                return Some(Excerpt::new(tier, found, &doc));
            }
        }

        // Unreachable with the built-in tier list: the fallback tier always matches.
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snippet::rules::RuleSpec;

    #[test]
    fn test_empty_log_has_no_excerpt() {
        assert_eq!(extract(""), None);
    }

    #[test]
    fn test_newline_only_log_still_has_excerpt() {
        let excerpt = extract("\n").unwrap();
        assert_eq!(excerpt.tier, Tier::Fallback);
        assert_eq!(excerpt.text(), "\n");
    }

    #[test]
    fn test_summary_beats_everything() {
        let raw = "panic: boom\n===== Results summary =====\nFAILED a\n===== end =====\nerror: x";
        let excerpt = extract(raw).unwrap();
        assert_eq!(excerpt.tier, Tier::Summary);
        assert_eq!(excerpt.text(), "===== Results summary =====\nFAILED a");
        assert_eq!(excerpt.anchor, None);
        assert_eq!(excerpt.pattern, None);
    }

    #[test]
    fn test_summary_without_failure_falls_through() {
        let raw = "===== Results summary =====\nok a\n===== end =====\nerror: x";
        let excerpt = extract(raw).unwrap();
        assert_eq!(excerpt.tier, Tier::Keyword);
        assert_eq!(excerpt.anchor, Some(3));
    }

    #[test]
    fn test_pattern_beats_keyword() {
        let raw = "fatal error: foo.h not found\ncompilation failed\nerror: exit code 1";
        let excerpt = extract(raw).unwrap();
        assert_eq!(excerpt.tier, Tier::HighConfidence);
        assert_eq!(excerpt.anchor, Some(0));
        assert_eq!(excerpt.pattern.as_deref(), Some("fatal-error"));
    }

    #[test]
    fn test_custom_rules() {
        let spec = RuleSpec {
            fallback_lines: 2,
            ..RuleSpec::default()
        };
        let extractor = Extractor::new(RuleSet::compile(spec).unwrap());
        let excerpt = extractor.extract("a\nb\nc\nd").unwrap();
        assert_eq!(excerpt.text(), "c\nd");
        assert_eq!(excerpt.line_count(), 2);
    }

    #[test]
    fn test_summary_excerpt_serializes_without_anchor() {
        let excerpt = extract("===== Results summary =====\nFAILED a").unwrap();
        let json = serde_json::to_value(&excerpt).unwrap();
        assert_eq!(json["tier"], "summary");
        assert!(json.get("anchor").is_none());
    }

    #[test]
    fn test_excerpt_serializes_tier_name() {
        let excerpt = extract("all good").unwrap();
        let json = serde_json::to_value(&excerpt).unwrap();
        assert_eq!(json["tier"], "fallback");
        assert_eq!(json["window"]["start"], 0);
        assert!(json.get("anchor").is_none());
    }
}
