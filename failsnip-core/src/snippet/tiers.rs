//! Extraction tiers
//!
//! Each tier is a pure function from a document and the rule set to an optional
//! [`TierMatch`]. The order of [`Tier::ALL`] is the confidence hierarchy; the extractor walks it
//! front to back and never reorders it.

pub mod fallback;
pub mod high_confidence;
pub mod keyword;
pub mod summary;

use crate::snippet::document::LogDocument;
use crate::snippet::rules::RuleSet;
use crate::snippet::window::Window;
use serde::Serialize;
use std::fmt;

/// One ranked strategy of the cascade. Declaration order is priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tier {
    Summary,
    HighConfidence,
    Keyword,
    Fallback,
}

impl Tier {
    pub const ALL: [Tier; 4] = [
        Tier::Summary,
        Tier::HighConfidence,
        Tier::Keyword,
        Tier::Fallback,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Tier::Summary => "summary",
            Tier::HighConfidence => "high-confidence",
            Tier::Keyword => "keyword",
            Tier::Fallback => "fallback",
        }
    }

    /// Run this tier against `doc`.
    pub fn find(&self, doc: &LogDocument<'_>, rules: &RuleSet) -> Option<TierMatch> {
        match self {
            Tier::Summary => summary::find(doc, rules.summary()),
            Tier::HighConfidence => high_confidence::find(doc, rules),
            Tier::Keyword => keyword::find(doc, rules),
            Tier::Fallback => Some(fallback::find(doc, rules.fallback_lines())),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a tier found: the window to excerpt and, when there is one, the line that triggered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierMatch {
    pub window: Window,
    /// Index of the matched line. Only the high-confidence and keyword tiers match a single
    /// line; the summary block and the tail have none.
    pub anchor: Option<usize>,
    /// Name of the high-confidence pattern that won, if any.
    pub pattern: Option<String>,
}

impl TierMatch {
    pub fn new(window: Window) -> Self {
        TierMatch {
            window,
            anchor: None,
            pattern: None,
        }
    }

    pub fn with_anchor(mut self, anchor: usize) -> Self {
        self.anchor = Some(anchor);
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }
}
