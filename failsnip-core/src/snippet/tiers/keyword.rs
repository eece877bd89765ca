//! Generic keyword tier
//!
//! Loose keywords such as "error" show up everywhere in CI output, so a line only counts when it
//! carries a keyword and none of the exclusion patterns (warnings, usage text, flag listings,
//! auth noise). Lines are case-folded before both checks.

use crate::snippet::document::LogDocument;
use crate::snippet::rules::RuleSet;
use crate::snippet::tiers::TierMatch;
use crate::snippet::window::Window;
use tracing::{debug, trace};

pub fn find(doc: &LogDocument<'_>, rules: &RuleSet) -> Option<TierMatch> {
    let (index, _) = doc.iter_rev().find(|(index, line)| qualifies(*index, line, rules))?;
    debug!(line = index, "generic keyword match");
    let margin = rules.context_lines();
    Some(TierMatch::new(Window::around(index, margin, margin, doc.len())).with_anchor(index))
}

/// Keyword present and not excluded.
fn qualifies(index: usize, line: &str, rules: &RuleSet) -> bool {
    let folded = line.to_lowercase();
    if !rules.keywords().iter().any(|k| folded.contains(k.as_str())) {
        return false;
    }
    match rules.exclusions().iter().find(|p| p.is_match(&folded)) {
        Some(exclusion) => {
            trace!(line = index, exclusion = exclusion.as_str(), "keyword line excluded");
            false
        }
        None => true,
    }
}
