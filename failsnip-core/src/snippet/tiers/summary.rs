//! Structured results-summary tier
//!
//! Test runners that print a delimited summary section are the most reliable source of failure
//! context: when the block names a failure, the block is the excerpt.
//!
//!     ===== Results summary =====      <- header (first line containing the header marker)
//!     ok   pkg/a
//!     FAILED pkg/b                     <- failure marker required somewhere in the block
//!     ===== Elapsed =====              <- first delimiter after the header ends the block
//!
//! A summary without a failure marker says nothing about the failure, so it is not returned.

use crate::snippet::document::LogDocument;
use crate::snippet::rules::SummaryRules;
use crate::snippet::tiers::TierMatch;
use crate::snippet::window::Window;
use tracing::debug;

pub fn find(doc: &LogDocument<'_>, rules: &SummaryRules) -> Option<TierMatch> {
    let lines = doc.lines();
    let header = lines
        .iter()
        .position(|line| line.contains(rules.header.as_str()))?;

    let end = lines[header + 1..]
        .iter()
        .position(|line| line.starts_with(rules.delimiter.as_str()))
        .map_or(lines.len(), |offset| header + 1 + offset);
    let block = Window::new(header, end);

    if doc
        .slice(block)
        .iter()
        .any(|line| line.contains(rules.failure_marker.as_str()))
    {
        Some(TierMatch::new(block))
    } else {
        debug!(%block, "results summary has no failure marker, skipping");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snippet::rules::RuleSet;

    fn run(raw: &str) -> Option<TierMatch> {
        find(&LogDocument::new(raw), RuleSet::builtin().summary())
    }

    #[test]
    fn test_block_ends_at_next_delimiter() {
        let raw = "setup\n===== Results summary =====\nFAILED test_x\nok test_y\n===== done =====\ntrailer";
        let found = run(raw).unwrap();
        assert_eq!(found.window, Window::new(1, 4));
        assert_eq!(found.anchor, None);
    }

    #[test]
    fn test_block_runs_to_end_without_delimiter() {
        let raw = "===== Results summary =====\nok a\nFAILED b";
        let found = run(raw).unwrap();
        assert_eq!(found.window, Window::new(0, 3));
        assert_eq!(found.anchor, None);
    }

    #[test]
    fn test_failure_after_block_does_not_count() {
        let raw = "===== Results summary =====\nok a\n===== end =====\nFAILED later";
        assert_eq!(run(raw), None);
    }

    #[test]
    fn test_no_header() {
        assert_eq!(run("FAILED something\nerror: boom"), None);
    }

    #[test]
    fn test_only_first_header_is_considered() {
        let raw = "===== Results summary =====\nok\n===== x =====\n===== Results summary =====\nFAILED";
        assert_eq!(run(raw), None);
    }

    #[test]
    fn test_header_matches_by_containment() {
        let raw = "12:00:01 ===== Results summary =====\nFAILED t";
        assert_eq!(run(raw).unwrap().window, Window::new(0, 2));
    }
}
