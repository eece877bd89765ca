//! High-confidence pattern tier
//!
//! Patterns are tried in priority order. The first pattern that matches anywhere in the log
//! wins, even when a lower-priority pattern matches closer to the end; within the winning
//! pattern the last matching line is used. When two patterns match the very same line the
//! earlier one in the list therefore wins as well.

use crate::snippet::document::LogDocument;
use crate::snippet::rules::RuleSet;
use crate::snippet::tiers::TierMatch;
use crate::snippet::window::Window;
use tracing::debug;

pub fn find(doc: &LogDocument<'_>, rules: &RuleSet) -> Option<TierMatch> {
    for pattern in rules.patterns() {
        let Some((index, line)) = doc.iter_rev().find(|(_, line)| pattern.is_match(line)) else {
            continue;
        };

        let window = match rules.special_case_for(line) {
            Some(case) => {
                debug!(
                    pattern = pattern.name(),
                    marker = %case.marker,
                    line = index,
                    "special-case match, leaning window forward"
                );
                Window::around(index, case.before, case.after, doc.len())
            }
            None => {
                debug!(pattern = pattern.name(), line = index, "high-confidence match");
                Window::around(index, rules.context_lines(), rules.context_lines(), doc.len())
            }
        };

        return Some(
            TierMatch::new(window)
                .with_anchor(index)
                .with_pattern(pattern.name()),
        );
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("line {i}")).collect()
    }

    fn run(lines: &[String]) -> Option<TierMatch> {
        let raw = lines.join("\n");
        find(&LogDocument::new(&raw), RuleSet::builtin())
    }

    #[test]
    fn test_last_match_wins_within_pattern() {
        let mut lines = numbered(100);
        lines[20] = "fatal error: first".to_string();
        lines[70] = "fatal error: second".to_string();
        let found = run(&lines).unwrap();
        assert_eq!(found.anchor, Some(70));
        assert_eq!(found.window, Window::new(60, 80));
        assert_eq!(found.pattern.as_deref(), Some("fatal-error"));
    }

    #[test]
    fn test_list_order_beats_position() {
        let mut lines = numbered(100);
        lines[10] = "make[1]: *** [all] Error 2".to_string();
        lines[90] = "panic: runtime error".to_string();
        let found = run(&lines).unwrap();
        assert_eq!(found.anchor, Some(10));
        assert_eq!(found.pattern.as_deref(), Some("make-error"));
        assert_eq!(found.window, Window::new(0, 20));
    }

    #[test]
    fn test_check_dirty_leans_forward() {
        let mut lines = numbered(200);
        lines[100] = "make[1]: *** [Makefile:12: check-dirty] Error 1".to_string();
        let found = run(&lines).unwrap();
        assert_eq!(found.window, Window::new(95, 150));
    }

    #[test]
    fn test_check_dirty_clamps_at_end() {
        let mut lines = numbered(30);
        lines[27] = "make[2]: *** [check-dirty] Error 1".to_string();
        let found = run(&lines).unwrap();
        assert_eq!(found.window, Window::new(22, 30));
    }

    #[test]
    fn test_same_line_goes_to_first_pattern() {
        let mut lines = numbered(5);
        lines[2] = "panic: fatal error: both".to_string();
        let found = run(&lines).unwrap();
        assert_eq!(found.pattern.as_deref(), Some("fatal-error"));
    }

    #[test]
    fn test_no_pattern() {
        assert_eq!(run(&numbered(50)), None);
    }
}
