//! Line view over a raw log
//!
//! The raw text is split on `\n` exactly like the logs are written: a trailing newline leaves a
//! final empty line and carriage returns stay attached to their line. Joining any window back
//! with `\n` therefore reproduces a verbatim slice of the input.

use crate::snippet::window::Window;

/// An ordered, immutable sequence of log lines, indexed `0..len()`.
///
/// Borrows from the raw log, so building one costs a single pass and one `Vec` of slices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogDocument<'a> {
    lines: Vec<&'a str>,
}

impl<'a> LogDocument<'a> {
    /// Split a raw log into lines. Text without any line break is a single line.
    pub fn new(raw: &'a str) -> Self {
        LogDocument {
            lines: raw.split('\n').collect(),
        }
    }

    /// Number of lines. Never zero: even the empty string is one (empty) line.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True when the document holds a single empty line, i.e. it came from an empty log.
    pub fn is_empty(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].is_empty()
    }

    pub fn line(&self, index: usize) -> Option<&'a str> {
        self.lines.get(index).copied()
    }

    pub fn lines(&self) -> &[&'a str] {
        &self.lines
    }

    /// Lines from the last to the first, paired with their index.
    ///
    /// Tiers that want the most recent failure iterate this and stop at the first hit, so a
    /// match near the end of a huge log never pays for a full scan.
    pub fn iter_rev(&self) -> impl Iterator<Item = (usize, &'a str)> + '_ {
        self.lines.iter().copied().enumerate().rev()
    }

    /// The lines covered by `window`, already clamped to the document.
    pub fn slice(&self, window: Window) -> &[&'a str] {
        let window = window.clamp_to(self.len());
        &self.lines[window.start..window.end]
    }

    /// Rejoin the lines covered by `window` into excerpt text.
    pub fn text(&self, window: Window) -> String {
        self.slice(window).join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_without_break() {
        let doc = LogDocument::new("just one line");
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.line(0), Some("just one line"));
        assert!(!doc.is_empty());
    }

    #[test]
    fn test_empty_log_is_one_empty_line() {
        let doc = LogDocument::new("");
        assert_eq!(doc.len(), 1);
        assert!(doc.is_empty());
    }

    #[test]
    fn test_trailing_newline_keeps_final_empty_line() {
        let doc = LogDocument::new("a\nb\n");
        assert_eq!(doc.lines(), &["a", "b", ""]);
        assert!(!doc.is_empty());
    }

    #[test]
    fn test_carriage_returns_are_preserved() {
        let doc = LogDocument::new("a\r\nb");
        assert_eq!(doc.lines(), &["a\r", "b"]);
        assert_eq!(doc.text(Window::new(0, 2)), "a\r\nb");
    }

    #[test]
    fn test_iter_rev_walks_from_the_end() {
        let doc = LogDocument::new("a\nb\nc");
        let seen: Vec<_> = doc.iter_rev().collect();
        assert_eq!(seen, vec![(2, "c"), (1, "b"), (0, "a")]);
    }

    #[test]
    fn test_text_clamps_out_of_range_windows() {
        let doc = LogDocument::new("a\nb\nc");
        assert_eq!(doc.text(Window::new(1, 99)), "b\nc");
    }
}
