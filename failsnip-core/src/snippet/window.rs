//! Clamped line windows
//!
//! Every tier that reports context around a line goes through [`Window::around`], so the
//! clamping rule lives in exactly one place:
//!
//!     start = max(0, index - before)
//!     end   = min(len, index + after)
//!
//! Windows are half-open, `[start, end)`.

use serde::Serialize;
use std::fmt;

/// A half-open range of line indices into a [`crate::LogDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Window {
    pub start: usize,
    pub end: usize,
}

impl Window {
    pub fn new(start: usize, end: usize) -> Self {
        Window {
            start,
            end: end.max(start),
        }
    }

    /// Context window around `index` in a document of `len` lines.
    ///
    /// `after` counts from the matched line itself, so `around(i, 10, 10, n)` covers ten lines
    /// before the match, the match, and the nine lines that follow it.
    pub fn around(index: usize, before: usize, after: usize, len: usize) -> Self {
        let start = index.saturating_sub(before);
        let end = index.saturating_add(after).min(len);
        Window::new(start.min(end), end)
    }

    /// The last `count` lines of a document of `len` lines, or all of them if there are fewer.
    pub fn tail(count: usize, len: usize) -> Self {
        Window::new(len.saturating_sub(count), len)
    }

    /// Restrict the window to a document of `len` lines.
    pub fn clamp_to(self, len: usize) -> Self {
        let end = self.end.min(len);
        Window::new(self.start.min(end), end)
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index < self.end
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_around_in_the_middle() {
        let window = Window::around(50, 10, 10, 100);
        assert_eq!(window, Window::new(40, 60));
        assert_eq!(window.len(), 20);
        assert!(window.contains(50));
    }

    #[test]
    fn test_around_clamps_at_start() {
        assert_eq!(Window::around(3, 10, 10, 100), Window::new(0, 13));
    }

    #[test]
    fn test_around_clamps_at_end() {
        assert_eq!(Window::around(97, 10, 10, 100), Window::new(87, 100));
    }

    #[test]
    fn test_around_asymmetric() {
        assert_eq!(Window::around(20, 5, 50, 200), Window::new(15, 70));
    }

    #[test]
    fn test_around_does_not_overflow() {
        let window = Window::around(5, 1, usize::MAX, 10);
        assert_eq!(window, Window::new(4, 10));
    }

    #[test]
    fn test_tail_shorter_document() {
        assert_eq!(Window::tail(20, 7), Window::new(0, 7));
    }

    #[test]
    fn test_tail_longer_document() {
        assert_eq!(Window::tail(20, 75), Window::new(55, 75));
    }

    #[test]
    fn test_clamp_to() {
        assert_eq!(Window::new(5, 30).clamp_to(10), Window::new(5, 10));
        assert_eq!(Window::new(15, 30).clamp_to(10), Window::new(10, 10));
    }

    #[test]
    fn test_display() {
        assert_eq!(Window::new(2, 9).to_string(), "[2, 9)");
    }
}
