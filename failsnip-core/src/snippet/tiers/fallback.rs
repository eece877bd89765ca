//! Tail fallback: when nothing matched, the end of the log is the best guess.

use crate::snippet::document::LogDocument;
use crate::snippet::tiers::TierMatch;
use crate::snippet::window::Window;

pub fn find(doc: &LogDocument<'_>, lines: usize) -> TierMatch {
    TierMatch::new(Window::tail(lines, doc.len()))
}
