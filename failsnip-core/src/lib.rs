//! # failsnip-core
//!
//! Finds the part of a CI job log that explains why the job failed.
//!
//! A job log can run to tens of thousands of lines, while the summarizer that consumes the
//! excerpt works under a strict size budget. The extractor walks a fixed cascade of tiers and
//! the first tier that matches decides the excerpt:
//!
//!     1. summary         a "Results summary" block that reports a FAILED entry
//!     2. high-confidence known fatal patterns (make, docker buildx, fatal error, go panic)
//!     3. keyword         loose failure keywords, minus warning/help/noise lines
//!     4. fallback        the tail of the log
//!
//! File Layout
//!
//!     src/snippet
//!       ├── document.rs      LogDocument: the immutable line view of a raw log
//!       ├── window.rs        Window and the shared clamped windowing helpers
//!       ├── rules.rs         Pattern, RuleSpec and the compiled RuleSet
//!       ├── tiers/           one module per tier
//!       ├── extractor.rs     tier dispatch and the Excerpt result
//!       └── loader.rs        SnippetLoader: files, readers, strings and size caps
//!     src/analysis.rs        prompt rendering and summarizer response parsing
//!
//! Everything here is synchronous and free of shared mutable state, so independent logs can be
//! processed from as many threads as the caller likes.

pub mod analysis;
pub mod snippet;

pub use analysis::{render_prompt, Analysis, AnalysisError};
pub use snippet::document::LogDocument;
pub use snippet::extractor::{extract, Excerpt, ExtractionResult, Extractor};
pub use snippet::loader::{LoaderError, SnippetLoader};
pub use snippet::rules::{Pattern, PatternSpec, RuleError, RuleSet, RuleSpec, SpecialCase};
pub use snippet::tiers::Tier;
pub use snippet::window::Window;
