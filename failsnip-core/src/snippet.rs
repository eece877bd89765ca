//! Snippet extraction
//!
//! The extraction pipeline is deliberately small: a [`document::LogDocument`] is built once per
//! call, each tier in [`tiers`] gets a read-only view of it, and the [`extractor::Extractor`]
//! stops at the first tier that returns a [`window::Window`].
//!
//! Tier order is fixed by [`tiers::Tier`] and never derived from configuration. Configuration
//! only changes what each tier looks for, see [`rules::RuleSet`].

pub mod document;
pub mod extractor;
pub mod loader;
pub mod rules;
pub mod tiers;
pub mod window;
