//! Shared configuration loader for the failsnip toolchain.
//!
//! `defaults/failsnip.default.toml` is embedded into every binary so that the documented
//! defaults and the built-in rules cannot drift apart. The CLI layers its `--config` file and
//! flag overrides on top of those defaults via [`Loader`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use failsnip_core::{PatternSpec, RuleError, RuleSet, RuleSpec, SpecialCase};
use serde::Deserialize;
use std::path::Path;

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../defaults/failsnip.default.toml");

/// Top-level configuration consumed by failsnip applications.
#[derive(Debug, Clone, Deserialize)]
pub struct FailsnipConfig {
    pub extraction: ExtractionConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
}

impl FailsnipConfig {
    /// Compile the extraction section. Bad patterns surface here, before any log is read.
    pub fn rules(&self) -> Result<RuleSet, RuleError> {
        RuleSet::compile(self.extraction.clone().into())
    }
}

/// Mirrors the knobs of the extraction rule set.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionConfig {
    pub summary_header: String,
    pub section_delimiter: String,
    pub failure_marker: String,
    pub context_lines: usize,
    pub fallback_lines: usize,
    pub keywords: Vec<String>,
    pub exclusions: Vec<String>,
    pub patterns: Vec<PatternConfig>,
    #[serde(default)]
    pub special_cases: Vec<SpecialCaseConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PatternConfig {
    pub name: String,
    pub regex: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpecialCaseConfig {
    pub marker: String,
    pub before: usize,
    pub after: usize,
}

impl From<ExtractionConfig> for RuleSpec {
    fn from(config: ExtractionConfig) -> Self {
        RuleSpec {
            summary_header: config.summary_header,
            section_delimiter: config.section_delimiter,
            failure_marker: config.failure_marker,
            context_lines: config.context_lines,
            patterns: config
                .patterns
                .into_iter()
                .map(|p| PatternSpec::new(p.name, p.regex))
                .collect(),
            special_cases: config
                .special_cases
                .into_iter()
                .map(|c| SpecialCase::new(c.marker, c.before, c.after))
                .collect(),
            keywords: config.keywords,
            exclusions: config.exclusions,
            fallback_lines: config.fallback_lines,
        }
    }
}

/// Limits applied to log input before extraction.
#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    pub max_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub format: String,
}

/// Builds a [`FailsnipConfig`] from three layers, later ones winning: the embedded defaults,
/// the file named by `--config` (or a well-known optional path), then one override per CLI flag.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// The `--config` layer. The file must exist.
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.with_toml(path.as_ref(), true)
    }

    /// Like [`Loader::with_file`], but a missing file adds nothing.
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Self {
        self.with_toml(path.as_ref(), false)
    }

    fn with_toml(mut self, path: &Path, required: bool) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path).format(FileFormat::Toml).required(required));
        self
    }

    /// The flag layer: `key` is a dotted path such as `extraction.context_lines`.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Merge the layers and check the input limits.
    ///
    /// Extraction rules are compiled separately by [`FailsnipConfig::rules`], so a bad pattern
    /// is reported as a rule error rather than a config error.
    pub fn build(self) -> Result<FailsnipConfig, ConfigError> {
        let config: FailsnipConfig = self.builder.build()?.try_deserialize()?;
        if config.input.max_bytes == 0 {
            return Err(ConfigError::Message(
                "input.max_bytes must be at least 1".to_string(),
            ));
        }
        Ok(config)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// The embedded defaults with nothing layered on top.
pub fn load_defaults() -> Result<FailsnipConfig, ConfigError> {
    Loader::new().build()
}
