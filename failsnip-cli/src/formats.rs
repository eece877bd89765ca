//! Output formats for extraction reports
//!
//! Each format renders a [`Report`] to a string. Formats are looked up by name in a
//! [`FormatRegistry`], so adding one means implementing [`Format`] and registering it in
//! [`FormatRegistry::with_defaults`].

use failsnip_core::analysis::NO_ERRORS_FOUND;
use failsnip_core::Excerpt;
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("unknown output format '{0}'")]
    FormatNotFound(String),

    #[error("failed to serialize report: {0}")]
    Serialization(String),
}

/// Everything the CLI knows about one extraction.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// File path, or `-` for stdin.
    pub source: String,
    /// True when the head of the log was dropped by the size cap.
    pub truncated: bool,
    pub excerpt: Option<Excerpt>,
}

impl Report {
    /// Excerpt text, or the canned message when there is none.
    pub fn text(&self) -> &str {
        self.excerpt
            .as_ref()
            .map_or(NO_ERRORS_FOUND, |excerpt| excerpt.text())
    }
}

pub trait Format: Send + Sync {
    /// The name of this format (e.g. "text", "json")
    fn name(&self) -> &str;

    /// One-line summary shown in `--format` help
    fn description(&self) -> &str;

    fn render(&self, report: &Report) -> Result<String, FormatError>;
}

/// Excerpt text only, ready to paste or pipe into a summarizer.
pub struct TextFormat;

impl Format for TextFormat {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Excerpt text only"
    }

    fn render(&self, report: &Report) -> Result<String, FormatError> {
        Ok(format!("{}\n", report.text()))
    }
}

pub struct JsonFormat;

impl Format for JsonFormat {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Report with tier, window and text as pretty JSON"
    }

    fn render(&self, report: &Report) -> Result<String, FormatError> {
        serde_json::to_string_pretty(report)
            .map(|json| json + "\n")
            .map_err(|e| FormatError::Serialization(e.to_string()))
    }
}

pub struct YamlFormat;

impl Format for YamlFormat {
    fn name(&self) -> &str {
        "yaml"
    }

    fn description(&self) -> &str {
        "Report with tier, window and text as YAML"
    }

    fn render(&self, report: &Report) -> Result<String, FormatError> {
        serde_yaml::to_string(report).map_err(|e| FormatError::Serialization(e.to_string()))
    }
}

/// Registry of output formats, keyed by name.
pub struct FormatRegistry {
    formats: HashMap<String, Box<dyn Format>>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        FormatRegistry {
            formats: HashMap::new(),
        }
    }

    /// Register a format, replacing any format with the same name.
    pub fn register<F: Format + 'static>(&mut self, format: F) {
        self.formats
            .insert(format.name().to_string(), Box::new(format));
    }

    pub fn get(&self, name: &str) -> Result<&dyn Format, FormatError> {
        self.formats
            .get(name)
            .map(|f| f.as_ref())
            .ok_or_else(|| FormatError::FormatNotFound(name.to_string()))
    }

    /// All format names, sorted
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formats.keys().cloned().collect();
        names.sort();
        names
    }

    /// `name: description` for every format, sorted by name, one per line.
    pub fn describe_formats(&self) -> String {
        self.list_formats()
            .iter()
            .map(|name| format!("{}: {}", name, self.formats[name].description()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn render(&self, report: &Report, format: &str) -> Result<String, FormatError> {
        self.get(format)?.render(report)
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(TextFormat);
        registry.register(JsonFormat);
        registry.register(YamlFormat);
        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
