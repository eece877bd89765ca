//! Log loading utilities
//!
//! `SnippetLoader` gets log text from a file, a reader or a string and optionally caps its size
//! before extraction. Extraction cost grows with the log, and bounding it is the caller's job;
//! the cap keeps the tail because CI failures are reported at the end.
//!
//! # Example
//!
//! ```rust
//! use failsnip_core::{Extractor, SnippetLoader};
//!
//! let excerpt = SnippetLoader::from_path("job.log")?
//!     .with_max_bytes(4 * 1024 * 1024)
//!     .extract(&Extractor::default());
//! ```

use crate::snippet::extractor::{ExtractionResult, Extractor};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("failed to read {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read log input: {0}")]
    Read(#[from] io::Error),
}

/// Raw log text on its way into the extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetLoader {
    source: String,
    truncated: bool,
}

impl SnippetLoader {
    /// Load from a file path. Invalid UTF-8 is replaced rather than rejected; CI logs
    /// regularly carry stray bytes from tool output.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LoaderError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| LoaderError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_bytes(bytes))
    }

    /// Load everything a reader yields (stdin in the CLI).
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, LoaderError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(Self::from_bytes(bytes))
    }

    pub fn from_string<S: Into<String>>(source: S) -> Self {
        SnippetLoader {
            source: source.into(),
            truncated: false,
        }
    }

    fn from_bytes(bytes: Vec<u8>) -> Self {
        let source = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
        };
        Self::from_string(source)
    }

    /// Keep at most the last `max_bytes` bytes.
    ///
    /// The kept text starts on a whole line, so tiers never see the tail of a cut line. Only
    /// when the kept bytes hold no line break at all is the fragment kept, cut on a char
    /// boundary.
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        if self.source.len() <= max_bytes {
            return self;
        }
        let mut cut = self.source.len() - max_bytes;
        while !self.source.is_char_boundary(cut) {
            cut += 1;
        }
        if self.source.as_bytes()[cut - 1] != b'\n' {
            if let Some(offset) = self.source[cut..].find('\n') {
                cut += offset + 1;
            }
        }
        debug!(
            original = self.source.len(),
            kept = self.source.len() - cut,
            "log exceeds size cap, keeping tail"
        );
        self.source.drain(..cut);
        self.truncated = true;
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether [`Self::with_max_bytes`] dropped the head of the log.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn extract(&self, extractor: &Extractor) -> ExtractionResult {
        extractor.extract(&self.source)
    }
}
