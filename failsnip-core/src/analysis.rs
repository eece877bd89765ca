//! Summarizer contract
//!
//! The excerpt is handed to a language-model summarizer that answers with a small JSON object.
//! Calling the model is the caller's business; this module owns the two text ends of that
//! exchange: the prompt that wraps the excerpt, and parsing of the model's reply into an
//! [`Analysis`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reported when the extractor finds nothing to send (the log was empty).
pub const NO_ERRORS_FOUND: &str = "No obvious errors were found in the log.";

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("summarizer returned an empty response")]
    Empty,

    #[error("summarizer response is not a valid analysis: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Structured summary of a failed job, as returned by the summarizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub summary: String,
    #[serde(default)]
    pub root_cause: String,
    #[serde(default)]
    pub solution: String,
}

impl Analysis {
    /// The canned analysis for a log with no excerpt.
    pub fn no_errors_found() -> Self {
        Analysis {
            summary: NO_ERRORS_FOUND.to_string(),
            root_cause: String::new(),
            solution: String::new(),
        }
    }

    /// Parse the model's reply. Models like to wrap JSON in a Markdown code fence, which is
    /// stripped first.
    pub fn from_model_text(text: &str) -> Result<Self, AnalysisError> {
        let body = strip_code_fence(text);
        if body.is_empty() {
            return Err(AnalysisError::Empty);
        }
        Ok(serde_json::from_str(body)?)
    }
}

fn strip_code_fence(text: &str) -> &str {
    let mut body = text.trim();
    if let Some(rest) = body.strip_prefix("```") {
        // drop the info string ("json") along with the opening fence line
        body = rest.split_once('\n').map_or("", |(_, tail)| tail);
    }
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Wrap an excerpt in the CI-debugger prompt sent to the summarizer.
pub fn render_prompt(excerpt: &str) -> String {
    format!(
        "You are an expert CI/CD debugger analyzing the log of a failed CI job.\n\
         Your task is to:\n\
         1. Identify the single, primary root cause of the failure from this log snippet.\n\
         2. Provide a brief, one-sentence summary of the error.\n\
         3. Suggest a concrete, actionable solution, including specific commands if applicable.\n\
         Format your response as a JSON object with three keys: \"rootCause\", \"summary\", and \"solution\".\n\
         Here is the relevant log snippet:\n\
         ---\n\
         {excerpt}\n\
         ---\n"
    )
}
