//! Error types for debrief.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DebriefError {
    #[error("Invalid recorder state: expected {expected}, got {actual}")]
    InvalidState {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("No active exchange: record a user prompt first")]
    NoActiveExchange,

    #[error("Invalid redaction pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
