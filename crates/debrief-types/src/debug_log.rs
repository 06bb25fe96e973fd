//! Best-effort parsed host debug logs.

use serde::{Deserialize, Serialize};

/// One line of a debug log, with whatever fields could be extracted.
///
/// Extractions are independent; any subset may be present. A line that
/// matched nothing is not recorded at all.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DebugLogEntry {
    /// The raw line text, capped by the ingestor.
    pub raw: String,
    pub api_call: Option<String>,
    pub error: Option<String>,
    pub timing: Option<String>,
    pub model: Option<String>,
    pub token_usage: Option<String>,
}

impl DebugLogEntry {
    /// Whether any field beyond the raw text was extracted.
    pub fn has_extractions(&self) -> bool {
        self.api_call.is_some()
            || self.error.is_some()
            || self.timing.is_some()
            || self.model.is_some()
            || self.token_usage.is_some()
    }
}

/// A single ingested debug log file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugLogFile {
    /// File name (not the full path).
    pub file: String,
    #[serde(default)]
    pub entries: Vec<DebugLogEntry>,
    /// Set when the file could not be read; entries are then empty.
    pub error: Option<String>,
}
