//! Session-level types: metadata, environment snapshot, and the full record.

use crate::{DebugLogFile, Exchange, SessionStatistics};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Metadata describing one recorded session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionMetadata {
    /// Opaque session identifier (caller-supplied or generated).
    pub session_id: String,
    /// Model the assistant was running (e.g. "claude-sonnet-4").
    pub model: String,
    /// When recording started.
    pub start_time: DateTime<Utc>,
    /// When recording stopped (None while still recording).
    pub end_time: Option<DateTime<Utc>>,
    /// Working directory the session ran in.
    pub working_directory: PathBuf,
    /// Git branch at recording start, if the caller knew it.
    pub git_branch: Option<String>,
    /// Directory of host debug logs to ingest on stop, if any.
    pub log_dir: Option<PathBuf>,
}

/// Best-effort snapshot of the environment the session ran in.
///
/// Every field degrades gracefully: a probe that fails or times out leaves
/// `None` (or a fallback string), never an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvironmentContext {
    pub os_name: String,
    pub os_version: String,
    pub shell: String,
    pub terminal: String,
    pub git_version: Option<String>,
    pub gh_version: Option<String>,
    pub node_version: Option<String>,
}

/// An error observed during the session, independent of any exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// Free-form type tag (e.g. "tool_failure", "ingestion").
    pub error_type: String,
    pub message: String,
    /// Arbitrary nested context supplied by the caller.
    #[serde(default)]
    pub context: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

/// The complete in-memory record of one session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub metadata: SessionMetadata,
    #[serde(default)]
    pub environment: Option<EnvironmentContext>,
    #[serde(default)]
    pub exchanges: Vec<Exchange>,
    #[serde(default)]
    pub errors: Vec<ErrorRecord>,
    #[serde(default)]
    pub debug_logs: Vec<DebugLogFile>,
}

/// Serialization shape of the machine-readable feedback section.
///
/// Identical to [`SessionData`] with derived statistics appended, so the
/// emitted JSON carries `metadata`, `environment`, `exchanges`, `errors`,
/// `debug_logs` and `statistics` keys in that order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionExport {
    pub metadata: SessionMetadata,
    pub environment: Option<EnvironmentContext>,
    pub exchanges: Vec<Exchange>,
    pub errors: Vec<ErrorRecord>,
    pub debug_logs: Vec<DebugLogFile>,
    pub statistics: SessionStatistics,
}
