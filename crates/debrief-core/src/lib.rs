//! Core recording, redaction and aggregation for debrief.

mod environment;
mod error;
pub mod feedback;
mod log_ingest;
mod recorder;
mod redact;
pub mod stats;

pub use environment::capture_environment;
pub use error::DebriefError;
pub use feedback::{FeedbackDocument, format_feedback, save_feedback};
pub use log_ingest::ingest_logs;
pub use recorder::{RecordOptions, SessionRecorder};
pub use redact::{REDACTION_MARKER, RedactionEngine};

/// Result type for debrief operations.
pub type Result<T> = std::result::Result<T, DebriefError>;
