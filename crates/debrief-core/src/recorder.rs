//! Session recorder state machine.
//!
//! Lifecycle is `Idle → Recording → Stopped`. Capture calls are issued
//! sequentially by the host; the recorder owns its session exclusively and
//! hands out value snapshots only.

use crate::{DebriefError, RedactionEngine, Result, environment, log_ingest};
use chrono::Utc;
use debrief_types::{ErrorRecord, Exchange, SessionData, SessionMetadata, ToolCall};
use serde_json::Value;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Captured result/error text is stored at most this many characters.
const MAX_CAPTURED_CHARS: usize = 2000;
/// Appended to text that was cut at [`MAX_CAPTURED_CHARS`].
const TRUNCATION_MARKER: &str = "... [truncated]";

/// Options for starting a recording.
#[derive(Debug, Clone)]
pub struct RecordOptions {
    /// Session identifier; a UUIDv4 is generated when absent.
    pub session_id: Option<String>,
    pub model: String,
    pub git_branch: Option<String>,
    /// Directory of host debug logs, ingested on stop.
    pub log_dir: Option<PathBuf>,
    /// Snapshot the environment (tool version probes) at start.
    pub capture_environment: bool,
}

impl Default for RecordOptions {
    fn default() -> Self {
        Self {
            session_id: None,
            model: "unknown".to_string(),
            git_branch: None,
            log_dir: None,
            capture_environment: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecorderState {
    Idle,
    Recording,
    Stopped,
}

impl RecorderState {
    fn name(self) -> &'static str {
        match self {
            RecorderState::Idle => "idle",
            RecorderState::Recording => "recording",
            RecorderState::Stopped => "stopped",
        }
    }
}

/// Records one assistant CLI session.
///
/// A caller-owned handle; independent recorders may coexist. All mutation
/// calls outside the `Recording` state fail with
/// [`DebriefError::InvalidState`].
#[derive(Debug)]
pub struct SessionRecorder {
    state: RecorderState,
    session: Option<SessionData>,
    /// The one open (mutable) exchange, if any.
    current_exchange: Option<Exchange>,
    exchange_started: Option<Instant>,
    /// Pending timing-start marker for the next tool call; last-wins.
    pending_tool_start: Option<Instant>,
}

impl SessionRecorder {
    pub fn new() -> Self {
        Self {
            state: RecorderState::Idle,
            session: None,
            current_exchange: None,
            exchange_started: None,
            pending_tool_start: None,
        }
    }

    /// Begin recording. Fails unless the recorder is idle.
    ///
    /// Environment capture is best-effort: probes that fail or time out
    /// leave their fields empty, never an error.
    pub async fn start_recording(&mut self, opts: RecordOptions) -> Result<()> {
        if self.state != RecorderState::Idle {
            return Err(self.invalid_state("idle"));
        }

        let session_id = opts
            .session_id
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let working_directory = std::env::current_dir().unwrap_or_default();

        let environment = if opts.capture_environment {
            Some(environment::capture_environment().await)
        } else {
            None
        };

        info!(
            target: "debrief::recorder",
            "Recording started for session {} (model {})", session_id, opts.model
        );

        self.session = Some(SessionData {
            metadata: SessionMetadata {
                session_id,
                model: opts.model,
                start_time: Utc::now(),
                end_time: None,
                working_directory,
                git_branch: opts.git_branch,
                log_dir: opts.log_dir,
            },
            environment,
            exchanges: Vec::new(),
            errors: Vec::new(),
            debug_logs: Vec::new(),
        });
        self.state = RecorderState::Recording;
        Ok(())
    }

    /// Whether the recorder is in the `Recording` state.
    pub fn is_recording(&self) -> bool {
        self.state == RecorderState::Recording
    }

    /// Record a user prompt, opening a new exchange.
    ///
    /// Any previously open exchange is closed first; its assistant response
    /// staying empty is valid, not an error.
    pub fn add_user_prompt(&mut self, prompt: impl Into<String>) -> Result<()> {
        self.require_recording()?;
        self.close_current_exchange();

        let prompt = prompt.into();
        let estimate = estimate_tokens(&prompt);
        self.current_exchange = Some(Exchange::new(prompt, estimate));
        self.exchange_started = Some(Instant::now());
        Ok(())
    }

    /// Set or overwrite the open exchange's assistant response.
    pub fn add_assistant_response(&mut self, response: impl Into<String>) -> Result<()> {
        self.require_recording()?;
        let exchange = self
            .current_exchange
            .as_mut()
            .ok_or(DebriefError::NoActiveExchange)?;

        let response = response.into();
        exchange.output_tokens_estimate = Some(estimate_tokens(&response));
        exchange.assistant_response = response;
        if let Some(started) = self.exchange_started {
            exchange.duration_ms = Some(started.elapsed().as_millis() as u64);
        }
        Ok(())
    }

    /// Mark the start of a tool call for timing.
    ///
    /// Calling this twice without an intervening [`add_tool_call`] discards
    /// the earlier marker (last wins).
    ///
    /// [`add_tool_call`]: SessionRecorder::add_tool_call
    pub fn start_tool_call(&mut self) {
        if self.pending_tool_start.replace(Instant::now()).is_some() {
            debug!(target: "debrief::recorder", "Discarding stale tool-call start marker");
        }
    }

    /// Record a tool call on the open exchange.
    ///
    /// Duration comes from the pending start marker when one is set;
    /// without one the duration is simply absent. Oversized result/error
    /// text is truncated with a marker.
    pub fn add_tool_call(
        &mut self,
        name: impl Into<String>,
        parameters: Value,
        result: Option<String>,
        error: Option<String>,
        retry_count: u32,
    ) -> Result<()> {
        self.require_recording()?;
        let exchange = self
            .current_exchange
            .as_mut()
            .ok_or(DebriefError::NoActiveExchange)?;
        let duration_ms = self
            .pending_tool_start
            .take()
            .map(|started| started.elapsed().as_millis() as u64);

        exchange.tool_calls.push(ToolCall {
            name: name.into(),
            parameters,
            result: result.map(truncate_captured),
            error: error.map(truncate_captured),
            timestamp: Utc::now(),
            duration_ms,
            retry_count,
        });
        Ok(())
    }

    /// Record a session-level error, regardless of exchange state.
    pub fn add_error(
        &mut self,
        error_type: impl Into<String>,
        message: impl Into<String>,
        context: Value,
    ) -> Result<()> {
        let session = self.recording_session()?;
        let context = if context.is_null() {
            Value::Object(serde_json::Map::new())
        } else {
            context
        };
        session.errors.push(ErrorRecord {
            error_type: error_type.into(),
            message: message.into(),
            context,
            timestamp: Utc::now(),
        });
        Ok(())
    }

    /// Stop recording: close the open exchange, stamp the end time, ingest
    /// debug logs if a log directory was configured, and freeze the session.
    pub fn stop_recording(&mut self) -> Result<()> {
        self.require_recording()?;
        self.close_current_exchange();
        self.pending_tool_start = None;

        if let Some(session) = self.session.as_mut() {
            session.metadata.end_time = Some(Utc::now());

            if let Some(log_dir) = session.metadata.log_dir.clone() {
                let files = log_ingest::ingest_logs(&log_dir);
                for file in &files {
                    if let Some(err) = &file.error {
                        warn!(
                            target: "debrief::recorder",
                            "Debug log {} ingested with error: {}", file.file, err
                        );
                        session.errors.push(ErrorRecord {
                            error_type: "ingestion".to_string(),
                            message: err.clone(),
                            context: serde_json::json!({ "file": file.file }),
                            timestamp: Utc::now(),
                        });
                    }
                }
                session.debug_logs.extend(files);
            }

            info!(
                target: "debrief::recorder",
                "Recording stopped for session {} ({} exchanges)",
                session.metadata.session_id,
                session.exchanges.len()
            );
        }

        self.state = RecorderState::Stopped;
        Ok(())
    }

    /// Value snapshot of the session, including the open exchange.
    ///
    /// `None` only before `start_recording`. The snapshot shares no state
    /// with the recorder; later capture calls do not affect it.
    pub fn get_session_data(&self) -> Option<SessionData> {
        let mut snapshot = self.session.clone()?;
        if let Some(open) = &self.current_exchange {
            snapshot.exchanges.push(open.clone());
        }
        Some(snapshot)
    }

    /// Scrub secrets from everything recorded so far, using the built-in
    /// rules. Idempotent; a no-op before `start_recording`.
    pub fn scrub_sensitive_data(&mut self) {
        self.scrub_with(&RedactionEngine::new());
    }

    /// Scrub with a caller-configured engine (e.g. extra patterns).
    pub fn scrub_with(&mut self, engine: &RedactionEngine) {
        if let Some(session) = self.session.as_mut() {
            engine.scrub_session(session);
        }
        if let Some(exchange) = self.current_exchange.as_mut() {
            engine.scrub_exchange(exchange);
        }
    }

    /// Close the open exchange, appending it to the session log.
    fn close_current_exchange(&mut self) {
        if let (Some(exchange), Some(session)) = (self.current_exchange.take(), self.session.as_mut())
        {
            session.exchanges.push(exchange);
        }
        self.exchange_started = None;
    }

    fn require_recording(&self) -> Result<()> {
        if self.state == RecorderState::Recording {
            Ok(())
        } else {
            Err(self.invalid_state("recording"))
        }
    }

    fn recording_session(&mut self) -> Result<&mut SessionData> {
        match (self.state, self.session.as_mut()) {
            (RecorderState::Recording, Some(session)) => Ok(session),
            _ => Err(DebriefError::InvalidState {
                expected: "recording",
                actual: self.state.name(),
            }),
        }
    }

    fn invalid_state(&self, expected: &'static str) -> DebriefError {
        DebriefError::InvalidState {
            expected,
            actual: self.state.name(),
        }
    }
}

impl Default for SessionRecorder {
    fn default() -> Self {
        Self::new()
    }
}

/// ~4 characters per token for English text.
fn estimate_tokens(text: &str) -> u64 {
    (text.chars().count() / 4) as u64
}

fn truncate_captured(text: String) -> String {
    if text.chars().count() <= MAX_CAPTURED_CHARS {
        return text;
    }
    let mut truncated: String = text.chars().take(MAX_CAPTURED_CHARS).collect();
    truncated.push_str(TRUNCATION_MARKER);
    truncated
}
