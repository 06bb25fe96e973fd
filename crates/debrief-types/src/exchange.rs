//! Exchange and tool-call types.
//!
//! An exchange is one user-prompt/assistant-response turn together with the
//! tool calls the assistant made while producing that response.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single prompt/response turn within a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exchange {
    /// The user's prompt, verbatim.
    pub user_prompt: String,
    /// The assistant's response text (empty until supplied).
    #[serde(default)]
    pub assistant_response: String,
    /// Tool calls made during this exchange, in invocation order.
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
    /// When the prompt was captured.
    pub timestamp: DateTime<Utc>,
    /// Rough input token estimate (~4 chars per token).
    pub input_tokens_estimate: Option<u64>,
    /// Rough output token estimate, set once a response is captured.
    pub output_tokens_estimate: Option<u64>,
    /// Milliseconds from prompt capture to the last response capture.
    pub duration_ms: Option<u64>,
}

impl Exchange {
    /// Open a new exchange for the given prompt.
    pub fn new(user_prompt: String, input_tokens_estimate: u64) -> Self {
        Self {
            user_prompt,
            assistant_response: String::new(),
            tool_calls: Vec::new(),
            timestamp: Utc::now(),
            input_tokens_estimate: Some(input_tokens_estimate),
            output_tokens_estimate: None,
            duration_ms: None,
        }
    }
}

/// A single invocation of an external capability during an exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Tool name (e.g. "bash", "view", "edit").
    pub name: String,
    /// Parameter tree as supplied by the host.
    pub parameters: Value,
    /// Result text, truncated by the recorder if oversized.
    pub result: Option<String>,
    /// Error text, truncated by the recorder if oversized.
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
    /// Milliseconds between the timing-start marker and this record, when
    /// the host supplied one.
    pub duration_ms: Option<u64>,
    #[serde(default)]
    pub retry_count: u32,
}
