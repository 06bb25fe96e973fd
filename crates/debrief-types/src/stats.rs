//! Derived session statistics.
//!
//! Computed from a session snapshot, never mutated directly. Grouped counts
//! keep the insertion order of first occurrence for stable output.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenEstimates {
    pub total_input: u64,
    pub total_output: u64,
    pub total: u64,
}

/// Usage count for one tool, keyed by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolUsage {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolPerformance {
    /// Mean of all recorded tool-call durations, None if none were timed.
    pub avg_duration_ms: Option<f64>,
    pub tool_usage: Vec<ToolUsage>,
}

/// Error count for one error type tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorTypeCount {
    pub error_type: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStatistics {
    pub total_exchanges: usize,
    pub total_tool_calls: usize,
    pub total_errors: usize,
    /// End minus start, None while the session is still recording.
    pub duration_seconds: Option<f64>,
    pub token_estimates: TokenEstimates,
    pub tool_performance: ToolPerformance,
    pub error_breakdown: Vec<ErrorTypeCount>,
}
