//! Statistics aggregation over a session snapshot.

use debrief_types::{
    ErrorTypeCount, SessionData, SessionExport, SessionStatistics, TokenEstimates,
    ToolPerformance, ToolUsage,
};

/// Derive statistics from a session snapshot.
///
/// A pure function: the same snapshot always yields the same statistics,
/// and the snapshot is never mutated.
pub fn compute(session: &SessionData) -> SessionStatistics {
    let total_tool_calls = session.exchanges.iter().map(|e| e.tool_calls.len()).sum();

    let duration_seconds = session
        .metadata
        .end_time
        .map(|end| (end - session.metadata.start_time).num_milliseconds() as f64 / 1000.0);

    let durations: Vec<u64> = session
        .exchanges
        .iter()
        .flat_map(|e| e.tool_calls.iter())
        .filter_map(|call| call.duration_ms)
        .collect();
    let avg_duration_ms = if durations.is_empty() {
        None
    } else {
        Some(durations.iter().sum::<u64>() as f64 / durations.len() as f64)
    };

    let mut tool_usage: Vec<ToolUsage> = Vec::new();
    for call in session.exchanges.iter().flat_map(|e| e.tool_calls.iter()) {
        match tool_usage.iter_mut().find(|u| u.name == call.name) {
            Some(usage) => usage.count += 1,
            None => tool_usage.push(ToolUsage {
                name: call.name.clone(),
                count: 1,
            }),
        }
    }

    let mut error_breakdown: Vec<ErrorTypeCount> = Vec::new();
    for error in &session.errors {
        match error_breakdown
            .iter_mut()
            .find(|c| c.error_type == error.error_type)
        {
            Some(count) => count.count += 1,
            None => error_breakdown.push(ErrorTypeCount {
                error_type: error.error_type.clone(),
                count: 1,
            }),
        }
    }

    let total_input: u64 = session
        .exchanges
        .iter()
        .filter_map(|e| e.input_tokens_estimate)
        .sum();
    let total_output: u64 = session
        .exchanges
        .iter()
        .filter_map(|e| e.output_tokens_estimate)
        .sum();

    SessionStatistics {
        total_exchanges: session.exchanges.len(),
        total_tool_calls,
        total_errors: session.errors.len(),
        duration_seconds,
        token_estimates: TokenEstimates {
            total_input,
            total_output,
            total: total_input + total_output,
        },
        tool_performance: ToolPerformance {
            avg_duration_ms,
            tool_usage,
        },
        error_breakdown,
    }
}

/// Session snapshot plus derived statistics, ready for serialization.
pub fn export(session: &SessionData) -> SessionExport {
    SessionExport {
        metadata: session.metadata.clone(),
        environment: session.environment.clone(),
        exchanges: session.exchanges.clone(),
        errors: session.errors.clone(),
        debug_logs: session.debug_logs.clone(),
        statistics: compute(session),
    }
}
