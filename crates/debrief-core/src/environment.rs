//! Best-effort environment snapshot.

use debrief_types::EnvironmentContext;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

/// A hung version probe must not stall the recording.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Snapshot the environment the session is running in.
///
/// Every probe is independent: a missing tool, non-zero exit or timeout
/// leaves its field unset, never an error.
pub async fn capture_environment() -> EnvironmentContext {
    EnvironmentContext {
        os_name: std::env::consts::OS.to_string(),
        os_version: probe("uname", &["-r"]).await.unwrap_or_default(),
        shell: std::env::var("SHELL").unwrap_or_else(|_| "unknown".to_string()),
        terminal: std::env::var("TERM_PROGRAM")
            .or_else(|_| std::env::var("TERM"))
            .unwrap_or_else(|_| "unknown".to_string()),
        git_version: probe("git", &["--version"]).await,
        gh_version: probe("gh", &["--version"]).await,
        node_version: probe("node", &["--version"]).await,
    }
}

/// Run a version command, returning the first line of stdout.
async fn probe(program: &str, args: &[&str]) -> Option<String> {
    let output = match timeout(PROBE_TIMEOUT, Command::new(program).args(args).output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            debug!(target: "debrief::environment", "Probe {} failed: {}", program, e);
            return None;
        }
        Err(_) => {
            debug!(target: "debrief::environment", "Probe {} timed out", program);
            return None;
        }
    };

    if !output.status.success() {
        return None;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let first_line = stdout.lines().next()?.trim();
    if first_line.is_empty() {
        None
    } else {
        Some(first_line.to_string())
    }
}
