//! Sharing wrappers around the `gh` CLI.
//!
//! The recording core only ever exposes a finished file path; these
//! functions hand that path to `gh` and report back a URL or an error.

use anyhow::{Context, Result, bail, ensure};
use debrief_core::feedback::MACHINE_SECTION_HEADER;
use std::path::Path;
use tokio::process::Command;
use tracing::info;

/// Create a GitHub gist (secret by default) from a feedback file.
pub async fn create_gist(file: &Path, description: Option<&str>, public: bool) -> Result<String> {
    ensure!(file.exists(), "File not found: {}", file.display());

    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let description = description
        .map(str::to_string)
        .unwrap_or_else(|| format!("CLI Session Feedback - {file_name}"));

    let mut cmd = Command::new("gh");
    cmd.arg("gist").arg("create").arg(file).args(["--desc", &description]);
    if public {
        cmd.arg("--public");
    }

    let url = run_gh(cmd).await?;
    info!(target: "debrief::share", "Created gist {}", url);
    Ok(url)
}

/// Create a GitHub issue from a feedback file.
///
/// The issue body carries only the human summary; the machine-readable
/// section is stripped and replaced with a pointer line.
pub async fn create_issue(
    file: &Path,
    repo: &str,
    title: Option<&str>,
    labels: &[String],
) -> Result<String> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Cannot read {}", file.display()))?;
    let (derived_title, body) = issue_title_and_body(&content);
    let title = title.unwrap_or(&derived_title);

    let mut cmd = Command::new("gh");
    cmd.args(["issue", "create", "--repo", repo, "--title", title, "--body", &body]);
    for label in labels {
        cmd.args(["--label", label]);
    }

    let url = run_gh(cmd).await?;
    info!(target: "debrief::share", "Created issue {}", url);
    Ok(url)
}

async fn run_gh(mut cmd: Command) -> Result<String> {
    let output = cmd
        .output()
        .await
        .context("Failed to run 'gh'. Install it from https://cli.github.com/")?;

    if !output.status.success() {
        bail!(
            "gh exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    let url = String::from_utf8_lossy(&output.stdout).trim().to_string();
    ensure!(!url.is_empty(), "gh reported success but returned no URL");
    Ok(url)
}

/// Derive an issue title and body from a feedback document.
pub fn issue_title_and_body(content: &str) -> (String, String) {
    let mut task_lines: Vec<&str> = Vec::new();
    let mut in_task_section = false;
    for line in content.lines() {
        if line.starts_with("### Task Attempted") {
            in_task_section = true;
            continue;
        }
        if in_task_section && line.starts_with("###") {
            break;
        }
        if in_task_section && !line.trim().is_empty() {
            task_lines.push(line.trim());
        }
    }

    let title = if task_lines.is_empty() {
        "CLI Session Feedback".to_string()
    } else {
        let task = task_lines.join(" ");
        let short: String = task.chars().take(80).collect();
        if task.chars().count() > 80 {
            format!("Feedback: {short}...")
        } else {
            format!("Feedback: {short}")
        }
    };

    let body = match content.find(MACHINE_SECTION_HEADER) {
        Some(idx) => format!(
            "{}\n\n*Full session data available in the attached feedback file.*\n",
            content[..idx].trim_end()
        ),
        None => content.to_string(),
    };

    (title, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "# CLI Session Feedback\n\n\
        ## Summary\n\n\
        ### Task Attempted\n\
        Fix a login bug causing 401 errors for users.\n\n\
        ### Problems Encountered\n\
        - None reported\n\n\
        ## Full Session Data (Machine Readable)\n\n\
        ```json\n{}\n```\n";

    #[test]
    fn test_title_from_task_section() {
        let (title, _) = issue_title_and_body(DOC);
        assert_eq!(title, "Feedback: Fix a login bug causing 401 errors for users.");
    }

    #[test]
    fn test_long_task_is_ellipsized() {
        let long_doc = format!(
            "### Task Attempted\n{}\n\n### Problems Encountered\n",
            "words ".repeat(40)
        );
        let (title, _) = issue_title_and_body(&long_doc);
        assert!(title.ends_with("..."));
        // "Feedback: " + 80 chars + "..."
        assert_eq!(title.chars().count(), 10 + 80 + 3);
    }

    #[test]
    fn test_body_strips_machine_section() {
        let (_, body) = issue_title_and_body(DOC);
        assert!(!body.contains("```json"));
        assert!(body.contains("*Full session data available"));
        assert!(body.contains("### Task Attempted"));
    }

    #[test]
    fn test_document_without_machine_section_passes_through() {
        let (_, body) = issue_title_and_body("just a summary\n");
        assert_eq!(body, "just a summary\n");
    }

    #[test]
    fn test_fallback_title() {
        let (title, _) = issue_title_and_body("no sections here\n");
        assert_eq!(title, "CLI Session Feedback");
    }
}
