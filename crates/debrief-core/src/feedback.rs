//! Feedback document rendering and saving.
//!
//! The document pairs a human-readable summary with the full session as a
//! fenced JSON block. Scrubbing is the caller's responsibility and happens
//! before formatting; the formatter never re-scrubs.

use crate::{Result, stats};
use chrono::{DateTime, Local};
use debrief_types::SessionData;
use std::path::{Path, PathBuf};
use tracing::info;

/// Rendered where an optional header field has no value.
const NOT_APPLICABLE: &str = "N/A";

/// Marks the start of the machine-readable section; everything above it is
/// the human summary.
pub const MACHINE_SECTION_HEADER: &str = "## Full Session Data (Machine Readable)";

/// The final dual-format artifact. Created once, write-once.
#[derive(Debug, Clone)]
pub struct FeedbackDocument {
    content: String,
    generated_at: DateTime<Local>,
}

impl FeedbackDocument {
    /// The complete markdown content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Timestamp-derived filename, e.g. `feedback-2026-08-07-1432.md`.
    pub fn filename(&self) -> String {
        format!("feedback-{}.md", self.generated_at.format("%Y-%m-%d-%H%M"))
    }
}

/// Build the feedback document from a (pre-scrubbed) session snapshot and
/// the caller-supplied summary fields.
pub fn format_feedback(
    session: &SessionData,
    task_summary: &str,
    problems: &[String],
    outcome: &str,
) -> Result<FeedbackDocument> {
    let mut content = summary_section(session, task_summary, problems, outcome);
    content.push_str(&machine_section(session)?);
    Ok(FeedbackDocument {
        content,
        generated_at: Local::now(),
    })
}

/// Save the document under `output_dir`, creating the directory if needed.
///
/// The write goes to a temporary sibling first and is renamed into place,
/// so a failure never leaves a partial feedback file behind.
pub fn save_feedback(document: &FeedbackDocument, output_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;

    let final_path = output_dir.join(document.filename());
    let tmp_path = output_dir.join(format!("{}.tmp", document.filename()));

    std::fs::write(&tmp_path, document.content())?;
    if let Err(e) = std::fs::rename(&tmp_path, &final_path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(e.into());
    }

    info!(target: "debrief::feedback", "Saved feedback to {}", final_path.display());
    Ok(final_path)
}

/// Humanize a duration in seconds.
pub fn format_duration(seconds: Option<f64>) -> String {
    let Some(seconds) = seconds else {
        return "Unknown".to_string();
    };

    if seconds < 60.0 {
        format!("{} seconds", seconds as u64)
    } else if seconds < 3600.0 {
        let minutes = (seconds / 60.0) as u64;
        format!("{} minute{}", minutes, if minutes == 1 { "" } else { "s" })
    } else {
        let hours = (seconds / 3600.0) as u64;
        let minutes = ((seconds % 3600.0) / 60.0) as u64;
        format!("{hours}h {minutes}m")
    }
}

fn summary_section(
    session: &SessionData,
    task_summary: &str,
    problems: &[String],
    outcome: &str,
) -> String {
    let metadata = &session.metadata;
    let stats = stats::compute(session);

    let problems_md = if problems.is_empty() {
        "- None reported".to_string()
    } else {
        problems
            .iter()
            .map(|p| format!("- {p}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let git_branch = metadata.git_branch.as_deref().unwrap_or(NOT_APPLICABLE);
    let log_source = metadata
        .log_dir
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| NOT_APPLICABLE.to_string());

    format!(
        "# CLI Session Feedback\n\
         \n\
         **Date**: {date}\n\
         **Model**: {model}\n\
         **Duration**: {duration}\n\
         **Session ID**: {session_id}\n\
         **Working Directory**: {workdir}\n\
         **Git Branch**: {git_branch}\n\
         **Log Source**: {log_source}\n\
         \n\
         ## Summary\n\
         \n\
         ### Task Attempted\n\
         {task_summary}\n\
         \n\
         ### Problems Encountered\n\
         {problems_md}\n\
         \n\
         ### Outcome\n\
         {outcome}\n\
         \n\
         ## Statistics\n\
         - **Total Exchanges**: {exchanges}\n\
         - **Tool Calls**: {tool_calls}\n\
         - **Errors**: {errors}\n\
         \n\
         ---\n",
        date = metadata.start_time.format("%Y-%m-%d %H:%M"),
        model = metadata.model,
        duration = format_duration(stats.duration_seconds),
        session_id = metadata.session_id,
        workdir = metadata.working_directory.display(),
        git_branch = git_branch,
        log_source = log_source,
        task_summary = task_summary,
        problems_md = problems_md,
        outcome = outcome,
        exchanges = stats.total_exchanges,
        tool_calls = stats.total_tool_calls,
        errors = stats.total_errors,
    )
}

fn machine_section(session: &SessionData) -> Result<String> {
    let export = stats::export(session);
    let json = serde_json::to_string_pretty(&export)?;
    Ok(format!(
        "\n{MACHINE_SECTION_HEADER}\n\
         \n\
         The following JSON contains the complete session data for LLM analysis:\n\
         \n\
         ```json\n\
         {json}\n\
         ```\n"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use debrief_types::{Exchange, SessionExport, SessionMetadata};

    fn session() -> SessionData {
        let start = Utc::now();
        SessionData {
            metadata: SessionMetadata {
                session_id: "s1".to_string(),
                model: "model-x".to_string(),
                start_time: start,
                end_time: Some(start + Duration::seconds(125)),
                working_directory: "/work".into(),
                git_branch: None,
                log_dir: None,
            },
            environment: None,
            exchanges: vec![Exchange::new("fix the bug".to_string(), 3)],
            errors: Vec::new(),
            debug_logs: Vec::new(),
        }
    }

    #[test]
    fn test_format_duration_buckets() {
        assert_eq!(format_duration(None), "Unknown");
        assert_eq!(format_duration(Some(45.0)), "45 seconds");
        assert_eq!(format_duration(Some(60.0)), "1 minute");
        assert_eq!(format_duration(Some(150.0)), "2 minutes");
        assert_eq!(format_duration(Some(3900.0)), "1h 5m");
    }

    #[test]
    fn test_missing_fields_render_as_not_applicable() {
        let document = format_feedback(&session(), "task", &[], "done").unwrap();
        assert!(document.content().contains("**Git Branch**: N/A"));
        assert!(document.content().contains("**Log Source**: N/A"));
    }

    #[test]
    fn test_empty_problems_render_placeholder() {
        let document = format_feedback(&session(), "task", &[], "done").unwrap();
        assert!(document.content().contains("- None reported"));

        let problems = vec!["search was slow".to_string()];
        let document = format_feedback(&session(), "task", &problems, "done").unwrap();
        assert!(document.content().contains("- search was slow"));
    }

    #[test]
    fn test_machine_section_round_trips() {
        let document = format_feedback(&session(), "task", &[], "done").unwrap();
        let content = document.content();

        let start = content.find("```json\n").unwrap() + "```json\n".len();
        let end = content[start..].find("```").unwrap() + start;
        let export: SessionExport = serde_json::from_str(&content[start..end]).unwrap();

        assert_eq!(export.metadata.session_id, "s1");
        assert_eq!(export.statistics.total_exchanges, 1);
        assert_eq!(export.exchanges[0].user_prompt, "fix the bug");
    }

    #[test]
    fn test_filename_shape() {
        let document = format_feedback(&session(), "task", &[], "done").unwrap();
        let name = document.filename();
        assert!(name.starts_with("feedback-"));
        assert!(name.ends_with(".md"));
    }

    #[test]
    fn test_save_creates_directory_and_leaves_no_tmp() {
        let dir = tempfile::tempdir().unwrap();
        let output_dir = dir.path().join("nested").join("feedback");
        let document = format_feedback(&session(), "task", &[], "done").unwrap();

        let path = save_feedback(&document, &output_dir).unwrap();
        assert!(path.exists());
        let saved = std::fs::read_to_string(&path).unwrap();
        assert_eq!(saved, document.content());

        let leftovers: Vec<_> = std::fs::read_dir(&output_dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_save_fails_on_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let blocking_file = dir.path().join("occupied");
        std::fs::write(&blocking_file, "x").unwrap();
        let document = format_feedback(&session(), "task", &[], "done").unwrap();
        // The target "directory" is an existing file; creation must fail.
        assert!(save_feedback(&document, &blocking_file).is_err());
    }
}
