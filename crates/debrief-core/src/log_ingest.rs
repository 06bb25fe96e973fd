//! Best-effort ingestion of host debug logs.
//!
//! Every extraction is an independent heuristic; a line that matches
//! nothing is dropped, a file that cannot be read degrades to an
//! entries-free record with an error note. Nothing here ever fails the
//! recording itself.

use debrief_types::{DebugLogEntry, DebugLogFile};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;

/// Newest log files considered per ingestion.
const MAX_LOG_FILES: usize = 5;
/// Entries kept per file.
const MAX_ENTRIES_PER_FILE: usize = 100;
/// Raw line text is capped at this many characters.
const MAX_RAW_CHARS: usize = 500;

static API_CALL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(POST|GET)\s+\S*api\S*").unwrap());
static ERROR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(error|warning|warn)[\s:]+(.+)").unwrap());
static TIMING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)ms").unwrap());
static MODEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)model["\s:]+([A-Za-z0-9.\-]+)"#).unwrap());
static TOKEN_USAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)(tokens?|usage)["\s:]+(\d+)"#).unwrap());

/// Ingest debug logs from a file or directory.
///
/// A directory yields its `.log` files, newest first, capped at
/// [`MAX_LOG_FILES`]. A missing path yields nothing.
pub fn ingest_logs(path: &Path) -> Vec<DebugLogFile> {
    if !path.exists() {
        debug!(target: "debrief::ingest", "No debug logs at {}", path.display());
        return Vec::new();
    }

    candidate_files(path)
        .into_iter()
        .map(|file| ingest_file(&file))
        .collect()
}

fn candidate_files(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        return vec![path.to_path_buf()];
    }

    let entries = match std::fs::read_dir(path) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(target: "debrief::ingest", "Cannot enumerate {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    let mut files: Vec<(PathBuf, SystemTime)> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "log"))
        .map(|p| {
            let modified = std::fs::metadata(&p)
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            (p, modified)
        })
        .collect();

    // Newest first
    files.sort_by(|a, b| b.1.cmp(&a.1));
    files.truncate(MAX_LOG_FILES);
    files.into_iter().map(|(p, _)| p).collect()
}

fn ingest_file(path: &Path) -> DebugLogFile {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            return DebugLogFile {
                file: file_name,
                entries: Vec::new(),
                error: Some(format!("Failed to read: {e}")),
            };
        }
    };

    let entries: Vec<DebugLogEntry> = content
        .lines()
        .filter_map(parse_line)
        .take(MAX_ENTRIES_PER_FILE)
        .collect();

    debug!(
        target: "debrief::ingest",
        "Ingested {} entries from {}", entries.len(), file_name
    );

    DebugLogFile {
        file: file_name,
        entries,
        error: None,
    }
}

/// Extract whatever fields a line carries; None if it carries none.
fn parse_line(line: &str) -> Option<DebugLogEntry> {
    let entry = DebugLogEntry {
        raw: cap_chars(line, MAX_RAW_CHARS),
        api_call: first_match(&API_CALL_RE, line),
        error: first_match(&ERROR_RE, line),
        timing: first_match(&TIMING_RE, line),
        model: first_match(&MODEL_RE, line),
        token_usage: first_match(&TOKEN_USAGE_RE, line),
    };
    entry.has_extractions().then_some(entry)
}

fn first_match(regex: &Regex, line: &str) -> Option<String> {
    regex.find(line).map(|m| m.as_str().to_string())
}

fn cap_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_line_extracts_independent_fields() {
        let line = "2026-08-07 INFO POST /v1/api/chat model: claude-sonnet-4 took 812ms";
        let entry = parse_line(line).unwrap();
        assert!(entry.api_call.is_some());
        assert_eq!(entry.timing.as_deref(), Some("812ms"));
        assert!(entry.model.as_deref().unwrap().contains("claude-sonnet-4"));
        assert!(entry.error.is_none());
    }

    #[test]
    fn test_unrecognized_line_yields_nothing() {
        assert!(parse_line("just some chatter").is_none());
    }

    #[test]
    fn test_error_extraction_survives_missing_other_fields() {
        let entry = parse_line("ERROR: connection reset").unwrap();
        assert!(entry.error.is_some());
        assert!(entry.api_call.is_none());
        assert!(entry.timing.is_none());
    }

    #[test]
    fn test_raw_line_is_capped() {
        let line = format!("ERROR: {}", "x".repeat(2000));
        let entry = parse_line(&line).unwrap();
        assert_eq!(entry.raw.chars().count(), MAX_RAW_CHARS);
    }

    #[test]
    fn test_directory_ingestion_newest_first_capped() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..8u64 {
            let path = dir.path().join(format!("host-{i}.log"));
            let mut file = std::fs::File::create(&path).unwrap();
            writeln!(file, "ERROR: boom {i}").unwrap();
            // Space the mtimes out so the ordering is deterministic.
            let mtime = std::time::SystemTime::now() - std::time::Duration::from_secs(100 - i);
            file.set_modified(mtime).unwrap();
        }
        // A non-log file is ignored entirely.
        std::fs::write(dir.path().join("notes.txt"), "ERROR: ignored").unwrap();

        let files = ingest_logs(dir.path());
        assert_eq!(files.len(), MAX_LOG_FILES);
        assert_eq!(files[0].file, "host-7.log");
        assert!(files.iter().all(|f| f.error.is_none()));
    }

    #[test]
    fn test_single_file_ingestion() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("host.log");
        std::fs::write(&path, "WARN: slow\nnoise\n1234ms elapsed\n").unwrap();

        let files = ingest_logs(&path);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].entries.len(), 2);
    }

    #[test]
    fn test_missing_path_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let files = ingest_logs(&dir.path().join("absent"));
        assert!(files.is_empty());
    }

    #[test]
    fn test_entries_capped_per_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("host.log");
        let content: String = (0..500).map(|i| format!("ERROR: {i}\n")).collect();
        std::fs::write(&path, content).unwrap();

        let files = ingest_logs(&path);
        assert_eq!(files[0].entries.len(), MAX_ENTRIES_PER_FILE);
    }
}
