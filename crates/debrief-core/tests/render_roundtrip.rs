//! Record → scrub → format → save, end to end.

use debrief_core::{RecordOptions, SessionRecorder, format_feedback, save_feedback};
use debrief_types::SessionExport;
use serde_json::json;

#[tokio::test]
async fn recorded_session_renders_and_saves_scrubbed() {
    let mut recorder = SessionRecorder::new();
    recorder
        .start_recording(RecordOptions {
            session_id: Some("roundtrip".to_string()),
            model: "model-x".to_string(),
            git_branch: Some("feature/login-fix".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    recorder
        .add_user_prompt("Fix the login bug, token: ghp_AbCdEf1234567890")
        .unwrap();
    recorder.start_tool_call();
    recorder
        .add_tool_call(
            "grep",
            json!({"pattern": "401", "api_key": "abc123secret"}),
            Some("Found in auth.rs:42".to_string()),
            None,
            0,
        )
        .unwrap();
    recorder
        .add_assistant_response("The token validation is failing.")
        .unwrap();
    recorder.stop_recording().unwrap();

    recorder.scrub_sensitive_data();
    let session = recorder.get_session_data().unwrap();

    let document = format_feedback(
        &session,
        "User attempted to fix a login bug.",
        &["grep returned too many results".to_string()],
        "Success",
    )
    .unwrap();

    let content = document.content();
    assert!(!content.contains("ghp_AbCdEf1234567890"));
    assert!(!content.contains("abc123secret"));
    assert!(content.contains("**Git Branch**: feature/login-fix"));
    assert!(content.contains("- grep returned too many results"));

    // The machine-readable block parses back into the export schema.
    let start = content.find("```json\n").unwrap() + "```json\n".len();
    let end = content[start..].find("```").unwrap() + start;
    let export: SessionExport = serde_json::from_str(&content[start..end]).unwrap();
    assert_eq!(export.statistics.total_exchanges, 1);
    assert_eq!(export.statistics.total_tool_calls, 1);
    assert_eq!(export.exchanges[0].tool_calls[0].parameters["api_key"], "[REDACTED]");

    let dir = tempfile::tempdir().unwrap();
    let path = save_feedback(&document, dir.path()).unwrap();
    let saved = std::fs::read_to_string(&path).unwrap();
    assert_eq!(saved, content);
}

#[tokio::test]
async fn scrubbing_twice_changes_nothing() {
    let mut recorder = SessionRecorder::new();
    recorder
        .start_recording(RecordOptions {
            model: "m".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    recorder
        .add_user_prompt("password: hunter2 and Bearer abc.def")
        .unwrap();
    recorder.stop_recording().unwrap();

    recorder.scrub_sensitive_data();
    let once = recorder.get_session_data().unwrap();
    recorder.scrub_sensitive_data();
    let twice = recorder.get_session_data().unwrap();

    assert_eq!(once.exchanges[0].user_prompt, twice.exchanges[0].user_prompt);
    assert!(!once.exchanges[0].user_prompt.contains("hunter2"));
}
