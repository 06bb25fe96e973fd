//! Pattern-based redaction of secret-shaped text.
//!
//! The engine walks captured values structurally: strings are scrubbed with
//! a fixed rule set (plus caller-supplied patterns), mappings and sequences
//! are walked element-wise preserving shape and key order, and everything
//! else passes through unchanged. Replacement is whole-match; the marker
//! itself matches no rule, so scrubbing is idempotent.

use crate::{DebriefError, Result};
use debrief_types::{DebugLogEntry, ErrorRecord, Exchange, SessionData};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Fixed replacement for every detected secret.
pub const REDACTION_MARKER: &str = "[REDACTED]";

/// Token shapes are case-sensitive; key names are matched case-insensitively.
static BUILTIN_RULES: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        // GitHub personal access token
        Regex::new(r"ghp_[A-Za-z0-9]{36}").unwrap(),
        // OpenAI-style secret key
        Regex::new(r"sk-[A-Za-z0-9]{48}").unwrap(),
        // Bearer token header
        Regex::new(r"(?i)bearer\s+[\w.\-]+").unwrap(),
        // key=value / "key": "value" assignment with a secret-like key name
        Regex::new(
            r#"(?i)(api[_-]?key|apikey|secret|password|token|credential)["']?\s*[:=]\s*["']?[\w.\-]+"#,
        )
        .unwrap(),
    ]
});

/// Mapping keys whose string values are replaced wholesale.
static SENSITIVE_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(api[_-]?key|apikey|secret|password|token|credential)$").unwrap()
});

/// Scanner/transformer over arbitrary structured values.
#[derive(Debug, Default)]
pub struct RedactionEngine {
    custom: Vec<Regex>,
}

impl RedactionEngine {
    /// Engine with the built-in rule set only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with additional caller-supplied patterns.
    ///
    /// Invalid patterns are rejected here, once; scrubbing itself never
    /// fails. A pattern that matches nothing is simply inert.
    pub fn with_patterns<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut custom = Vec::new();
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let regex = Regex::new(pattern).map_err(|source| DebriefError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;
            custom.push(regex);
        }
        Ok(Self { custom })
    }

    /// Replace every rule match in `text` with the redaction marker.
    pub fn scrub_text(&self, text: &str) -> String {
        let mut scrubbed = text.to_string();
        for rule in BUILTIN_RULES.iter().chain(self.custom.iter()) {
            if rule.is_match(&scrubbed) {
                scrubbed = rule.replace_all(&scrubbed, REDACTION_MARKER).into_owned();
            }
        }
        scrubbed
    }

    /// Recursively scrub a structured value in place, preserving its shape.
    pub fn scrub_value(&self, value: &mut Value) {
        match value {
            Value::String(text) => *text = self.scrub_text(text),
            Value::Array(items) => {
                for item in items.iter_mut() {
                    self.scrub_value(item);
                }
            }
            Value::Object(map) => {
                for (key, entry) in map.iter_mut() {
                    if SENSITIVE_KEY.is_match(key) && entry.is_string() {
                        *entry = Value::String(REDACTION_MARKER.to_string());
                    } else {
                        self.scrub_value(entry);
                    }
                }
            }
            // Numbers, booleans and null pass through unchanged.
            _ => {}
        }
    }

    /// Scrub an entire session record in place.
    pub fn scrub_session(&self, session: &mut SessionData) {
        for exchange in &mut session.exchanges {
            self.scrub_exchange(exchange);
        }
        for error in &mut session.errors {
            self.scrub_error(error);
        }
        for log in &mut session.debug_logs {
            for entry in &mut log.entries {
                self.scrub_log_entry(entry);
            }
        }
    }

    pub(crate) fn scrub_exchange(&self, exchange: &mut Exchange) {
        exchange.user_prompt = self.scrub_text(&exchange.user_prompt);
        exchange.assistant_response = self.scrub_text(&exchange.assistant_response);
        for call in &mut exchange.tool_calls {
            self.scrub_value(&mut call.parameters);
            if let Some(result) = call.result.take() {
                call.result = Some(self.scrub_text(&result));
            }
            if let Some(error) = call.error.take() {
                call.error = Some(self.scrub_text(&error));
            }
        }
    }

    fn scrub_error(&self, error: &mut ErrorRecord) {
        error.message = self.scrub_text(&error.message);
        self.scrub_value(&mut error.context);
    }

    fn scrub_log_entry(&self, entry: &mut DebugLogEntry) {
        entry.raw = self.scrub_text(&entry.raw);
        for field in [
            &mut entry.api_call,
            &mut entry.error,
            &mut entry.timing,
            &mut entry.model,
            &mut entry.token_usage,
        ] {
            if let Some(text) = field.take() {
                *field = Some(self.scrub_text(&text));
            }
        }
    }
}
