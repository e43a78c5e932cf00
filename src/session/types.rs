// ABOUTME: Result records and shared helpers for study-state persistence.
// ABOUTME: Each result serializes to the flat mapping handed back to the agent runtime.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Maximum number of characters kept from a check-in note or log detail.
pub const MAX_TEXT_CHARS: usize = 500;

/// Outcome flag shared by every write operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Error,
}

/// Result of loading the state document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadResult {
    /// Whether a readable state document was found.
    pub exists: bool,
    /// The parsed document, or null when absent or unreadable.
    pub state: Option<Value>,
    pub message: String,
}

/// Result of replacing the state document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveResult {
    pub status: Status,
    pub message: String,
    /// Sorted top-level keys of the saved document, present only on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keys: Option<Vec<String>>,
}

impl SaveResult {
    pub(crate) fn error(message: String) -> Self {
        Self {
            status: Status::Error,
            message,
            keys: None,
        }
    }
}

/// Result of appending a line to the session log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogResult {
    pub status: Status,
    pub message: String,
}

/// Result of appending a daily check-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckinResult {
    pub status: Status,
    pub message: String,
    /// Length of `progress_log` after the append, present only on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entries: Option<usize>,
}

/// A check-in together with its best-effort session log append.
///
/// `log` is `None` when the append was never attempted. Its status never
/// changes `result.status`.
#[derive(Debug, Clone, PartialEq)]
pub struct Checkin {
    pub result: CheckinResult,
    pub log: Option<LogResult>,
}

impl Checkin {
    pub(crate) fn failed(message: String) -> Self {
        Self {
            result: CheckinResult {
                status: Status::Error,
                message,
                entries: None,
            },
            log: None,
        }
    }
}

/// One element of the `progress_log` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckinEntry {
    pub timestamp: String,
    pub note: String,
}

impl CheckinEntry {
    /// Build an entry stamped with the current UTC time, truncating the note.
    pub fn now(note: &str) -> Self {
        Self {
            timestamp: utc_timestamp(),
            note: truncate_chars(note, MAX_TEXT_CHARS).to_string(),
        }
    }
}

impl From<CheckinEntry> for Value {
    fn from(entry: CheckinEntry) -> Self {
        serde_json::json!({
            "timestamp": entry.timestamp,
            "note": entry.note,
        })
    }
}

/// Failures while reading or writing the state document.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Parse(#[from] serde_json::Error),
    #[error("top-level value is a JSON {0}, expected an object")]
    NotAnObject(&'static str),
}

/// The minimal document synthesized when no state exists yet.
pub fn skeleton() -> Value {
    serde_json::json!({
        "profile": {},
        "plan": {},
        "progress_log": [],
    })
}

/// Current UTC time with second precision and a trailing `Z`.
pub fn utc_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// The first `max` characters of `text`, never splitting a character.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Human-readable name of a JSON value's type.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
