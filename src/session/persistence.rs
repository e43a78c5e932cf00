// ABOUTME: Study state persistence — load and replace the whole JSON state document.
// ABOUTME: Writes are canonical (2-space pretty JSON, literal non-ASCII) and atomic via tmp + rename.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use super::types::{LoadResult, SaveResult, Status, StoreError, json_kind};

/// Reads and writes the single JSON document holding profile, plan, and progress.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name used in result messages.
    pub(crate) fn file_name(&self) -> String {
        display_name(&self.path)
    }

    /// Load the state document. Never fails: read and parse errors are
    /// reported as `exists = false` with the cause in `message`.
    pub fn load(&self) -> LoadResult {
        let name = self.file_name();
        match read_document(&self.path) {
            Ok(Some(state)) => {
                debug!(path = %self.path.display(), "loaded study state");
                LoadResult {
                    exists: true,
                    state: Some(state),
                    message: format!("Loaded study state from {name}."),
                }
            }
            Ok(None) => LoadResult {
                exists: false,
                state: None,
                message: format!("No saved {name} found yet."),
            },
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "failed to load study state");
                LoadResult {
                    exists: false,
                    state: None,
                    message: format!("Failed to load state from {name}: {err}"),
                }
            }
        }
    }

    /// Replace the state document with `state_json`.
    ///
    /// The text must parse as a JSON object; anything else is rejected
    /// without touching the file.
    pub fn save(&self, state_json: &str) -> SaveResult {
        let name = self.file_name();
        let data: Value = match serde_json::from_str(state_json) {
            Ok(data) => data,
            Err(err) => {
                return SaveResult::error(format!(
                    "State must be valid JSON. Decoder error: {err}"
                ));
            }
        };

        let Value::Object(map) = &data else {
            return SaveResult::error(format!(
                "State must be a JSON object with keys like profile, plan, progress_log: {}",
                StoreError::NotAnObject(json_kind(&data))
            ));
        };
        let mut keys: Vec<String> = map.keys().cloned().collect();
        keys.sort();

        if let Err(err) = write_document(&self.path, &data) {
            warn!(path = %self.path.display(), error = %err, "failed to save study state");
            return SaveResult::error(format!("Failed to write to {name}: {err}"));
        }

        debug!(path = %self.path.display(), keys = keys.len(), "saved study state");
        SaveResult {
            status: Status::Ok,
            message: format!("Saved study state to {name}."),
            keys: Some(keys),
        }
    }
}

/// Read and parse the document at `path`. `Ok(None)` when it does not exist;
/// any other read failure (permissions, a directory in the way) is an error.
pub(crate) fn read_document(path: &Path) -> Result<Option<Value>, StoreError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if is_missing(&err) => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    let data: Value = serde_json::from_str(&content)?;
    Ok(Some(data))
}

/// The file or one of its ancestors does not exist as a directory entry.
fn is_missing(err: &std::io::Error) -> bool {
    matches!(err.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory)
}

/// Write `data` in canonical form (atomic write via tmp + rename).
pub(crate) fn write_document(path: &Path, data: &Value) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let content = serde_json::to_string_pretty(data)?;
    let tmp_path = tmp_path_for(path);
    std::fs::write(&tmp_path, &content)?;
    if let Err(err) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(err.into());
    }
    Ok(())
}

/// Sibling path with `.tmp` appended to the full file name.
pub(crate) fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
