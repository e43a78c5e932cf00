// ABOUTME: Session event log — appends tab-separated, timestamped lines to a text file.
// ABOUTME: Write-only sink: lines are never read back or rotated.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::persistence::display_name;
use super::types::{LogResult, MAX_TEXT_CHARS, Status, truncate_chars, utc_timestamp};

/// Appends `<timestamp>\t<event_type>\t<details>` lines to the session log.
#[derive(Debug, Clone)]
pub struct EventLog {
    path: PathBuf,
}

impl EventLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one event line, creating the file if needed. I/O failures are
    /// returned as `status = error`.
    pub fn append(&self, event_type: &str, details: &str) -> LogResult {
        let name = display_name(&self.path);
        let line = format_line(&utc_timestamp(), event_type, details);

        match append_line(&self.path, &line) {
            Ok(()) => {
                debug!(path = %self.path.display(), event_type, "logged session event");
                LogResult {
                    status: Status::Ok,
                    message: format!("Event logged to {name}."),
                }
            }
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "failed to log session event");
                LogResult {
                    status: Status::Error,
                    message: format!("Failed to write to {name}: {err}"),
                }
            }
        }
    }
}

/// Render a single log line, truncating `details` and ending with a newline.
pub fn format_line(timestamp: &str, event_type: &str, details: &str) -> String {
    format!(
        "{timestamp}\t{event_type}\t{}\n",
        truncate_chars(details, MAX_TEXT_CHARS)
    )
}

fn append_line(path: &Path, line: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(line.as_bytes())?;
    file.flush()?;
    Ok(())
}
