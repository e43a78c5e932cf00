// ABOUTME: Daily check-ins — read-modify-write of progress_log plus a session log line.
// ABOUTME: Bootstraps the skeleton document and repairs a malformed progress_log.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::log::EventLog;
use super::persistence::{StateStore, read_document, write_document};
use super::types::{
    Checkin, CheckinEntry, CheckinResult, Status, StoreError, json_kind, skeleton,
};

/// Event type written to the session log for every check-in.
pub const CHECKIN_EVENT: &str = "daily_checkin";

/// Key of the append-only check-in array inside the state document.
pub const PROGRESS_LOG_KEY: &str = "progress_log";

/// Appends check-ins to the state document and mirrors them to the event log.
#[derive(Debug, Clone, Copy)]
pub struct CheckinRecorder<'a> {
    state: &'a StateStore,
    events: &'a EventLog,
}

impl<'a> CheckinRecorder<'a> {
    pub fn new(state: &'a StateStore, events: &'a EventLog) -> Self {
        Self { state, events }
    }

    /// Append a check-in for `note`.
    ///
    /// The session log is only written after the state document was saved,
    /// and its outcome is reported separately in [`Checkin::log`].
    pub fn append(&self, note: &str) -> Checkin {
        let name = self.state.file_name();

        let mut data = match read_document(self.state.path()) {
            Ok(Some(data)) => data,
            Ok(None) => {
                debug!(
                    path = %self.state.path().display(),
                    "no study state yet, starting from skeleton"
                );
                skeleton()
            }
            Err(err) => {
                warn!(error = %err, "failed to load study state for check-in");
                return Checkin::failed(format!("Could not load {name}: {err}"));
            }
        };

        let kind = json_kind(&data);
        let Some(map) = data.as_object_mut() else {
            return Checkin::failed(format!(
                "Could not load {name}: {}",
                StoreError::NotAnObject(kind)
            ));
        };
        let entries = push_entry(map, CheckinEntry::now(note));

        if let Err(err) = write_document(self.state.path(), &data) {
            warn!(error = %err, "failed to save study state for check-in");
            return Checkin::failed(format!("Failed to write to {name}: {err}"));
        }

        // The log line gets the untruncated note; EventLog truncates on its own.
        let log = self.events.append(CHECKIN_EVENT, note);

        Checkin {
            result: CheckinResult {
                status: Status::Ok,
                message: "Daily check-in appended.".to_string(),
                entries: Some(entries),
            },
            log: Some(log),
        }
    }
}

/// Append `entry` to `progress_log`, replacing a non-array value with an
/// empty array first. Returns the array length after the append.
pub(crate) fn push_entry(map: &mut Map<String, Value>, entry: CheckinEntry) -> usize {
    let progress = map
        .entry(PROGRESS_LOG_KEY)
        .or_insert_with(|| Value::Array(Vec::new()));

    let mut items = match std::mem::take(progress) {
        Value::Array(items) => items,
        other => {
            warn!(
                found = json_kind(&other),
                "progress_log is not a list; replacing it with an empty list"
            );
            Vec::new()
        }
    };
    items.push(entry.into());
    let len = items.len();
    *progress = Value::Array(items);
    len
}
