// ABOUTME: Session module — local persistence of study state between conversational turns.
// ABOUTME: StudyStore bundles the state document, the session event log, and check-ins.

pub mod checkin;
pub mod log;
pub mod persistence;
pub mod types;

pub use checkin::{CHECKIN_EVENT, CheckinRecorder, PROGRESS_LOG_KEY};
pub use log::EventLog;
pub use persistence::StateStore;
pub use types::*;

use crate::config::StorageConfig;

/// The four persistence operations exposed to the agent runtime, bound to
/// one configured pair of files.
#[derive(Debug, Clone)]
pub struct StudyStore {
    state: StateStore,
    events: EventLog,
}

impl StudyStore {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            state: StateStore::new(config.state_file),
            events: EventLog::new(config.log_file),
        }
    }

    pub fn state(&self) -> &StateStore {
        &self.state
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn load(&self) -> LoadResult {
        self.state.load()
    }

    pub fn save(&self, state_json: &str) -> SaveResult {
        self.state.save(state_json)
    }

    pub fn log_event(&self, event_type: &str, details: &str) -> LogResult {
        self.events.append(event_type, details)
    }

    pub fn append_checkin(&self, note: &str) -> Checkin {
        CheckinRecorder::new(&self.state, &self.events).append(note)
    }
}
