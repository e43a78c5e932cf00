// ABOUTME: Study-state tools — load, save, log, and check-in wrapped as agent tools.
// ABOUTME: Each returns the store's flat result record as JSON.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use super::{Tool, string_param};
use crate::session::StudyStore;

pub const LOAD_STUDY_STATE: &str = "load_study_state";
pub const SAVE_STUDY_STATE: &str = "save_study_state";
pub const LOG_SESSION_EVENT: &str = "log_session_event";
pub const APPEND_DAILY_CHECKIN: &str = "append_daily_checkin";

/// Loads the last saved study state.
pub struct LoadStudyStateTool {
    store: Arc<StudyStore>,
}

impl LoadStudyStateTool {
    pub fn new(store: Arc<StudyStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for LoadStudyStateTool {
    fn name(&self) -> &str {
        LOAD_STUDY_STATE
    }

    fn description(&self) -> &str {
        "Load the last saved study state (profile, plan, progress_log). Returns exists, state, and message."
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _params: Value) -> anyhow::Result<Value> {
        Ok(serde_json::to_value(self.store.load())?)
    }
}

/// Replaces the full study state with a JSON document.
pub struct SaveStudyStateTool {
    store: Arc<StudyStore>,
}

impl SaveStudyStateTool {
    pub fn new(store: Arc<StudyStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for SaveStudyStateTool {
    fn name(&self) -> &str {
        SAVE_STUDY_STATE
    }

    fn description(&self) -> &str {
        "Persist the full study state. Pass a JSON object string with top-level keys such as profile, plan, and progress_log."
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "state_json": {
                    "type": "string",
                    "description": "The full state as a JSON object string"
                }
            },
            "required": ["state_json"]
        })
    }

    async fn execute(&self, params: Value) -> anyhow::Result<Value> {
        let state_json = string_param(&params, "state_json")?;
        Ok(serde_json::to_value(self.store.save(state_json))?)
    }
}

/// Appends a milestone event to the session log.
pub struct LogSessionEventTool {
    store: Arc<StudyStore>,
}

impl LogSessionEventTool {
    pub fn new(store: Arc<StudyStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for LogSessionEventTool {
    fn name(&self) -> &str {
        LOG_SESSION_EVENT
    }

    fn description(&self) -> &str {
        "Append a timestamped event to the session log, e.g. new_plan, weekly_review, or a big plan adjustment."
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "event_type": {
                    "type": "string",
                    "description": "Short tag like new_plan, daily_checkin, review"
                },
                "details": {
                    "type": "string",
                    "description": "Brief description, at most 500 characters are kept"
                }
            },
            "required": ["event_type", "details"]
        })
    }

    async fn execute(&self, params: Value) -> anyhow::Result<Value> {
        let event_type = string_param(&params, "event_type")?;
        let details = string_param(&params, "details")?;
        Ok(serde_json::to_value(self.store.log_event(event_type, details))?)
    }
}

/// Appends a daily progress note to progress_log.
pub struct AppendDailyCheckinTool {
    store: Arc<StudyStore>,
}

impl AppendDailyCheckinTool {
    pub fn new(store: Arc<StudyStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for AppendDailyCheckinTool {
    fn name(&self) -> &str {
        APPEND_DAILY_CHECKIN
    }

    fn description(&self) -> &str {
        "Append a daily progress note to progress_log with a UTC timestamp. Returns the number of entries after the append."
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "note": {
                    "type": "string",
                    "description": "What the user worked on today"
                }
            },
            "required": ["note"]
        })
    }

    async fn execute(&self, params: Value) -> anyhow::Result<Value> {
        let note = string_param(&params, "note")?;
        let checkin = self.store.append_checkin(note);
        Ok(serde_json::to_value(checkin.result)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageConfig;

    fn store_in(dir: &std::path::Path) -> Arc<StudyStore> {
        Arc::new(StudyStore::new(StorageConfig::in_dir(dir)))
    }

    #[test]
    fn schemas_require_their_params() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(tmp.path());
        let save = SaveStudyStateTool::new(store.clone()).schema();
        assert_eq!(save["required"], json!(["state_json"]));
        let log = LogSessionEventTool::new(store.clone()).schema();
        assert_eq!(log["required"], json!(["event_type", "details"]));
        let checkin = AppendDailyCheckinTool::new(store).schema();
        assert_eq!(checkin["properties"]["note"]["type"], "string");
    }

    #[tokio::test]
    async fn load_tool_reports_missing_state() {
        let tmp = tempfile::tempdir().unwrap();
        let result = LoadStudyStateTool::new(store_in(tmp.path()))
            .execute(json!({}))
            .await
            .unwrap();
        assert_eq!(result["exists"], false);
        assert!(result["state"].is_null());
    }

    #[tokio::test]
    async fn save_tool_returns_keys() {
        let tmp = tempfile::tempdir().unwrap();
        let result = SaveStudyStateTool::new(store_in(tmp.path()))
            .execute(json!({"state_json": "{\"plan\": {}, \"profile\": {}}"}))
            .await
            .unwrap();
        assert_eq!(result["status"], "ok");
        assert_eq!(result["keys"], json!(["plan", "profile"]));
    }

    #[tokio::test]
    async fn save_tool_rejects_missing_param() {
        let tmp = tempfile::tempdir().unwrap();
        let err = SaveStudyStateTool::new(store_in(tmp.path()))
            .execute(json!({"state": "{}"}))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("state_json"));
    }

    #[tokio::test]
    async fn checkin_tool_returns_flat_result() {
        let tmp = tempfile::tempdir().unwrap();
        let result = AppendDailyCheckinTool::new(store_in(tmp.path()))
            .execute(json!({"note": "Two Sum and Valid Parentheses"}))
            .await
            .unwrap();
        assert_eq!(
            result,
            json!({"status": "ok", "message": "Daily check-in appended.", "entries": 1})
        );
    }

    #[tokio::test]
    async fn log_tool_writes_event() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(tmp.path());
        let result = LogSessionEventTool::new(store.clone())
            .execute(json!({"event_type": "new_plan", "details": "8-week graphs focus"}))
            .await
            .unwrap();
        assert_eq!(result["status"], "ok");
        let content = std::fs::read_to_string(store.events().path()).unwrap();
        assert!(content.contains("\tnew_plan\t8-week graphs focus\n"));
    }
}
