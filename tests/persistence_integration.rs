// ABOUTME: Integration tests for study-state persistence.
// ABOUTME: Exercises load/save/log/check-in together against temporary files.

use std::fs;

use serde_json::json;

use studyclaw::config::StorageConfig;
use studyclaw::session::{Status, StudyStore};

fn store_in(dir: &std::path::Path) -> StudyStore {
    StudyStore::new(StorageConfig::in_dir(dir))
}

/// Saving an object and loading it back yields the same value.
#[test]
fn save_then_load_roundtrips_object() {
    let tmp = tempfile::tempdir().unwrap();
    let store = store_in(tmp.path());
    let state = json!({
        "profile": {"target": "FAANG", "level": "beginner", "weak_topics": ["DP", "Graphs"]},
        "plan": {"weeks": [{"week": 1, "days": [{"problems": ["Two Sum", "Contains Duplicate"]}]}]},
        "progress_log": [{"timestamp": "2026-01-15T10:00:00Z", "note": "started"}],
        "ratio": 0.75,
        "done": null,
    });

    assert_eq!(store.save(&state.to_string()).status, Status::Ok);
    let loaded = store.load();
    assert!(loaded.exists);
    assert_eq!(loaded.state, Some(state));
}

/// Long notes are cut to 500 characters in both the state and the log.
#[test]
fn long_checkin_note_is_truncated_everywhere() {
    let tmp = tempfile::tempdir().unwrap();
    let store = store_in(tmp.path());
    let note = format!("{}{}", "a".repeat(500), "b".repeat(200));

    let checkin = store.append_checkin(&note);
    assert_eq!(checkin.result.status, Status::Ok);

    let doc = store.load().state.unwrap();
    let stored = doc["progress_log"][0]["note"].as_str().unwrap();
    assert_eq!(stored, "a".repeat(500));

    let log = fs::read_to_string(store.events().path()).unwrap();
    let details = log.lines().next().unwrap().split('\t').nth(2).unwrap();
    assert_eq!(details, "a".repeat(500));
}

/// A non-list progress_log is replaced before appending.
#[test]
fn malformed_progress_log_self_heals() {
    let tmp = tempfile::tempdir().unwrap();
    let store = store_in(tmp.path());
    store.save(r#"{"profile": {"level": "advanced"}, "plan": {}, "progress_log": 42}"#);

    let checkin = store.append_checkin("x");
    assert_eq!(checkin.result.status, Status::Ok);
    assert_eq!(checkin.result.entries, Some(1));

    let doc = store.load().state.unwrap();
    assert_eq!(doc["progress_log"].as_array().unwrap().len(), 1);
    assert_eq!(doc["progress_log"][0]["note"], "x");
    assert_eq!(doc["profile"]["level"], "advanced");
}

/// Each check-in grows progress_log by exactly one.
#[test]
fn repeated_checkins_grow_monotonically() {
    let tmp = tempfile::tempdir().unwrap();
    let store = store_in(tmp.path());

    for n in 1..=5 {
        let checkin = store.append_checkin(&format!("day {n}"));
        assert_eq!(checkin.result.entries, Some(n));
    }

    let doc = store.load().state.unwrap();
    let log = doc["progress_log"].as_array().unwrap();
    assert_eq!(log.len(), 5);
    assert_eq!(log[4]["note"], "day 5");

    let lines = fs::read_to_string(store.events().path()).unwrap();
    assert_eq!(lines.lines().count(), 5);
    assert!(lines.lines().all(|l| l.split('\t').nth(1) == Some("daily_checkin")));
}

/// A fresh environment has no state; the first check-in creates the skeleton.
#[test]
fn first_checkin_bootstraps_state_file() {
    let tmp = tempfile::tempdir().unwrap();
    let store = store_in(tmp.path());

    let loaded = store.load();
    assert!(!loaded.exists);
    assert!(loaded.state.is_none());

    store.append_checkin("first note");

    let doc = store.load().state.unwrap();
    let keys: Vec<&String> = doc.as_object().unwrap().keys().collect();
    assert_eq!(keys, ["profile", "plan", "progress_log"]);
    assert_eq!(doc["progress_log"].as_array().unwrap().len(), 1);
    assert_eq!(doc["progress_log"][0]["note"], "first note");
    let ts = doc["progress_log"][0]["timestamp"].as_str().unwrap();
    assert!(ts.ends_with('Z'));
    assert_eq!(ts.len(), 20);
}

/// Malformed save input leaves an existing document byte-for-byte unchanged.
#[test]
fn malformed_save_leaves_file_untouched() {
    let tmp = tempfile::tempdir().unwrap();
    let store = store_in(tmp.path());
    store.save(r#"{"profile": {"name": "Zoë"}, "plan": {}}"#);
    let before = fs::read(store.state().path()).unwrap();

    let result = store.save("{not valid json");
    assert_eq!(result.status, Status::Error);
    assert!(result.message.contains("Decoder error"));
    assert!(result.keys.is_none());

    assert_eq!(fs::read(store.state().path()).unwrap(), before);
}

/// A failing session log does not affect the check-in's own result.
#[test]
fn log_failure_does_not_block_checkin() {
    let tmp = tempfile::tempdir().unwrap();
    let log_dir = tmp.path().join("logs_are_a_dir");
    fs::create_dir_all(&log_dir).unwrap();
    let store = StudyStore::new(StorageConfig {
        state_file: tmp.path().join("study_state.json"),
        log_file: log_dir,
    });

    let checkin = store.append_checkin("still saved");
    assert_eq!(checkin.result.status, Status::Ok);
    assert_eq!(checkin.result.entries, Some(1));
    assert_eq!(checkin.log.unwrap().status, Status::Error);

    let doc = store.load().state.unwrap();
    assert_eq!(doc["progress_log"][0]["note"], "still saved");
}

/// A failed state write is reported and the log append is not attempted.
#[test]
fn save_failure_skips_log_append() {
    let tmp = tempfile::tempdir().unwrap();
    // The parent "directory" is a regular file, so the write cannot succeed.
    let blocker = tmp.path().join("blocker");
    fs::write(&blocker, "x").unwrap();
    let store = StudyStore::new(StorageConfig {
        state_file: blocker.join("study_state.json"),
        log_file: tmp.path().join("session_log.txt"),
    });

    let checkin = store.append_checkin("lost");
    assert_eq!(checkin.result.status, Status::Error);
    assert!(checkin.result.message.starts_with("Failed to write to study_state.json:"));
    assert!(checkin.log.is_none());
    assert!(!store.events().path().exists());
}

/// Check-ins keep whatever the agent stored under profile and plan.
#[test]
fn checkin_preserves_existing_document() {
    let tmp = tempfile::tempdir().unwrap();
    let store = store_in(tmp.path());
    store.save(
        &json!({
            "profile": {"hours_per_day": 2},
            "plan": {"current_week": 3},
            "progress_log": [{"timestamp": "2026-01-14T09:00:00Z", "note": "Trees"}],
            "extra": "kept",
        })
        .to_string(),
    );

    let checkin = store.append_checkin("Heaps");
    assert_eq!(checkin.result.entries, Some(2));

    let doc = store.load().state.unwrap();
    assert_eq!(doc["profile"]["hours_per_day"], 2);
    assert_eq!(doc["plan"]["current_week"], 3);
    assert_eq!(doc["extra"], "kept");
    assert_eq!(doc["progress_log"][0]["note"], "Trees");
    assert_eq!(doc["progress_log"][1]["note"], "Heaps");
}
