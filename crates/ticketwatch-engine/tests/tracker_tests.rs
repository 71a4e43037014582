// Integration tests for the ticket tracker and partition registry
// Drives full receives against file-backed partitions

use serde_json::json;
use std::fs;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;
use ticketwatch_core::logging_facility::test_capture::init_test_capture;
use ticketwatch_core::{ChangeEntry, ExErrorKind, MemorySnapshotStore};
use ticketwatch_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};
use ticketwatch_engine::{TicketFilter, TicketTracker, TrackerConfig, TrackerRegistry};

fn setup_registry() -> (TempDir, TrackerRegistry) {
    let dir = TempDir::new().expect("Failed to create temp data directory");
    let registry = TrackerRegistry::open(TrackerConfig::default().with_data_dir(dir.path()));
    (dir, registry)
}

#[test]
fn test_first_then_changed_then_unchanged() {
    let (_dir, registry) = setup_registry();
    let tracker = registry.default_tracker().unwrap();

    // Given: a ticket seen for the first time
    let first = tracker
        .receive(json!({"id": "T1", "status": "open", "tags": ["a", "b", "c"]}))
        .unwrap();
    assert!(first.changed());
    assert!(first.comparison.changes.is_first_observation());

    // When: the status changes and tags are reordered
    let second = tracker
        .receive(json!({"id": "T1", "status": "closed", "tags": ["c", "a", "b"]}))
        .unwrap();

    // Then: only status is reported
    assert!(second.changed());
    assert_eq!(second.comparison.changes.len(), 1);
    assert_eq!(
        second.comparison.changes.get("status"),
        Some(&ChangeEntry {
            old: json!("open"),
            new: json!("closed"),
        })
    );

    // And: the same payload again reports nothing
    let third = tracker
        .receive(json!({"id": "T1", "status": "closed", "tags": ["b", "c", "a"]}))
        .unwrap();
    assert!(!third.changed());
    assert!(third.comparison.changes.is_empty());
}

#[test]
fn test_ticket_id_field_fallback() {
    let (_dir, registry) = setup_registry();
    let tracker = registry.default_tracker().unwrap();

    let outcome = tracker
        .receive(json!({"id": "", "ticket_id": 1042, "status": "open"}))
        .unwrap();
    assert_eq!(outcome.ticket_id, "1042");
    assert!(tracker.get_ticket("1042").unwrap().is_some());
}

#[test]
fn test_missing_id_mutates_nothing() {
    let (dir, registry) = setup_registry();
    let tracker = registry.default_tracker().unwrap();

    let err = tracker
        .receive(json!({"id": null, "ticket_id": false, "status": "open"}))
        .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::MissingId);
    assert!(err.kind().is_client_error());
    assert_eq!(err.message(), "Ticket must have one of: id, ticket_id");
    assert_eq!(err.partition(), Some("default"));
    assert!(err.request_id().is_some());
    assert_eq!(tracker.ticket_count().unwrap(), 0);
    assert!(!dir.path().join("default.json").exists());
}

#[test]
fn test_non_object_payload_is_invalid_input() {
    let (_dir, registry) = setup_registry();
    let tracker = registry.default_tracker().unwrap();

    for payload in [json!(["id", "T1"]), json!("T1"), json!(null)] {
        let err = tracker.receive(payload).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidInput);
        assert_eq!(err.code(), "ERR_INVALID_INPUT");
    }
    assert_eq!(tracker.ticket_count().unwrap(), 0);
}

#[test]
fn test_partial_update_keeps_omitted_fields_out_of_diff() {
    let (_dir, registry) = setup_registry();
    let tracker = registry.default_tracker().unwrap();

    tracker
        .receive(json!({"id": "T1", "status": "open", "assignee": "alice"}))
        .unwrap();
    let outcome = tracker.receive(json!({"id": "T1", "status": "open"})).unwrap();

    assert!(!outcome.changed());
    // Last write wins: the stored snapshot is the partial payload.
    let stored = tracker.get_ticket("T1").unwrap().unwrap();
    assert!(stored.get("assignee").is_none());
}

#[test]
fn test_blank_toggle_and_added_tag() {
    let (_dir, registry) = setup_registry();
    let tracker = registry.default_tracker().unwrap();

    tracker
        .receive(json!({"id": "T1", "note": null, "tags": ["a", "b"]}))
        .unwrap();
    let outcome = tracker
        .receive(json!({"id": "T1", "note": "", "tags": ["a", "c"]}))
        .unwrap();

    let changes = serde_json::to_value(&outcome.comparison.changes).unwrap();
    assert_eq!(
        changes,
        json!({"tags": {"old": ["a", "b"], "new": ["a", "c"]}})
    );
}

#[test]
fn test_snapshots_survive_registry_restart() {
    let dir = TempDir::new().unwrap();
    let config = TrackerConfig::default().with_data_dir(dir.path());

    {
        let registry = TrackerRegistry::open(config.clone());
        registry
            .tracker("user123")
            .unwrap()
            .receive(json!({"id": "T1", "status": "open"}))
            .unwrap();
    }

    let registry = TrackerRegistry::open(config);
    let tracker = registry.tracker("user123").unwrap();
    let outcome = tracker
        .receive(json!({"id": "T1", "status": "open"}))
        .unwrap();
    assert!(!outcome.changed());
}

#[test]
fn test_partitions_are_isolated() {
    let (dir, registry) = setup_registry();

    registry
        .tracker("alice")
        .unwrap()
        .receive(json!({"id": "T1", "status": "open"}))
        .unwrap();
    let outcome = registry
        .tracker("bob")
        .unwrap()
        .receive(json!({"id": "T1", "status": "closed"}))
        .unwrap();

    assert!(outcome.comparison.changes.is_first_observation());
    assert!(dir.path().join("alice.json").exists());
    assert!(dir.path().join("bob.json").exists());
}

#[test]
fn test_invalid_partition_names_rejected() {
    let (_dir, registry) = setup_registry();

    for name in ["", "../escape", ".hidden", "a/b", "user 1"] {
        let err = registry.tracker(name).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidPartition, "name {:?}", name);
    }
}

#[test]
fn test_concurrent_receives_lose_no_update() {
    let (_dir, registry) = setup_registry();
    let tracker = registry.tracker("busy").unwrap();
    tracker.receive(json!({"id": "T1", "counter": -1})).unwrap();

    let threads = 8;
    let per_thread = 10;
    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let tracker = Arc::clone(&tracker);
            thread::spawn(move || {
                (0..per_thread)
                    .map(|i| {
                        let outcome = tracker
                            .receive(json!({"id": "T1", "counter": t * per_thread + i}))
                            .unwrap();
                        outcome.comparison.changes.get("counter").cloned()
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut old_values: Vec<i64> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .map(|entry| entry.expect("every write changes counter").old.as_i64().unwrap())
        .collect();

    // Every receive saw a distinct predecessor: no two read the same snapshot.
    old_values.sort_unstable();
    let before_dedup = old_values.len();
    old_values.dedup();
    assert_eq!(old_values.len(), before_dedup);
    assert_eq!(before_dedup, (threads * per_thread) as usize);
    assert_eq!(old_values[0], -1);
}

#[test]
fn test_failed_persist_keeps_previous_snapshot() {
    let dir = TempDir::new().unwrap();
    let data_dir = dir.path().join("data");
    let registry = TrackerRegistry::open(TrackerConfig::default().with_data_dir(&data_dir));
    let tracker = registry.default_tracker().unwrap();
    tracker
        .receive(json!({"id": "T1", "status": "open"}))
        .unwrap();

    // Given: the data directory is replaced by a plain file
    fs::remove_dir_all(&data_dir).unwrap();
    fs::write(&data_dir, b"not a directory").unwrap();

    // When: an update arrives
    let err = tracker
        .receive(json!({"id": "T1", "status": "closed"}))
        .unwrap_err();

    // Then: the error surfaces and memory still holds the old snapshot
    assert_eq!(err.kind(), ExErrorKind::Io);
    assert_eq!(err.ticket_id(), Some("T1"));
    let stored = tracker.get_ticket("T1").unwrap().unwrap();
    assert_eq!(stored["status"], json!("open"));
}

#[test]
fn test_list_with_filter_and_clear() {
    let (_dir, registry) = setup_registry();
    let tracker = registry.default_tracker().unwrap();
    tracker.receive(json!({"id": "T1", "step": "done"})).unwrap();
    tracker.receive(json!({"id": "T2", "step": "open"})).unwrap();
    tracker.receive(json!({"id": "T3", "step": "done"})).unwrap();

    let filter: TicketFilter = "step=done".parse().unwrap();
    let done = tracker.list_tickets(Some(&filter)).unwrap();
    assert_eq!(done.keys().collect::<Vec<_>>(), vec!["T1", "T3"]);
    assert_eq!(tracker.list_tickets(None).unwrap().len(), 3);

    tracker.clear_all().unwrap();
    assert_eq!(tracker.ticket_count().unwrap(), 0);

    let outcome = tracker.receive(json!({"id": "T1", "step": "done"})).unwrap();
    assert!(outcome.comparison.changes.is_first_observation());
}

#[test]
fn test_memory_store_tracker() {
    let tracker = TicketTracker::with_defaults("scratch", MemorySnapshotStore::new());
    tracker.receive(json!({"id": 7, "v": 1})).unwrap();
    let outcome = tracker.receive(json!({"id": 7, "v": 1.0})).unwrap();
    assert!(!outcome.changed());
    assert_eq!(tracker.partition(), "scratch");
}

#[test]
fn test_receive_logs_start_and_end_with_request_id() {
    let capture = init_test_capture();
    let tracker = TicketTracker::with_defaults("logged", MemorySnapshotStore::new());

    tracker
        .receive(json!({"id": "LOG-UNIQUE-1", "status": "open"}))
        .unwrap();

    let end = capture
        .events_for_op("receive_ticket")
        .into_iter()
        .find(|e| {
            e.event.as_deref() == Some(EVENT_END) && e.field("ticket_id") == Some("LOG-UNIQUE-1")
        })
        .expect("end event captured");
    assert_eq!(end.field("partition"), Some("logged"));
    assert_eq!(end.field("changed"), Some("true"));

    let request_id = end.field("request_id").expect("request id logged");
    assert!(capture.count_events(|e| {
        e.event.as_deref() == Some(EVENT_START) && e.field("request_id") == Some(request_id)
    }) == 1);
}

#[test]
fn test_rejected_receive_logs_error_code() {
    let capture = init_test_capture();
    let tracker = TicketTracker::with_defaults("logged-errors", MemorySnapshotStore::new());

    tracker.receive(json!({"status": "open"})).unwrap_err();

    let error = capture
        .events_for_op("receive_ticket")
        .into_iter()
        .find(|e| {
            e.event.as_deref() == Some(EVENT_END_ERROR)
                && e.field("partition") == Some("logged-errors")
        })
        .expect("error event captured");
    assert_eq!(error.field("err_code"), Some("ERR_MISSING_ID"));
}
