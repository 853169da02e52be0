//! Learned pattern store persistence and learning-loop tests.

use proptest::prelude::*;

use waypoint_mapping::ir::{LocatorSpec, Primitive};
use waypoint_mapping::llkb::{
    LlkbStore, StoreDocument, CONFIDENCE_CAP, CONFIDENCE_FLOOR, STORE_FILE, STORE_VERSION,
};

fn click() -> Primitive {
    Primitive::Click {
        locator: LocatorSpec::role("button", "Save"),
    }
}

#[test]
fn test_save_and_reload_round_trip() {
    let dir = tempfile::TempDir::new().unwrap();

    let mut store = LlkbStore::load(dir.path());
    assert!(store.is_empty());
    let id = store.learn(r#"user click "Save" button"#, click(), "checkout");
    store.record_success(&id, "checkout").unwrap();
    store.save().unwrap();

    let reloaded = LlkbStore::load(dir.path());
    assert_eq!(reloaded.len(), 1);
    let pattern = reloaded.get(&id).unwrap();
    assert_eq!(pattern.success_count, 2);
    assert!((pattern.confidence - 0.55).abs() < 1e-9);
    assert!(pattern.source_journeys.contains("checkout"));
}

/// The persisted document carries a schema version and the pattern list.
#[test]
fn test_store_document_shape() {
    let dir = tempfile::TempDir::new().unwrap();
    let mut store = LlkbStore::load(dir.path());
    store.learn("user click \"Go\"", click(), "j1");
    store.save().unwrap();

    let raw = std::fs::read_to_string(dir.path().join(STORE_FILE)).unwrap();
    let doc: StoreDocument = serde_json::from_str(&raw).unwrap();
    assert_eq!(doc.version, STORE_VERSION);
    assert_eq!(doc.patterns.len(), 1);
}

/// A corrupt store file yields an empty store, never an error.
#[test]
fn test_corrupt_store_recovers_empty() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join(STORE_FILE), "{not json at all").unwrap();

    let store = LlkbStore::load(dir.path());
    assert!(store.is_empty());
}

/// An absent store file yields an empty store.
#[test]
fn test_absent_store_is_empty() {
    let dir = tempfile::TempDir::new().unwrap();
    let store = LlkbStore::load(dir.path());
    assert!(store.is_empty());
}

/// An unsupported schema version is treated like corruption.
#[test]
fn test_future_version_recovers_empty() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(STORE_FILE),
        r#"{"version": 99, "patterns": []}"#,
    )
    .unwrap();
    let store = LlkbStore::load(dir.path());
    assert!(store.is_empty());
}

/// Reset drops everything; a later save persists the empty state.
#[test]
fn test_reset_then_save() {
    let dir = tempfile::TempDir::new().unwrap();
    let mut store = LlkbStore::load(dir.path());
    store.learn("user click \"Go\"", click(), "j1");
    store.save().unwrap();

    store.reset();
    store.save().unwrap();

    let reloaded = LlkbStore::load(dir.path());
    assert!(reloaded.is_empty());
}

#[test]
fn test_export_is_sorted_and_bounded() {
    let mut store = LlkbStore::in_memory();
    let id_a = store.learn("user click \"A\"", click(), "j1");
    let id_b = store.learn("user click \"B\"", click(), "j1");
    let id_c = store.learn("user click \"C\"", click(), "j1");
    for _ in 0..8 {
        store.record_success(&id_b, "j1").unwrap();
    }
    for _ in 0..3 {
        store.record_success(&id_c, "j1").unwrap();
    }
    let _ = id_a;

    let exported = store.export_top(2, 0.6);
    assert_eq!(exported.len(), 2);
    assert_eq!(exported[0].normalized_text, "user click \"B\"");
    assert_eq!(exported[1].normalized_text, "user click \"C\"");
}

#[test]
fn test_diagnostics_counts() {
    let mut store = LlkbStore::in_memory();
    let id = store.learn("user click \"A\"", click(), "j1");
    for _ in 0..8 {
        store.record_success(&id, "j1").unwrap();
    }
    store.learn("user click \"B\"", click(), "j1");

    let diagnostics = store.diagnostics(0.6);
    assert_eq!(diagnostics.total_patterns, 2);
    assert_eq!(diagnostics.publishable, 1);
    assert!(diagnostics.avg_confidence > 0.5);
}

proptest! {
    /// Confidence never leaves [0.10, 0.95] under any sequence of recorded
    /// successes and failures.
    #[test]
    fn prop_confidence_stays_clamped(outcomes in prop::collection::vec(any::<bool>(), 0..200)) {
        let mut store = LlkbStore::in_memory();
        let id = store.learn("user click \"X\"", click(), "j1");
        for success in outcomes {
            if success {
                store.record_success(&id, "j1").unwrap();
            } else {
                store.record_failure(&id).unwrap();
            }
            let confidence = store.get(&id).unwrap().confidence;
            prop_assert!((CONFIDENCE_FLOOR..=CONFIDENCE_CAP).contains(&confidence));
        }
    }
}
