//! Persistence E2E tests.
//!
//! Committed index content must survive reopening the on-disk directory,
//! and uncommitted work abandoned with a session must never appear.

use pretty_assertions::assert_eq;

use e2e_tests::{sample_source, TestHarness};
use sync_engine::{Coordinator, SyncOptions};
use sync_types::RecordSource;

#[test]
fn test_index_survives_reopen() {
    let harness = TestHarness::new();

    {
        let coordinator = harness.coordinator(80, 21);
        coordinator.update(&SyncOptions::default()).unwrap();
    }

    // Reopen the same directory with a fresh store handle.
    let store = harness.store();
    assert_eq!(store.document_count().unwrap(), 80);
}

#[test]
fn test_abandoned_session_leaves_committed_state() {
    let harness = TestHarness::new();
    let coordinator = harness.coordinator(50, 22);
    coordinator.update(&SyncOptions::default()).unwrap();

    {
        // Write without committing, then drop the session.
        let store = harness.store();
        let session = store.writer_session().unwrap();
        let extra = sample_source(60, 22);
        session
            .add_or_replace(&extra.fetch(55).unwrap().unwrap())
            .unwrap();
    }

    let store = harness.store();
    assert_eq!(store.document_count().unwrap(), 50);
    assert!(!store.indexed_keys().unwrap().contains(&55));
}

#[test]
fn test_fresh_coordinator_resyncs_existing_index() {
    let harness = TestHarness::new();

    {
        let coordinator = harness.coordinator(30, 23);
        coordinator.update(&SyncOptions::default()).unwrap();
    }

    // A new coordinator over the same directory picks up where it left off.
    let coordinator = Coordinator::new(sample_source(35, 23), harness.store());
    let report = coordinator.update(&SyncOptions::default()).unwrap();

    assert!(report.is_success());
    assert_eq!(report.document_count, 35);
}
