//! Management-command E2E tests.
//!
//! Exercises the clear/update/rebuild command surface against a populated
//! record store and verifies index counts and key sets after each command.

use std::collections::BTreeSet;

use pretty_assertions::assert_eq;

use e2e_tests::TestHarness;
use sync_engine::{clear_index, rebuild_index, update_index, Coordinator};
use sync_types::{MemoryRecordSource, Pk, RecordSource};

const NUM_ENTRIES: u64 = 1000;

/// Confirm that the documents in the search index match the record store.
fn verify_indexed_documents(coordinator: &Coordinator<MemoryRecordSource>, expected: u64) {
    let store = coordinator.store();
    assert_eq!(store.document_count().unwrap(), expected);
    assert_eq!(
        store.indexed_keys().unwrap(),
        coordinator.source().all_keys().unwrap()
    );
}

#[test]
fn test_basic_commands() {
    let harness = TestHarness::new();
    let coordinator = harness.coordinator(NUM_ENTRIES, 1);
    update_index(&coordinator, false, 1, 1000).unwrap();

    clear_index(&coordinator).unwrap();
    assert_eq!(coordinator.store().document_count().unwrap(), 0);

    update_index(&coordinator, false, 1, 1000).unwrap();
    verify_indexed_documents(&coordinator, NUM_ENTRIES);

    clear_index(&coordinator).unwrap();
    assert_eq!(coordinator.store().document_count().unwrap(), 0);

    rebuild_index(&coordinator).unwrap();
    verify_indexed_documents(&coordinator, NUM_ENTRIES);
}

#[test]
fn test_remove() {
    let harness = TestHarness::new();
    let coordinator = harness.coordinator(NUM_ENTRIES, 2);

    update_index(&coordinator, false, 1, 1000).unwrap();
    verify_indexed_documents(&coordinator, NUM_ENTRIES);

    // Remove several records from the store.
    for pk in [1, 2, 8] {
        assert!(coordinator.source().delete(pk));
    }
    assert_eq!(coordinator.store().document_count().unwrap(), NUM_ENTRIES);

    // A plain update doesn't fix it.
    update_index(&coordinator, false, 1, 1000).unwrap();
    assert_eq!(coordinator.store().document_count().unwrap(), NUM_ENTRIES);

    // ... but remove does.
    let status = update_index(&coordinator, true, 1, 1000).unwrap();
    assert!(status.success);
    assert_eq!(status.report.removed, 3);
    assert_eq!(
        coordinator.store().document_count().unwrap(),
        NUM_ENTRIES - 3
    );

    let keys = coordinator.store().indexed_keys().unwrap();
    for pk in [1, 2, 8] {
        assert!(!keys.contains(&pk), "pk {} should be gone", pk);
    }
}

#[test]
fn test_multiprocessing() {
    let harness = TestHarness::new();
    let coordinator = harness.coordinator(NUM_ENTRIES, 3);

    clear_index(&coordinator).unwrap();
    assert_eq!(coordinator.store().document_count().unwrap(), 0);

    let status = update_index(&coordinator, false, 10, 10).unwrap();
    assert!(status.success);
    assert!(
        status.report.fatal.is_empty(),
        "no lock errors may surface under concurrent workers: {:?}",
        status.report.fatal
    );
    verify_indexed_documents(&coordinator, NUM_ENTRIES);
}

#[test]
fn test_rebuild_after_store_shrinks() {
    let harness = TestHarness::new();
    let coordinator = harness.coordinator(100, 4);
    rebuild_index(&coordinator).unwrap();

    for pk in 1..=40 {
        coordinator.source().delete(pk);
    }

    let status = rebuild_index(&coordinator).unwrap();
    assert!(status.success);
    assert_eq!(coordinator.store().document_count().unwrap(), 60);
    assert_eq!(
        coordinator.store().indexed_keys().unwrap(),
        (41..=100).collect::<BTreeSet<Pk>>()
    );
}
