//! Concurrency E2E tests.
//!
//! Parallelism must never be observable in the final index content, and
//! lock contention must be fully absorbed by the engine.

use std::collections::BTreeSet;

use pretty_assertions::assert_eq;

use e2e_tests::TestHarness;
use sync_engine::{SyncOptions, SyncPhase};
use sync_types::Pk;

#[test]
fn test_worker_counts_produce_identical_indexes() {
    let mut key_sets: Vec<BTreeSet<Pk>> = Vec::new();

    for workers in [1, 2, 10] {
        let harness = TestHarness::new();
        let coordinator = harness.coordinator(500, 99);

        let report = coordinator
            .update(
                &SyncOptions::default()
                    .with_workers(workers)
                    .with_batch_size(17),
            )
            .unwrap();

        assert_eq!(report.phase, SyncPhase::Done, "workers={}", workers);
        key_sets.push(coordinator.store().indexed_keys().unwrap());
    }

    assert_eq!(key_sets[0], key_sets[1]);
    assert_eq!(key_sets[1], key_sets[2]);
}

#[test]
fn test_concurrent_update_surfaces_no_lock_errors() {
    let harness = TestHarness::new();
    let coordinator = harness.coordinator(300, 7);

    let report = coordinator
        .update(
            &SyncOptions::default()
                .with_workers(10)
                .with_batch_size(5),
        )
        .unwrap();

    assert_eq!(report.phase, SyncPhase::Done);
    assert!(report.fatal.is_empty(), "lock errors surfaced: {:?}", report.fatal);
    assert_eq!(report.indexed, 300);
}

#[test]
fn test_update_twice_is_idempotent() {
    let harness = TestHarness::new();
    let coordinator = harness.coordinator(120, 11);

    let first = coordinator
        .update(&SyncOptions::default().with_workers(4).with_batch_size(13))
        .unwrap();
    let second = coordinator
        .update(&SyncOptions::default().with_workers(4).with_batch_size(13))
        .unwrap();

    assert_eq!(first.document_count, 120);
    assert_eq!(second.document_count, 120);
    assert_eq!(
        coordinator.store().indexed_keys().unwrap(),
        (1..=120).collect::<BTreeSet<Pk>>()
    );
}

#[test]
fn test_parallel_remove_pass() {
    let harness = TestHarness::new();
    let coordinator = harness.coordinator(200, 5);
    coordinator.update(&SyncOptions::default()).unwrap();

    for pk in (1..=200).filter(|pk| pk % 10 == 0) {
        coordinator.source().delete(pk);
    }

    let report = coordinator
        .update(
            &SyncOptions::default()
                .with_workers(8)
                .with_batch_size(9)
                .with_remove(true),
        )
        .unwrap();

    assert_eq!(report.phase, SyncPhase::Done);
    assert_eq!(report.removed, 20);
    assert_eq!(report.document_count, 180);
}
