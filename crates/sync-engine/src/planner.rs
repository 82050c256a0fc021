//! Batch planner.
//!
//! Slices the full key set into ordered, disjoint batches of at most
//! `batch_size` keys. Keys are sorted ascending first so plans are
//! deterministic per run regardless of how the source enumerates them.

use std::collections::BTreeSet;

use tracing::debug;

use sync_types::Pk;

use crate::error::SyncError;

/// An ordered, disjoint slice of the key set, processed by one worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    /// Position of this batch in the plan
    pub index: usize,
    /// Keys in ascending order
    pub keys: Vec<Pk>,
}

impl Batch {
    /// Number of keys in the batch.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Partition a key set into batches of at most `batch_size` keys.
///
/// An empty key set yields zero batches; `batch_size == 0` is a caller
/// error.
pub fn plan(keys: &BTreeSet<Pk>, batch_size: usize) -> Result<Vec<Batch>, SyncError> {
    if batch_size == 0 {
        return Err(SyncError::InvalidConfig(
            "batch size must be positive".to_string(),
        ));
    }

    let sorted: Vec<Pk> = keys.iter().copied().collect();
    let batches: Vec<Batch> = sorted
        .chunks(batch_size)
        .enumerate()
        .map(|(index, chunk)| Batch {
            index,
            keys: chunk.to_vec(),
        })
        .collect();

    debug!(
        keys = sorted.len(),
        batch_size,
        batches = batches.len(),
        "Planned batches"
    );

    Ok(batches)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_splits_evenly() {
        let keys: BTreeSet<Pk> = (1..=10).collect();
        let batches = plan(&keys, 5).unwrap();

        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].keys, vec![1, 2, 3, 4, 5]);
        assert_eq!(batches[1].keys, vec![6, 7, 8, 9, 10]);
    }

    #[test]
    fn test_plan_last_batch_shorter() {
        let keys: BTreeSet<Pk> = (1..=7).collect();
        let batches = plan(&keys, 3).unwrap();

        assert_eq!(batches.len(), 3);
        assert_eq!(batches[2].keys, vec![7]);
    }

    #[test]
    fn test_plan_batches_are_disjoint_and_cover() {
        let keys: BTreeSet<Pk> = (1..=100).collect();
        let batches = plan(&keys, 9).unwrap();

        let mut seen = BTreeSet::new();
        for batch in &batches {
            assert!(batch.len() <= 9);
            for &pk in &batch.keys {
                assert!(seen.insert(pk), "pk {} appears in two batches", pk);
            }
        }
        assert_eq!(seen, keys);
    }

    #[test]
    fn test_plan_empty_keys() {
        let keys = BTreeSet::new();
        let batches = plan(&keys, 10).unwrap();
        assert!(batches.is_empty());
    }

    #[test]
    fn test_plan_zero_batch_size_is_invalid() {
        let keys: BTreeSet<Pk> = (1..=3).collect();
        let err = plan(&keys, 0).unwrap_err();
        assert!(matches!(err, SyncError::InvalidConfig(_)));
    }

    #[test]
    fn test_plan_is_deterministic() {
        let keys: BTreeSet<Pk> = [5, 3, 9, 1, 7].into_iter().collect();
        let a = plan(&keys, 2).unwrap();
        let b = plan(&keys, 2).unwrap();
        assert_eq!(a, b);
        assert_eq!(a[0].keys, vec![1, 3]);
    }
}
