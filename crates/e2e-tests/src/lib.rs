//! End-to-end test infrastructure for index-sync.
//!
//! Provides a shared TestHarness and a deterministic sample-record builder
//! for tests covering the full clear/update/rebuild command surface.

use std::path::PathBuf;

use chrono::{Days, Duration, NaiveDate, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;

use sync_engine::Coordinator;
use sync_index::{IndexStore, IndexStoreConfig};
use sync_types::{FieldValue, MemoryRecordSource, Pk, Record};

/// Shared test harness.
///
/// Owns the temp directory holding the index for the lifetime of a test.
pub struct TestHarness {
    /// Keeps the temp dir alive for the lifetime of the harness
    pub _temp_dir: tempfile::TempDir,
    /// Path of the index directory
    pub index_path: PathBuf,
}

impl TestHarness {
    /// Create a new harness with a fresh index directory.
    pub fn new() -> Self {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let index_path = temp_dir.path().join("index");

        Self {
            _temp_dir: temp_dir,
            index_path,
        }
    }

    /// Open the index store at the harness path.
    pub fn store(&self) -> IndexStore {
        IndexStore::open_or_create(IndexStoreConfig::new(&self.index_path))
            .expect("Failed to open index store")
    }

    /// Build a coordinator over `count` seeded sample records.
    pub fn coordinator(&self, count: u64, seed: u64) -> Coordinator<MemoryRecordSource> {
        Coordinator::new(sample_source(count, seed), self.store())
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Build one sample record.
///
/// Mirrors a typical blog-entry fixture: string, url, boolean parity,
/// integer multiple, random float, fixed decimal, descending datetime,
/// ascending date. The RNG is injected so fixtures stay deterministic.
pub fn sample_record(pk: Pk, rng: &mut StdRng) -> Record {
    let datetime = Utc.with_ymd_and_hms(2009, 2, 25, 1, 1, 1).unwrap() - Duration::seconds(pk as i64);
    let date = NaiveDate::from_ymd_opt(2009, 2, 23).unwrap() + Days::new(pk);

    Record::new(pk)
        .with_field("author", FieldValue::Text(format!("david{}", pk)))
        .with_field("url", FieldValue::Text(format!("http://example.com/{}/", pk)))
        .with_field("boolean", FieldValue::Bool(pk % 2 == 1))
        .with_field("number", FieldValue::Integer(pk as i64 * 5))
        .with_field(
            "float_number",
            FieldValue::Float(rng.random_range(0.0..1000.0)),
        )
        .with_field("decimal_number", FieldValue::Decimal(Decimal::new(2234, 2)))
        .with_field("datetime", FieldValue::DateTime(datetime))
        .with_field("date", FieldValue::Date(date))
}

/// Build an in-memory source holding records with keys `1..=count`.
pub fn sample_source(count: u64, seed: u64) -> MemoryRecordSource {
    let mut rng = StdRng::seed_from_u64(seed);
    MemoryRecordSource::from_records((1..=count).map(|pk| sample_record(pk, &mut rng)))
}
