//! # sync-engine
//!
//! Write-side synchronization engine keeping a search index consistent with
//! a source-of-truth record store.
//!
//! ## Key components
//!
//! - [`plan`]: partitions the key set into fixed-size batches
//! - [`run_batch`]: applies one batch of records through the writer session
//! - [`Coordinator`]: orchestrates clear, incremental update, stale-key
//!   removal, and full rebuild over a fixed pool of workers
//! - [`commands`]: the `clear` / `update` / `rebuild` command surface
//!
//! ## Concurrency contract
//!
//! Workers pull batches from a shared cursor and funnel writes through one
//! shared writer session, so the single-writer index lock is taken once per
//! job and contention never surfaces to the caller. Worker counts 1 and N
//! produce identical final index content; parallelism is never observable
//! in the result.

pub mod commands;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod planner;
pub mod progress;
pub mod worker;

pub use commands::{clear_index, rebuild_index, update_index, CommandStatus};
pub use config::SyncOptions;
pub use coordinator::{Coordinator, SyncPhase, SyncReport};
pub use error::SyncError;
pub use planner::{plan, Batch};
pub use progress::{LoggingProgressCallback, NoOpProgressCallback, ProgressCallback, SyncProgress};
pub use worker::{run_batch, BatchOutcome, RecordFailure};
