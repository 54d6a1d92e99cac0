//! Static partitioning, per-worker aggregation and reduction
//!
//! The coordinator splits the event file's data lines into one contiguous
//! shard per worker, hands each worker its shard together with read-only
//! handles to the grid and language table, and reduces the partial counts
//! the workers send back into a single ranked [`Report`].

pub mod aggregation;
pub mod coordinator;
pub mod planning;
pub mod reducer;
pub mod worker;

pub use aggregation::{Event, PartialAggregator, PartialCount, ShardStats};
pub use coordinator::{Coordinator, RunOutcome, RunPlan};
pub use planning::{plan_shards, Shard, ShardPlan};
pub use reducer::{reduce_and_rank, CellReport, LanguageCount, Report};
pub use worker::{Worker, WorkerAssignment, WorkerResult};
