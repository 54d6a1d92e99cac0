//! Pure shard planning
//!
//! These functions split the data lines of the event file among a fixed
//! number of workers without any I/O.

use crate::error::{ErrorCode, GeoTallyError, Result};
use serde::{Deserialize, Serialize};

/// Line 1 holds the header; data starts on line 2
pub const FIRST_DATA_LINE: usize = 2;

/// Contiguous range of 1-based line numbers owned by one worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shard {
    pub worker: usize,
    pub start_line: usize,
    pub line_count: usize,
}

impl Shard {
    /// One past the last line of the shard
    pub fn end_line(&self) -> usize {
        self.start_line + self.line_count
    }

    pub fn contains(&self, line: usize) -> bool {
        (self.start_line..self.end_line()).contains(&line)
    }

    pub fn is_empty(&self) -> bool {
        self.line_count == 0
    }
}

/// One shard per worker, in worker order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardPlan {
    pub total_rows: usize,
    pub shards: Vec<Shard>,
}

impl ShardPlan {
    pub fn worker_count(&self) -> usize {
        self.shards.len()
    }
}

/// Split `[2, total_rows + 1]` into `workers` contiguous shards
///
/// Every worker gets `total_rows / workers` lines and the first
/// `total_rows % workers` workers get one more, so sizes differ by at most
/// one with the larger shards first. When `total_rows < workers` the
/// trailing workers receive empty shards.
///
/// Fails when `workers` is zero or when the last line number,
/// `total_rows + 1`, does not fit in a `usize`.
///
/// # Examples
///
/// ```
/// use geotally::mapreduce::planning::plan_shards;
///
/// let plan = plan_shards(10, 3).unwrap();
/// let sizes: Vec<_> = plan.shards.iter().map(|s| s.line_count).collect();
/// assert_eq!(sizes, vec![4, 3, 3]);
/// assert_eq!(plan.shards[1].start_line, 6);
/// ```
pub fn plan_shards(total_rows: usize, workers: usize) -> Result<ShardPlan> {
    if workers == 0 {
        return Err(GeoTallyError::config_with_code(
            ErrorCode::CONFIG_NO_WORKERS,
            "worker count must be at least 1",
        ));
    }

    if total_rows.checked_add(FIRST_DATA_LINE).is_none() {
        return Err(GeoTallyError::config_with_code(
            ErrorCode::CONFIG_INVALID_VALUE,
            format!("total_rows {} exceeds the addressable line range", total_rows),
        ));
    }

    let base = total_rows / workers;
    let remainder = total_rows % workers;
    let mut start_line = FIRST_DATA_LINE;

    let shards = (0..workers)
        .map(|worker| {
            let line_count = base + usize::from(worker < remainder);
            let shard = Shard {
                worker,
                start_line,
                line_count,
            };
            start_line += line_count;
            shard
        })
        .collect();

    Ok(ShardPlan { total_rows, shards })
}

/// Default worker count: the machine's available parallelism
pub fn default_worker_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
