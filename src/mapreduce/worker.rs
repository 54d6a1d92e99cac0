//! Worker role: scan one shard and return its partial count
//!
//! A worker blocks until the coordinator hands it a [`WorkerAssignment`],
//! then reads only the lines of its shard. It shares nothing mutable with
//! other workers; the grid index and language table it receives are
//! read-only.

use super::aggregation::{Event, PartialAggregator, PartialCount, ShardStats};
use super::planning::Shard;
use crate::error::{common, ErrorCode, GeoTallyError, Result};
use crate::grid::GridIndex;
use crate::ingest::{EventParser, LineOutcome, UnusableReason};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

/// Everything a worker needs to process its shard
#[derive(Debug, Clone)]
pub struct WorkerAssignment {
    pub shard: Shard,
    pub events_path: PathBuf,
    pub grid: Arc<GridIndex>,
    pub parser: EventParser,
}

/// What a worker sends back at the gather barrier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkerResult {
    pub worker: usize,
    pub partial: PartialCount,
    pub stats: ShardStats,
}

#[derive(Debug, Clone, Copy)]
pub struct Worker {
    id: usize,
}

impl Worker {
    pub fn new(id: usize) -> Self {
        Self { id }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Wait for an assignment, then execute it
    pub async fn run(self, mut assignments: mpsc::Receiver<WorkerAssignment>) -> Result<WorkerResult> {
        let assignment = assignments.recv().await.ok_or_else(|| {
            GeoTallyError::execution_with_code(
                ErrorCode::EXEC_CHANNEL_CLOSED,
                "coordinator closed the channel before sending an assignment",
                Some(self.id),
            )
        })?;
        self.execute(assignment).await
    }

    /// Scan the assigned shard of the event file
    pub async fn execute(&self, assignment: WorkerAssignment) -> Result<WorkerResult> {
        let WorkerAssignment {
            shard,
            events_path,
            grid,
            parser,
        } = assignment;

        info!(
            "Worker {}: start at line {}, {} lines",
            self.id, shard.start_line, shard.line_count
        );

        let mut aggregator = PartialAggregator::new();
        if shard.is_empty() {
            return Ok(self.finish(aggregator));
        }

        let file = File::open(&events_path)
            .await
            .map_err(|e| common::read_failed(&events_path, e))?;
        let mut segments = BufReader::new(file).split(b'\n');
        let mut line_no = 0;

        while let Some(bytes) = segments
            .next_segment()
            .await
            .map_err(|e| common::read_failed(&events_path, e))?
        {
            line_no += 1;
            if line_no < shard.start_line {
                continue;
            }
            if line_no >= shard.end_line() {
                break;
            }

            aggregator.line_scanned();
            match String::from_utf8(bytes) {
                Ok(line) => scan_line(&mut aggregator, &grid, &parser, line_no, &line)?,
                Err(e) => {
                    debug!("Worker {}: line {} is not UTF-8: {}", self.id, line_no, e);
                    aggregator.malformed();
                }
            }
        }

        let last_line = shard.end_line() - 1;
        if line_no < last_line {
            warn!(
                "Worker {}: event file ended at line {}, shard expected lines up to {}",
                self.id, line_no, last_line
            );
        }

        Ok(self.finish(aggregator))
    }

    fn finish(&self, aggregator: PartialAggregator) -> WorkerResult {
        let (partial, stats) = aggregator.finish();
        info!(
            "Worker {}: {} lines scanned, {} events counted, {} discarded",
            self.id,
            stats.lines_scanned,
            stats.events,
            stats.discarded()
        );
        WorkerResult {
            worker: self.id,
            partial,
            stats,
        }
    }
}

/// Parse, classify and count one line
///
/// Line-level problems are recorded in the aggregator's stats; only
/// unrecoverable errors are returned.
pub fn scan_line(
    aggregator: &mut PartialAggregator,
    grid: &GridIndex,
    parser: &EventParser,
    line_no: usize,
    line: &str,
) -> Result<()> {
    let record = match parser.parse(line_no, line) {
        Ok(LineOutcome::Usable(record)) => record,
        Ok(LineOutcome::Unusable(reason)) => {
            aggregator.reject(reason);
            return Ok(());
        }
        Err(e) if e.is_recoverable() => {
            warn!("Skipping line: {}", e);
            aggregator.malformed();
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    match grid.locate(record.point) {
        Some(cell) => aggregator.accept(&Event {
            language: record.language,
            cell: cell.to_string(),
        }),
        None => {
            trace!("Line {}: point {} outside the grid", line_no, record.point);
            aggregator.reject(UnusableReason::UnclassifiablePoint);
        }
    }
    Ok(())
}
