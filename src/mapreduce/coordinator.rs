//! Coordinator role: plan the run, scatter assignments, gather partials
//!
//! All configuration-phase work (grid, language table, header, shard plan)
//! happens here before any worker is started, so a configuration error
//! aborts the run without scanning a single data line.

use super::aggregation::ShardStats;
use super::planning::{plan_shards, ShardPlan};
use super::reducer::{reduce_and_rank, Report};
use super::worker::{Worker, WorkerAssignment, WorkerResult};
use crate::config::RunConfig;
use crate::error::{ErrorCode, GeoTallyError, Result};
use crate::grid::{GridBuilder, GridIndex};
use crate::ingest::{read_total_rows, EventParser, LanguageTable};
use futures::future::join_all;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Everything decided before scanning starts
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub events_path: PathBuf,
    pub shards: ShardPlan,
    pub grid: Arc<GridIndex>,
    pub languages: Arc<LanguageTable>,
    pub undefined_language: String,
}

impl RunPlan {
    /// One assignment per shard, in worker order
    pub fn assignments(&self) -> Vec<WorkerAssignment> {
        let parser = EventParser::new(self.languages.clone(), self.undefined_language.clone());
        self.shards
            .shards
            .iter()
            .map(|shard| WorkerAssignment {
                shard: *shard,
                events_path: self.events_path.clone(),
                grid: self.grid.clone(),
                parser: parser.clone(),
            })
            .collect()
    }
}

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub report: Report,
    pub stats: ShardStats,
    pub worker_stats: Vec<ShardStats>,
    pub elapsed: Duration,
}

pub struct Coordinator {
    config: RunConfig,
}

impl Coordinator {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Load the grid, language table and header, and split the lines
    pub async fn plan(&self) -> Result<RunPlan> {
        self.config.validate()?;

        let grid = GridBuilder::load(&self.config.grid)?;
        let languages = LanguageTable::load(&self.config.languages)?;
        let total_rows = read_total_rows(&self.config.events).await?;
        let shards = plan_shards(total_rows, self.config.workers)?;

        info!(
            "Planned {} rows across {} workers over {} cells",
            total_rows,
            shards.worker_count(),
            grid.len()
        );

        Ok(RunPlan {
            events_path: self.config.events.clone(),
            shards,
            grid: Arc::new(grid),
            languages: Arc::new(languages),
            undefined_language: self.config.undefined_language.clone(),
        })
    }

    /// Start every worker, hand out assignments, then collect all results
    pub async fn execute(&self, plan: RunPlan) -> Result<RunOutcome> {
        let start = Instant::now();
        let assignments = plan.assignments();

        let mut senders = Vec::with_capacity(assignments.len());
        let mut handles: Vec<JoinHandle<Result<WorkerResult>>> =
            Vec::with_capacity(assignments.len());
        for shard in &plan.shards.shards {
            let (tx, rx) = mpsc::channel(1);
            senders.push(tx);
            handles.push(tokio::spawn(Worker::new(shard.worker).run(rx)));
        }

        // scatter
        for (worker, (tx, assignment)) in senders.into_iter().zip(assignments).enumerate() {
            debug!(
                "Sending shard starting at line {} to worker {}",
                assignment.shard.start_line, worker
            );
            tx.send(assignment).await.map_err(|_| {
                GeoTallyError::execution_with_code(
                    ErrorCode::EXEC_CHANNEL_CLOSED,
                    "worker stopped before receiving its assignment",
                    Some(worker),
                )
            })?;
        }

        // gather
        let results = join_all(handles)
            .await
            .into_iter()
            .enumerate()
            .map(|(worker, joined)| joined.map_err(|e| join_error(worker, e)).and_then(|r| r))
            .collect::<Result<Vec<_>>>()?;
        info!("Gathered partial counts from {} workers", results.len());

        Ok(self.reduce(&plan, results, start.elapsed()))
    }

    /// Plan and execute in one step
    pub async fn run(&self) -> Result<RunOutcome> {
        let plan = self.plan().await?;
        self.execute(plan).await
    }

    fn reduce(&self, plan: &RunPlan, results: Vec<WorkerResult>, elapsed: Duration) -> RunOutcome {
        let mut stats = ShardStats::default();
        let mut worker_stats = Vec::with_capacity(results.len());
        let mut partials = Vec::with_capacity(results.len());
        for result in results {
            stats.merge(&result.stats);
            worker_stats.push(result.stats);
            partials.push(result.partial);
        }

        let report = reduce_and_rank(partials, plan.grid.cell_ids());
        info!(
            "Counted {} events from {} lines ({} discarded, {} malformed) in {:.3}s",
            stats.events,
            stats.lines_scanned,
            stats.discarded(),
            stats.malformed_lines,
            elapsed.as_secs_f64()
        );

        RunOutcome {
            report,
            stats,
            worker_stats,
            elapsed,
        }
    }
}

fn join_error(worker: usize, err: tokio::task::JoinError) -> GeoTallyError {
    let code = if err.is_panic() {
        ErrorCode::EXEC_WORKER_PANICKED
    } else {
        ErrorCode::EXEC_WORKER_CANCELLED
    };
    GeoTallyError::execution_with_code(code, err.to_string(), Some(worker))
}
