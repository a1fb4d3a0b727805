//! Batch Runner
//!
//! Sweeps a grid of parameter cells, runs independent replicates of each
//! cell and aggregates them. Runs share no mutable state, so they can be
//! spread over a worker pool; results are regrouped per cell afterwards.

pub mod aggregate;

use drift_events::RunRecord;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

use crate::config::{DispositionRatios, ExperimentConfig, SimulationConfig, SweepConfig};
use crate::error::{AggregationError, ConfigError};
use crate::simulation::Simulation;

pub use aggregate::{
    aggregate_runs, CellSummary, MeanDispositions, Moments, TerminalDistribution, TickStatistics,
};

/// Generates the map key of a batch cell.
pub fn generate_cell_id(index: usize) -> String {
    format!("cell_{:04}", index)
}

/// Seed of one replicate, mixed from the batch seed and the run coordinates.
///
/// Uses the splitmix64 finalizer so neighbouring coordinates land far apart.
pub fn derive_seed(base_seed: u64, cell_index: usize, replicate: u32) -> u64 {
    let mut z = base_seed
        ^ (cell_index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ u64::from(replicate).wrapping_mul(0xD1B5_4A32_D192_ED03);
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Coordinates of one cell in the parameter grid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellKey {
    pub index: usize,
    pub disposition_ratios: DispositionRatios,
    pub res_threshold: f64,
    pub emp_threshold: f64,
    pub rewiring_probability: f64,
    pub mean_degree: usize,
    pub broadcasting_enabled: bool,
}

impl CellKey {
    pub fn id(&self) -> String {
        generate_cell_id(self.index)
    }

    /// The base configuration with this cell's coordinates applied
    pub fn apply(&self, base: &SimulationConfig) -> SimulationConfig {
        SimulationConfig {
            initial_disposition_ratios: self.disposition_ratios,
            res_threshold: self.res_threshold,
            emp_threshold: self.emp_threshold,
            rewiring_probability: self.rewiring_probability,
            mean_degree: self.mean_degree,
            broadcasting_enabled: self.broadcasting_enabled,
            ..base.clone()
        }
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (fearful={}, neutral={}, compassionate={}, res_threshold={}, emp_threshold={}, \
             rewiring={}, mean_degree={}, broadcasting={})",
            self.id(),
            self.disposition_ratios.fearful,
            self.disposition_ratios.neutral,
            self.disposition_ratios.compassionate,
            self.res_threshold,
            self.emp_threshold,
            self.rewiring_probability,
            self.mean_degree,
            self.broadcasting_enabled,
        )
    }
}

/// A batch description: base parameters and the axes to sweep
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigSpace {
    pub base: SimulationConfig,
    pub sweep: SweepConfig,
}

impl ConfigSpace {
    pub fn new(base: SimulationConfig, sweep: SweepConfig) -> Self {
        Self { base, sweep }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sweep.replicate_count == 0 {
            return Err(ConfigError::invalid("replicate_count", "must be positive"));
        }
        if self.sweep.worker_threads == 0 {
            return Err(ConfigError::invalid("worker_threads", "must be positive"));
        }
        Ok(())
    }

    /// Every cell of the grid. Empty axes contribute the base value.
    pub fn cells(&self) -> Vec<CellKey> {
        let base = &self.base;
        let mixes = axis(&self.sweep.disposition_mixes, base.initial_disposition_ratios);
        let thresholds = axis(
            &self
                .sweep
                .threshold_pairs
                .iter()
                .map(|p| (p.res_threshold, p.emp_threshold))
                .collect::<Vec<_>>(),
            (base.res_threshold, base.emp_threshold),
        );
        let rewirings = axis(&self.sweep.rewiring_probabilities, base.rewiring_probability);
        let degrees = axis(&self.sweep.mean_degrees, base.mean_degree);
        let broadcasting = axis(&self.sweep.broadcasting, base.broadcasting_enabled);

        let mut cells = Vec::new();
        for &disposition_ratios in &mixes {
            for &(res_threshold, emp_threshold) in &thresholds {
                for &rewiring_probability in &rewirings {
                    for &mean_degree in &degrees {
                        for &broadcasting_enabled in &broadcasting {
                            cells.push(CellKey {
                                index: cells.len(),
                                disposition_ratios,
                                res_threshold,
                                emp_threshold,
                                rewiring_probability,
                                mean_degree,
                                broadcasting_enabled,
                            });
                        }
                    }
                }
            }
        }
        cells
    }
}

impl From<ExperimentConfig> for ConfigSpace {
    fn from(config: ExperimentConfig) -> Self {
        Self::new(config.simulation, config.sweep)
    }
}

fn axis<T: Copy>(values: &[T], base: T) -> Vec<T> {
    if values.is_empty() {
        vec![base]
    } else {
        values.to_vec()
    }
}

/// Health of a batch cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CellStatus {
    /// Every replicate completed
    Complete,
    /// Some replicates failed; statistics cover the rest
    Degraded,
    /// No replicate completed
    Failed,
}

/// A replicate that could not run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunFailure {
    pub replicate: u32,
    pub seed: u64,
    pub cause: ConfigError,
}

/// Outcome of one batch cell
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellReport {
    pub key: CellKey,
    pub status: CellStatus,
    pub successful_runs: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<RunFailure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<CellSummary>,
    /// Full time series of the successful runs, in replicate order
    #[serde(skip)]
    pub records: Vec<RunRecord>,
}

impl CellReport {
    fn new(key: CellKey, records: Vec<RunRecord>, failures: Vec<RunFailure>) -> Self {
        let status = match (records.is_empty(), failures.is_empty()) {
            (_, true) => CellStatus::Complete,
            (false, false) => CellStatus::Degraded,
            (true, false) => CellStatus::Failed,
        };
        Self {
            status,
            successful_runs: records.len(),
            summary: aggregate_runs(&records),
            key,
            failures,
            records,
        }
    }

    /// The aggregation error of a cell with no successful runs
    pub fn error(&self) -> Option<AggregationError> {
        if self.status != CellStatus::Failed {
            return None;
        }
        self.failures.first().map(|failure| AggregationError {
            cell: self.key.clone(),
            cause: failure.cause.clone(),
        })
    }
}

/// Results of a batch sweep, keyed by cell id
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedResults {
    pub batch_id: Uuid,
    pub base_seed: u64,
    pub replicate_count: u32,
    pub cells: BTreeMap<String, CellReport>,
}

impl AggregatedResults {
    pub fn get(&self, cell_id: &str) -> Option<&CellReport> {
        self.cells.get(cell_id)
    }

    /// Errors of every cell in which no run completed
    pub fn failed_cells(&self) -> Vec<AggregationError> {
        self.cells.values().filter_map(CellReport::error).collect()
    }

    pub fn is_complete(&self) -> bool {
        self.cells
            .values()
            .all(|cell| cell.status == CellStatus::Complete)
    }
}

struct Job {
    cell: usize,
    replicate: u32,
    seed: u64,
    config: SimulationConfig,
}

struct JobOutcome {
    cell: usize,
    replicate: u32,
    seed: u64,
    result: Result<RunRecord, ConfigError>,
}

fn execute(job: Job) -> JobOutcome {
    let result = Simulation::with_seed(&job.config, job.seed).map(Simulation::run_to_completion);
    JobOutcome {
        cell: job.cell,
        replicate: job.replicate,
        seed: job.seed,
        result,
    }
}

/// Run every cell x replicate of `space` and aggregate per cell.
///
/// A cell whose runs fail does not stop the others; it is reported as
/// degraded or failed. Only an invalid sweep description fails the batch.
pub fn run_batch(space: &ConfigSpace) -> Result<AggregatedResults, ConfigError> {
    space.validate()?;

    let base_seed = space.base.random_seed.unwrap_or_else(rand::random);
    let replicate_count = space.sweep.replicate_count;
    let cells = space.cells();

    let jobs: Vec<Job> = cells
        .iter()
        .flat_map(|key| {
            let config = key.apply(&space.base);
            (0..replicate_count).map(move |replicate| Job {
                cell: key.index,
                replicate,
                seed: derive_seed(base_seed, key.index, replicate),
                config: config.clone(),
            })
        })
        .collect();

    tracing::info!(
        cells = cells.len(),
        runs = jobs.len(),
        base_seed,
        worker_threads = space.sweep.worker_threads,
        "Starting batch"
    );

    let mut outcomes = run_jobs(jobs, space.sweep.worker_threads);
    outcomes.sort_by_key(|o| (o.cell, o.replicate));

    let mut grouped: Vec<(Vec<RunRecord>, Vec<RunFailure>)> =
        cells.iter().map(|_| (Vec::new(), Vec::new())).collect();
    for outcome in outcomes {
        let (records, failures) = &mut grouped[outcome.cell];
        match outcome.result {
            Ok(record) => records.push(record),
            Err(cause) => failures.push(RunFailure {
                replicate: outcome.replicate,
                seed: outcome.seed,
                cause,
            }),
        }
    }

    let mut reports = BTreeMap::new();
    for (key, (records, failures)) in cells.into_iter().zip(grouped) {
        let report = CellReport::new(key, records, failures);
        match report.status {
            CellStatus::Complete => {}
            CellStatus::Degraded => tracing::warn!(
                cell = %report.key,
                failed = report.failures.len(),
                "Batch cell degraded"
            ),
            CellStatus::Failed => {
                if let Some(err) = report.error() {
                    tracing::error!("{}", err);
                }
            }
        }
        reports.insert(report.key.id(), report);
    }

    let results = AggregatedResults {
        batch_id: Uuid::new_v4(),
        base_seed,
        replicate_count,
        cells: reports,
    };
    tracing::info!(
        batch_id = %results.batch_id,
        failed_cells = results.failed_cells().len(),
        "Batch complete"
    );
    Ok(results)
}

fn run_jobs(jobs: Vec<Job>, worker_threads: usize) -> Vec<JobOutcome> {
    if worker_threads <= 1 || jobs.len() <= 1 {
        return jobs.into_iter().map(execute).collect();
    }

    match rayon::ThreadPoolBuilder::new()
        .num_threads(worker_threads)
        .build()
    {
        Ok(pool) => pool.install(|| jobs.into_par_iter().map(execute).collect()),
        Err(e) => {
            tracing::warn!("Could not build worker pool, running sequentially: {}", e);
            jobs.into_iter().map(execute).collect()
        }
    }
}
