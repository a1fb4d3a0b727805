//! Run Aggregation
//!
//! Reduces the records of one batch cell into trajectory and terminal
//! statistics. Values are sorted before summation, so the result does not
//! depend on the order in which runs finished.

use drift_events::{MoralState, RunRecord};
use serde::{Deserialize, Serialize};

/// Mean and population variance of a sample
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Moments {
    pub mean: f64,
    pub variance: f64,
}

impl Moments {
    /// Moments of `values`, reduced in ascending order. Empty input yields zeros.
    pub fn from_values(mut values: Vec<f64>) -> Self {
        if values.is_empty() {
            return Self::default();
        }
        values.sort_by(f64::total_cmp);

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Self { mean, variance }
    }
}

/// Mean Humans per disposition at one tick
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MeanDispositions {
    pub fearful: f64,
    pub neutral: f64,
    pub compassionate: f64,
}

impl MeanDispositions {
    pub fn compassionate_minus_fearful(&self) -> f64 {
        self.compassionate - self.fearful
    }
}

/// Cross-run statistics for one tick index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickStatistics {
    pub tick: u64,
    pub empathy: Moments,
    pub resentment: Moments,
    /// Mean of the moral-state ordinal (0 peaceful, 1 cautious, 2 vengeful)
    pub mean_moral_state: f64,
    pub mean_dispositions: MeanDispositions,
}

/// How many runs ended in each moral state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TerminalDistribution {
    pub peaceful: usize,
    pub cautious: usize,
    pub vengeful: usize,
}

impl TerminalDistribution {
    pub fn record(&mut self, state: MoralState) {
        match state {
            MoralState::Peaceful => self.peaceful += 1,
            MoralState::Cautious => self.cautious += 1,
            MoralState::Vengeful => self.vengeful += 1,
        }
    }

    pub fn count(&self, state: MoralState) -> usize {
        match state {
            MoralState::Peaceful => self.peaceful,
            MoralState::Cautious => self.cautious,
            MoralState::Vengeful => self.vengeful,
        }
    }

    pub fn total(&self) -> usize {
        self.peaceful + self.cautious + self.vengeful
    }

    /// Share of runs ending in `state`; zero when no runs were recorded
    pub fn fraction(&self, state: MoralState) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.count(state) as f64 / total as f64,
        }
    }
}

/// Aggregated statistics of one batch cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellSummary {
    pub runs: usize,
    /// Length of the shortest run; trajectories are truncated to it
    pub aligned_ticks: usize,
    pub trajectory: Vec<TickStatistics>,
    pub terminal_states: TerminalDistribution,
    pub terminal_empathy: Moments,
    pub terminal_resentment: Moments,
    /// Runs that were vengeful at least once
    pub vengeful_runs: usize,
    /// Mean first vengeful tick over the runs that got there
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mean_first_vengeful_tick: Option<f64>,
}

/// Aggregate the successful runs of one cell. Returns `None` for no runs.
pub fn aggregate_runs(records: &[RunRecord]) -> Option<CellSummary> {
    if records.is_empty() {
        return None;
    }

    let runs = records.len();
    let aligned_ticks = records.iter().map(RunRecord::len).min().unwrap_or(0);
    let trajectory = (0..aligned_ticks)
        .map(|t| tick_statistics(records, t))
        .collect();

    let mut terminal_states = TerminalDistribution::default();
    let mut terminal_empathy = Vec::with_capacity(runs);
    let mut terminal_resentment = Vec::with_capacity(runs);
    for last in records.iter().filter_map(RunRecord::last) {
        terminal_states.record(last.moral_state);
        terminal_empathy.push(last.empathy);
        terminal_resentment.push(last.resentment);
    }

    let first_vengeful: Vec<u64> = records
        .iter()
        .filter_map(RunRecord::first_vengeful_tick)
        .collect();
    let vengeful_runs = first_vengeful.len();
    let mean_first_vengeful_tick = if first_vengeful.is_empty() {
        None
    } else {
        Some(first_vengeful.iter().sum::<u64>() as f64 / vengeful_runs as f64)
    };

    Some(CellSummary {
        runs,
        aligned_ticks,
        trajectory,
        terminal_states,
        terminal_empathy: Moments::from_values(terminal_empathy),
        terminal_resentment: Moments::from_values(terminal_resentment),
        vengeful_runs,
        mean_first_vengeful_tick,
    })
}

fn tick_statistics(records: &[RunRecord], t: usize) -> TickStatistics {
    let n = records.len() as f64;
    let snapshots = records.iter().map(|r| &r.snapshots[t]);

    let empathy = Moments::from_values(snapshots.clone().map(|s| s.empathy).collect());
    let resentment = Moments::from_values(snapshots.clone().map(|s| s.resentment).collect());

    // Integer sums are exact, hence order-independent
    let state_sum: u64 = snapshots.clone().map(|s| u64::from(s.moral_state.ordinal())).sum();
    let (fearful, neutral, compassionate) = snapshots.fold((0u64, 0u64, 0u64), |acc, s| {
        (
            acc.0 + u64::from(s.dispositions.fearful),
            acc.1 + u64::from(s.dispositions.neutral),
            acc.2 + u64::from(s.dispositions.compassionate),
        )
    });

    TickStatistics {
        tick: t as u64,
        empathy,
        resentment,
        mean_moral_state: state_sum as f64 / n,
        mean_dispositions: MeanDispositions {
            fearful: fearful as f64 / n,
            neutral: neutral as f64 / n,
            compassionate: compassionate as f64 / n,
        },
    }
}
