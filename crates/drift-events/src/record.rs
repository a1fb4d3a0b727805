//! Run Records
//!
//! Per-tick snapshots and the append-only time series of a single run.

use serde::{Deserialize, Serialize};

use crate::{Disposition, MoralState};

/// Result of the Creature's attempt to interact during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionOutcome {
    Accepted,
    Rejected,
    /// No Human was in range, emotions untouched
    NoOp,
}

/// The interaction resolved during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    pub outcome: InteractionOutcome,
    /// Network id of the Human met, absent for no-ops
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<u32>,
}

impl Interaction {
    pub fn with(target: u32, outcome: InteractionOutcome) -> Self {
        Self {
            outcome,
            target: Some(target),
        }
    }

    pub fn no_op() -> Self {
        Self {
            outcome: InteractionOutcome::NoOp,
            target: None,
        }
    }

    pub fn is_no_op(&self) -> bool {
        self.outcome == InteractionOutcome::NoOp
    }
}

/// Number of Humans holding each disposition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DispositionCounts {
    pub fearful: u32,
    pub neutral: u32,
    pub compassionate: u32,
}

impl DispositionCounts {
    pub fn get(&self, disposition: Disposition) -> u32 {
        match disposition {
            Disposition::Fearful => self.fearful,
            Disposition::Neutral => self.neutral,
            Disposition::Compassionate => self.compassionate,
        }
    }

    pub fn increment(&mut self, disposition: Disposition) {
        match disposition {
            Disposition::Fearful => self.fearful += 1,
            Disposition::Neutral => self.neutral += 1,
            Disposition::Compassionate => self.compassionate += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.fearful + self.neutral + self.compassionate
    }

    /// Net trust balance of the population
    pub fn compassionate_minus_fearful(&self) -> i64 {
        i64::from(self.compassionate) - i64::from(self.fearful)
    }
}

impl FromIterator<Disposition> for DispositionCounts {
    fn from_iter<I: IntoIterator<Item = Disposition>>(iter: I) -> Self {
        let mut counts = Self::default();
        for disposition in iter {
            counts.increment(disposition);
        }
        counts
    }
}

/// State recorded at the end of one tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickSnapshot {
    pub tick: u64,
    pub empathy: f64,
    pub resentment: f64,
    pub moral_state: MoralState,
    pub dispositions: DispositionCounts,
    pub interaction: Interaction,
    /// Landmark the Creature stood at (spatial selection only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<usize>,
}

/// Why a run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    MaxTicks,
    /// The Creature stayed vengeful for the configured number of ticks
    VengefulStreak,
    Cancelled,
}

/// Complete time series of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    /// Seed the run's random source was built from
    pub seed: u64,
    pub termination: TerminationReason,
    pub snapshots: Vec<TickSnapshot>,
}

impl RunRecord {
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn last(&self) -> Option<&TickSnapshot> {
        self.snapshots.last()
    }

    /// Moral state at the final recorded tick
    pub fn terminal_state(&self) -> Option<MoralState> {
        self.last().map(|s| s.moral_state)
    }

    /// First tick at which the Creature was vengeful
    pub fn first_vengeful_tick(&self) -> Option<u64> {
        self.snapshots
            .iter()
            .find(|s| s.moral_state == MoralState::Vengeful)
            .map(|s| s.tick)
    }

    /// Number of ticks where no Human was in range
    pub fn no_op_count(&self) -> usize {
        self.snapshots
            .iter()
            .filter(|s| s.interaction.is_no_op())
            .count()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(tick: u64, moral_state: MoralState, interaction: Interaction) -> TickSnapshot {
        TickSnapshot {
            tick,
            empathy: 5.0,
            resentment: 5.0,
            moral_state,
            dispositions: DispositionCounts::default(),
            interaction,
            location: None,
        }
    }

    #[test]
    fn test_counts_from_iter() {
        let counts: DispositionCounts = [
            Disposition::Fearful,
            Disposition::Fearful,
            Disposition::Compassionate,
        ]
        .into_iter()
        .collect();

        assert_eq!(counts.fearful, 2);
        assert_eq!(counts.neutral, 0);
        assert_eq!(counts.total(), 3);
        assert_eq!(counts.compassionate_minus_fearful(), -1);
    }

    #[test]
    fn test_run_record_queries() {
        let record = RunRecord {
            seed: 7,
            termination: TerminationReason::MaxTicks,
            snapshots: vec![
                snapshot(0, MoralState::Peaceful, Interaction::no_op()),
                snapshot(1, MoralState::Vengeful, Interaction::with(3, InteractionOutcome::Rejected)),
                snapshot(2, MoralState::Vengeful, Interaction::no_op()),
            ],
        };

        assert_eq!(record.len(), 3);
        assert_eq!(record.terminal_state(), Some(MoralState::Vengeful));
        assert_eq!(record.first_vengeful_tick(), Some(1));
        assert_eq!(record.no_op_count(), 2);
    }

    #[test]
    fn test_no_op_omits_target() {
        let json = serde_json::to_string(&Interaction::no_op()).unwrap();
        assert_eq!(json, r#"{"outcome":"no_op"}"#);
    }
}
