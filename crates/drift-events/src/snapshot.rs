//! State Snapshots
//!
//! Read-only views of a live simulation, handed to rendering front-ends.

use serde::{Deserialize, Serialize};

use crate::{Disposition, DispositionCounts, MoralState};

/// Lifecycle phase of a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    #[default]
    Initialized,
    Running,
    Terminated,
}

/// Creature state as seen by a renderer
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CreatureView {
    pub empathy: f64,
    pub resentment: f64,
    pub moral_state: MoralState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<usize>,
    /// Network id of the last Human interacted with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<u32>,
}

/// A single Human as seen by a renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HumanView {
    pub network_id: u32,
    pub disposition: Disposition,
    pub landmark: usize,
}

/// Full simulation state at a point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub tick: u64,
    pub phase: RunPhase,
    pub creature: CreatureView,
    /// Humans ordered by network id
    pub humans: Vec<HumanView>,
    /// Undirected edges as `(low, high)` id pairs
    pub edges: Vec<(u32, u32)>,
}

impl StateSnapshot {
    pub fn disposition_counts(&self) -> DispositionCounts {
        self.humans.iter().map(|h| h.disposition).collect()
    }
}
