//! Run Resources
//!
//! Clock state, registries and per-tick bookkeeping for one run's world.

use bevy_ecs::prelude::*;
use drift_events::{Interaction, MoralState, RunPhase, TerminationReason, TickSnapshot};

use crate::config::{SelectionMode, SimulationConfig};

/// Resource: simulation clock and termination policy
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct SimulationState {
    pub current_tick: u64,
    pub max_ticks: u64,
    pub phase: RunPhase,
    /// Consecutive ticks ending in the vengeful state
    pub vengeful_streak: u64,
    pub vengeful_stop_after: Option<u64>,
    pub termination: Option<TerminationReason>,
}

impl SimulationState {
    pub fn new(max_ticks: u64, vengeful_stop_after: Option<u64>) -> Self {
        Self {
            current_tick: 0,
            max_ticks,
            phase: RunPhase::Initialized,
            vengeful_streak: 0,
            vengeful_stop_after,
            termination: None,
        }
    }

    pub fn is_terminated(&self) -> bool {
        self.phase == RunPhase::Terminated
    }

    pub fn terminate(&mut self, reason: TerminationReason) {
        self.phase = RunPhase::Terminated;
        self.termination = Some(reason);
    }

    /// Close the current tick given the Creature's state at its end.
    pub fn advance(&mut self, moral_state: MoralState) {
        self.current_tick += 1;
        if moral_state == MoralState::Vengeful {
            self.vengeful_streak += 1;
        } else {
            self.vengeful_streak = 0;
        }

        if self
            .vengeful_stop_after
            .is_some_and(|limit| self.vengeful_streak >= limit)
        {
            self.terminate(TerminationReason::VengefulStreak);
        } else if self.current_tick >= self.max_ticks {
            self.terminate(TerminationReason::MaxTicks);
        }
    }
}

/// Resource: Human entities indexed by network id
#[derive(Resource, Debug, Clone, Default)]
pub struct HumanIndex {
    entities: Vec<Entity>,
}

impl HumanIndex {
    pub fn new(entities: Vec<Entity>) -> Self {
        Self { entities }
    }

    pub fn get(&self, network_id: u32) -> Option<Entity> {
        self.entities.get(network_id as usize).copied()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }
}

/// Resource: network ids of the Humans standing at each landmark
#[derive(Resource, Debug, Clone, Default)]
pub struct LandmarkOccupancy {
    by_landmark: Vec<Vec<u32>>,
}

impl LandmarkOccupancy {
    pub fn new(landmark_count: usize) -> Self {
        Self {
            by_landmark: vec![Vec::new(); landmark_count],
        }
    }

    pub fn place(&mut self, landmark: usize, network_id: u32) {
        if let Some(occupants) = self.by_landmark.get_mut(landmark) {
            occupants.push(network_id);
        }
    }

    pub fn humans_at(&self, landmark: usize) -> &[u32] {
        self.by_landmark
            .get(landmark)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn landmark_count(&self) -> usize {
        self.by_landmark.len()
    }
}

/// Resource: how the interaction target is chosen
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionSettings {
    pub mode: SelectionMode,
    pub landmark_count: usize,
}

impl InteractionSettings {
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            mode: config.selection_mode,
            landmark_count: config.landmark_count,
        }
    }
}

/// Resource: trust broadcasting switch and strength
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct DiffusionSettings {
    pub enabled: bool,
    pub influence_probability: f64,
}

impl DiffusionSettings {
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            enabled: config.broadcasting_enabled,
            influence_probability: config.influence_probability,
        }
    }
}

/// Resource: the interaction resolved during the current tick
#[derive(Resource, Debug, Clone, Copy)]
pub struct TickOutcome(pub Interaction);

impl Default for TickOutcome {
    fn default() -> Self {
        Self(Interaction::no_op())
    }
}

/// Resource: append-only snapshot log of the run
#[derive(Resource, Debug, Clone, Default)]
pub struct RunLog {
    pub snapshots: Vec<TickSnapshot>,
}

impl RunLog {
    pub fn push(&mut self, snapshot: TickSnapshot) {
        self.snapshots.push(snapshot);
    }

    pub fn last(&self) -> Option<&TickSnapshot> {
        self.snapshots.last()
    }
}
