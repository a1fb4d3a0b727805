//! Simulation Driver
//!
//! Owns one run's ECS world and schedule. Each run gets its own world and
//! random source, so runs never share mutable state.

use bevy_ecs::prelude::*;
use bevy_ecs::schedule::ExecutorKind;
use drift_events::{
    CreatureView, HumanView, RunPhase, RunRecord, StateSnapshot, TerminationReason, TickSnapshot,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::components::creature::{Creature, EmotionRules};
use crate::components::human::{Landmark, NetworkId, Trust};
use crate::components::network::Topology;
use crate::components::world::{
    DiffusionSettings, HumanIndex, InteractionSettings, RunLog, SimulationState, TickOutcome,
};
use crate::config::{SelectionMode, SimulationConfig};
use crate::error::ConfigError;
use crate::setup;
use crate::systems::{advance_clock, diffuse_trust, move_creature, record_snapshot, run_interaction};
use crate::SimRng;

/// A single simulation run.
pub struct Simulation {
    world: World,
    schedule: Schedule,
    creature: Entity,
    seed: u64,
}

impl Simulation {
    /// Build a run from `config`, seeding from `random_seed` or from entropy.
    pub fn new(config: &SimulationConfig) -> Result<Self, ConfigError> {
        let seed = config.random_seed.unwrap_or_else(rand::random);
        Self::with_seed(config, seed)
    }

    /// Build a run with an explicit seed, ignoring `random_seed`.
    pub fn with_seed(config: &SimulationConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut rng = SmallRng::seed_from_u64(seed);
        let topology = setup::generate_small_world(
            config.node_count,
            config.mean_degree,
            config.rewiring_probability,
            &mut rng,
        )?;
        let population =
            setup::build_population(&config.initial_disposition_ratios, config.node_count, &mut rng);

        let mut world = World::new();
        let (index, occupancy) =
            setup::spawn_humans(&mut world, &population, config.landmark_count, &mut rng);

        let rules = EmotionRules::from_config(config);
        let start = match config.selection_mode {
            SelectionMode::Spatial => Some(setup::CREATURE_START_LANDMARK),
            SelectionMode::Random => None,
        };
        let creature = setup::spawn_creature(
            &mut world,
            config.empathy_init,
            config.resentment_init,
            &rules,
            start,
        );

        world.insert_resource(SimulationState::new(
            config.max_ticks,
            config.vengeful_stop_after,
        ));
        world.insert_resource(rules);
        world.insert_resource(InteractionSettings::from_config(config));
        world.insert_resource(DiffusionSettings::from_config(config));
        world.insert_resource(topology);
        world.insert_resource(index);
        world.insert_resource(occupancy);
        world.insert_resource(TickOutcome::default());
        world.insert_resource(RunLog::default());
        world.insert_resource(SimRng(rng));

        // Ticks are strictly sequential; the chain fixes system order
        let mut schedule = Schedule::default();
        schedule.set_executor_kind(ExecutorKind::SingleThreaded);
        schedule.add_systems(
            (
                move_creature,
                run_interaction,
                diffuse_trust,
                record_snapshot,
                advance_clock,
            )
                .chain(),
        );

        tracing::debug!(seed, humans = config.node_count, "Simulation initialized");

        Ok(Self {
            world,
            schedule,
            creature,
            seed,
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of ticks completed so far
    pub fn tick(&self) -> u64 {
        self.world.resource::<SimulationState>().current_tick
    }

    pub fn phase(&self) -> RunPhase {
        self.world.resource::<SimulationState>().phase
    }

    pub fn is_terminated(&self) -> bool {
        self.world.resource::<SimulationState>().is_terminated()
    }

    pub fn topology(&self) -> &Topology {
        self.world.resource::<Topology>()
    }

    /// Snapshots recorded so far
    pub fn snapshots(&self) -> &[TickSnapshot] {
        &self.world.resource::<RunLog>().snapshots
    }

    /// Advance one tick. Returns `None` once the run has terminated.
    pub fn step(&mut self) -> Option<TickSnapshot> {
        if self.is_terminated() {
            return None;
        }
        {
            let mut state = self.world.resource_mut::<SimulationState>();
            if state.phase == RunPhase::Initialized {
                state.phase = RunPhase::Running;
            }
        }

        self.schedule.run(&mut self.world);
        self.world.resource::<RunLog>().last().cloned()
    }

    /// Read-only view of the current state for rendering
    pub fn get_state(&self) -> StateSnapshot {
        let state = self.world.resource::<SimulationState>();
        let index = self.world.resource::<HumanIndex>();

        let humans = index
            .entities()
            .iter()
            .filter_map(|&entity| {
                let network_id = self.world.get::<NetworkId>(entity)?;
                let trust = self.world.get::<Trust>(entity)?;
                let landmark = self.world.get::<Landmark>(entity)?;
                Some(HumanView {
                    network_id: network_id.0,
                    disposition: trust.0,
                    landmark: landmark.0,
                })
            })
            .collect();

        let creature = self
            .world
            .get::<Creature>(self.creature)
            .map(|c| CreatureView {
                empathy: c.empathy,
                resentment: c.resentment,
                moral_state: c.moral_state,
                location: c.location,
                target: c.target,
            })
            .unwrap_or_default();

        StateSnapshot {
            tick: state.current_tick,
            phase: state.phase,
            creature,
            humans,
            edges: self.topology().edges(),
        }
    }

    /// Stop an unfinished run between ticks. No effect once terminated.
    pub fn cancel(&mut self) {
        let mut state = self.world.resource_mut::<SimulationState>();
        if !state.is_terminated() {
            state.terminate(TerminationReason::Cancelled);
        }
    }

    /// Step until the run terminates and return its record.
    pub fn run_to_completion(mut self) -> RunRecord {
        while self.step().is_some() {}
        self.finish()
    }

    /// Step until termination or until `cancel` is raised between ticks.
    ///
    /// Snapshots recorded before cancellation are kept.
    pub fn run_until_cancelled(mut self, cancel: &AtomicBool) -> RunRecord {
        while !self.is_terminated() {
            if cancel.load(Ordering::Relaxed) {
                self.cancel();
                break;
            }
            self.step();
        }
        self.finish()
    }

    /// Close the run and take its record. An unfinished run counts as cancelled.
    pub fn finish(mut self) -> RunRecord {
        self.cancel();
        let termination = self
            .world
            .resource::<SimulationState>()
            .termination
            .unwrap_or(TerminationReason::Cancelled);
        let snapshots = self
            .world
            .remove_resource::<RunLog>()
            .map(|log| log.snapshots)
            .unwrap_or_default();

        RunRecord {
            seed: self.seed,
            termination,
            snapshots,
        }
    }
}

/// Run one simulation from `config` to termination.
pub fn run_to_completion(config: &SimulationConfig) -> Result<RunRecord, ConfigError> {
    let simulation = Simulation::new(config)?;
    let seed = simulation.seed();
    let record = simulation.run_to_completion();

    tracing::info!(
        seed,
        ticks = record.len(),
        termination = ?record.termination,
        terminal_state = ?record.terminal_state(),
        "Run complete"
    );
    Ok(record)
}
