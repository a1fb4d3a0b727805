//! Moral Drift Simulation Engine
//!
//! A single stigmatized Creature meets a population of Humans on a
//! small-world network. Each meeting nudges the Creature's empathy and
//! resentment, which in turn decide whether it stays peaceful, grows
//! cautious or turns vengeful. Batches of independent runs are swept over a
//! parameter grid and aggregated per cell.

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;

pub mod batch;
pub mod components;
pub mod config;
pub mod error;
pub mod output;
pub mod setup;
pub mod simulation;
pub mod systems;

pub use batch::{
    derive_seed, run_batch, AggregatedResults, CellKey, CellReport, CellStatus, CellSummary,
    ConfigSpace,
};
pub use config::{
    DispositionRatios, ExperimentConfig, SelectionMode, SimulationConfig, SweepConfig,
    ThresholdPair,
};
pub use error::{AggregationError, ConfigError};
pub use simulation::{run_to_completion, Simulation};

/// Seeded random number generator resource
#[derive(Resource)]
pub struct SimRng(pub SmallRng);
