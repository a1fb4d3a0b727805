//! Shared output types for the moral drift simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! Rendering front-ends and result exporters depend on it without pulling
//! in the engine.

pub mod agent;
pub mod record;
pub mod snapshot;

#[cfg(feature = "test-fixtures")]
pub mod fixtures;

// Re-export agent tags
pub use agent::{Disposition, MoralState};

// Re-export per-tick and per-run records
pub use record::{
    DispositionCounts, Interaction, InteractionOutcome, RunRecord, TerminationReason, TickSnapshot,
};

// Re-export rendering snapshot types
pub use snapshot::{CreatureView, HumanView, RunPhase, StateSnapshot};
