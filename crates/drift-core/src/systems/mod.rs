//! ECS Systems
//!
//! Per-tick systems, run in a fixed chain: movement, interaction, trust
//! diffusion, snapshot recording, clock advance.

pub mod clock;
pub mod diffusion;
pub mod interaction;

pub use clock::{advance_clock, record_snapshot};
pub use diffusion::{diffuse_trust, plan_promotions, promote};
pub use interaction::{
    acceptance_probability, move_creature, resolve_outcome, run_interaction, select_target,
    NEUTRAL_ACCEPTANCE,
};
