//! Run Setup
//!
//! Network generation and agent spawning for a fresh run.

pub mod agents;
pub mod topology;

pub use agents::*;
pub use topology::*;
