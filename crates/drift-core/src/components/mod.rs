//! ECS Components
//!
//! Entity components for the Creature and the Humans, plus the per-run
//! resources shared by the systems.

pub mod creature;
pub mod human;
pub mod network;
pub mod world;

pub use creature::*;
pub use human::*;
pub use network::*;
pub use world::*;
