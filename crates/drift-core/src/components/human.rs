//! Human Components
//!
//! Humans are passive: they hold a disposition and a fixed place in the
//! social network and on the landmark layout.

use bevy_ecs::prelude::*;
use drift_events::Disposition;

/// Marker component identifying an entity as a Human
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Human;

/// Stable node identity in the social network
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NetworkId(pub u32);

/// Current trust disposition; only trust diffusion changes it
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trust(pub Disposition);

/// Landmark the Human stands at for the whole run
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Landmark(pub usize);
