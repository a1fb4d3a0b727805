//! Agent Spawning
//!
//! Builds the Human population from the configured disposition mix and
//! places the Creature.

use bevy_ecs::prelude::*;
use drift_events::Disposition;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::components::creature::{Creature, EmotionRules};
use crate::components::human::{Human, Landmark, NetworkId, Trust};
use crate::components::world::{HumanIndex, LandmarkOccupancy};
use crate::config::DispositionRatios;

/// Landmark the Creature starts at in spatial mode (the forest)
pub const CREATURE_START_LANDMARK: usize = 0;

/// Shuffled dispositions for a population of `node_count` Humans.
///
/// Position in the returned list becomes the Human's network id.
pub fn build_population<R: Rng + ?Sized>(
    ratios: &DispositionRatios,
    node_count: usize,
    rng: &mut R,
) -> Vec<Disposition> {
    let (fearful, neutral, compassionate) = ratios.split(node_count);

    let mut population = Vec::with_capacity(node_count);
    population.extend(std::iter::repeat(Disposition::Fearful).take(fearful));
    population.extend(std::iter::repeat(Disposition::Neutral).take(neutral));
    population.extend(std::iter::repeat(Disposition::Compassionate).take(compassionate));
    population.shuffle(rng);
    population
}

/// Spawn one Human per disposition, each at a random landmark.
pub fn spawn_humans<R: Rng + ?Sized>(
    world: &mut World,
    population: &[Disposition],
    landmark_count: usize,
    rng: &mut R,
) -> (HumanIndex, LandmarkOccupancy) {
    let mut entities = Vec::with_capacity(population.len());
    let mut occupancy = LandmarkOccupancy::new(landmark_count);

    for (id, &disposition) in population.iter().enumerate() {
        let network_id = id as u32;
        let landmark = rng.gen_range(0..landmark_count);

        let entity = world
            .spawn((Human, NetworkId(network_id), Trust(disposition), Landmark(landmark)))
            .id();

        entities.push(entity);
        occupancy.place(landmark, network_id);
    }

    (HumanIndex::new(entities), occupancy)
}

/// Spawn the Creature with its initial emotions.
pub fn spawn_creature(
    world: &mut World,
    empathy: f64,
    resentment: f64,
    rules: &EmotionRules,
    start_landmark: Option<usize>,
) -> Entity {
    let mut creature = Creature::new(empathy, resentment, rules);
    if let Some(landmark) = start_landmark {
        creature = creature.at_landmark(landmark);
    }
    world.spawn(creature).id()
}
