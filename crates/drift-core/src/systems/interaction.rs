//! Interaction System
//!
//! Picks the Human the Creature meets, resolves accept/reject from the
//! Human's disposition and feeds the outcome into the emotional update.

use bevy_ecs::prelude::*;
use drift_events::{Disposition, Interaction, InteractionOutcome};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::components::creature::{Creature, EmotionRules};
use crate::components::human::{Human, Trust};
use crate::components::world::{
    HumanIndex, InteractionSettings, LandmarkOccupancy, TickOutcome,
};
use crate::config::SelectionMode;
use crate::SimRng;

/// Chance that a neutral Human accepts the Creature
pub const NEUTRAL_ACCEPTANCE: f64 = 0.5;

/// Probability that a Human with this disposition accepts the Creature
pub fn acceptance_probability(disposition: Disposition) -> f64 {
    match disposition {
        Disposition::Fearful => 0.0,
        Disposition::Neutral => NEUTRAL_ACCEPTANCE,
        Disposition::Compassionate => 1.0,
    }
}

/// Resolve one meeting. Only uncertain dispositions consume a random draw.
pub fn resolve_outcome<R: Rng + ?Sized>(disposition: Disposition, rng: &mut R) -> InteractionOutcome {
    let p = acceptance_probability(disposition);
    let accepted = if p <= 0.0 {
        false
    } else if p >= 1.0 {
        true
    } else {
        rng.gen_bool(p)
    };

    if accepted {
        InteractionOutcome::Accepted
    } else {
        InteractionOutcome::Rejected
    }
}

/// Network id of the Human the Creature meets this tick, if any is in range.
pub fn select_target<R: Rng + ?Sized>(
    mode: SelectionMode,
    location: Option<usize>,
    population: usize,
    occupancy: &LandmarkOccupancy,
    rng: &mut R,
) -> Option<u32> {
    match mode {
        SelectionMode::Random => {
            if population == 0 {
                None
            } else {
                Some(rng.gen_range(0..population) as u32)
            }
        }
        SelectionMode::Spatial => {
            location.and_then(|landmark| occupancy.humans_at(landmark).choose(rng).copied())
        }
    }
}

/// System: in spatial mode the Creature wanders to a random landmark
pub fn move_creature(
    settings: Res<InteractionSettings>,
    mut rng: ResMut<SimRng>,
    mut creature_q: Query<&mut Creature>,
) {
    if settings.mode != SelectionMode::Spatial {
        return;
    }
    let Ok(mut creature) = creature_q.get_single_mut() else {
        return;
    };
    creature.location = Some(rng.0.gen_range(0..settings.landmark_count));
}

/// System: meet one Human and apply the emotional update
pub fn run_interaction(
    settings: Res<InteractionSettings>,
    rules: Res<EmotionRules>,
    index: Res<HumanIndex>,
    occupancy: Res<LandmarkOccupancy>,
    mut rng: ResMut<SimRng>,
    mut tick_outcome: ResMut<TickOutcome>,
    mut creature_q: Query<&mut Creature>,
    humans: Query<&Trust, With<Human>>,
) {
    let Ok(mut creature) = creature_q.get_single_mut() else {
        return;
    };

    let target = select_target(
        settings.mode,
        creature.location,
        index.len(),
        &occupancy,
        &mut rng.0,
    );
    let met = target.and_then(|id| {
        let entity = index.get(id)?;
        humans.get(entity).ok().map(|trust| (id, trust.0))
    });

    let Some((id, disposition)) = met else {
        rules.recompute(&mut creature);
        tick_outcome.0 = Interaction::no_op();
        return;
    };

    let outcome = resolve_outcome(disposition, &mut rng.0);
    let previous = rules.apply(&mut creature, outcome);
    creature.target = Some(id);
    tick_outcome.0 = Interaction::with(id, outcome);

    if creature.moral_state != previous {
        tracing::debug!(
            from = %previous,
            to = %creature.moral_state,
            empathy = creature.empathy,
            resentment = creature.resentment,
            "Creature moral state changed"
        );
    }
}
