//! Trust Diffusion System
//!
//! Compassionate Humans broadcast trust to their network neighbours.
//! Promotions are planned against the dispositions at the start of the
//! phase and applied together, so a Human moves at most one level per tick.

use bevy_ecs::prelude::*;
use drift_events::Disposition;
use rand::Rng;

use crate::components::human::{Human, Trust};
use crate::components::network::Topology;
use crate::components::world::{DiffusionSettings, HumanIndex};
use crate::SimRng;

/// Next disposition up the trust ladder; `None` for compassionate
pub fn promote(disposition: Disposition) -> Option<Disposition> {
    match disposition {
        Disposition::Fearful => Some(Disposition::Neutral),
        Disposition::Neutral => Some(Disposition::Compassionate),
        Disposition::Compassionate => None,
    }
}

/// Plan this tick's promotions from a disposition snapshot indexed by network id.
///
/// Every edge from a compassionate Human to a promotable neighbour gets an
/// independent draw. Returns `(network_id, new_disposition)` pairs in id order.
pub fn plan_promotions<R: Rng + ?Sized>(
    snapshot: &[Disposition],
    topology: &Topology,
    influence_probability: f64,
    rng: &mut R,
) -> Vec<(u32, Disposition)> {
    let mut planned: Vec<Option<Disposition>> = vec![None; snapshot.len()];

    for (source, &disposition) in snapshot.iter().enumerate() {
        if disposition != Disposition::Compassionate {
            continue;
        }
        for neighbor in topology.neighbors(source as u32) {
            let Some(&current) = snapshot.get(neighbor as usize) else {
                continue;
            };
            let Some(next) = promote(current) else {
                continue;
            };
            if rng.gen_bool(influence_probability) {
                planned[neighbor as usize] = Some(next);
            }
        }
    }

    planned
        .into_iter()
        .enumerate()
        .filter_map(|(id, next)| next.map(|d| (id as u32, d)))
        .collect()
}

/// System: broadcast trust from compassionate Humans when enabled
pub fn diffuse_trust(
    settings: Res<DiffusionSettings>,
    topology: Res<Topology>,
    index: Res<HumanIndex>,
    mut rng: ResMut<SimRng>,
    mut humans: Query<&mut Trust, With<Human>>,
) {
    if !settings.enabled {
        return;
    }

    let snapshot: Option<Vec<Disposition>> = index
        .entities()
        .iter()
        .map(|&entity| humans.get(entity).ok().map(|trust| trust.0))
        .collect();
    let Some(snapshot) = snapshot else {
        tracing::warn!("Human index out of sync with world, skipping diffusion");
        return;
    };

    let promotions = plan_promotions(
        &snapshot,
        &topology,
        settings.influence_probability,
        &mut rng.0,
    );

    for &(id, next) in &promotions {
        let Some(entity) = index.get(id) else {
            continue;
        };
        if let Ok(mut trust) = humans.get_mut(entity) {
            trust.0 = next;
        }
    }

    if !promotions.is_empty() {
        tracing::debug!(promoted = promotions.len(), "Trust diffused through network");
    }
}
