//! Clock Systems
//!
//! Record the end-of-tick snapshot and advance the simulation clock.

use bevy_ecs::prelude::*;
use drift_events::{DispositionCounts, TickSnapshot};

use crate::components::creature::Creature;
use crate::components::human::{Human, Trust};
use crate::components::world::{RunLog, SimulationState, TickOutcome};

/// System: append this tick's snapshot to the run log
pub fn record_snapshot(
    state: Res<SimulationState>,
    tick_outcome: Res<TickOutcome>,
    mut log: ResMut<RunLog>,
    creature_q: Query<&Creature>,
    humans: Query<&Trust, With<Human>>,
) {
    let Ok(creature) = creature_q.get_single() else {
        return;
    };
    let dispositions: DispositionCounts = humans.iter().map(|trust| trust.0).collect();

    log.push(TickSnapshot {
        tick: state.current_tick,
        empathy: creature.empathy,
        resentment: creature.resentment,
        moral_state: creature.moral_state,
        dispositions,
        interaction: tick_outcome.0,
        location: creature.location,
    });
}

/// System: close the tick and apply the termination policy
pub fn advance_clock(mut state: ResMut<SimulationState>, creature_q: Query<&Creature>) {
    let Ok(creature) = creature_q.get_single() else {
        return;
    };
    state.advance(creature.moral_state);

    if let Some(reason) = state.termination {
        tracing::debug!(tick = state.current_tick, ?reason, "Run terminated");
    }
}
