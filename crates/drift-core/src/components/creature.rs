//! Creature Components
//!
//! The Creature's emotional state and the rule that turns interaction
//! outcomes into emotional drift and moral-state changes.

use bevy_ecs::prelude::*;
use drift_events::{InteractionOutcome, MoralState};

use crate::config::SimulationConfig;

/// The single stigmatized agent
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Creature {
    pub empathy: f64,
    pub resentment: f64,
    pub moral_state: MoralState,
    /// Current landmark (spatial selection only)
    pub location: Option<usize>,
    /// Network id of the last Human met
    pub target: Option<u32>,
}

impl Creature {
    /// Create a Creature at its initial emotions, with the state those emotions imply.
    pub fn new(empathy: f64, resentment: f64, rules: &EmotionRules) -> Self {
        Self {
            empathy,
            resentment,
            moral_state: rules.derive_state(empathy, resentment),
            location: None,
            target: None,
        }
    }

    pub fn at_landmark(mut self, landmark: usize) -> Self {
        self.location = Some(landmark);
        self
    }
}

/// Moral state implied by an emotional pair.
///
/// Thresholds are strict: a value sitting exactly on a threshold does not
/// count toward escalation.
pub fn derive_moral_state(
    empathy: f64,
    resentment: f64,
    res_threshold: f64,
    emp_threshold: f64,
) -> MoralState {
    let resentful = resentment > res_threshold;
    let cold = empathy < emp_threshold;
    match (resentful, cold) {
        (true, true) => MoralState::Vengeful,
        (true, false) | (false, true) => MoralState::Cautious,
        (false, false) => MoralState::Peaceful,
    }
}

/// Resource: emotional update parameters for a run
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct EmotionRules {
    pub clamp_min: f64,
    pub clamp_max: f64,
    pub res_threshold: f64,
    pub emp_threshold: f64,
    pub accept_empathy_delta: f64,
    pub accept_resentment_delta: f64,
    pub reject_empathy_delta: f64,
    pub reject_resentment_delta: f64,
    pub allow_deescalation: bool,
}

impl EmotionRules {
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            clamp_min: config.clamp_min,
            clamp_max: config.clamp_max,
            res_threshold: config.res_threshold,
            emp_threshold: config.emp_threshold,
            accept_empathy_delta: config.accept_empathy_delta,
            accept_resentment_delta: config.accept_resentment_delta,
            reject_empathy_delta: config.reject_empathy_delta,
            reject_resentment_delta: config.reject_resentment_delta,
            allow_deescalation: config.allow_deescalation,
        }
    }

    pub fn derive_state(&self, empathy: f64, resentment: f64) -> MoralState {
        derive_moral_state(empathy, resentment, self.res_threshold, self.emp_threshold)
    }

    fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.clamp_min, self.clamp_max)
    }

    /// Apply one outcome to the Creature and recompute its moral state.
    ///
    /// Returns the state before the update.
    pub fn apply(&self, creature: &mut Creature, outcome: InteractionOutcome) -> MoralState {
        match outcome {
            InteractionOutcome::Accepted => {
                creature.empathy = self.clamp(creature.empathy + self.accept_empathy_delta);
                creature.resentment = self.clamp(creature.resentment - self.accept_resentment_delta);
            }
            InteractionOutcome::Rejected => {
                creature.empathy = self.clamp(creature.empathy - self.reject_empathy_delta);
                creature.resentment = self.clamp(creature.resentment + self.reject_resentment_delta);
            }
            InteractionOutcome::NoOp => {}
        }
        self.recompute(creature)
    }

    /// Recompute the moral state from the current emotions.
    ///
    /// Without de-escalation the state only ratchets upward. Returns the
    /// state before the recomputation.
    pub fn recompute(&self, creature: &mut Creature) -> MoralState {
        let previous = creature.moral_state;
        let derived = self.derive_state(creature.empathy, creature.resentment);
        creature.moral_state = if self.allow_deescalation {
            derived
        } else {
            previous.max(derived)
        };
        previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(allow_deescalation: bool) -> EmotionRules {
        EmotionRules {
            clamp_min: 0.0,
            clamp_max: 100.0,
            res_threshold: 50.0,
            emp_threshold: 20.0,
            accept_empathy_delta: 5.0,
            accept_resentment_delta: 8.0,
            reject_empathy_delta: 5.0,
            reject_resentment_delta: 8.0,
            allow_deescalation,
        }
    }

    #[test]
    fn test_derive_state_is_strict() {
        assert_eq!(derive_moral_state(20.0, 50.0, 50.0, 20.0), MoralState::Peaceful);
        assert_eq!(derive_moral_state(19.9, 50.0, 50.0, 20.0), MoralState::Cautious);
        assert_eq!(derive_moral_state(20.0, 50.1, 50.0, 20.0), MoralState::Cautious);
        assert_eq!(derive_moral_state(19.9, 50.1, 50.0, 20.0), MoralState::Vengeful);
    }

    #[test]
    fn test_derive_state_is_pure() {
        for &(empathy, resentment) in &[(0.0, 100.0), (35.0, 40.0), (10.0, 10.0), (90.0, 60.0)] {
            let first = derive_moral_state(empathy, resentment, 50.0, 20.0);
            let second = derive_moral_state(empathy, resentment, 50.0, 20.0);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_ten_rejections_turn_vengeful() {
        let rules = rules(false);
        let mut creature = Creature::new(50.0, 0.0, &rules);
        assert_eq!(creature.moral_state, MoralState::Peaceful);

        for _ in 0..10 {
            rules.apply(&mut creature, InteractionOutcome::Rejected);
        }

        assert_eq!(creature.empathy, 0.0);
        assert_eq!(creature.resentment, 80.0);
        assert_eq!(creature.moral_state, MoralState::Vengeful);
    }

    #[test]
    fn test_updates_clamp() {
        let rules = rules(false);
        let mut creature = Creature::new(98.0, 3.0, &rules);

        rules.apply(&mut creature, InteractionOutcome::Accepted);
        assert_eq!(creature.empathy, 100.0);
        assert_eq!(creature.resentment, 0.0);

        for _ in 0..30 {
            rules.apply(&mut creature, InteractionOutcome::Rejected);
        }
        assert_eq!(creature.empathy, 0.0);
        assert_eq!(creature.resentment, 100.0);
    }

    #[test]
    fn test_no_deescalation_by_default() {
        let rules = rules(false);
        let mut creature = Creature::new(0.0, 100.0, &rules);
        assert_eq!(creature.moral_state, MoralState::Vengeful);

        for _ in 0..20 {
            rules.apply(&mut creature, InteractionOutcome::Accepted);
        }
        assert_eq!(creature.moral_state, MoralState::Vengeful);
    }

    #[test]
    fn test_deescalation_when_allowed() {
        let rules = rules(true);
        let mut creature = Creature::new(0.0, 100.0, &rules);

        for _ in 0..20 {
            rules.apply(&mut creature, InteractionOutcome::Accepted);
        }
        assert_eq!(creature.moral_state, MoralState::Peaceful);
    }

    #[test]
    fn test_no_op_leaves_emotions() {
        let rules = rules(false);
        let mut creature = Creature::new(40.0, 30.0, &rules);

        let previous = rules.apply(&mut creature, InteractionOutcome::NoOp);
        assert_eq!(previous, MoralState::Peaceful);
        assert_eq!(creature.empathy, 40.0);
        assert_eq!(creature.resentment, 30.0);
    }
}
