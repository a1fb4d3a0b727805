//! Scenario tests
//!
//! Whole-run behaviour checked through the public driver.

use drift_core::{DispositionRatios, SelectionMode, Simulation, SimulationConfig};
use drift_events::{DispositionCounts, InteractionOutcome, MoralState, TerminationReason};

fn all_fearful() -> DispositionRatios {
    DispositionRatios::new(1.0, 0.0, 0.0)
}

/// Test that emotions stay inside the clamp range on every tick
#[test]
fn test_emotions_stay_within_clamp() {
    for seed in 0..10 {
        let config = SimulationConfig {
            accept_empathy_delta: 3.0,
            reject_resentment_delta: 4.0,
            max_ticks: 80,
            random_seed: Some(seed),
            ..SimulationConfig::default()
        };
        let record = Simulation::new(&config).unwrap().run_to_completion();

        for snapshot in &record.snapshots {
            assert!((0.0..=10.0).contains(&snapshot.empathy), "tick {}", snapshot.tick);
            assert!((0.0..=10.0).contains(&snapshot.resentment), "tick {}", snapshot.tick);
        }
    }
}

/// Test ten rejections drive the Creature from (50, 0) to (0, 80)
#[test]
fn test_ten_rejections_turn_vengeful() {
    let config = SimulationConfig {
        node_count: 10,
        clamp_min: 0.0,
        clamp_max: 100.0,
        empathy_init: 50.0,
        resentment_init: 0.0,
        res_threshold: 50.0,
        emp_threshold: 20.0,
        reject_empathy_delta: 5.0,
        reject_resentment_delta: 8.0,
        max_ticks: 10,
        random_seed: Some(1),
        initial_disposition_ratios: all_fearful(),
        ..SimulationConfig::default()
    };
    let record = Simulation::new(&config).unwrap().run_to_completion();

    assert_eq!(record.len(), 10);
    assert!(record
        .snapshots
        .iter()
        .all(|s| s.interaction.outcome == InteractionOutcome::Rejected));

    let last = record.last().unwrap();
    assert_eq!(last.empathy, 0.0);
    assert_eq!(last.resentment, 80.0);
    assert_eq!(last.moral_state, MoralState::Vengeful);
    assert_eq!(record.termination, TerminationReason::MaxTicks);
}

/// Test that dispositions never change without broadcasting
#[test]
fn test_fearful_population_is_static() {
    let config = SimulationConfig {
        node_count: 100,
        broadcasting_enabled: false,
        max_ticks: 40,
        random_seed: Some(5),
        initial_disposition_ratios: all_fearful(),
        ..SimulationConfig::default()
    };
    let record = Simulation::new(&config).unwrap().run_to_completion();

    let expected = DispositionCounts {
        fearful: 100,
        neutral: 0,
        compassionate: 0,
    };
    assert!(record.snapshots.iter().all(|s| s.dispositions == expected));
}

/// Test that zero rewiring leaves the exact ring lattice
#[test]
fn test_zero_rewiring_gives_ring_lattice() {
    let config = SimulationConfig {
        node_count: 20,
        mean_degree: 4,
        rewiring_probability: 0.0,
        random_seed: Some(11),
        ..SimulationConfig::default()
    };
    let simulation = Simulation::new(&config).unwrap();
    let topology = simulation.topology();

    assert_eq!(topology.edge_count(), 40);
    for node in 0..20u32 {
        assert_eq!(topology.degree(node), 4);
        for offset in 1..=2 {
            assert!(topology.has_edge(node, (node + offset) % 20));
        }
    }
}

/// Test that the moral state only ratchets upward by default
#[test]
fn test_moral_state_never_recovers() {
    for seed in 0..10 {
        let config = SimulationConfig {
            max_ticks: 100,
            random_seed: Some(seed),
            ..SimulationConfig::default()
        };
        let record = Simulation::new(&config).unwrap().run_to_completion();

        for pair in record.snapshots.windows(2) {
            assert!(pair[1].moral_state >= pair[0].moral_state);
        }
    }
}

/// Test that de-escalation lets the state track the emotions
#[test]
fn test_deescalation_allows_recovery() {
    let config = SimulationConfig {
        empathy_init: 0.0,
        resentment_init: 10.0,
        accept_empathy_delta: 2.0,
        accept_resentment_delta: 2.0,
        allow_deescalation: true,
        max_ticks: 10,
        random_seed: Some(2),
        initial_disposition_ratios: DispositionRatios::new(0.0, 0.0, 1.0),
        ..SimulationConfig::default()
    };
    let record = Simulation::new(&config).unwrap().run_to_completion();

    assert_eq!(record.snapshots[0].moral_state, MoralState::Vengeful);
    assert_eq!(record.terminal_state(), Some(MoralState::Peaceful));
}

/// Test that an empty landmark produces a recorded no-op tick
#[test]
fn test_spatial_mode_records_no_ops() {
    let config = SimulationConfig {
        node_count: 3,
        mean_degree: 2,
        selection_mode: SelectionMode::Spatial,
        landmark_count: 1000,
        max_ticks: 50,
        random_seed: Some(8),
        ..SimulationConfig::default()
    };
    let record = Simulation::new(&config).unwrap().run_to_completion();

    assert_eq!(record.len(), 50);
    assert!(record.no_op_count() > 0);
    assert!(record.snapshots.iter().all(|s| s.location.is_some()));

    let mut previous = (10.0, 0.0);
    for snapshot in &record.snapshots {
        if snapshot.interaction.is_no_op() {
            assert_eq!(snapshot.interaction.target, None);
            assert_eq!((snapshot.empathy, snapshot.resentment), previous);
        }
        previous = (snapshot.empathy, snapshot.resentment);
    }
}

/// Test that a vengeful streak stops the run early
#[test]
fn test_vengeful_streak_stops_early() {
    let config = SimulationConfig {
        empathy_init: 0.0,
        resentment_init: 10.0,
        max_ticks: 100,
        vengeful_stop_after: Some(3),
        random_seed: Some(4),
        initial_disposition_ratios: all_fearful(),
        ..SimulationConfig::default()
    };
    let record = Simulation::new(&config).unwrap().run_to_completion();

    assert_eq!(record.termination, TerminationReason::VengefulStreak);
    assert_eq!(record.len(), 3);
    assert_eq!(record.first_vengeful_tick(), Some(0));
}

/// Test that broadcasting only ever raises trust
#[test]
fn test_broadcasting_never_demotes() {
    let config = SimulationConfig {
        node_count: 60,
        broadcasting_enabled: true,
        influence_probability: 0.3,
        max_ticks: 40,
        random_seed: Some(21),
        ..SimulationConfig::default()
    };
    let mut simulation = Simulation::new(&config).unwrap();

    let mut before = simulation.get_state().humans;
    while simulation.step().is_some() {
        let after = simulation.get_state().humans;
        for (old, new) in before.iter().zip(&after) {
            assert!(new.disposition >= old.disposition);
        }
        before = after;
    }

    let record = simulation.finish();
    let first = record.snapshots.first().unwrap().dispositions;
    let last = record.last().unwrap().dispositions;
    assert!(last.compassionate >= first.compassionate);
    assert!(last.fearful <= first.fearful);
}
