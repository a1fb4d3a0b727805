//! Fixture loading tests.

#![cfg(feature = "test-fixtures")]

use drift_events::{fixtures, InteractionOutcome, MoralState};

#[test]
fn test_sample_run_loads() {
    let record = fixtures::sample_run_record();

    assert_eq!(record.seed, 42);
    assert_eq!(record.len(), 4);
    assert_eq!(record.terminal_state(), Some(MoralState::Vengeful));
    assert_eq!(record.snapshots[1].interaction.outcome, InteractionOutcome::NoOp);
    assert!(record.snapshots.iter().all(|s| s.dispositions.total() == 10));
}
