//! Batch runner tests
//!
//! Sweeps, failure isolation and aggregation properties.

use drift_core::batch::aggregate_runs;
use drift_core::{
    run_batch, CellStatus, ConfigSpace, DispositionRatios, SimulationConfig, SweepConfig,
};

fn base() -> SimulationConfig {
    SimulationConfig {
        node_count: 20,
        max_ticks: 25,
        random_seed: Some(42),
        ..SimulationConfig::default()
    }
}

/// Test that aggregation ignores the order runs are supplied in
#[test]
fn test_aggregation_order_independent() {
    let space = ConfigSpace::new(
        base(),
        SweepConfig {
            replicate_count: 6,
            ..SweepConfig::default()
        },
    );
    let results = run_batch(&space).unwrap();
    let records = &results.get("cell_0000").unwrap().records;
    assert_eq!(records.len(), 6);

    let forward = aggregate_runs(records).unwrap();
    let mut reversed = records.clone();
    reversed.reverse();
    let mut rotated = records.clone();
    rotated.rotate_left(2);

    assert_eq!(aggregate_runs(&reversed).unwrap(), forward);
    assert_eq!(aggregate_runs(&rotated).unwrap(), forward);
}

/// Test that a failing cell does not abort the rest of the batch
#[test]
fn test_failed_cell_is_isolated() {
    let space = ConfigSpace::new(
        base(),
        SweepConfig {
            replicate_count: 3,
            mean_degrees: vec![4, 3],
            broadcasting: vec![false, true],
            ..SweepConfig::default()
        },
    );
    let results = run_batch(&space).unwrap();

    assert_eq!(results.cells.len(), 4);
    assert!(!results.is_complete());

    for report in results.cells.values() {
        if report.key.mean_degree == 3 {
            assert_eq!(report.status, CellStatus::Failed);
            assert_eq!(report.failures.len(), 3);
            assert!(report.summary.is_none());
        } else {
            assert_eq!(report.status, CellStatus::Complete);
            assert_eq!(report.summary.as_ref().unwrap().runs, 3);
        }
    }

    let failed = results.failed_cells();
    assert_eq!(failed.len(), 2);
    assert!(failed
        .iter()
        .all(|err| err.cause.parameter() == Some("mean_degree")));
    assert!(failed[0].to_string().contains("mean_degree=3"));
}

/// Test that the worker pool does not change any statistic
#[test]
fn test_parallel_matches_sequential() {
    let sweep = SweepConfig {
        replicate_count: 4,
        rewiring_probabilities: vec![0.0, 0.3],
        disposition_mixes: vec![
            DispositionRatios::new(0.8, 0.1, 0.1),
            DispositionRatios::new(0.2, 0.3, 0.5),
        ],
        ..SweepConfig::default()
    };
    let sequential = run_batch(&ConfigSpace::new(base(), sweep.clone())).unwrap();
    let parallel = run_batch(&ConfigSpace::new(
        base(),
        SweepConfig {
            worker_threads: 4,
            ..sweep
        },
    ))
    .unwrap();

    assert_eq!(sequential.base_seed, parallel.base_seed);
    assert_eq!(sequential.cells, parallel.cells);
    assert_ne!(sequential.batch_id, parallel.batch_id);
}

/// Test that replicates of a cell use distinct seeds
#[test]
fn test_replicates_are_independent() {
    let space = ConfigSpace::new(
        base(),
        SweepConfig {
            replicate_count: 5,
            ..SweepConfig::default()
        },
    );
    let results = run_batch(&space).unwrap();
    let records = &results.get("cell_0000").unwrap().records;

    let mut seeds: Vec<u64> = records.iter().map(|r| r.seed).collect();
    seeds.sort_unstable();
    seeds.dedup();
    assert_eq!(seeds.len(), 5);
}

/// Test the per-cell summary shape
#[test]
fn test_summary_covers_every_tick() {
    let space = ConfigSpace::new(
        base(),
        SweepConfig {
            replicate_count: 3,
            ..SweepConfig::default()
        },
    );
    let results = run_batch(&space).unwrap();
    let summary = results.get("cell_0000").unwrap().summary.clone().unwrap();

    assert_eq!(summary.runs, 3);
    assert_eq!(summary.aligned_ticks, 25);
    assert_eq!(summary.trajectory.len(), 25);
    assert_eq!(summary.terminal_states.total(), 3);
    for stats in &summary.trajectory {
        assert!(stats.empathy.mean >= 0.0 && stats.empathy.mean <= 10.0);
        assert!(stats.empathy.variance >= 0.0);
    }
}
