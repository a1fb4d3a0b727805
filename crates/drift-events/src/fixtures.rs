//! Sample data fixtures for testing.
//!
//! Enable the `test-fixtures` feature to access these helpers.
//!
//! ```ignore
//! // [dev-dependencies]
//! // drift-events = { path = "../drift-events", features = ["test-fixtures"] }
//!
//! let record = drift_events::fixtures::sample_run_record();
//! ```

use crate::RunRecord;

/// Returns a short sample run from the fixtures file.
///
/// Contains 4 ticks on a population of 10 Humans:
/// - a rejection that leaves the Creature peaceful
/// - a tick with no Human in range
/// - two rejections ending in the vengeful state
pub fn sample_run_record() -> RunRecord {
    let json = include_str!("../tests/fixtures/sample_run.json");
    RunRecord::from_json(json).expect("Failed to parse sample_run.json")
}
