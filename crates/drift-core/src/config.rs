//! Configuration System
//!
//! Loads run and sweep parameters from a TOML file so experiments can be
//! adjusted without recompiling. Every field has a default, so a file only
//! needs to name what it changes.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

/// Default experiment file path
pub const DEFAULT_CONFIG_PATH: &str = "drift.toml";

/// Allowed slack when checking that disposition ratios sum to one
pub const RATIO_TOLERANCE: f64 = 1e-6;

/// How the Creature picks the Human it meets each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// Uniformly among the whole population
    #[default]
    Random,
    /// Among the Humans standing at the Creature's landmark
    Spatial,
}

/// Initial share of each disposition in the population
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DispositionRatios {
    pub fearful: f64,
    pub neutral: f64,
    pub compassionate: f64,
}

impl DispositionRatios {
    pub fn new(fearful: f64, neutral: f64, compassionate: f64) -> Self {
        Self {
            fearful,
            neutral,
            compassionate,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("initial_disposition_ratios.fearful", self.fearful),
            ("initial_disposition_ratios.neutral", self.neutral),
            ("initial_disposition_ratios.compassionate", self.compassionate),
        ] {
            check_unit_interval(name, value)?;
        }

        let sum = self.fearful + self.neutral + self.compassionate;
        if (sum - 1.0).abs() > RATIO_TOLERANCE {
            return Err(ConfigError::invalid(
                "initial_disposition_ratios",
                format!("ratios must sum to 1, got {}", sum),
            ));
        }
        Ok(())
    }

    /// Number of (fearful, neutral, compassionate) Humans in a population of `n`.
    ///
    /// Fearful and neutral counts are truncated; the remainder is compassionate.
    pub fn split(&self, n: usize) -> (usize, usize, usize) {
        let share = |ratio: f64| ((ratio * n as f64) + RATIO_TOLERANCE).floor() as usize;
        let fearful = share(self.fearful).min(n);
        let neutral = share(self.neutral).min(n - fearful);
        (fearful, neutral, n - fearful - neutral)
    }
}

impl Default for DispositionRatios {
    fn default() -> Self {
        Self::new(0.4, 0.4, 0.2)
    }
}

/// Parameters of a single simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of Humans, one per network node
    pub node_count: usize,
    /// Ring-lattice degree before rewiring (even, below `node_count`)
    pub mean_degree: usize,
    pub rewiring_probability: f64,

    /// Lower clamp for empathy and resentment
    pub clamp_min: f64,
    /// Upper clamp for empathy and resentment
    pub clamp_max: f64,
    pub empathy_init: f64,
    pub resentment_init: f64,
    /// Resentment strictly above this counts toward escalation
    pub res_threshold: f64,
    /// Empathy strictly below this counts toward escalation
    pub emp_threshold: f64,
    pub accept_empathy_delta: f64,
    pub accept_resentment_delta: f64,
    pub reject_empathy_delta: f64,
    pub reject_resentment_delta: f64,
    /// Let the moral state fall back when emotions recover
    pub allow_deescalation: bool,

    pub selection_mode: SelectionMode,
    /// Landmarks Humans are scattered over in spatial mode
    pub landmark_count: usize,

    pub broadcasting_enabled: bool,
    /// Chance per edge per tick that a compassionate Human promotes a neighbour
    pub influence_probability: f64,

    pub max_ticks: u64,
    /// Stop early once the Creature has been vengeful this many ticks in a row
    pub vengeful_stop_after: Option<u64>,
    pub random_seed: Option<u64>,

    pub initial_disposition_ratios: DispositionRatios,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            node_count: 30,
            mean_degree: 4,
            rewiring_probability: 0.1,
            clamp_min: 0.0,
            clamp_max: 10.0,
            empathy_init: 10.0,
            resentment_init: 0.0,
            res_threshold: 7.0,
            emp_threshold: 3.0,
            accept_empathy_delta: 1.0,
            accept_resentment_delta: 1.0,
            reject_empathy_delta: 1.0,
            reject_resentment_delta: 1.0,
            allow_deescalation: false,
            selection_mode: SelectionMode::Random,
            landmark_count: 4,
            broadcasting_enabled: false,
            influence_probability: 0.2,
            max_ticks: 50,
            vengeful_stop_after: None,
            random_seed: None,
            initial_disposition_ratios: DispositionRatios::default(),
        }
    }
}

impl SimulationConfig {
    /// Check every parameter constraint, reporting the first violation.
    ///
    /// Topology constraints (`mean_degree`) are checked by the generator.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.node_count == 0 {
            return Err(ConfigError::invalid("node_count", "must be positive"));
        }
        if u32::try_from(self.node_count).is_err() {
            return Err(ConfigError::invalid(
                "node_count",
                format!("must fit in 32 bits, got {}", self.node_count),
            ));
        }
        check_unit_interval("rewiring_probability", self.rewiring_probability)?;
        check_unit_interval("influence_probability", self.influence_probability)?;
        self.initial_disposition_ratios.validate()?;

        if !self.clamp_min.is_finite() || !self.clamp_max.is_finite() {
            return Err(ConfigError::invalid("clamp_min", "clamp bounds must be finite"));
        }
        if self.clamp_min >= self.clamp_max {
            return Err(ConfigError::invalid(
                "clamp_max",
                format!(
                    "must exceed clamp_min ({}), got {}",
                    self.clamp_min, self.clamp_max
                ),
            ));
        }
        for (name, value) in [
            ("empathy_init", self.empathy_init),
            ("resentment_init", self.resentment_init),
            ("res_threshold", self.res_threshold),
            ("emp_threshold", self.emp_threshold),
        ] {
            self.check_in_clamp(name, value)?;
        }
        for (name, value) in [
            ("accept_empathy_delta", self.accept_empathy_delta),
            ("accept_resentment_delta", self.accept_resentment_delta),
            ("reject_empathy_delta", self.reject_empathy_delta),
            ("reject_resentment_delta", self.reject_resentment_delta),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid(
                    name,
                    format!("must be a non-negative number, got {}", value),
                ));
            }
        }

        if self.landmark_count == 0 {
            return Err(ConfigError::invalid("landmark_count", "must be positive"));
        }
        if self.max_ticks == 0 {
            return Err(ConfigError::invalid("max_ticks", "must be positive"));
        }
        if self.vengeful_stop_after == Some(0) {
            return Err(ConfigError::invalid(
                "vengeful_stop_after",
                "must be positive when set",
            ));
        }
        Ok(())
    }

    fn check_in_clamp(&self, name: &'static str, value: f64) -> Result<(), ConfigError> {
        if value.is_finite() && (self.clamp_min..=self.clamp_max).contains(&value) {
            Ok(())
        } else {
            Err(ConfigError::invalid(
                name,
                format!(
                    "must lie within [{}, {}], got {}",
                    self.clamp_min, self.clamp_max, value
                ),
            ))
        }
    }
}

/// A pair of moral-state thresholds swept together
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdPair {
    pub res_threshold: f64,
    pub emp_threshold: f64,
}

/// Parameter axes of a batch sweep.
///
/// An empty axis keeps the base configuration's value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Independent runs per cell
    pub replicate_count: u32,
    /// Worker threads for the batch; 1 runs sequentially
    pub worker_threads: usize,
    pub rewiring_probabilities: Vec<f64>,
    pub mean_degrees: Vec<usize>,
    pub broadcasting: Vec<bool>,
    pub threshold_pairs: Vec<ThresholdPair>,
    pub disposition_mixes: Vec<DispositionRatios>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            replicate_count: 5,
            worker_threads: 1,
            rewiring_probabilities: Vec::new(),
            mean_degrees: Vec::new(),
            broadcasting: Vec::new(),
            threshold_pairs: Vec::new(),
            disposition_mixes: Vec::new(),
        }
    }
}

/// Complete experiment file: base run parameters plus an optional sweep.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExperimentConfig {
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub sweep: SweepConfig,
}

impl ExperimentConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

fn check_unit_interval(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            name,
            format!("must lie within [0, 1], got {}", value),
        ))
    }
}
