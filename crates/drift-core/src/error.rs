//! Error Types
//!
//! Configuration failures are fatal for the run that hit them; aggregation
//! failures are scoped to a single batch cell.

use serde::Serialize;
use thiserror::Error;

use crate::batch::CellKey;

/// Invalid or unreadable configuration.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigError {
    /// A parameter violated its constraint
    #[error("invalid `{parameter}`: {reason}")]
    Invalid {
        parameter: &'static str,
        reason: String,
    },
    #[error("IO error: {0}")]
    Io(String),
    #[error("TOML parse error: {0}")]
    Parse(String),
}

impl ConfigError {
    pub fn invalid(parameter: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            parameter,
            reason: reason.into(),
        }
    }

    /// Name of the offending parameter, if the error is a constraint violation
    pub fn parameter(&self) -> Option<&'static str> {
        match self {
            ConfigError::Invalid { parameter, .. } => Some(parameter),
            _ => None,
        }
    }
}

/// A batch cell in which no run completed.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[error("batch cell {cell} produced no successful runs: {cause}")]
pub struct AggregationError {
    pub cell: CellKey,
    pub cause: ConfigError,
}
