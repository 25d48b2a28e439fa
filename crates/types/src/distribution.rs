//! Probability distributions for inter-arrival and service times.

use serde::{Deserialize, Serialize};

/// A distribution of non-negative durations.
///
/// Serialized with a `type` tag, e.g. `{"type": "exponential", "mean": 5}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Distribution {
    /// Always the same value.
    Fixed { value: f64 },

    /// Exponential with the given mean (not rate).
    Exponential { mean: f64 },

    /// Gaussian with mean and standard deviation.
    Normal { mean: f64, stddev: f64 },

    /// Continuous uniform on `[min, max)`.
    Uniform { min: f64, max: f64 },

    /// Triangular with lower bound, mode and upper bound.
    Triangular { min: f64, mode: f64, max: f64 },
}

impl Distribution {
    /// Short lower-case name of the distribution family.
    pub fn kind(&self) -> &'static str {
        match self {
            Distribution::Fixed { .. } => "fixed",
            Distribution::Exponential { .. } => "exponential",
            Distribution::Normal { .. } => "normal",
            Distribution::Uniform { .. } => "uniform",
            Distribution::Triangular { .. } => "triangular",
        }
    }

    /// Expected value before clamping to zero.
    pub fn mean(&self) -> f64 {
        match *self {
            Distribution::Fixed { value } => value,
            Distribution::Exponential { mean } => mean,
            Distribution::Normal { mean, .. } => mean,
            Distribution::Uniform { min, max } => (min + max) / 2.0,
            Distribution::Triangular { min, mode, max } => (min + mode + max) / 3.0,
        }
    }
}
