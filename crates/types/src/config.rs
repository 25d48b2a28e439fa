//! Run configuration and caller-supplied overrides.

use crate::constants::{DEFAULT_DURATION, DEFAULT_SEED, DEFAULT_WARMUP_PERIOD};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unit the model's times are expressed in. Informational only; the engine
/// treats all times as plain numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Sec,
    #[default]
    Min,
    Hour,
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TimeUnit::Sec => "sec",
            TimeUnit::Min => "min",
            TimeUnit::Hour => "hour",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for TimeUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sec" | "s" => Ok(TimeUnit::Sec),
            "min" | "m" => Ok(TimeUnit::Min),
            "hour" | "h" => Ok(TimeUnit::Hour),
            _ => Err(format!("Unknown time unit: {}", s)),
        }
    }
}

/// Configuration for a single simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimConfig {
    /// Seed for the run's random stream. Only the low 32 bits are used.
    pub seed: i64,

    /// Simulation horizon. Events after this time are never processed.
    pub duration: f64,

    /// Unit of all times in the model.
    pub time_unit: TimeUnit,

    /// Start of the measurement window. The clock still runs from zero.
    pub warmup_period: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            duration: DEFAULT_DURATION,
            time_unit: TimeUnit::default(),
            warmup_period: DEFAULT_WARMUP_PERIOD,
        }
    }
}

impl SimConfig {
    /// Create a config with the given horizon and no warmup.
    pub fn new(seed: i64, duration: f64) -> Self {
        Self {
            seed,
            duration,
            warmup_period: 0.0,
            ..Default::default()
        }
    }

    /// Set the seed.
    pub fn with_seed(mut self, seed: i64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the simulation horizon.
    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = duration;
        self
    }

    /// Set the warmup period.
    pub fn with_warmup_period(mut self, warmup_period: f64) -> Self {
        self.warmup_period = warmup_period;
        self
    }

    /// Set the time unit.
    pub fn with_time_unit(mut self, time_unit: TimeUnit) -> Self {
        self.time_unit = time_unit;
        self
    }

    /// Merge a partial config on top of this one. Fields absent from
    /// `overrides` keep their current value.
    pub fn with_overrides(self, overrides: &SimConfigOverrides) -> Self {
        Self {
            seed: overrides.seed.unwrap_or(self.seed),
            duration: overrides.duration.unwrap_or(self.duration),
            time_unit: overrides.time_unit.unwrap_or(self.time_unit),
            warmup_period: overrides.warmup_period.unwrap_or(self.warmup_period),
        }
    }

    /// Length of the measurement window `[warmup_period, duration]`.
    pub fn measured_duration(&self) -> f64 {
        self.duration - self.warmup_period
    }
}

/// Partial [`SimConfig`] supplied by a caller at run time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimConfigOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_unit: Option<TimeUnit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warmup_period: Option<f64>,
}

impl SimConfigOverrides {
    /// True if no field is overridden.
    pub fn is_empty(&self) -> bool {
        self.seed.is_none()
            && self.duration.is_none()
            && self.time_unit.is_none()
            && self.warmup_period.is_none()
    }
}
