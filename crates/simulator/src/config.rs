//! Configuration types for the simulator.

use flowsim_simulation::EngineConfig;
use flowsim_types::{SimConfigOverrides, TimeUnit};

/// Configuration applied to every model the simulator runs.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SimulatorConfig {
    /// Run settings merged over each model's own config.
    pub overrides: SimConfigOverrides,

    /// Engine tunables.
    pub engine: EngineConfig,

    /// Log progress while running.
    pub log_progress: bool,
}

impl SimulatorConfig {
    /// Create a configuration that runs models as they are.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: i64) -> Self {
        self.overrides.seed = Some(seed);
        self
    }

    /// Set the simulation horizon.
    pub fn with_duration(mut self, duration: f64) -> Self {
        self.overrides.duration = Some(duration);
        self
    }

    /// Set the warmup period.
    pub fn with_warmup_period(mut self, warmup_period: f64) -> Self {
        self.overrides.warmup_period = Some(warmup_period);
        self
    }

    /// Set the time unit label.
    pub fn with_time_unit(mut self, time_unit: TimeUnit) -> Self {
        self.overrides.time_unit = Some(time_unit);
        self
    }

    /// Replace all overrides at once.
    pub fn with_overrides(mut self, overrides: SimConfigOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Set the engine configuration.
    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }

    /// Enable or disable progress logging.
    pub fn with_progress_logging(mut self, enabled: bool) -> Self {
        self.log_progress = enabled;
        self
    }
}
