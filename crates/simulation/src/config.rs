//! Engine tunables that are not part of the model.

use flowsim_types::constants::{
    DEFAULT_MAX_EVENTS, DEFAULT_PROGRESS_INTERVAL_PERCENT, DEFAULT_TIME_SERIES_POINTS,
};

/// Configuration for the engine itself.
///
/// None of these settings change what a completed run computes, only how
/// far it may go and how finely it is reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Events processed before the run is aborted as runaway.
    pub max_events: u64,

    /// Number of intervals in the time series. One more sample than this is
    /// taken so that both window ends are included.
    pub time_series_points: usize,

    /// Progress is reported each time simulated time crosses another
    /// multiple of this percentage.
    pub progress_interval_percent: u8,
}

impl EngineConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self {
            max_events: DEFAULT_MAX_EVENTS,
            time_series_points: DEFAULT_TIME_SERIES_POINTS,
            progress_interval_percent: DEFAULT_PROGRESS_INTERVAL_PERCENT,
        }
    }

    /// Set the safety cap on processed events.
    pub fn with_max_events(mut self, max_events: u64) -> Self {
        self.max_events = max_events;
        self
    }

    /// Set the number of time series intervals. Zero is treated as one.
    pub fn with_time_series_points(mut self, points: usize) -> Self {
        self.time_series_points = points.max(1);
        self
    }

    /// Set the progress reporting granularity, clamped to `1..=100`.
    pub fn with_progress_interval_percent(mut self, percent: u8) -> Self {
        self.progress_interval_percent = percent.clamp(1, 100);
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.max_events, 1_000_000);
        assert_eq!(config.time_series_points, 100);
        assert_eq!(config.progress_interval_percent, 10);
    }

    #[test]
    fn test_builders_clamp() {
        let config = EngineConfig::new()
            .with_max_events(50)
            .with_time_series_points(0)
            .with_progress_interval_percent(0);
        assert_eq!(config.max_events, 50);
        assert_eq!(config.time_series_points, 1);
        assert_eq!(config.progress_interval_percent, 1);

        let config = EngineConfig::new().with_progress_interval_percent(250);
        assert_eq!(config.progress_interval_percent, 100);
    }
}
