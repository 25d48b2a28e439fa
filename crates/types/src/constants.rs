//! Shared defaults and limits.

use crate::{Distribution, QueueDiscipline};

/// Maximum number of nodes allowed in a process model.
pub const MAX_NODES: usize = 50;

/// Maximum simulated duration (24 hours expressed in seconds).
pub const MAX_SIMULATION_DURATION: f64 = 86_400.0;

/// Utilization above this value flags a node as a bottleneck.
pub const BOTTLENECK_UTILIZATION_THRESHOLD: f64 = 0.85;

/// Average queue length above this value flags a node as a bottleneck.
pub const BOTTLENECK_QUEUE_THRESHOLD: f64 = 1.0;

/// At most this many bottlenecks are reported.
pub const MAX_REPORTED_BOTTLENECKS: usize = 3;

pub const DEFAULT_SEED: i64 = 42;
pub const DEFAULT_DURATION: f64 = 480.0;
pub const DEFAULT_WARMUP_PERIOD: f64 = 60.0;

pub const DEFAULT_INTER_ARRIVAL: Distribution = Distribution::Exponential { mean: 5.0 };
pub const DEFAULT_SERVICE_TIME: Distribution = Distribution::Exponential { mean: 4.0 };
pub const DEFAULT_RESOURCE_COUNT: u32 = 1;
pub const DEFAULT_PROCESS_NAME: &str = "Process";

/// Capacity 0 means the queue never rejects.
pub const DEFAULT_QUEUE_CAPACITY: usize = 0;
pub const DEFAULT_QUEUE_DISCIPLINE: QueueDiscipline = QueueDiscipline::Fifo;

/// Safety cap on events processed in one run.
pub const DEFAULT_MAX_EVENTS: u64 = 1_000_000;

/// Time series intervals over the measurement window.
pub const DEFAULT_TIME_SERIES_POINTS: usize = 100;

pub const DEFAULT_PROGRESS_INTERVAL_PERCENT: u8 = 10;
