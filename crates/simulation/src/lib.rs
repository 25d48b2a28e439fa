//! Deterministic discrete-event simulation of process models.
//!
//! Given the same model (including its seed) a run produces identical
//! results every time. All randomness comes from one [`Mulberry32`] stream
//! consumed in event order.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                       SimEngine                         │
//! │                                                         │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │     Event Queue (BinaryHeap<SimEvent>)             │ │
//! │  │     Ordered by: time, priority, sequence           │ │
//! │  └────────────────────────┬───────────────────────────┘ │
//! │                           │                             │
//! │                           ▼                             │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │     handlers: Vec<NodeHandler>                     │ │
//! │  │     Source → Queue → Process → Sink                │ │
//! │  └────────────────────────┬───────────────────────────┘ │
//! │                           │                             │
//! │                           ▼                             │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │     StatsCollector → NodeMetrics, TimeSeries       │ │
//! │  └────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────┘
//! ```

mod bottleneck;
mod config;
mod distributions;
mod engine;
mod entity;
mod error;
mod event_queue;
pub mod handlers;
mod progress;
mod resource_pool;
mod rng;
mod stats;

pub use bottleneck::{detect_bottlenecks, BottleneckThresholds};
pub use config::EngineConfig;
pub use distributions::sample;
pub use engine::{RunStats, SimEngine};
pub use entity::{Entity, EntityId};
pub use error::SimulationError;
pub use event_queue::{EventKind, EventQueue, SimEvent};
pub use progress::ProgressObserver;
pub use resource_pool::ResourcePool;
pub use rng::{unit_f64, Mulberry32};
pub use stats::{StatsCollector, WipSnapshot};

/// Index of a node within its model's node list.
///
/// Handlers and events address nodes by position; [`flowsim_types::NodeId`]
/// is only used at the edges of a run.
pub type NodeIndex = u32;
