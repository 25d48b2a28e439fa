//! Core types for flowsim process models.
//!
//! A [`ProcessModel`] is a directed graph of source, queue, process and sink
//! nodes plus a [`SimConfig`]. Running it produces a [`SimResult`]. Both are
//! serialized with the camelCase field names used by the persistence and
//! reporting layers, so field names here must not drift.

pub mod constants;

mod config;
mod distribution;
mod identifiers;
mod model;
mod result;

pub use config::{SimConfig, SimConfigOverrides, TimeUnit};
pub use distribution::Distribution;
pub use identifiers::{EdgeId, NodeId};
pub use model::{
    NodeParams, NodeType, ProcessModel, ProcessParams, QueueDiscipline, QueueParams, SimEdge,
    SimNode, SinkParams, SourceParams,
};
pub use result::{Bottleneck, NodeMetrics, SimResult, SimSummary, TimeSeries};
