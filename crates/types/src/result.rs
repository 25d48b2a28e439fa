//! Output of a simulation run.

use crate::NodeId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// System-wide summary over the measurement window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimSummary {
    /// Departures per unit time in the measurement window.
    pub throughput: f64,
    /// Mean creation-to-departure time of entities that departed.
    pub avg_lead_time: f64,
    /// Time-weighted mean work in progress.
    #[serde(rename = "avgWIP")]
    pub avg_wip: f64,
    /// Entities created in the measurement window.
    pub total_entities: u64,
    /// Simulation horizon.
    pub simulated_time: f64,
}

/// Final metrics for one process or queue node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeMetrics {
    /// Busy fraction of the node's resources, in `[0, 1]`.
    pub utilization: f64,
    pub avg_queue_length: f64,
    pub avg_wait_time: f64,
    pub avg_service_time: f64,
    pub processed: u64,
}

/// A node flagged as constraining throughput.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bottleneck {
    pub node_id: NodeId,
    pub utilization: f64,
    pub avg_queue_length: f64,
}

/// Evenly spaced samples over the measurement window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeries {
    pub timestamps: Vec<f64>,
    pub wip: Vec<u64>,
    pub throughput_cumulative: Vec<u64>,
}

impl TimeSeries {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// Complete result of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimResult {
    pub summary: SimSummary,
    /// Keyed by node id, in a stable order.
    pub node_metrics: IndexMap<NodeId, NodeMetrics>,
    pub bottlenecks: Vec<Bottleneck>,
    pub time_series: TimeSeries,
}
