//! Validation issue types.

use flowsim_types::{EdgeId, NodeId};
use thiserror::Error;

/// One violated rule.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationIssue {
    #[error("Model must have at least one Source node")]
    MissingSource,

    #[error("Model must have at least one Sink node")]
    MissingSink,

    #[error("Model has {count} nodes, at most {max} are allowed")]
    TooManyNodes { count: usize, max: usize },

    #[error("Node at position {index} has an empty id")]
    EmptyNodeId { index: usize },

    #[error("Duplicate node id: \"{id}\"")]
    DuplicateNodeId { id: NodeId },

    #[error("Edge \"{edge}\" references unknown source node \"{node}\"")]
    UnknownEdgeSource { edge: EdgeId, node: NodeId },

    #[error("Edge \"{edge}\" references unknown target node \"{node}\"")]
    UnknownEdgeTarget { edge: EdgeId, node: NodeId },

    /// Sources only emit; nothing may route into them.
    #[error("Edge \"{edge}\" leads into Source node \"{node}\"")]
    EdgeIntoSource { edge: EdgeId, node: NodeId },

    /// Sinks are terminal.
    #[error("Edge \"{edge}\" leaves Sink node \"{node}\"")]
    EdgeFromSink { edge: EdgeId, node: NodeId },

    #[error("Node \"{id}\" is isolated (no edges)")]
    IsolatedNode { id: NodeId },

    #[error("Graph is not connected: {unreachable} node(s) are unreachable")]
    Disconnected { unreachable: usize },

    #[error("Node \"{node}\" {field}: {issue}")]
    InvalidDistribution {
        node: NodeId,
        field: &'static str,
        issue: DistributionIssue,
    },

    /// A source whose arrivals never advance time would never let the run
    /// reach its horizon.
    #[error("Source \"{node}\": interArrivalTime must have a positive mean")]
    ZeroInterArrival { node: NodeId },

    #[error("Process \"{node}\": resourceCount must be >= 1")]
    NoResources { node: NodeId },

    #[error("Simulation duration must be > 0 (got {duration})")]
    NonPositiveDuration { duration: f64 },

    #[error("Simulation duration {duration} exceeds the maximum of {max}")]
    DurationTooLong { duration: f64, max: f64 },

    #[error("Warmup period must be >= 0 (got {warmup})")]
    NegativeWarmup { warmup: f64 },

    #[error("Warmup period {warmup} leaves nothing of the {duration} run to measure")]
    WarmupCoversRun { warmup: f64, duration: f64 },
}

/// Problem with the parameters of a distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DistributionIssue {
    #[error("parameters must be finite numbers")]
    NonFinite,

    #[error("fixed value must be >= 0")]
    NegativeFixed,

    #[error("exponential mean must be > 0")]
    NonPositiveMean,

    #[error("normal stddev must be >= 0")]
    NegativeStddev,

    #[error("{kind} min must be >= 0")]
    NegativeMin { kind: &'static str },

    #[error("{kind} max must be >= min")]
    MaxBelowMin { kind: &'static str },

    #[error("triangular mode must be between min and max")]
    ModeOutOfRange,
}
