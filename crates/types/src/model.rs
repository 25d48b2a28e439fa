//! The declarative process model: a directed graph of nodes and edges.

use crate::constants::{
    DEFAULT_INTER_ARRIVAL, DEFAULT_PROCESS_NAME, DEFAULT_QUEUE_CAPACITY,
    DEFAULT_QUEUE_DISCIPLINE, DEFAULT_RESOURCE_COUNT, DEFAULT_SERVICE_TIME,
};
use crate::{Distribution, EdgeId, NodeId, SimConfig};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order in which a queue releases buffered entities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QueueDiscipline {
    /// Oldest entity first.
    #[default]
    Fifo,
    /// Newest entity first.
    Lifo,
    /// Lowest priority value first; ties go to the earliest buffered.
    Priority,
}

/// Parameters for a source node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceParams {
    pub inter_arrival_time: Distribution,
}

impl Default for SourceParams {
    fn default() -> Self {
        Self {
            inter_arrival_time: DEFAULT_INTER_ARRIVAL,
        }
    }
}

/// Parameters for a queue node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueParams {
    /// Maximum buffered entities. Zero means unbounded.
    pub capacity: usize,
    pub discipline: QueueDiscipline,
}

impl Default for QueueParams {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_QUEUE_CAPACITY,
            discipline: DEFAULT_QUEUE_DISCIPLINE,
        }
    }
}

/// Parameters for a process node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessParams {
    pub service_time: Distribution,
    /// Number of identical resources serving in parallel.
    pub resource_count: u32,
    pub name: String,
}

impl Default for ProcessParams {
    fn default() -> Self {
        Self {
            service_time: DEFAULT_SERVICE_TIME,
            resource_count: DEFAULT_RESOURCE_COUNT,
            name: DEFAULT_PROCESS_NAME.to_string(),
        }
    }
}

/// Parameters for a sink node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SinkParams {
    pub collect_stats: bool,
}

impl Default for SinkParams {
    fn default() -> Self {
        Self {
            collect_stats: true,
        }
    }
}

/// Type-specific node parameters, tagged by node type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "params", rename_all = "lowercase")]
pub enum NodeParams {
    Source(SourceParams),
    Queue(QueueParams),
    Process(ProcessParams),
    Sink(SinkParams),
}

/// Node type without its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Source,
    Queue,
    Process,
    Sink,
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NodeType::Source => "source",
            NodeType::Queue => "queue",
            NodeType::Process => "process",
            NodeType::Sink => "sink",
        };
        f.write_str(s)
    }
}

impl NodeParams {
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeParams::Source(_) => NodeType::Source,
            NodeParams::Queue(_) => NodeType::Queue,
            NodeParams::Process(_) => NodeType::Process,
            NodeParams::Sink(_) => NodeType::Sink,
        }
    }
}

/// A node in the process graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimNode {
    pub id: NodeId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(flatten)]
    pub params: NodeParams,
}

impl SimNode {
    pub fn new(id: impl Into<NodeId>, params: NodeParams) -> Self {
        Self {
            id: id.into(),
            label: None,
            params,
        }
    }

    /// A source emitting entities with the given inter-arrival distribution.
    pub fn source(id: impl Into<NodeId>, inter_arrival_time: Distribution) -> Self {
        Self::new(id, NodeParams::Source(SourceParams { inter_arrival_time }))
    }

    /// A buffering queue. `capacity == 0` means unbounded.
    pub fn queue(id: impl Into<NodeId>, capacity: usize, discipline: QueueDiscipline) -> Self {
        Self::new(
            id,
            NodeParams::Queue(QueueParams {
                capacity,
                discipline,
            }),
        )
    }

    /// A process with `resource_count` parallel resources.
    pub fn process(
        id: impl Into<NodeId>,
        service_time: Distribution,
        resource_count: u32,
    ) -> Self {
        let id = id.into();
        let name = id.0.clone();
        Self::new(
            id,
            NodeParams::Process(ProcessParams {
                service_time,
                resource_count,
                name,
            }),
        )
    }

    /// A terminal sink.
    pub fn sink(id: impl Into<NodeId>) -> Self {
        Self::new(id, NodeParams::Sink(SinkParams::default()))
    }

    /// Attach a display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn node_type(&self) -> NodeType {
        self.params.node_type()
    }
}

/// Directed arc between two nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimEdge {
    pub id: EdgeId,
    pub from: NodeId,
    pub to: NodeId,
}

impl SimEdge {
    pub fn new(id: impl Into<EdgeId>, from: impl Into<NodeId>, to: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            from: from.into(),
            to: to.into(),
        }
    }
}

/// A complete model for one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessModel {
    pub id: String,
    pub name: String,
    pub nodes: Vec<SimNode>,
    pub edges: Vec<SimEdge>,
    pub config: SimConfig,
}

impl ProcessModel {
    /// Create an empty model with default config.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            nodes: Vec::new(),
            edges: Vec::new(),
            config: SimConfig::default(),
        }
    }

    /// Add a node.
    pub fn with_node(mut self, node: SimNode) -> Self {
        self.nodes.push(node);
        self
    }

    /// Add an edge. The edge id is derived from its position.
    pub fn with_edge(mut self, from: impl Into<NodeId>, to: impl Into<NodeId>) -> Self {
        let id = format!("e{}", self.edges.len() + 1);
        self.edges.push(SimEdge::new(id, from, to));
        self
    }

    /// Replace the config.
    pub fn with_config(mut self, config: SimConfig) -> Self {
        self.config = config;
        self
    }

    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Option<&SimNode> {
        self.nodes.iter().find(|n| n.id.as_str() == id)
    }

    /// Iterate over nodes of one type.
    pub fn nodes_of_type(&self, node_type: NodeType) -> impl Iterator<Item = &SimNode> {
        self.nodes
            .iter()
            .filter(move |n| n.node_type() == node_type)
    }
}
