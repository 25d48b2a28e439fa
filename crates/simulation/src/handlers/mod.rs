//! Per-node-type behavior.
//!
//! Each node in the model gets exactly one handler. Handlers own the node's
//! state (buffers, resources, counters) and schedule follow-up events; the
//! engine decides which handler an event goes to.

mod process;
mod queue;
mod sink;
mod source;

pub use process::ProcessHandler;
pub use queue::{QueueHandler, QueueSnapshot};
pub use sink::{Departure, SinkHandler};
pub use source::SourceHandler;

use crate::NodeIndex;
use flowsim_types::{NodeParams, NodeType, SimNode};

/// The handler for one node.
#[derive(Debug)]
pub enum NodeHandler {
    Source(SourceHandler),
    Queue(QueueHandler),
    Process(ProcessHandler),
    Sink(SinkHandler),
}

impl NodeHandler {
    /// Build the handler for `node`. `downstream` is the node's first
    /// outgoing neighbor, if any.
    pub fn new(node: &SimNode, index: NodeIndex, downstream: Option<NodeIndex>) -> Self {
        match &node.params {
            NodeParams::Source(params) => {
                NodeHandler::Source(SourceHandler::new(index, params, downstream))
            }
            NodeParams::Queue(params) => NodeHandler::Queue(QueueHandler::new(params)),
            NodeParams::Process(params) => NodeHandler::Process(ProcessHandler::new(
                node.id.clone(),
                index,
                params,
                downstream,
            )),
            NodeParams::Sink(params) => NodeHandler::Sink(SinkHandler::new(params)),
        }
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            NodeHandler::Source(_) => NodeType::Source,
            NodeHandler::Queue(_) => NodeType::Queue,
            NodeHandler::Process(_) => NodeType::Process,
            NodeHandler::Sink(_) => NodeType::Sink,
        }
    }
}
