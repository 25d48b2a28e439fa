//! Error types for simulation runs.

use crate::event_queue::EventKind;
use crate::{EntityId, NodeIndex};
use flowsim_types::{NodeId, NodeType};
use thiserror::Error;

/// Failure of a single run.
///
/// Dropped entities are modeled behavior and never surface here. Every
/// variant means the run's result would be wrong and must be discarded.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Service started on a process with every resource busy.
    #[error("Process {node}: no resource available at time {time}")]
    ResourceUnavailable { node: NodeId, time: f64 },

    /// The safety cap on processed events was hit before the horizon.
    #[error("Event limit of {limit} reached at time {time} before the horizon")]
    EventLimitExceeded { limit: u64, time: f64 },

    /// An event addressed a node index outside the model.
    #[error("Event addressed to unknown node index {node}")]
    UnknownNode { node: NodeIndex },

    /// An event reached a node that cannot handle it.
    #[error("Event for node {node} requires a {expected} node")]
    UnexpectedNode { node: NodeId, expected: NodeType },

    /// An event referenced an entity that is no longer in the system.
    #[error("Entity {entity} is not in the system")]
    UnknownEntity { entity: EntityId },

    /// An entity event was scheduled without naming its entity.
    #[error("{kind} event carries no entity")]
    MissingEntity { kind: EventKind },
}
