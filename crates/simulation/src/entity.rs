//! Entities flowing through the process graph.

use crate::NodeIndex;
use std::fmt;

/// Identifier of an entity, unique within one run.
///
/// Sources number their own entities, so the id is the creating source plus
/// that source's counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId {
    pub source: NodeIndex,
    pub seq: u64,
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e-{}-{}", self.source, self.seq)
    }
}

/// A transient item moving from a source to a sink.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    pub created_at: f64,
    /// Node the entity was last routed to.
    pub current_node: NodeIndex,
    /// Lower values are served first by priority queues.
    pub priority: i32,
}
