//! Entity generation.

use crate::distributions::sample;
use crate::event_queue::{EventKind, EventQueue, SimEvent};
use crate::{Entity, EntityId, NodeIndex};
use flowsim_types::{Distribution, SourceParams};
use rand::RngCore;

/// Stateless generator apart from its entity counter.
#[derive(Debug)]
pub struct SourceHandler {
    node: NodeIndex,
    inter_arrival_time: Distribution,
    downstream: Option<NodeIndex>,
    created: u64,
}

impl SourceHandler {
    pub fn new(node: NodeIndex, params: &SourceParams, downstream: Option<NodeIndex>) -> Self {
        Self {
            node,
            inter_arrival_time: params.inter_arrival_time,
            downstream,
            created: 0,
        }
    }

    /// Schedule the first arrival at time zero.
    pub fn init(&self, events: &mut EventQueue) {
        events.enqueue(SimEvent::creation(0.0, self.node));
    }

    /// Number of entities this source has created.
    pub fn created(&self) -> u64 {
        self.created
    }

    /// Create an entity at `event.time`, schedule the next arrival if it
    /// falls strictly before `horizon`, and route the entity to the first
    /// downstream node.
    pub fn handle_entity_created<R: RngCore + ?Sized>(
        &mut self,
        event: &SimEvent,
        horizon: f64,
        rng: &mut R,
        events: &mut EventQueue,
    ) -> Entity {
        self.created += 1;
        let mut entity = Entity {
            id: EntityId {
                source: self.node,
                seq: self.created,
            },
            created_at: event.time,
            current_node: self.node,
            priority: 0,
        };

        let next = event.time + sample(&self.inter_arrival_time, rng);
        if next < horizon {
            events.enqueue(SimEvent::creation(next, self.node));
        }

        if let Some(target) = self.downstream {
            entity.current_node = target;
            events.enqueue(SimEvent::for_entity(
                event.time,
                EventKind::EntityEnqueued,
                entity.id,
                target,
                entity.priority,
            ));
        }

        entity
    }
}
