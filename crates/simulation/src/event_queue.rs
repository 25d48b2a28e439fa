//! Event queue with deterministic ordering.

use crate::{EntityId, NodeIndex};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;

/// What happened to an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A source emits a new entity.
    EntityCreated,
    /// An entity arrives at a node. The engine decides what that means
    /// from the node's type.
    EntityEnqueued,
    /// An entity begins service at a process.
    ServiceStart,
    /// An entity finishes service at a process.
    ServiceEnd,
    /// An entity leaves the system at a sink.
    EntityDeparted,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EventKind::EntityCreated => "ENTITY_CREATED",
            EventKind::EntityEnqueued => "ENTITY_ENQUEUED",
            EventKind::ServiceStart => "SERVICE_START",
            EventKind::ServiceEnd => "SERVICE_END",
            EventKind::EntityDeparted => "ENTITY_DEPARTED",
        };
        f.write_str(s)
    }
}

/// A scheduled event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimEvent {
    pub time: f64,
    pub kind: EventKind,
    /// `None` only for [`EventKind::EntityCreated`], before the entity exists.
    pub entity: Option<EntityId>,
    pub node: NodeIndex,
    /// Lower runs first among events at the same time.
    pub priority: i32,
}

impl SimEvent {
    /// Event for an entity that already exists.
    pub fn for_entity(
        time: f64,
        kind: EventKind,
        entity: EntityId,
        node: NodeIndex,
        priority: i32,
    ) -> Self {
        Self {
            time,
            kind,
            entity: Some(entity),
            node,
            priority,
        }
    }

    /// Creation event at a source.
    pub fn creation(time: f64, node: NodeIndex) -> Self {
        Self {
            time,
            kind: EventKind::EntityCreated,
            entity: None,
            node,
            priority: 0,
        }
    }
}

/// Heap entry. Ordered so that `BinaryHeap`, a max-heap, pops the smallest
/// `(time, priority, sequence)` first.
#[derive(Debug)]
struct Entry {
    event: SimEvent,
    sequence: u64,
}

impl Entry {
    fn key_cmp(&self, other: &Self) -> Ordering {
        self.event
            .time
            .total_cmp(&other.event.time)
            .then(self.event.priority.cmp(&other.event.priority))
            .then(self.sequence.cmp(&other.sequence))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        other.key_cmp(self)
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.key_cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

/// Min-priority queue of events keyed by `(time, priority)`.
///
/// Events with equal time and priority come out in insertion order.
#[derive(Debug, Default)]
pub struct EventQueue {
    heap: BinaryHeap<Entry>,
    sequence: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule an event.
    pub fn enqueue(&mut self, event: SimEvent) {
        let sequence = self.sequence;
        self.sequence += 1;
        self.heap.push(Entry { event, sequence });
    }

    /// Remove the earliest event, or `None` if the queue is empty.
    pub fn dequeue(&mut self) -> Option<SimEvent> {
        self.heap.pop().map(|entry| entry.event)
    }

    /// The earliest event without removing it.
    pub fn peek(&self) -> Option<&SimEvent> {
        self.heap.peek().map(|entry| &entry.event)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Drop every pending event.
    pub fn clear(&mut self) {
        self.heap.clear();
    }
}
