//! Service execution on a pool of resources.

use crate::distributions::sample;
use crate::event_queue::{EventKind, EventQueue, SimEvent};
use crate::resource_pool::ResourcePool;
use crate::{EntityId, NodeIndex, SimulationError};
use flowsim_types::{Distribution, NodeId, ProcessParams};
use rand::RngCore;

/// State of one process node.
///
/// Routing claims a resource with [`reserve`](Self::reserve) when it
/// schedules a service start, so that several routings at the same instant
/// cannot all see the same free resource.
#[derive(Debug)]
pub struct ProcessHandler {
    id: NodeId,
    node: NodeIndex,
    service_time: Distribution,
    downstream: Option<NodeIndex>,
    pool: ResourcePool,
    reserved: u32,
    total_service_time: f64,
    started: u64,
    processed: u64,
}

impl ProcessHandler {
    pub fn new(
        id: NodeId,
        node: NodeIndex,
        params: &ProcessParams,
        downstream: Option<NodeIndex>,
    ) -> Self {
        Self {
            id,
            node,
            service_time: params.service_time,
            downstream,
            pool: ResourcePool::new(params.resource_count),
            reserved: 0,
            total_service_time: 0.0,
            started: 0,
            processed: 0,
        }
    }

    /// True if a resource is free and not already promised to a pending start.
    pub fn has_available_resource(&self) -> bool {
        self.pool.available() > self.reserved
    }

    /// Promise a resource to a service start scheduled for later in this
    /// instant.
    pub fn reserve(&mut self) {
        self.reserved += 1;
    }

    /// Acquire a resource, sample the service time and schedule the end of
    /// service. Fails if no resource is free, which means routing skipped
    /// the availability check.
    pub fn handle_service_start<R: RngCore + ?Sized>(
        &mut self,
        event: &SimEvent,
        entity: EntityId,
        rng: &mut R,
        events: &mut EventQueue,
    ) -> Result<f64, SimulationError> {
        self.reserved = self.reserved.saturating_sub(1);
        if !self.pool.acquire(event.time) {
            return Err(SimulationError::ResourceUnavailable {
                node: self.id.clone(),
                time: event.time,
            });
        }

        let service_time = sample(&self.service_time, rng);
        self.total_service_time += service_time;
        self.started += 1;

        events.enqueue(SimEvent::for_entity(
            event.time + service_time,
            EventKind::ServiceEnd,
            entity,
            self.node,
            event.priority,
        ));
        Ok(service_time)
    }

    /// Release the resource and route the entity to the first downstream
    /// node. Returns that node, if any.
    pub fn handle_service_end(
        &mut self,
        event: &SimEvent,
        entity: EntityId,
        events: &mut EventQueue,
    ) -> Option<NodeIndex> {
        self.pool.release(event.time);
        self.processed += 1;

        let target = self.downstream?;
        events.enqueue(SimEvent::for_entity(
            event.time,
            EventKind::EntityEnqueued,
            entity,
            target,
            event.priority,
        ));
        Some(target)
    }

    /// Entities that completed service.
    pub fn processed(&self) -> u64 {
        self.processed
    }

    /// Mean sampled service time over every service started.
    pub fn avg_service_time(&self) -> f64 {
        if self.started == 0 {
            return 0.0;
        }
        self.total_service_time / self.started as f64
    }

    pub fn utilization(&self, total_time: f64) -> f64 {
        self.pool.utilization(total_time)
    }

    pub fn busy(&self) -> u32 {
        self.pool.busy()
    }
}
