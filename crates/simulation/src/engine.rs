//! The discrete-event loop.

use crate::bottleneck::detect_bottlenecks;
use crate::config::EngineConfig;
use crate::event_queue::{EventKind, EventQueue, SimEvent};
use crate::handlers::{NodeHandler, ProcessHandler, QueueHandler, SinkHandler, SourceHandler};
use crate::progress::{ProgressObserver, ProgressTracker};
use crate::stats::StatsCollector;
use crate::{Entity, EntityId, Mulberry32, NodeIndex, SimulationError};
use flowsim_types::{
    NodeId, NodeMetrics, NodeType, ProcessModel, SimResult, SimSummary, TimeSeries,
};
use indexmap::IndexMap;
use std::collections::HashMap;
use tracing::{debug, info, trace, warn};

/// Counters describing how a run went, beyond what [`SimResult`] reports.
///
/// Unlike the summary these cover the whole run including warmup, so that
/// `entities_created == entities_departed + entities_dropped +
/// entities_in_flight` always holds.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunStats {
    /// Events dispatched.
    pub events_processed: u64,
    /// Entities created by all sources.
    pub entities_created: u64,
    /// Entities that reached a sink.
    pub entities_departed: u64,
    /// Entities lost to full queues, busy processes with no buffer, or
    /// nodes with nowhere to send them.
    pub entities_dropped: u64,
    /// Entities still in the system when the horizon was reached.
    pub entities_in_flight: u64,
}

/// Runs one simulation of a process model.
///
/// The engine reads the model and nothing else: the same model always
/// produces the same result. It assumes the model has passed validation.
pub struct SimEngine<'a> {
    model: &'a ProcessModel,
    config: EngineConfig,
    observer: Option<&'a mut dyn ProgressObserver>,
}

impl<'a> SimEngine<'a> {
    /// Engine with default tunables.
    pub fn new(model: &'a ProcessModel) -> Self {
        Self::with_config(model, EngineConfig::default())
    }

    pub fn with_config(model: &'a ProcessModel, config: EngineConfig) -> Self {
        Self {
            model,
            config,
            observer: None,
        }
    }

    /// Report progress to `observer` while running.
    pub fn with_observer(mut self, observer: &'a mut dyn ProgressObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Run to the horizon and compute the result.
    pub fn run(self) -> Result<SimResult, SimulationError> {
        self.run_with_stats().map(|(result, _)| result)
    }

    /// Like [`run`](Self::run), also returning run counters.
    pub fn run_with_stats(self) -> Result<(SimResult, RunStats), SimulationError> {
        let SimEngine {
            model,
            config,
            observer,
        } = self;

        let mut run = Run::new(model, config);
        let mut progress = ProgressTracker::new(observer, config.progress_interval_percent);

        info!(
            model = %model.id,
            seed = model.config.seed,
            duration = model.config.duration,
            warmup = model.config.warmup_period,
            nodes = model.nodes.len(),
            "Starting simulation"
        );

        run.start();
        run.run_until_horizon(&mut progress)?;
        progress.finish();

        let result = run.finish();
        let stats = run.run_stats();

        info!(
            events_processed = stats.events_processed,
            created = result.summary.total_entities,
            departed = run.stats.total_departed(),
            dropped = stats.entities_dropped,
            "Simulation complete"
        );

        Ok((result, stats))
    }
}

/// Handlers indexed by node position in the model.
struct Nodes {
    handlers: Vec<NodeHandler>,
    ids: Vec<NodeId>,
}

impl Nodes {
    fn id(&self, node: NodeIndex) -> &str {
        self.ids.get(node as usize).map_or("?", NodeId::as_str)
    }

    fn get_mut(&mut self, node: NodeIndex) -> Result<&mut NodeHandler, SimulationError> {
        self.handlers
            .get_mut(node as usize)
            .ok_or(SimulationError::UnknownNode { node })
    }

    fn node_type(&self, node: NodeIndex) -> Result<NodeType, SimulationError> {
        self.handlers
            .get(node as usize)
            .map(NodeHandler::node_type)
            .ok_or(SimulationError::UnknownNode { node })
    }

    fn source_mut(&mut self, node: NodeIndex) -> Result<&mut SourceHandler, SimulationError> {
        match self.handlers.get_mut(node as usize) {
            Some(NodeHandler::Source(h)) => Ok(h),
            _ => Err(unexpected(&self.ids, node, NodeType::Source)),
        }
    }

    fn queue_mut(&mut self, node: NodeIndex) -> Result<&mut QueueHandler, SimulationError> {
        match self.handlers.get_mut(node as usize) {
            Some(NodeHandler::Queue(h)) => Ok(h),
            _ => Err(unexpected(&self.ids, node, NodeType::Queue)),
        }
    }

    fn process_mut(&mut self, node: NodeIndex) -> Result<&mut ProcessHandler, SimulationError> {
        match self.handlers.get_mut(node as usize) {
            Some(NodeHandler::Process(h)) => Ok(h),
            _ => Err(unexpected(&self.ids, node, NodeType::Process)),
        }
    }

    fn sink_mut(&mut self, node: NodeIndex) -> Result<&mut SinkHandler, SimulationError> {
        match self.handlers.get_mut(node as usize) {
            Some(NodeHandler::Sink(h)) => Ok(h),
            _ => Err(unexpected(&self.ids, node, NodeType::Sink)),
        }
    }
}

fn unexpected(ids: &[NodeId], node: NodeIndex, expected: NodeType) -> SimulationError {
    match ids.get(node as usize) {
        Some(id) => SimulationError::UnexpectedNode {
            node: id.clone(),
            expected,
        },
        None => SimulationError::UnknownNode { node },
    }
}

/// Edges as index lists, in the order they appear in the model.
struct Topology {
    downstream: Vec<Vec<NodeIndex>>,
    upstream: Vec<Vec<NodeIndex>>,
}

impl Topology {
    fn downstream(&self, node: NodeIndex) -> &[NodeIndex] {
        self.downstream.get(node as usize).map_or(&[], Vec::as_slice)
    }

    fn upstream(&self, node: NodeIndex) -> &[NodeIndex] {
        self.upstream.get(node as usize).map_or(&[], Vec::as_slice)
    }
}

/// State of one run. Everything here is dropped when the run ends.
struct Run<'m> {
    model: &'m ProcessModel,
    config: EngineConfig,
    duration: f64,
    warmup: f64,
    clock: f64,
    rng: Mulberry32,
    events: EventQueue,
    stats: StatsCollector,
    entities: HashMap<EntityId, Entity>,
    nodes: Nodes,
    topology: Topology,
    counters: RunStats,
}

impl<'m> Run<'m> {
    fn new(model: &'m ProcessModel, config: EngineConfig) -> Self {
        let index: HashMap<&str, NodeIndex> = model
            .nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.id.as_str(), i as NodeIndex))
            .collect();

        let mut downstream = vec![Vec::new(); model.nodes.len()];
        let mut upstream = vec![Vec::new(); model.nodes.len()];
        for edge in &model.edges {
            // Dangling edges are rejected by validation; skip them here.
            let (Some(&from), Some(&to)) =
                (index.get(edge.from.as_str()), index.get(edge.to.as_str()))
            else {
                continue;
            };
            downstream[from as usize].push(to);
            upstream[to as usize].push(from);
        }

        let handlers = model
            .nodes
            .iter()
            .enumerate()
            .map(|(i, node)| NodeHandler::new(node, i as NodeIndex, downstream[i].first().copied()))
            .collect();

        Self {
            model,
            config,
            duration: model.config.duration,
            warmup: model.config.warmup_period,
            clock: 0.0,
            rng: Mulberry32::new(model.config.seed),
            events: EventQueue::new(),
            stats: StatsCollector::new(),
            entities: HashMap::new(),
            nodes: Nodes {
                handlers,
                ids: model.nodes.iter().map(|n| n.id.clone()).collect(),
            },
            topology: Topology {
                downstream,
                upstream,
            },
            counters: RunStats::default(),
        }
    }

    /// Schedule every source's first arrival.
    fn start(&mut self) {
        for handler in &self.nodes.handlers {
            if let NodeHandler::Source(source) = handler {
                source.init(&mut self.events);
            }
        }
    }

    fn run_until_horizon(&mut self, progress: &mut ProgressTracker<'_>) -> Result<(), SimulationError> {
        while let Some(&next) = self.events.peek() {
            if next.time > self.duration {
                debug!(
                    remaining_events = self.events.len(),
                    "Horizon reached"
                );
                break;
            }
            if self.counters.events_processed >= self.config.max_events {
                warn!(
                    limit = self.config.max_events,
                    time = next.time,
                    "Event limit reached before the horizon, aborting run"
                );
                return Err(SimulationError::EventLimitExceeded {
                    limit: self.config.max_events,
                    time: next.time,
                });
            }

            let Some(event) = self.events.dequeue() else {
                break;
            };
            self.clock = event.time;
            self.counters.events_processed += 1;

            trace!(
                time = event.time,
                kind = %event.kind,
                node = self.nodes.id(event.node),
                "Processing event"
            );

            self.dispatch(event)?;
            progress.update(self.clock, self.duration);
        }
        Ok(())
    }

    fn dispatch(&mut self, event: SimEvent) -> Result<(), SimulationError> {
        let entity = match (event.kind, event.entity) {
            (EventKind::EntityCreated, _) => return self.on_entity_created(&event),
            (_, Some(entity)) => entity,
            (kind, None) => return Err(SimulationError::MissingEntity { kind }),
        };

        match event.kind {
            EventKind::EntityCreated => Ok(()),
            EventKind::EntityEnqueued => self.on_entity_enqueued(&event, entity),
            EventKind::ServiceStart => self.on_service_start(&event, entity),
            EventKind::ServiceEnd => self.on_service_end(&event, entity),
            EventKind::EntityDeparted => self.on_entity_departed(&event, entity),
        }
    }

    fn on_entity_created(&mut self, event: &SimEvent) -> Result<(), SimulationError> {
        let source = self.nodes.source_mut(event.node)?;
        let entity = source.handle_entity_created(event, self.duration, &mut self.rng, &mut self.events);

        self.entities.insert(entity.id, entity);
        self.stats.record_creation(entity.id, event.time, self.warmup);
        self.counters.entities_created += 1;

        if entity.current_node == event.node {
            self.drop_entity(entity.id, event, "source has no outgoing edge");
        }
        Ok(())
    }

    /// An entity arrives at a node. What that means depends on the node.
    fn on_entity_enqueued(&mut self, event: &SimEvent, id: EntityId) -> Result<(), SimulationError> {
        let entity = match self.entities.get_mut(&id) {
            Some(entity) => {
                entity.current_node = event.node;
                *entity
            }
            None => return Err(SimulationError::UnknownEntity { entity: id }),
        };

        match self.nodes.node_type(event.node)? {
            NodeType::Queue => self.arrive_at_queue(event, entity),
            NodeType::Process => {
                let process = self.nodes.process_mut(event.node)?;
                if process.has_available_resource() {
                    process.reserve();
                    self.schedule(event.time, EventKind::ServiceStart, id, event.node, event.priority);
                } else {
                    self.drop_entity(id, event, "process busy with no queue in front");
                }
                Ok(())
            }
            NodeType::Sink => {
                self.schedule(event.time, EventKind::EntityDeparted, id, event.node, event.priority);
                Ok(())
            }
            NodeType::Source => {
                self.drop_entity(id, event, "routed into a source");
                Ok(())
            }
        }
    }

    /// Skip the buffer when a downstream process is free, pass through when
    /// there is no downstream process at all, and buffer otherwise.
    fn arrive_at_queue(&mut self, event: &SimEvent, entity: Entity) -> Result<(), SimulationError> {
        let mut feeds_process = false;
        for &target in self.topology.downstream(event.node) {
            if let NodeHandler::Process(process) = self.nodes.get_mut(target)? {
                feeds_process = true;
                if process.has_available_resource() {
                    process.reserve();
                    self.events.enqueue(SimEvent::for_entity(
                        event.time,
                        EventKind::ServiceStart,
                        entity.id,
                        target,
                        event.priority,
                    ));
                    return Ok(());
                }
            }
        }

        if !feeds_process {
            let next = self.topology.downstream(event.node).first().copied();
            match next {
                Some(next) => self.schedule(
                    event.time,
                    EventKind::EntityEnqueued,
                    entity.id,
                    next,
                    event.priority,
                ),
                None => self.drop_entity(entity.id, event, "queue has no outgoing edge"),
            }
            return Ok(());
        }

        let queue = self.nodes.queue_mut(event.node)?;
        if !queue.enqueue(entity, event.time) {
            let rejected = queue.rejected();
            debug!(node = self.nodes.id(event.node), rejected, "Queue full");
            self.drop_entity(entity.id, event, "queue full");
        }
        Ok(())
    }

    fn on_service_start(&mut self, event: &SimEvent, id: EntityId) -> Result<(), SimulationError> {
        if !self.entities.contains_key(&id) {
            return Err(SimulationError::UnknownEntity { entity: id });
        }
        let process = self.nodes.process_mut(event.node)?;
        process.handle_service_start(event, id, &mut self.rng, &mut self.events)?;
        Ok(())
    }

    /// Free the resource, send the entity on, and pull the next waiting
    /// entity from the first non-empty upstream queue.
    fn on_service_end(&mut self, event: &SimEvent, id: EntityId) -> Result<(), SimulationError> {
        let process = self.nodes.process_mut(event.node)?;
        if process.handle_service_end(event, id, &mut self.events).is_none() {
            self.drop_entity(id, event, "process has no outgoing edge");
        }

        if !self.nodes.process_mut(event.node)?.has_available_resource() {
            return Ok(());
        }

        let mut pulled = None;
        for &upstream in self.topology.upstream(event.node) {
            if let NodeHandler::Queue(queue) = self.nodes.get_mut(upstream)? {
                if queue.is_empty() {
                    continue;
                }
                pulled = queue.dequeue(event.time);
                break;
            }
        }

        if let Some(next) = pulled {
            self.nodes.process_mut(event.node)?.reserve();
            if let Some(entity) = self.entities.get_mut(&next.id) {
                entity.current_node = event.node;
            }
            self.schedule(event.time, EventKind::ServiceStart, next.id, event.node, next.priority);
        }
        Ok(())
    }

    fn on_entity_departed(&mut self, event: &SimEvent, id: EntityId) -> Result<(), SimulationError> {
        let entity = self
            .entities
            .remove(&id)
            .ok_or(SimulationError::UnknownEntity { entity: id })?;
        self.nodes.sink_mut(event.node)?.handle_entity_departed(event, &entity);
        self.stats.record_departure(id, event.time, self.warmup);
        self.counters.entities_departed += 1;
        Ok(())
    }

    fn schedule(&mut self, time: f64, kind: EventKind, entity: EntityId, node: NodeIndex, priority: i32) {
        self.events
            .enqueue(SimEvent::for_entity(time, kind, entity, node, priority));
    }

    fn drop_entity(&mut self, id: EntityId, event: &SimEvent, reason: &'static str) {
        debug!(
            entity = %id,
            node = self.nodes.id(event.node),
            time = event.time,
            reason,
            "Entity dropped"
        );
        self.entities.remove(&id);
        self.stats.record_loss(event.time);
        self.counters.entities_dropped += 1;
    }

    fn run_stats(&self) -> RunStats {
        RunStats {
            entities_in_flight: self.entities.len() as u64,
            ..self.counters.clone()
        }
    }

    /// Compute the result from the state at the horizon.
    fn finish(&self) -> SimResult {
        let duration = self.duration;
        let start = self.warmup;
        let measured = self.model.config.measured_duration().max(0.0);

        let mut node_metrics = IndexMap::with_capacity(self.model.nodes.len());
        for (i, handler) in self.nodes.handlers.iter().enumerate() {
            let metrics = match handler {
                NodeHandler::Source(source) => NodeMetrics {
                    processed: source.created(),
                    ..NodeMetrics::default()
                },
                NodeHandler::Queue(queue) => NodeMetrics {
                    avg_queue_length: queue.avg_queue_length(duration),
                    avg_wait_time: queue.avg_wait_time(),
                    ..NodeMetrics::default()
                },
                NodeHandler::Process(process) => {
                    self.process_metrics(i as NodeIndex, process)
                }
                NodeHandler::Sink(sink) => NodeMetrics {
                    processed: sink.departure_count(),
                    ..NodeMetrics::default()
                },
            };
            node_metrics.insert(self.nodes.ids[i].clone(), metrics);
        }

        let bottlenecks = detect_bottlenecks(&node_metrics);

        let points = self.config.time_series_points.max(1);
        let step = measured / points as f64;
        // The last sample sits exactly on the horizon.
        let timestamps: Vec<f64> = (0..=points)
            .map(|i| if i == points { duration } else { start + i as f64 * step })
            .collect();
        let time_series = TimeSeries {
            wip: self.stats.sample_wip(&timestamps),
            throughput_cumulative: self.stats.sample_throughput(&timestamps),
            timestamps,
        };

        let throughput = if measured > 0.0 {
            self.stats.total_departed() as f64 / measured
        } else {
            0.0
        };

        SimResult {
            summary: SimSummary {
                throughput,
                avg_lead_time: self.stats.compute_avg_lead_time(),
                avg_wip: self.stats.compute_avg_wip(start, duration),
                total_entities: self.stats.total_created(),
                simulated_time: duration,
            },
            node_metrics,
            bottlenecks,
            time_series,
        }
    }

    /// A process reports the queueing in front of it: the summed mean length
    /// of its upstream queues and their pooled mean wait.
    fn process_metrics(&self, node: NodeIndex, process: &ProcessHandler) -> NodeMetrics {
        let mut avg_queue_length = 0.0;
        let mut total_wait = 0.0;
        let mut waits = 0u64;
        for &upstream in self.topology.upstream(node) {
            if let Some(NodeHandler::Queue(queue)) = self.nodes.handlers.get(upstream as usize) {
                avg_queue_length += queue.avg_queue_length(self.duration);
                let (sum, count) = queue.wait_totals();
                total_wait += sum;
                waits += count;
            }
        }

        NodeMetrics {
            utilization: process.utilization(self.duration),
            avg_queue_length,
            avg_wait_time: if waits == 0 { 0.0 } else { total_wait / waits as f64 },
            avg_service_time: process.avg_service_time(),
            processed: process.processed(),
        }
    }
}
