//! Buffering with a release discipline and optional capacity.

use crate::Entity;
use flowsim_types::{QueueDiscipline, QueueParams};
use std::collections::VecDeque;

/// Buffer length from `time` until the next snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueueSnapshot {
    pub time: f64,
    pub length: usize,
}

#[derive(Debug)]
struct Waiting {
    entity: Entity,
    enqueued_at: f64,
}

/// State of one queue node.
#[derive(Debug)]
pub struct QueueHandler {
    capacity: usize,
    discipline: QueueDiscipline,
    buffer: VecDeque<Waiting>,
    snapshots: Vec<QueueSnapshot>,
    total_wait_time: f64,
    wait_count: u64,
    rejected: u64,
}

impl QueueHandler {
    pub fn new(params: &QueueParams) -> Self {
        Self {
            capacity: params.capacity,
            discipline: params.discipline,
            buffer: VecDeque::new(),
            snapshots: Vec::new(),
            total_wait_time: 0.0,
            wait_count: 0,
            rejected: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Capacity zero never fills.
    pub fn is_full(&self) -> bool {
        self.capacity > 0 && self.buffer.len() >= self.capacity
    }

    /// Entities turned away because the buffer was full.
    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    /// Buffer `entity`. Returns false, dropping the entity, if full.
    pub fn enqueue(&mut self, entity: Entity, time: f64) -> bool {
        if self.is_full() {
            self.rejected += 1;
            return false;
        }
        self.buffer.push_back(Waiting {
            entity,
            enqueued_at: time,
        });
        self.record_snapshot(time);
        true
    }

    /// Release the next entity according to the discipline.
    pub fn dequeue(&mut self, time: f64) -> Option<Entity> {
        let waiting = match self.discipline {
            QueueDiscipline::Fifo => self.buffer.pop_front(),
            QueueDiscipline::Lifo => self.buffer.pop_back(),
            QueueDiscipline::Priority => {
                let mut best: Option<(usize, i32)> = None;
                for (i, w) in self.buffer.iter().enumerate() {
                    if best.map_or(true, |(_, p)| w.entity.priority < p) {
                        best = Some((i, w.entity.priority));
                    }
                }
                best.and_then(|(i, _)| self.buffer.remove(i))
            }
        }?;

        self.total_wait_time += time - waiting.enqueued_at;
        self.wait_count += 1;
        self.record_snapshot(time);
        Some(waiting.entity)
    }

    /// Time-weighted mean length over `[0, total_duration]`.
    pub fn avg_queue_length(&self, total_duration: f64) -> f64 {
        if total_duration <= 0.0 {
            return 0.0;
        }
        let mut weighted = 0.0;
        for pair in self.snapshots.windows(2) {
            weighted += pair[0].length as f64 * (pair[1].time - pair[0].time);
        }
        if let Some(last) = self.snapshots.last() {
            weighted += last.length as f64 * (total_duration - last.time).max(0.0);
        }
        weighted / total_duration
    }

    /// Mean wait of entities that have left the queue.
    pub fn avg_wait_time(&self) -> f64 {
        if self.wait_count == 0 {
            return 0.0;
        }
        self.total_wait_time / self.wait_count as f64
    }

    /// Sum of individual waits and how many there were.
    pub fn wait_totals(&self) -> (f64, u64) {
        (self.total_wait_time, self.wait_count)
    }

    /// Recorded length history.
    pub fn snapshots(&self) -> &[QueueSnapshot] {
        &self.snapshots
    }

    /// Longest buffer length ever recorded.
    pub fn max_length(&self) -> usize {
        self.snapshots.iter().map(|s| s.length).max().unwrap_or(0)
    }

    // Several changes at one instant collapse into one snapshot holding the
    // final length.
    fn record_snapshot(&mut self, time: f64) {
        let length = self.buffer.len();
        match self.snapshots.last_mut() {
            Some(last) if time <= last.time => last.length = length,
            _ => self.snapshots.push(QueueSnapshot { time, length }),
        }
    }
}
