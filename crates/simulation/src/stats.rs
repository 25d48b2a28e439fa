//! System-wide entity statistics.
//!
//! Work in progress is tracked from time zero so that entities born during
//! warmup still count while they remain in the system. Creations,
//! departures, lead times and cumulative throughput only count events at or
//! after the warmup boundary.

use crate::EntityId;
use std::collections::HashMap;

/// WIP level from `time` until the next snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WipSnapshot {
    pub time: f64,
    pub count: u64,
}

/// Accumulates entity lifecycle data during a run.
#[derive(Debug, Default)]
pub struct StatsCollector {
    current_wip: u64,
    wip_snapshots: Vec<WipSnapshot>,
    births: HashMap<EntityId, f64>,
    /// In departure order, which is time order.
    deaths: Vec<(EntityId, f64)>,
    total_created: u64,
    total_departed: u64,
}

impl StatsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// An entity entered the system.
    pub fn record_creation(&mut self, entity: EntityId, time: f64, warmup: f64) {
        self.current_wip += 1;
        self.snapshot(time);
        if time >= warmup {
            self.total_created += 1;
            self.births.insert(entity, time);
        }
    }

    /// An entity left the system through a sink.
    pub fn record_departure(&mut self, entity: EntityId, time: f64, warmup: f64) {
        self.current_wip = self.current_wip.saturating_sub(1);
        self.snapshot(time);
        if time >= warmup {
            self.total_departed += 1;
            self.deaths.push((entity, time));
        }
    }

    /// An entity was lost inside the system. It leaves the WIP count but
    /// never counts as departed.
    pub fn record_loss(&mut self, time: f64) {
        self.current_wip = self.current_wip.saturating_sub(1);
        self.snapshot(time);
    }

    /// Entities created in the measurement window.
    pub fn total_created(&self) -> u64 {
        self.total_created
    }

    /// Entities departed in the measurement window.
    pub fn total_departed(&self) -> u64 {
        self.total_departed
    }

    /// Entities currently in the system.
    pub fn current_wip(&self) -> u64 {
        self.current_wip
    }

    pub fn wip_snapshots(&self) -> &[WipSnapshot] {
        &self.wip_snapshots
    }

    /// Mean lead time of entities both created and departed in the
    /// measurement window. Entities still in flight are excluded.
    pub fn compute_avg_lead_time(&self) -> f64 {
        let mut sum = 0.0;
        let mut count = 0u64;
        for (entity, death) in &self.deaths {
            if let Some(birth) = self.births.get(entity) {
                sum += death - birth;
                count += 1;
            }
        }
        if count == 0 {
            return 0.0;
        }
        sum / count as f64
    }

    /// Time-weighted mean WIP over `[start, end]`.
    pub fn compute_avg_wip(&self, start: f64, end: f64) -> f64 {
        if end <= start || self.wip_snapshots.is_empty() {
            return 0.0;
        }

        let mut level = 0u64;
        let mut weighted = 0.0;
        let mut last_time = start;
        for snap in &self.wip_snapshots {
            if snap.time > end {
                break;
            }
            if snap.time > start {
                weighted += level as f64 * (snap.time - last_time);
                last_time = snap.time;
            }
            level = snap.count;
        }
        weighted += level as f64 * (end - last_time);

        weighted / (end - start)
    }

    /// WIP at each of the ascending `timestamps`.
    pub fn sample_wip(&self, timestamps: &[f64]) -> Vec<u64> {
        let mut idx = 0;
        let mut level = 0;
        timestamps
            .iter()
            .map(|&t| {
                while idx < self.wip_snapshots.len() && self.wip_snapshots[idx].time <= t {
                    level = self.wip_snapshots[idx].count;
                    idx += 1;
                }
                level
            })
            .collect()
    }

    /// Cumulative measured departures at each of the ascending `timestamps`.
    pub fn sample_throughput(&self, timestamps: &[f64]) -> Vec<u64> {
        let mut idx = 0;
        timestamps
            .iter()
            .map(|&t| {
                while idx < self.deaths.len() && self.deaths[idx].1 <= t {
                    idx += 1;
                }
                idx as u64
            })
            .collect()
    }

    fn snapshot(&mut self, time: f64) {
        self.wip_snapshots.push(WipSnapshot {
            time,
            count: self.current_wip,
        });
    }
}
