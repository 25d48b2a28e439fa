//! A fixed pool of identical resources with busy-time accounting.

/// Tracks `total` interchangeable resources and integrates busy
/// resource-time for utilization.
///
/// Busy time is flushed exactly once per state change, for the busy level
/// held since the previous change.
#[derive(Debug, Clone)]
pub struct ResourcePool {
    total: u32,
    busy: u32,
    /// Sum over time of the busy count.
    cumulative_busy_time: f64,
    /// Time of the last busy-count change.
    last_change_time: f64,
}

impl ResourcePool {
    pub fn new(total: u32) -> Self {
        Self {
            total,
            busy: 0,
            cumulative_busy_time: 0.0,
            last_change_time: 0.0,
        }
    }

    /// Take one resource. Returns false if all are busy.
    pub fn acquire(&mut self, now: f64) -> bool {
        if self.busy >= self.total {
            return false;
        }
        self.flush(now);
        self.busy += 1;
        true
    }

    /// Return one resource. A release with nothing busy is ignored.
    pub fn release(&mut self, now: f64) {
        if self.busy == 0 {
            return;
        }
        self.flush(now);
        self.busy -= 1;
    }

    pub fn available(&self) -> u32 {
        self.total - self.busy
    }

    pub fn busy(&self) -> u32 {
        self.busy
    }

    /// Busy fraction over `[0, total_time]`, including the level still held
    /// since the last change. Zero when `total_time <= 0`.
    pub fn utilization(&self, total_time: f64) -> f64 {
        if total_time <= 0.0 || self.total == 0 {
            return 0.0;
        }
        let tail = (total_time - self.last_change_time).max(0.0);
        let busy_time = self.cumulative_busy_time + self.busy as f64 * tail;
        (busy_time / (self.total as f64 * total_time)).clamp(0.0, 1.0)
    }

    fn flush(&mut self, now: f64) {
        let dt = now - self.last_change_time;
        if dt > 0.0 {
            self.cumulative_busy_time += self.busy as f64 * dt;
            self.last_change_time = now;
        }
    }
}
