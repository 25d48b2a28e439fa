//! Advisory progress reporting.

/// Receives run progress as a percentage of simulated time.
///
/// Observers never influence the run: they are called between events and
/// draw no random numbers.
pub trait ProgressObserver {
    /// Called with a value in `0..=100`, non-decreasing over a run. The last
    /// call of a completed run is always 100.
    fn on_progress(&mut self, percent: u8);
}

impl<F: FnMut(u8)> ProgressObserver for F {
    fn on_progress(&mut self, percent: u8) {
        self(percent)
    }
}

/// Turns simulated time into progress callbacks every `interval` percent.
pub(crate) struct ProgressTracker<'a> {
    observer: Option<&'a mut dyn ProgressObserver>,
    interval: u8,
    last_reported: u8,
}

impl<'a> ProgressTracker<'a> {
    pub(crate) fn new(observer: Option<&'a mut dyn ProgressObserver>, interval: u8) -> Self {
        Self {
            observer,
            interval: interval.max(1),
            last_reported: 0,
        }
    }

    pub(crate) fn update(&mut self, now: f64, duration: f64) {
        let Some(observer) = self.observer.as_mut() else {
            return;
        };
        if duration <= 0.0 {
            return;
        }
        let percent = ((now / duration) * 100.0).floor().clamp(0.0, 100.0) as u8;
        if percent >= self.last_reported.saturating_add(self.interval) {
            self.last_reported = percent;
            observer.on_progress(percent);
        }
    }

    pub(crate) fn finish(&mut self) {
        if self.last_reported == 100 {
            return;
        }
        if let Some(observer) = self.observer.as_mut() {
            self.last_reported = 100;
            observer.on_progress(100);
        }
    }
}
