//! Host monotonic clock.
//!
//! The node runs on virtual time (`Node::advance`); this adapter turns
//! wall-clock progress into the elapsed steps the simulation loop feeds it.

use std::time::Instant;

use embassy_time::Duration;

/// Monotonic clock backed by `std::time::Instant`.
pub struct HostClock {
    start: Instant,
    last: Instant,
}

impl Default for HostClock {
    fn default() -> Self {
        Self::new()
    }
}

impl HostClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self { start: now, last: now }
    }

    /// Time since the previous call (or since construction).
    pub fn lap(&mut self) -> Duration {
        let now = Instant::now();
        let step = now.duration_since(self.last);
        self.last = now;
        Duration::from_micros(step.as_micros().min(u128::from(u64::MAX)) as u64)
    }

    /// Seconds since the clock was created.
    pub fn uptime_secs(&self) -> u64 {
        self.start.elapsed().as_secs()
    }
}
