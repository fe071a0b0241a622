//! Time sources of the frame loop.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use web_time::Instant;

/// Monotonic time source with nanosecond precision.
pub trait Clock {
    /// Nanoseconds since an arbitrary, fixed origin.
    fn now_nanos(&self) -> u64;
}

/// Wall clock, counting from the moment it was created.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now_nanos(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }
}

/// Clock that only moves when told to.
///
/// Clones share the same time, so a host can keep one clone and give another one to the
/// controller.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<Mutex<u64>>,
}

impl ManualClock {
    /// Creates a clock showing `now_nanos`.
    pub fn new(now_nanos: u64) -> Self {
        Self {
            now: Arc::new(Mutex::new(now_nanos)),
        }
    }

    /// Sets the time. Setting a time earlier than the current one is ignored.
    pub fn set(&self, now_nanos: u64) {
        let mut now = self.now.lock();
        *now = (*now).max(now_nanos);
    }

    /// Moves the time forward.
    pub fn advance(&self, duration: Duration) {
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        let mut now = self.now.lock();
        *now = now.saturating_add(nanos);
    }
}

impl Clock for ManualClock {
    fn now_nanos(&self) -> u64 {
        *self.now.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_is_monotonic() {
        let clock = ManualClock::new(100);
        let shared = clock.clone();

        shared.advance(Duration::from_nanos(50));
        assert_eq!(clock.now_nanos(), 150);

        shared.set(120);
        assert_eq!(clock.now_nanos(), 150);

        shared.set(200);
        assert_eq!(clock.now_nanos(), 200);
    }

    #[test]
    fn system_clock_moves_forward() {
        let clock = SystemClock::default();
        let first = clock.now_nanos();
        let second = clock.now_nanos();
        assert!(second >= first);
    }
}
