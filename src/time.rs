use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// A source of millisecond timestamps for ULID generation.
///
/// This abstraction lets you plug in the real clock or a mocked time source
/// in tests. The unit is milliseconds since the Unix epoch.
///
/// # Example
///
/// ```
/// use monoulid::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// assert_eq!(FixedTime.current_millis(), 1234);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since the Unix epoch.
    fn current_millis(&self) -> u64;
}

/// A monotonic time source that pairs one wall-clock snapshot with a
/// monotonic timer.
///
/// At construction it captures `SystemTime::now()` and `Instant::now()` once;
/// every read returns the snapshot plus the elapsed monotonic time. This
/// avoids a wall-clock syscall per generated ID and insulates the sequence
/// from NTP adjustments or backward clock jumps after startup.
#[derive(Clone, Debug)]
pub struct MonotonicClock {
    base_millis: u64,
    start: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    /// Captures the wall-clock/monotonic snapshot pair.
    ///
    /// A system clock before the Unix epoch is treated as the epoch itself.
    #[must_use]
    pub fn new() -> Self {
        let base_millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .as_millis() as u64;
        Self {
            base_millis,
            start: Instant::now(),
        }
    }
}

impl TimeSource for MonotonicClock {
    fn current_millis(&self) -> u64 {
        self.base_millis + self.start.elapsed().as_millis() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_never_goes_backward() {
        let clock = MonotonicClock::new();
        let mut prev = clock.current_millis();
        for _ in 0..1000 {
            let now = clock.current_millis();
            assert!(now >= prev);
            prev = now;
        }
    }

    #[test]
    fn clock_tracks_wall_time() {
        let clock = MonotonicClock::new();
        let wall = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_millis() as u64;
        let drift = clock.current_millis().abs_diff(wall);
        assert!(drift < 100, "clock drifted {drift}ms from wall time");
    }
}
