//! Monotonic time source for the host loop.
//!
//! Samples are nanoseconds since a clock-local origin. They are only ever
//! differenced, never read as wall-clock time.

use std::time::{Duration, Instant};

/// A point on the monotonic timeline, in nanoseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockSample(u64);

impl ClockSample {
    pub const fn from_nanos(nanos: u64) -> Self {
        Self(nanos)
    }

    pub const fn as_nanos(self) -> u64 {
        self.0
    }

    /// Nanoseconds elapsed since `earlier`, saturating at zero.
    pub const fn nanos_since(self, earlier: ClockSample) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<Duration> for ClockSample {
    type Output = ClockSample;

    fn add(self, rhs: Duration) -> ClockSample {
        ClockSample(self.0.saturating_add(duration_nanos(rhs)))
    }
}

/// Source of [`ClockSample`]s. Successive samples never decrease.
pub trait Clock {
    fn now(&mut self) -> ClockSample;
}

/// Clock backed by [`std::time::Instant`].
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&mut self) -> ClockSample {
        ClockSample(duration_nanos(self.origin.elapsed()))
    }
}

/// Deterministic clock that advances by a fixed stride on every sample.
///
/// Used to drive the host loop in tests without touching real time.
pub struct ManualClock {
    next: ClockSample,
    stride: Duration,
}

impl ManualClock {
    pub fn new(start: ClockSample, stride: Duration) -> Self {
        Self {
            next: start,
            stride,
        }
    }

    /// Move the next sample forward by `by` on top of the regular stride.
    pub fn advance(&mut self, by: Duration) {
        self.next = self.next + by;
    }
}

impl Clock for ManualClock {
    fn now(&mut self) -> ClockSample {
        let sample = self.next;
        self.next = self.next + self.stride;
        sample
    }
}

/// Duration in nanoseconds, clamped to `u64::MAX` (about 584 years).
pub(crate) fn duration_nanos(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}
