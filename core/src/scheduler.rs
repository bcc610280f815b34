//! Two independent fixed-rate schedules: instruction steps and timer ticks.
//!
//! Each schedule remembers the sample at which it last fired. An action is
//! due once strictly more than its period has elapsed since then. Firing
//! resets the last-fire sample to `now` rather than advancing it by one
//! period, so a slow iteration delays the next fire instead of queueing a
//! burst of catch-up fires.

use std::time::Duration;

use crate::clock::{ClockSample, duration_nanos};

/// Default rate for both schedules, in Hz.
pub const DEFAULT_RATE_HZ: u32 = 60;

const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// A schedule rate of zero was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZeroRate(pub &'static str);

impl std::fmt::Display for ZeroRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} rate must be at least 1 Hz", self.0)
    }
}

impl std::error::Error for ZeroRate {}

/// Last-fire samples for both schedules. `None` means "never fired" and is
/// treated as infinitely long ago.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScheduleState {
    pub last_step: Option<ClockSample>,
    pub last_tick: Option<ClockSample>,
}

pub struct Scheduler {
    step_period_ns: u64,
    tick_period_ns: u64,
    state: ScheduleState,
}

impl Default for Scheduler {
    fn default() -> Self {
        let period = Duration::from_nanos(NANOS_PER_SECOND / DEFAULT_RATE_HZ as u64);
        Self::new(period, period)
    }
}

impl Scheduler {
    pub fn new(step_period: Duration, tick_period: Duration) -> Self {
        Self {
            step_period_ns: duration_nanos(step_period),
            tick_period_ns: duration_nanos(tick_period),
            state: ScheduleState::default(),
        }
    }

    /// Build a scheduler from step and tick frequencies in Hz.
    pub fn from_rates(steps_per_second: u32, ticks_per_second: u32) -> Result<Self, ZeroRate> {
        let step_period = period_for("step", steps_per_second)?;
        let tick_period = period_for("tick", ticks_per_second)?;
        Ok(Self::new(step_period, tick_period))
    }

    /// True (and records `now`) if an instruction step is due.
    pub fn due_step(&mut self, now: ClockSample) -> bool {
        fire_if_due(&mut self.state.last_step, self.step_period_ns, now)
    }

    /// True (and records `now`) if a timer tick is due.
    pub fn due_tick(&mut self, now: ClockSample) -> bool {
        fire_if_due(&mut self.state.last_tick, self.tick_period_ns, now)
    }

    pub fn step_period(&self) -> Duration {
        Duration::from_nanos(self.step_period_ns)
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_nanos(self.tick_period_ns)
    }

    pub fn state(&self) -> ScheduleState {
        self.state
    }
}

fn period_for(name: &'static str, hz: u32) -> Result<Duration, ZeroRate> {
    if hz == 0 {
        return Err(ZeroRate(name));
    }
    Ok(Duration::from_nanos(NANOS_PER_SECOND / hz as u64))
}

fn fire_if_due(last: &mut Option<ClockSample>, period_ns: u64, now: ClockSample) -> bool {
    let due = match *last {
        None => true,
        Some(prev) => now.nanos_since(prev) > period_ns,
    };
    if due {
        *last = Some(now);
    }
    due
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ns(n: u64) -> ClockSample {
        ClockSample::from_nanos(n)
    }

    #[test]
    fn first_call_fires_regardless_of_now() {
        for start in [0, 1, 16_666_666, u64::MAX] {
            let mut s = Scheduler::default();
            assert!(s.due_step(ns(start)));
            assert!(s.due_tick(ns(start)));
        }
    }

    #[test]
    fn fires_only_after_period_strictly_elapses() {
        let mut s = Scheduler::new(Duration::from_nanos(100), Duration::from_nanos(100));
        assert!(s.due_step(ns(1_000)));
        assert!(!s.due_step(ns(1_050)));
        assert!(!s.due_step(ns(1_100)));
        assert!(s.due_step(ns(1_101)));
    }

    #[test]
    fn late_iteration_resets_instead_of_catching_up() {
        let mut s = Scheduler::new(Duration::from_nanos(100), Duration::from_nanos(100));
        assert!(s.due_tick(ns(0)));
        // Ten periods late: one fire, then the schedule restarts from here.
        assert!(s.due_tick(ns(1_000)));
        assert!(!s.due_tick(ns(1_000)));
        assert!(!s.due_tick(ns(1_050)));
        assert!(s.due_tick(ns(1_101)));
        assert_eq!(s.state().last_tick, Some(ns(1_101)));
    }

    #[test]
    fn step_and_tick_are_independent() {
        let mut s = Scheduler::new(Duration::from_nanos(10), Duration::from_nanos(1_000));
        assert!(s.due_step(ns(0)));
        assert!(s.due_tick(ns(0)));
        assert!(s.due_step(ns(11)));
        assert!(!s.due_tick(ns(11)));
        assert_eq!(s.state().last_tick, Some(ns(0)));
    }

    #[test]
    fn consecutive_fires_are_at_least_one_period_apart() {
        let period = 16_666_666;
        let mut s = Scheduler::new(Duration::from_nanos(period), Duration::from_nanos(period));
        // Irregular but monotonic sample sequence.
        let mut now = 0u64;
        let mut last_fire: Option<u64> = None;
        for i in 0..10_000u64 {
            now += (i * 7_919) % 3_000_001;
            if s.due_step(ns(now)) {
                if let Some(prev) = last_fire {
                    assert!(now - prev >= period);
                }
                last_fire = Some(now);
            }
        }
        assert!(last_fire.is_some());
    }

    #[test]
    fn backwards_sample_counts_as_no_time() {
        let mut s = Scheduler::new(Duration::from_nanos(10), Duration::from_nanos(10));
        assert!(s.due_step(ns(500)));
        assert!(!s.due_step(ns(0)));
    }

    #[test]
    fn rates_use_nanosecond_periods() {
        let s = Scheduler::from_rates(60, 60).unwrap();
        assert_eq!(s.step_period(), Duration::from_nanos(16_666_666));
        assert_eq!(s.tick_period(), s.step_period());

        let s = Scheduler::from_rates(500, 60).unwrap();
        assert_eq!(s.step_period(), Duration::from_millis(2));
    }

    #[test]
    fn zero_rate_rejected() {
        assert_eq!(Scheduler::from_rates(0, 60).err(), Some(ZeroRate("step")));
        assert_eq!(Scheduler::from_rates(60, 0).err(), Some(ZeroRate("tick")));
    }
}
