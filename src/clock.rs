//! Monotonic time sources for the meter.
//!
//! A clock may or may not offer a nanosecond counter. The meter probes that
//! once when it is built and keeps all of its timestamps and durations in the
//! units of whichever counter it picked, see [`TimeBase`].

use std::cell::Cell;
use std::time::{Duration, Instant};

pub trait Clock {
    /// Nanosecond monotonic counter, `None` if the platform has none.
    fn monotonic_ns(&self) -> Option<u64>;

    /// Monotonic counter in fractional seconds.
    fn monotonic(&self) -> f64;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn monotonic_ns(&self) -> Option<u64> {
        (**self).monotonic_ns()
    }

    fn monotonic(&self) -> f64 {
        (**self).monotonic()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeBase {
    Nanos,
    Seconds,
}

impl TimeBase {
    pub fn probe<C: Clock + ?Sized>(clock: &C) -> TimeBase {
        match clock.monotonic_ns() {
            Some(_) => TimeBase::Nanos,
            None => {
                log::warn!("No nanosecond clock available, falling back to fractional seconds");
                TimeBase::Seconds
            }
        }
    }

    pub fn units_per_second(&self) -> f64 {
        match self {
            TimeBase::Nanos => 1e9,
            TimeBase::Seconds => 1.0,
        }
    }

    /// Converts a duration in seconds into clock units.
    pub fn to_units(&self, seconds: f64) -> f64 {
        match self {
            TimeBase::Nanos => (seconds * self.units_per_second()).round_ties_even(),
            TimeBase::Seconds => seconds,
        }
    }

    /// Reads `clock` in this time base's units.
    pub fn now<C: Clock + ?Sized>(&self, clock: &C) -> f64 {
        match self {
            TimeBase::Nanos => match clock.monotonic_ns() {
                Some(ns) => ns as f64,
                None => clock.monotonic() * self.units_per_second(),
            },
            TimeBase::Seconds => clock.monotonic(),
        }
    }
}

/// Clock backed by [`Instant`], counting from its own creation.
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> SystemClock {
        SystemClock {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        SystemClock::new()
    }
}

impl Clock for SystemClock {
    fn monotonic_ns(&self) -> Option<u64> {
        u64::try_from(self.origin.elapsed().as_nanos()).ok()
    }

    fn monotonic(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Clock that only moves when told to. Shared by reference, so a meter can
/// hold `&ManualClock` while the caller keeps advancing it.
pub struct ManualClock {
    elapsed: Cell<Duration>,
    nanos: bool,
}

impl ManualClock {
    pub fn new() -> ManualClock {
        ManualClock {
            elapsed: Cell::new(Duration::ZERO),
            nanos: true,
        }
    }

    /// A clock without a nanosecond counter.
    pub fn seconds_only() -> ManualClock {
        ManualClock {
            elapsed: Cell::new(Duration::ZERO),
            nanos: false,
        }
    }

    pub fn advance(&self, by: Duration) {
        self.elapsed.set(self.elapsed.get() + by);
    }

    pub fn advance_secs(&self, secs: f64) {
        self.advance(Duration::from_secs_f64(secs));
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        ManualClock::new()
    }
}

impl Clock for ManualClock {
    fn monotonic_ns(&self) -> Option<u64> {
        if !self.nanos {
            return None;
        }
        u64::try_from(self.elapsed.get().as_nanos()).ok()
    }

    fn monotonic(&self) -> f64 {
        self.elapsed.get().as_secs_f64()
    }
}
