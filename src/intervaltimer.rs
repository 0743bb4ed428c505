use std::thread;
use std::time::{Duration, Instant};

/// Paces a loop to a fixed rate, logging skipped frames and the achieved
/// rate once a second.
pub struct IntervalTimer {
    interval: Duration,
    last_tick: Instant,
    last_report: Instant,
    ticks: u32,
}

impl IntervalTimer {
    pub fn new(freq_hz: f32) -> IntervalTimer {
        let now = Instant::now();
        IntervalTimer {
            interval: Duration::from_secs_f32(1.0 / freq_hz.max(0.1)),
            last_tick: now,
            last_report: now,
            ticks: 0,
        }
    }

    pub fn sleep_until_next_tick(&mut self) {
        self.count_tick();

        let now = Instant::now();
        let next_tick = self.last_tick + self.interval;
        let next_tick = if next_tick > now {
            next_tick
        } else {
            log::warn!("Meter update overran its interval, skipping a frame");
            now + self.interval
        };

        thread::sleep(next_tick.saturating_duration_since(now));
        self.last_tick = next_tick;
    }

    fn count_tick(&mut self) {
        self.ticks += 1;

        if self.last_report.elapsed() > Duration::from_secs(1) {
            log::debug!("Meter updates per second: {}", self.ticks);
            self.ticks = 0;
            self.last_report = Instant::now();
        }
    }
}
