//! Decay and peak hold.
//!
//! Both are driven by elapsed clock time, not by the number of updates. Each
//! update eases the decayed value toward the new one by the share of the decay
//! time that passed since the previous update. Times are in whatever units the
//! meter's [`TimeBase`](crate::clock::TimeBase) uses.

#[derive(Debug, Clone, PartialEq)]
pub struct Ballistics {
    decayed: f64,
    decayed_ts: f64,
    peak: f64,
    peak_ts: f64,
    decay_time: f64,
    peak_hold: f64,
    floor: f64,
}

impl Ballistics {
    /// `floor` is the value below which nothing is lit. Decay toward an
    /// infinite value aims for the floor instead, and drops straight to it
    /// once the decayed value is already at or under the floor.
    pub fn new(silence: f64, floor: f64, decay_time: f64, peak_hold: f64, now: f64) -> Ballistics {
        Ballistics {
            decayed: silence,
            decayed_ts: now,
            peak: silence,
            peak_ts: now,
            decay_time,
            peak_hold,
            floor,
        }
    }

    pub fn decays(&self) -> bool {
        self.decay_time > 0.0
    }

    pub fn decayed(&self) -> f64 {
        self.decayed
    }

    pub fn peak(&self) -> f64 {
        self.peak
    }

    /// Feeds `value` seen at `now`. `restamp` is asked for the time to file a
    /// new peak under.
    pub fn update(&mut self, value: f64, now: f64, restamp: impl FnOnce() -> f64) {
        self.decay_toward(value, now);

        if value > self.peak || now - self.peak_ts >= self.peak_hold {
            self.peak = value;
            self.peak_ts = restamp();
        }
    }

    fn decay_toward(&mut self, value: f64, now: f64) {
        if value >= self.decayed || !self.decays() {
            self.decayed = value;
        } else {
            let factor = ((now - self.decayed_ts) / self.decay_time).clamp(0.0, 1.0);
            let below_floor = !value.is_finite() && self.decayed <= self.floor;
            if factor >= 1.0 || self.decayed.is_infinite() || below_floor {
                self.decayed = value;
            } else if factor > 0.0 {
                let target = if value.is_finite() {
                    value
                } else {
                    value.max(self.floor)
                };
                self.decayed -= factor * (self.decayed - target);
            }
        }
        self.decayed_ts = now;
    }
}
