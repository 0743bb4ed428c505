use rand::Rng;

use stripmeter::Scale;

/// Made-up program level for the demo: a slow swell with random hits on
/// top, in the units of the meter's scale.
pub struct TestSignal {
    scale: Scale,
    phase: f64,
    step: f64,
    hit: f64,
}

impl TestSignal {
    pub fn new(scale: Scale, freq_hz: f32) -> TestSignal {
        TestSignal {
            scale,
            phase: 0.0,
            // One swell every four seconds.
            step: std::f64::consts::TAU / (4.0 * freq_hz.max(0.1) as f64),
            hit: 0.0,
        }
    }

    pub fn next_value(&mut self) -> f64 {
        let mut rng = rand::thread_rng();

        self.phase = (self.phase + self.step) % std::f64::consts::TAU;
        let swell = 0.35 + 0.3 * self.phase.sin();

        if rng.gen_bool(0.04) {
            self.hit = rng.gen_range(0.3..0.7);
        }
        self.hit *= 0.8;

        let level = (swell + self.hit + rng.gen_range(-0.03..0.03)).clamp(0.0, 1.0);
        match self.scale {
            Scale::Linear => (level * 65535.0).round(),
            Scale::Decibel => 20.0 * level.log10(),
        }
    }
}
