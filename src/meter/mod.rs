//! The peak meter itself.
//!
//! A [`MeterEngine`] turns one scalar per tick into a full frame for a strip
//! of RGB pixels: a bar in green, yellow and red zones that falls back slowly
//! after loud moments, plus a peak marker that stays put for a while.

pub(crate) mod ballistics;
pub(crate) mod thresholds;
pub(crate) mod zones;

use crate::clock::{Clock, TimeBase};
use crate::error::MeterError;
use crate::options::MeterOptions;
use crate::sink::PixelSink;

use self::ballistics::Ballistics;
use self::thresholds::{Scale, SegmentLevel, Thresholds};
use self::zones::{dim, zone_palette, Rgb, OFF};

pub struct MeterEngine<C: Clock> {
    clock: C,
    time_base: TimeBase,
    options: MeterOptions,
    zones: Vec<Rgb>,
    thresholds: Thresholds,
    value: f64,
    levels: Ballistics,
}

impl<C: Clock> MeterEngine<C> {
    /// Builds a meter sized to `sink`, using the calibrated thresholds for
    /// its length and scale.
    pub fn new<S>(sink: &S, clock: C, options: MeterOptions) -> Result<MeterEngine<C>, MeterError>
    where
        S: PixelSink + ?Sized,
    {
        let segment_count = sink.len();
        if segment_count == 0 {
            return Err(MeterError::EmptySink);
        }
        let thresholds = Thresholds::standard(options.scale(), segment_count);
        MeterEngine::build(segment_count, clock, options, thresholds)
    }

    /// Like [`MeterEngine::new`] with a table of `sink.len() + 1` strictly
    /// increasing thresholds.
    pub fn with_thresholds<S>(
        sink: &S,
        clock: C,
        options: MeterOptions,
        thresholds: Vec<f64>,
    ) -> Result<MeterEngine<C>, MeterError>
    where
        S: PixelSink + ?Sized,
    {
        let segment_count = sink.len();
        if segment_count == 0 {
            return Err(MeterError::EmptySink);
        }
        let thresholds = Thresholds::custom(thresholds, segment_count)?;
        MeterEngine::build(segment_count, clock, options, thresholds)
    }

    fn build(
        segment_count: usize,
        clock: C,
        options: MeterOptions,
        thresholds: Thresholds,
    ) -> Result<MeterEngine<C>, MeterError> {
        options.validate()?;

        let time_base = TimeBase::probe(&clock);
        let silence = options.scale().silence();
        let levels = Ballistics::new(
            silence,
            thresholds.floor(),
            time_base.to_units(options.decay),
            time_base.to_units(options.peak_hold),
            time_base.now(&clock),
        );
        let zones = zone_palette(segment_count);

        log::debug!(
            "Meter with {} segments, {:?} scale, {:?} clock, thresholds {:?}",
            segment_count,
            options.scale(),
            time_base,
            thresholds.bounds()
        );
        if !options.fractions {
            log::debug!("fractions = false is reserved and has no effect");
        }

        Ok(MeterEngine {
            clock,
            time_base,
            options,
            zones,
            thresholds,
            value: silence,
            levels,
        })
    }

    /// Sets the current value.
    ///
    /// Updates decay and peak against a fresh clock reading, then writes a
    /// whole new frame to `sink` and, with `show` set, flushes it. The sink
    /// must be as long as the one the meter was built for.
    pub fn set_value<S>(&mut self, value: f64, sink: &mut S) -> Result<(), MeterError>
    where
        S: PixelSink + ?Sized,
    {
        self.check_sink(sink)?;

        let value = if value.is_nan() {
            self.scale().silence()
        } else {
            value
        };
        self.value = value;

        let now = self.time_base.now(&self.clock);
        let (clock, time_base) = (&self.clock, self.time_base);
        self.levels.update(value, now, || time_base.now(clock));

        self.render(sink)
    }

    /// Writes the current frame to `sink` in one go.
    pub fn render<S>(&self, sink: &mut S) -> Result<(), MeterError>
    where
        S: PixelSink + ?Sized,
    {
        self.check_sink(sink)?;

        sink.replace(&self.frame());
        if self.options.show {
            sink.show()?;
        }
        Ok(())
    }

    /// The frame for the current state, in strip order.
    pub fn frame(&self) -> Vec<Rgb> {
        let bar = if self.levels.decays() {
            self.map_to_segment(self.levels.decayed())
        } else {
            self.map_to_segment(self.value)
        };
        let peak = self.map_to_segment(self.levels.peak());

        let mut pixels = vec![OFF; self.segment_count()];
        if let Some(top) = bar.position {
            for (index, pixel) in pixels.iter_mut().enumerate().take(top + 1) {
                *pixel = if index == top {
                    dim(self.zones[index], bar.brightness)
                } else {
                    self.zones[index]
                };
            }
        }

        // The peak never sits below the bar.
        if let Some(index) = peak.position {
            pixels[index] = dim(self.zones[index], peak.brightness);
        }

        if self.options.reverse {
            pixels.reverse();
        }
        pixels
    }

    pub fn map_to_segment(&self, value: f64) -> SegmentLevel {
        self.thresholds.map(value)
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn peak(&self) -> f64 {
        self.levels.peak()
    }

    pub fn decayed_value(&self) -> f64 {
        self.levels.decayed()
    }

    pub fn segment_count(&self) -> usize {
        self.zones.len()
    }

    pub fn scale(&self) -> Scale {
        self.options.scale()
    }

    pub fn options(&self) -> &MeterOptions {
        &self.options
    }

    pub fn zones(&self) -> &[Rgb] {
        &self.zones
    }

    pub fn thresholds(&self) -> &[f64] {
        self.thresholds.bounds()
    }

    pub fn time_base(&self) -> TimeBase {
        self.time_base
    }

    fn check_sink<S>(&self, sink: &S) -> Result<(), MeterError>
    where
        S: PixelSink + ?Sized,
    {
        if sink.len() != self.segment_count() {
            return Err(MeterError::SinkLength {
                expected: self.segment_count(),
                actual: sink.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::zones::{GREEN, RED, YELLOW};
    use super::*;
    use crate::clock::ManualClock;
    use crate::sink::PixelBuffer;

    fn options() -> MeterOptions {
        MeterOptions {
            reverse: false,
            ..Default::default()
        }
    }

    #[test]
    fn starts_silent_and_dark() {
        let clock = ManualClock::new();
        let strip = PixelBuffer::new(4);
        let meter = MeterEngine::new(&strip, &clock, options()).unwrap();
        assert_eq!(meter.value(), 0.0);
        assert_eq!(meter.peak(), 0.0);
        assert_eq!(meter.frame(), vec![OFF; 4]);

        let db = MeterOptions {
            db: true,
            ..options()
        };
        let meter = MeterEngine::new(&strip, &clock, db).unwrap();
        assert_eq!(meter.value(), f64::NEG_INFINITY);
        assert_eq!(meter.peak(), f64::NEG_INFINITY);
        assert_eq!(meter.frame(), vec![OFF; 4]);
    }

    #[test]
    fn four_segments_at_50000() {
        let clock = ManualClock::new();
        let mut strip = PixelBuffer::new(4);
        let mut meter = MeterEngine::new(&strip, &clock, options()).unwrap();

        meter.set_value(50000.0, &mut strip).unwrap();

        let level = meter.map_to_segment(50000.0);
        assert_eq!(level.position, Some(2));
        assert!((level.brightness - 0.4).abs() < 1e-12);
        assert_eq!(
            strip.pixels(),
            &[GREEN, GREEN, Rgb::new(21, 9, 0), OFF]
        );
        assert_eq!(meter.value(), 50000.0);
        assert_eq!(meter.peak(), 50000.0);
    }

    #[test]
    fn full_scale_lights_everything() {
        let clock = ManualClock::new();
        let mut strip = PixelBuffer::new(4);
        let mut meter = MeterEngine::new(&strip, &clock, options()).unwrap();

        meter.set_value(65535.0, &mut strip).unwrap();
        assert_eq!(strip.pixels(), &[GREEN, GREEN, YELLOW, RED]);
    }

    #[test]
    fn peak_marker_stays_above_a_decaying_bar() {
        let clock = ManualClock::new();
        let mut strip = PixelBuffer::new(4);
        let mut meter = MeterEngine::new(&strip, &clock, options()).unwrap();

        meter.set_value(60000.0, &mut strip).unwrap();
        clock.advance(Duration::from_millis(100));
        meter.set_value(20000.0, &mut strip).unwrap();

        // Bar fell a quarter of the way, 60000 -> 50000, the peak stays at 60000.
        assert_eq!(meter.decayed_value(), 50000.0);
        assert_eq!(meter.peak(), 60000.0);
        assert_eq!(
            strip.pixels(),
            &[GREEN, GREEN, Rgb::new(21, 9, 0), Rgb::new(55, 0, 0)]
        );

        clock.advance(Duration::from_millis(700));
        meter.set_value(20000.0, &mut strip).unwrap();
        assert_eq!(meter.decayed_value(), 20000.0);
        assert_eq!(meter.peak(), 20000.0);
        // 20000 is three quarters into the first segment.
        assert_eq!(strip.pixels(), &[Rgb::new(0, 18, 0), OFF, OFF, OFF]);
    }

    #[test]
    fn raw_value_drives_the_bar_without_decay() {
        let clock = ManualClock::new();
        let mut strip = PixelBuffer::new(4);
        let no_decay = MeterOptions {
            decay: 0.0,
            ..options()
        };
        let mut meter = MeterEngine::new(&strip, &clock, no_decay).unwrap();

        meter.set_value(60000.0, &mut strip).unwrap();
        clock.advance(Duration::from_millis(10));
        meter.set_value(30000.0, &mut strip).unwrap();

        // Bar drops at once, peak still held on the top segment.
        assert_eq!(
            strip.pixels(),
            &[GREEN, Rgb::new(0, 6, 0), OFF, Rgb::new(55, 0, 0)]
        );
    }

    #[test]
    fn reversed_frame_is_the_mirror_image() {
        let clock = ManualClock::new();
        let mut straight = PixelBuffer::new(10);
        let mut mirrored = PixelBuffer::new(10);
        let mut meter = MeterEngine::new(&straight, &clock, options()).unwrap();
        let reversed = MeterOptions {
            reverse: true,
            ..options()
        };
        let mut reversed_meter = MeterEngine::new(&mirrored, &clock, reversed).unwrap();

        for (step, value) in [61000.0, 42000.0, 30500.0, 12000.0].into_iter().enumerate() {
            clock.advance(Duration::from_millis(60 * step as u64));
            meter.set_value(value, &mut straight).unwrap();
            reversed_meter.set_value(value, &mut mirrored).unwrap();

            let mut expected = straight.pixels().to_vec();
            expected.reverse();
            assert_eq!(mirrored.pixels(), expected.as_slice());
        }
    }

    #[test]
    fn decibel_meter() {
        let clock = ManualClock::new();
        let mut strip = PixelBuffer::new(3);
        let db = MeterOptions {
            db: true,
            ..options()
        };
        let mut meter = MeterEngine::new(&strip, &clock, db).unwrap();
        assert_eq!(meter.thresholds(), &[-30.0, -6.0, 0.0, 3.0]);

        meter.set_value(-3.0, &mut strip).unwrap();
        // -3 dB is half way through the yellow segment.
        assert_eq!(strip.pixels(), &[GREEN, Rgb::new(26, 11, 0), OFF]);

        meter.set_value(6.0, &mut strip).unwrap();
        assert_eq!(strip.pixels(), &[GREEN, YELLOW, RED]);

        clock.advance(Duration::from_secs(2));
        meter.set_value(f64::NEG_INFINITY, &mut strip).unwrap();
        assert_eq!(strip.pixels(), &[OFF; 3]);
    }

    #[test]
    fn nan_counts_as_silence() {
        let clock = ManualClock::new();
        let mut strip = PixelBuffer::new(4);
        let mut meter = MeterEngine::new(&strip, &clock, options()).unwrap();
        meter.set_value(f64::NAN, &mut strip).unwrap();
        assert_eq!(meter.value(), 0.0);
        assert_eq!(strip.pixels(), &[OFF; 4]);
    }

    #[test]
    fn auto_flush() {
        let clock = ManualClock::new();
        let mut strip = PixelBuffer::new(4);

        let mut meter = MeterEngine::new(&strip, &clock, options()).unwrap();
        meter.set_value(30000.0, &mut strip).unwrap();
        assert_eq!(strip.show_count(), 0);

        let show = MeterOptions {
            show: true,
            ..options()
        };
        let mut meter = MeterEngine::new(&strip, &clock, show).unwrap();
        meter.set_value(30000.0, &mut strip).unwrap();
        meter.set_value(31000.0, &mut strip).unwrap();
        assert_eq!(strip.show_count(), 2);
    }

    #[test]
    fn render_redraws_a_cleared_strip() {
        let clock = ManualClock::new();
        let mut strip = PixelBuffer::new(4);
        let show = MeterOptions {
            show: true,
            ..options()
        };
        let mut meter = MeterEngine::new(&strip, &clock, show).unwrap();
        meter.set_value(50000.0, &mut strip).unwrap();
        let drawn = strip.pixels().to_vec();

        strip.clear();
        assert_eq!(strip.pixels(), &[OFF; 4]);

        meter.render(&mut strip).unwrap();
        assert_eq!(strip.pixels(), drawn.as_slice());
        assert_eq!(strip.show_count(), 2);
        // Rendering is not an update.
        assert_eq!(meter.value(), 50000.0);
        assert_eq!(meter.peak(), 50000.0);
    }

    #[test]
    fn render_refuses_a_sink_of_another_length() {
        let clock = ManualClock::new();
        let strip = PixelBuffer::new(4);
        let meter = MeterEngine::new(&strip, &clock, options()).unwrap();
        let mut other = PixelBuffer::new(3);
        assert!(matches!(
            meter.render(&mut other),
            Err(MeterError::SinkLength { .. })
        ));
    }

    #[test]
    fn refuses_a_sink_of_another_length() {
        let clock = ManualClock::new();
        let strip = PixelBuffer::new(4);
        let mut meter = MeterEngine::new(&strip, &clock, options()).unwrap();

        let mut other = PixelBuffer::new(5);
        let result = meter.set_value(30000.0, &mut other);
        assert!(matches!(
            result,
            Err(MeterError::SinkLength {
                expected: 4,
                actual: 5
            })
        ));
        assert_eq!(other.pixels(), &[OFF; 5]);
    }

    #[test]
    fn construction_errors() {
        let clock = ManualClock::new();
        assert!(matches!(
            MeterEngine::new(&PixelBuffer::new(0), &clock, options()),
            Err(MeterError::EmptySink)
        ));
        assert!(matches!(
            MeterEngine::with_thresholds(&PixelBuffer::new(2), &clock, options(), vec![0.0, 5.0, 5.0]),
            Err(MeterError::ThresholdOrder { .. })
        ));
        let bad_decay = MeterOptions {
            decay: f64::INFINITY,
            ..options()
        };
        assert!(matches!(
            MeterEngine::new(&PixelBuffer::new(2), &clock, bad_decay),
            Err(MeterError::Duration { .. })
        ));
    }

    #[test]
    fn custom_thresholds() {
        let clock = ManualClock::new();
        let mut strip = PixelBuffer::new(2);
        let mut meter =
            MeterEngine::with_thresholds(&strip, &clock, options(), vec![0.0, 0.5, 1.0]).unwrap();
        meter.set_value(0.75, &mut strip).unwrap();
        assert_eq!(strip.pixels(), &[GREEN, Rgb::new(55, 0, 0)]);
    }

    #[test]
    fn single_segment_strip() {
        let clock = ManualClock::new();
        let mut strip = PixelBuffer::new(1);
        let mut meter = MeterEngine::new(&strip, &clock, options()).unwrap();
        assert_eq!(meter.zones(), &[RED]);

        meter.set_value(33750.0, &mut strip).unwrap();
        assert_eq!(strip.pixels(), &[Rgb::new(55, 0, 0)]);
        meter.set_value(64000.0, &mut strip).unwrap();
        assert_eq!(strip.pixels(), &[RED]);
    }

    #[test]
    fn clock_resolution_does_not_change_the_output() {
        let fine = ManualClock::new();
        let coarse = ManualClock::seconds_only();
        let mut fine_strip = PixelBuffer::new(8);
        let mut coarse_strip = PixelBuffer::new(8);
        let mut fine_meter = MeterEngine::new(&fine_strip, &fine, options()).unwrap();
        let mut coarse_meter = MeterEngine::new(&coarse_strip, &coarse, options()).unwrap();
        assert_eq!(fine_meter.time_base(), TimeBase::Nanos);
        assert_eq!(coarse_meter.time_base(), TimeBase::Seconds);

        for value in [60000.0, 20000.0, 20000.0, 45000.0, 5000.0, 5000.0] {
            fine.advance(Duration::from_millis(125));
            coarse.advance(Duration::from_millis(125));
            fine_meter.set_value(value, &mut fine_strip).unwrap();
            coarse_meter.set_value(value, &mut coarse_strip).unwrap();
            assert_eq!(fine_strip.pixels(), coarse_strip.pixels());
            assert_eq!(fine_meter.peak(), coarse_meter.peak());
        }
    }
}
