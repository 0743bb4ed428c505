//! Zone colors and how they are spread over a strip.
//!
//! The top segment is always red, about a quarter of the strip below it is
//! yellow and the rest is green. A quarter is rounded half to even, so a
//! 10 segment strip gets 2 yellow segments and a 6 segment strip gets 2 too.

use palette::Srgb;

pub type Rgb = Srgb<u8>;

// Dim on purpose, these end up on bare LEDs.
pub const GREEN: Rgb = Rgb::new(0, 24, 0);
pub const YELLOW: Rgb = Rgb::new(52, 22, 0);
pub const RED: Rgb = Rgb::new(110, 0, 0);
pub const OFF: Rgb = Rgb::new(0, 0, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneCounts {
    pub green: usize,
    pub yellow: usize,
    pub red: usize,
}

impl ZoneCounts {
    pub fn for_segments(segment_count: usize) -> ZoneCounts {
        let red = segment_count.min(1);
        let yellow = (segment_count as f64 / 4.0).round_ties_even() as usize;
        let yellow = yellow.min(segment_count - red);
        ZoneCounts {
            green: segment_count - yellow - red,
            yellow,
            red,
        }
    }
}

/// One color per segment, bottom to top.
pub fn zone_palette(segment_count: usize) -> Vec<Rgb> {
    let counts = ZoneCounts::for_segments(segment_count);
    let mut colors = Vec::with_capacity(segment_count);
    colors.extend(std::iter::repeat(GREEN).take(counts.green));
    colors.extend(std::iter::repeat(YELLOW).take(counts.yellow));
    colors.extend(std::iter::repeat(RED).take(counts.red));
    colors
}

/// Scales each channel by `brightness`, rounding half to even.
pub fn dim(color: Rgb, brightness: f64) -> Rgb {
    let scale = |channel: u8| (channel as f64 * brightness).round_ties_even().clamp(0.0, 255.0) as u8;
    Rgb::new(scale(color.red), scale(color.green), scale(color.blue))
}
