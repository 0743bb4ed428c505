//! Peak meters on addressable RGB strips.
//!
//! Feed a [`MeterEngine`] one level per tick through
//! [`MeterEngine::set_value`] and it writes a complete frame to a
//! [`PixelSink`]: a bar colored by zone, easing down after loud moments, with
//! a held peak marker on top.

pub mod clock;
pub mod error;
pub mod meter;
pub mod olaoutput;
pub mod options;
pub mod sink;
pub mod terminal;

pub use clock::{Clock, ManualClock, SystemClock, TimeBase};
pub use error::MeterError;
pub use meter::ballistics::Ballistics;
pub use meter::thresholds::{Scale, SegmentLevel, Thresholds};
pub use meter::zones::{zone_palette, Rgb, ZoneCounts, GREEN, OFF, RED, YELLOW};
pub use meter::MeterEngine;
pub use olaoutput::OlaOutput;
pub use options::MeterOptions;
pub use sink::{PixelBuffer, PixelSink};
pub use terminal::TerminalStrip;
