use std::io::{self, Write};

use crate::meter::zones::{Rgb, OFF};
use crate::sink::PixelSink;

/// Draws the strip on one terminal line using 24 bit ANSI colors.
///
/// The meter colors are meant for LEDs and look dark on a screen, so they
/// are multiplied by `gain` first.
pub struct TerminalStrip<W: Write> {
    out: W,
    pixels: Vec<Rgb>,
    gain: u8,
}

impl<W: Write> TerminalStrip<W> {
    pub fn new(out: W, pixel_count: usize, gain: u8) -> TerminalStrip<W> {
        TerminalStrip {
            out,
            pixels: vec![OFF; pixel_count],
            gain: gain.max(1),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn boost(&self, channel: u8) -> u8 {
        channel.saturating_mul(self.gain)
    }
}

impl<W: Write> PixelSink for TerminalStrip<W> {
    fn len(&self) -> usize {
        self.pixels.len()
    }

    fn replace(&mut self, pixels: &[Rgb]) {
        self.pixels.clear();
        self.pixels.extend_from_slice(pixels);
    }

    fn show(&mut self) -> io::Result<()> {
        let mut line = String::from("\r");
        for pixel in &self.pixels {
            if *pixel == OFF {
                line.push_str("\x1b[0m\u{00b7}\u{00b7}");
            } else {
                line.push_str(&format!(
                    "\x1b[38;2;{};{};{}m\u{2588}\u{2588}",
                    self.boost(pixel.red),
                    self.boost(pixel.green),
                    self.boost(pixel.blue)
                ));
            }
        }
        line.push_str("\x1b[0m");
        self.out.write_all(line.as_bytes())?;
        self.out.flush()
    }
}
