use std::io;

use crate::meter::zones::{Rgb, OFF};

/// A fixed-length strip of RGB pixels.
///
/// `replace` swaps in the whole strip at once; implementations must not show
/// a half-written strip. `show` pushes the current contents to the hardware.
pub trait PixelSink {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn replace(&mut self, pixels: &[Rgb]);

    fn show(&mut self) -> io::Result<()>;

    /// Turns every pixel off. Needs a `show` to reach the hardware.
    fn clear(&mut self) {
        let off = vec![OFF; self.len()];
        self.replace(&off);
    }
}

/// In-memory strip, e.g. for composing several meters before handing the
/// result to real hardware.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    pixels: Vec<Rgb>,
    shows: usize,
}

impl PixelBuffer {
    pub fn new(pixel_count: usize) -> PixelBuffer {
        PixelBuffer {
            pixels: vec![OFF; pixel_count],
            shows: 0,
        }
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// How often `show` was called.
    pub fn show_count(&self) -> usize {
        self.shows
    }
}

impl PixelSink for PixelBuffer {
    fn len(&self) -> usize {
        self.pixels.len()
    }

    fn replace(&mut self, pixels: &[Rgb]) {
        self.pixels.clear();
        self.pixels.extend_from_slice(pixels);
    }

    fn show(&mut self) -> io::Result<()> {
        self.shows += 1;
        Ok(())
    }
}
