use serde::Deserialize;

use crate::error::MeterError;
use crate::meter::thresholds::Scale;

/// Meter settings, fixed once a meter is built.
///
/// Can be read from a config file, any field left out keeps its default:
///
/// ```toml
/// dB = true
/// reverse = false
/// decay = 0.25
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MeterOptions {
    /// Reserved. Accepted for compatibility, rendering always uses fractions.
    pub fractions: bool,
    /// Values are in dB instead of raw 0..65535 levels.
    #[serde(alias = "dB")]
    pub db: bool,
    /// Flush the sink after every update.
    pub show: bool,
    /// The first pixel of the strip is the top of the meter.
    pub reverse: bool,
    /// Seconds for the bar to fall to a lower value, 0 disables decay.
    pub decay: f64,
    /// Seconds a peak stays put unless a higher one arrives.
    pub peak_hold: f64,
}

impl Default for MeterOptions {
    fn default() -> Self {
        MeterOptions {
            fractions: true,
            db: false,
            show: false,
            reverse: true,
            decay: 0.4,
            peak_hold: 0.75,
        }
    }
}

impl MeterOptions {
    pub fn scale(&self) -> Scale {
        if self.db {
            Scale::Decibel
        } else {
            Scale::Linear
        }
    }

    pub(crate) fn validate(&self) -> Result<(), MeterError> {
        for (name, value) in [("decay", self.decay), ("peak_hold", self.peak_hold)] {
            if !value.is_finite() || value < 0.0 {
                return Err(MeterError::Duration { name, value });
            }
        }
        Ok(())
    }
}
