use crate::error::MeterError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    /// Raw 16 bit levels, 0 to 65535.
    Linear,
    /// Levels in dB, 0 dB being the nominal maximum.
    Decibel,
}

impl Scale {
    pub fn silence(&self) -> f64 {
        match self {
            Scale::Linear => 0.0,
            Scale::Decibel => f64::NEG_INFINITY,
        }
    }
}

/// Where a value lands on the strip. `position` is `None` when nothing is lit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentLevel {
    pub position: Option<usize>,
    pub brightness: f64,
}

impl SegmentLevel {
    pub const OFF: SegmentLevel = SegmentLevel {
        position: None,
        brightness: 0.0,
    };
}

const LINEAR_FLOOR: f64 = 5000.0;
const LINEAR_TOP: f64 = 57500.0;
const LINEAR_CEILING: f64 = 62500.0;
const DB_FLOOR: f64 = -40.0;
const DB_STEP: f64 = 6.0;
const DB_CEILING: f64 = 3.0;

/// Segment boundaries, one more than there are segments. Segment `i` covers
/// `[bounds[i], bounds[i + 1])`, anything from the last bound up is the top
/// segment at full brightness.
#[derive(Debug, Clone, PartialEq)]
pub struct Thresholds {
    bounds: Vec<f64>,
}

impl Thresholds {
    /// The calibrated table for a strip of `segment_count` segments.
    pub fn standard(scale: Scale, segment_count: usize) -> Thresholds {
        let bounds = match (scale, segment_count) {
            (Scale::Linear, 3) => vec![15000.0, 45000.0, 57500.0, 62500.0],
            (Scale::Linear, 4) => vec![5000.0, 25000.0, 45000.0, 57500.0, 62500.0],
            (Scale::Linear, n) => {
                let span = LINEAR_TOP - LINEAR_FLOOR;
                let divisor = n.saturating_sub(1).max(1) as f64;
                (0..n)
                    .map(|x| LINEAR_FLOOR + (x as f64 * span / divisor).round_ties_even())
                    .chain(std::iter::once(LINEAR_CEILING))
                    .collect()
            }
            (Scale::Decibel, 3) => vec![-30.0, -6.0, 0.0, 3.0],
            (Scale::Decibel, 4) => vec![-40.0, -12.0, -6.0, 0.0, 3.0],
            (Scale::Decibel, n) => {
                let mut bounds: Vec<f64> = (0..n)
                    .map(|x| (x as f64 - n as f64 + 1.0) * DB_STEP)
                    .chain(std::iter::once(DB_CEILING))
                    .collect();
                // Short strips still reach down to -40 dB.
                if bounds[0] > DB_FLOOR {
                    bounds[0] = DB_FLOOR;
                }
                bounds
            }
        };
        Thresholds { bounds }
    }

    /// A caller supplied table. It must have `segment_count + 1` entries,
    /// strictly increasing.
    pub fn custom(bounds: Vec<f64>, segment_count: usize) -> Result<Thresholds, MeterError> {
        if bounds.len() != segment_count + 1 {
            return Err(MeterError::ThresholdCount {
                expected: segment_count + 1,
                actual: bounds.len(),
            });
        }

        for (index, pair) in bounds.windows(2).enumerate() {
            // Written so that NaN on either side fails too.
            if !(pair[0] < pair[1]) {
                return Err(MeterError::ThresholdOrder {
                    index,
                    lower: pair[0],
                    upper: pair[1],
                });
            }
        }

        Ok(Thresholds { bounds })
    }

    pub fn bounds(&self) -> &[f64] {
        &self.bounds
    }

    pub fn segment_count(&self) -> usize {
        self.bounds.len() - 1
    }

    /// The lowest value that lights anything.
    pub fn floor(&self) -> f64 {
        self.bounds[0]
    }

    pub fn map(&self, value: f64) -> SegmentLevel {
        if value.is_nan() || value < self.bounds[0] {
            return SegmentLevel::OFF;
        }

        for (index, pair) in self.bounds.windows(2).enumerate() {
            let (lower, upper) = (pair[0], pair[1]);
            if lower <= value && value < upper {
                return SegmentLevel {
                    position: Some(index),
                    brightness: (value - lower) / (upper - lower),
                };
            }
        }

        SegmentLevel {
            position: Some(self.segment_count() - 1),
            brightness: 1.0,
        }
    }
}
