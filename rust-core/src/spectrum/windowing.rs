//! Signal windows for spectral analysis
//!
//! Selects a time interval of the buffer and tapers it with a raised-cosine
//! apodization before the FFT to reduce spectral leakage.

use std::f64::consts::PI;
use std::ops::Range;

use crate::audio::SampleBuffer;
use crate::error::{AnalysisError, Result};

/// a0 of the Hann window
pub const HANN_A0: f64 = 0.5;

/// a0 of the Hamming window
pub const HAMMING_A0: f64 = 0.53836;

/// Number of points in a window preview curve
pub const SHAPE_CURVE_POINTS: usize = 100;

/// Apodization shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowShape {
    /// Rectangular window (no tapering)
    Rectangular,

    /// Generalized raised cosine: w[n] = a0 - (1 - a0)*cos(2πn/N)
    /// a0 = 0.5 gives Hann, a0 = 0.53836 gives Hamming
    RaisedCosine(f64),
}

impl Default for WindowShape {
    fn default() -> Self {
        Self::Rectangular
    }
}

impl WindowShape {
    /// Hann window
    pub fn hann() -> Self {
        Self::RaisedCosine(HANN_A0)
    }

    /// Hamming window
    pub fn hamming() -> Self {
        Self::RaisedCosine(HAMMING_A0)
    }

    /// Check the shape parameter
    ///
    /// # Errors
    /// `InvalidShapeParam` when a0 lies outside [0, 1]
    pub fn validate(&self) -> Result<()> {
        match *self {
            WindowShape::RaisedCosine(a0) if !(0.0..=1.0).contains(&a0) => {
                Err(AnalysisError::InvalidShapeParam(a0))
            }
            _ => Ok(()),
        }
    }

    /// Window coefficient for sample `n` of an `length`-sample slice
    #[inline]
    pub fn coefficient(&self, n: usize, length: usize) -> f64 {
        match *self {
            WindowShape::Rectangular => 1.0,
            WindowShape::RaisedCosine(a0) => {
                a0 - (1.0 - a0) * (2.0 * PI * n as f64 / length as f64).cos()
            }
        }
    }

    /// Generate window coefficients w[n] for n = 0..length-1
    pub fn generate(&self, length: usize) -> Vec<f64> {
        (0..length).map(|n| self.coefficient(n, length)).collect()
    }
}

/// Apply window to signal
///
/// # Arguments
/// * `signal` - Input signal
/// * `shape` - Window shape
///
/// # Returns
/// Windowed signal
pub fn apply_window(signal: &[f64], shape: WindowShape) -> Vec<f64> {
    let mut windowed = signal.to_vec();
    apply_window_inplace(&mut windowed, shape);
    windowed
}

/// Apply window in-place (rectangular windows leave the signal untouched)
pub fn apply_window_inplace(signal: &mut [f64], shape: WindowShape) {
    if shape == WindowShape::Rectangular {
        return;
    }

    let length = signal.len();
    for (n, s) in signal.iter_mut().enumerate() {
        *s *= shape.coefficient(n, length);
    }
}

/// Time interval and apodization of the analysed segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowSpec {
    /// Start of the interval in seconds
    pub start_time: f64,

    /// End of the interval in seconds (exclusive)
    pub end_time: f64,

    /// Apodization shape
    pub shape: WindowShape,
}

/// Window function sampled over the window span, for previews
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeCurve {
    pub times: Vec<f64>,
    pub values: Vec<f64>,
}

impl WindowSpec {
    /// Create new window specification
    pub fn new(start_time: f64, end_time: f64, shape: WindowShape) -> Self {
        Self {
            start_time,
            end_time,
            shape,
        }
    }

    /// Rectangular window over the whole buffer
    pub fn full(duration: f64) -> Self {
        Self::new(0.0, duration, WindowShape::Rectangular)
    }

    /// Check the interval against a buffer of `duration` seconds
    ///
    /// # Errors
    /// `InvalidWindow` unless 0 <= start < end <= duration,
    /// `InvalidShapeParam` for an out-of-range a0
    pub fn validate(&self, duration: f64) -> Result<()> {
        let valid = self.start_time.is_finite()
            && self.end_time.is_finite()
            && self.start_time >= 0.0
            && self.end_time > self.start_time
            && self.end_time <= duration;

        if !valid {
            return Err(AnalysisError::InvalidWindow {
                start: self.start_time,
                end: self.end_time,
                duration,
            });
        }
        self.shape.validate()
    }

    /// Sample indices covered by the interval
    ///
    /// floor(start*N/duration) .. ceil(end*N/duration), clamped to N
    pub fn sample_range(&self, num_samples: usize, duration: f64) -> Range<usize> {
        let n = num_samples as f64;
        let last = (self.end_time * n / duration).ceil().max(0.0) as usize;
        let end = last.min(num_samples);
        let first = ((self.start_time * n / duration).floor().max(0.0) as usize).min(end);
        first..end
    }

    /// Cut the interval out of `buffer` and apply the window shape
    pub fn extract(&self, buffer: &SampleBuffer) -> Result<Vec<f64>> {
        self.validate(buffer.duration())?;

        let range = self.sample_range(buffer.len(), buffer.duration());
        log::debug!(
            "Window [{:.4}, {:.4}) s -> samples {}..{} of {}",
            self.start_time,
            self.end_time,
            range.start,
            range.end,
            buffer.len()
        );

        Ok(apply_window(&buffer.samples()[range], self.shape))
    }

    /// Sample the window function at `points` positions over the interval
    pub fn shape_curve(&self, points: usize) -> ShapeCurve {
        let step = if points > 1 {
            (self.end_time - self.start_time) / (points - 1) as f64
        } else {
            0.0
        };

        ShapeCurve {
            times: (0..points).map(|i| self.start_time + i as f64 * step).collect(),
            values: self.shape.generate(points),
        }
    }
}
