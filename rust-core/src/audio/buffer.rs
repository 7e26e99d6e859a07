//! Immutable mono sample buffer
//!
//! Holds a decoded channel together with its sample rate and duration

use crate::error::{AnalysisError, Result};

/// Read-only mono sample buffer
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    samples: Vec<f64>,
    sample_rate: f64,
    duration: f64,
}

impl SampleBuffer {
    /// Create new sample buffer
    ///
    /// # Arguments
    /// * `samples` - Decoded samples of a single channel
    /// * `sample_rate` - Sample rate in Hz
    /// * `duration` - Total length in seconds
    ///
    /// # Errors
    /// `BufferTooShort` when fewer than 2 samples are given (the sample
    /// period divides by N-1), `InvalidSampleRate` / `InvalidDuration` for
    /// non-positive or non-finite values
    pub fn new(samples: Vec<f64>, sample_rate: f64, duration: f64) -> Result<Self> {
        if samples.len() < 2 {
            return Err(AnalysisError::BufferTooShort(samples.len()));
        }
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(AnalysisError::InvalidSampleRate(sample_rate));
        }
        if !(duration.is_finite() && duration > 0.0) {
            return Err(AnalysisError::InvalidDuration(duration));
        }

        Ok(Self {
            samples,
            sample_rate,
            duration,
        })
    }

    /// Build a buffer from samples and sample rate, deriving the duration
    pub fn from_sample_rate(samples: Vec<f64>, sample_rate: f64) -> Result<Self> {
        let duration = samples.len() as f64 / sample_rate;
        Self::new(samples, sample_rate, duration)
    }

    /// Get samples
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Get number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false: a buffer holds at least 2 samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Get sample rate in Hz
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Get duration in seconds
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Time between consecutive points of the time axis
    pub fn period(&self) -> f64 {
        self.duration / (self.samples.len() - 1) as f64
    }

    /// Time stamp of every sample, from 0 to `duration` inclusive
    pub fn time_axis(&self) -> Vec<f64> {
        let period = self.period();
        (0..self.samples.len())
            .map(|i| period * i as f64)
            .collect()
    }

    /// Frame view starting at `offset`, truncated at the buffer end
    ///
    /// Returns an empty slice when `offset` lies past the end
    pub fn frame(&self, offset: usize, frame_size: usize) -> &[f64] {
        let start = offset.min(self.samples.len());
        let end = offset.saturating_add(frame_size).min(self.samples.len());
        &self.samples[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_short_buffer() {
        assert_eq!(
            SampleBuffer::new(vec![0.5], 8000.0, 1.0).unwrap_err(),
            AnalysisError::BufferTooShort(1)
        );
        assert!(SampleBuffer::new(vec![], 8000.0, 1.0).is_err());
    }

    #[test]
    fn test_rejects_bad_rate_and_duration() {
        assert!(matches!(
            SampleBuffer::new(vec![0.0; 4], 0.0, 1.0),
            Err(AnalysisError::InvalidSampleRate(_))
        ));
        assert!(matches!(
            SampleBuffer::new(vec![0.0; 4], 8000.0, -1.0),
            Err(AnalysisError::InvalidDuration(_))
        ));
    }

    #[test]
    fn test_time_axis_spans_duration() {
        let buffer = SampleBuffer::new(vec![0.0; 5], 4.0, 2.0).unwrap();
        let axis = buffer.time_axis();

        assert_eq!(axis.len(), 5);
        assert_eq!(axis[0], 0.0);
        assert!((axis[4] - 2.0).abs() < 1e-12);
        assert!((axis[1] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_frame_truncates_at_tail() {
        let buffer = SampleBuffer::from_sample_rate(vec![1.0, 2.0, 3.0, 4.0, 5.0], 5.0).unwrap();

        assert_eq!(buffer.frame(0, 2), &[1.0, 2.0]);
        assert_eq!(buffer.frame(3, 10), &[4.0, 5.0]);
        assert!(buffer.frame(7, 2).is_empty());
        assert!((buffer.duration() - 1.0).abs() < 1e-12);
    }
}
