//! Frame segmentation driver
//!
//! Slides a feature over the whole buffer and pairs every value with a time
//! stamp.

use crate::audio::SampleBuffer;
use crate::error::{AnalysisError, Result};
use super::features::FrameFeature;

/// Frame segmentation configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameConfig {
    /// Frame length in samples (default: 1200)
    pub frame_size: usize,

    /// Samples shared by consecutive frames (default: 20)
    pub overlap: usize,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            frame_size: 1200,
            overlap: 20,
        }
    }
}

impl FrameConfig {
    /// Create a new frame configuration
    pub fn new(frame_size: usize, overlap: usize) -> Self {
        Self { frame_size, overlap }
    }

    /// Validate and clamp the configuration
    ///
    /// An overlap of `frame_size` or more would stall the stride, so it is
    /// clamped to `frame_size - 1`.
    pub fn normalized(self) -> Result<Self> {
        if self.frame_size == 0 {
            return Err(AnalysisError::InvalidFrameSize);
        }

        let mut config = self;
        if config.overlap >= config.frame_size {
            log::warn!(
                "Overlap {} >= frame size {}, clamping to {}",
                config.overlap,
                config.frame_size,
                config.frame_size - 1
            );
            config.overlap = config.frame_size - 1;
        }
        Ok(config)
    }

    /// Distance between consecutive frame starts
    ///
    /// The overlap is clamped to `frame_size - 1` here as well, so the stride
    /// is at least 1 even for a configuration that was never normalized.
    pub fn stride(&self) -> usize {
        let overlap = self.overlap.min(self.frame_size.saturating_sub(1));
        self.frame_size.saturating_sub(overlap).max(1)
    }

    /// Number of frames covering `num_samples` samples: ceil(N / stride)
    pub fn frame_count(&self, num_samples: usize) -> usize {
        num_samples.div_ceil(self.stride())
    }
}

/// Values of one feature over the whole buffer
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSeries {
    feature: FrameFeature,
    config: FrameConfig,
    timestamps: Vec<f64>,
    values: Vec<f64>,
}

impl FrameSeries {
    /// Evaluate `feature` on every frame of `buffer`
    ///
    /// # Arguments
    /// * `buffer` - Source samples
    /// * `feature` - Feature evaluated per frame
    /// * `config` - Frame size and overlap (normalized here)
    ///
    /// # Returns
    /// One value per frame. Time stamps are spread evenly from 0 to the buffer
    /// duration, independently of the stride.
    pub fn compute(buffer: &SampleBuffer, feature: FrameFeature, config: FrameConfig) -> Result<Self> {
        let config = config.normalized()?;
        let stride = config.stride();
        let frame_count = config.frame_count(buffer.len());

        let step = if frame_count > 1 {
            buffer.duration() / (frame_count - 1) as f64
        } else {
            0.0
        };

        let samples = buffer.samples();
        let sample_rate = buffer.sample_rate();

        let values = (0..frame_count)
            .map(|i| feature.evaluate(samples, i * stride, config.frame_size, sample_rate))
            .collect();
        let timestamps = (0..frame_count).map(|i| i as f64 * step).collect();

        log::debug!(
            "Computed {} series: {} frames (size {}, stride {})",
            feature.name(),
            frame_count,
            config.frame_size,
            stride
        );

        Ok(Self {
            feature,
            config,
            timestamps,
            values,
        })
    }

    /// Get the feature this series was computed with
    pub fn feature(&self) -> FrameFeature {
        self.feature
    }

    /// Get the normalized frame configuration
    pub fn config(&self) -> FrameConfig {
        self.config
    }

    /// Get time stamps in seconds
    pub fn timestamps(&self) -> &[f64] {
        &self.timestamps
    }

    /// Get per-frame values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of frames
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the series holds no frame
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over (timestamp, value) pairs
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.timestamps.iter().copied().zip(self.values.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(len: usize) -> SampleBuffer {
        let samples = (0..len).map(|i| i as f64 / len as f64).collect();
        SampleBuffer::new(samples, 8000.0, len as f64 / 8000.0).unwrap()
    }

    #[test]
    fn test_frame_count_is_ceil_of_stride() {
        let buffer = ramp(1000);

        for (frame_size, overlap) in [(100, 0), (100, 20), (64, 63), (7, 3), (1500, 20)] {
            let config = FrameConfig::new(frame_size, overlap);
            let series = FrameSeries::compute(&buffer, FrameFeature::Volume, config).unwrap();
            let stride = frame_size - overlap;
            let expected = (1000 + stride - 1) / stride;

            assert_eq!(series.len(), expected);
            // Last frame starts inside the buffer, so every value is defined
            assert!((series.len() - 1) * stride < 1000);
            assert!(series.values().iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn test_overlap_clamped() {
        let config = FrameConfig::new(10, 10).normalized().unwrap();
        assert_eq!(config.overlap, 9);
        assert_eq!(config.stride(), 1);

        let config = FrameConfig::new(10, 25).normalized().unwrap();
        assert_eq!(config.overlap, 9);
    }

    #[test]
    fn test_stride_of_raw_config() {
        // Not normalized: overlap equal to or beyond the frame size
        assert_eq!(FrameConfig::new(10, 10).stride(), 1);
        assert_eq!(FrameConfig::new(10, 10).frame_count(100), 100);
        assert_eq!(FrameConfig::new(10, 20).frame_count(100), 100);
        assert_eq!(FrameConfig::new(0, 0).frame_count(5), 5);

        assert_eq!(FrameConfig::new(10, 4).frame_count(100), 17);
    }

    #[test]
    fn test_zero_frame_size_rejected() {
        assert_eq!(
            FrameConfig::new(0, 0).normalized().unwrap_err(),
            AnalysisError::InvalidFrameSize
        );
    }

    #[test]
    fn test_timestamps_span_duration() {
        let buffer = ramp(1000);
        let series = FrameSeries::compute(&buffer, FrameFeature::ShortTimeEnergy, FrameConfig::new(100, 0))
            .unwrap();

        let stamps = series.timestamps();
        assert_eq!(stamps.len(), 10);
        assert_eq!(stamps[0], 0.0);
        assert!((stamps[9] - buffer.duration()).abs() < 1e-12);
    }

    #[test]
    fn test_single_frame_timestamp() {
        let buffer = ramp(50);
        let series = FrameSeries::compute(&buffer, FrameFeature::Volume, FrameConfig::default()).unwrap();

        assert_eq!(series.len(), 1);
        assert_eq!(series.timestamps(), &[0.0]);
    }

    #[test]
    fn test_values_match_direct_evaluation() {
        let buffer = ramp(500);
        let config = FrameConfig::new(100, 50);
        let series = FrameSeries::compute(&buffer, FrameFeature::Volume, config).unwrap();

        for (i, (_, value)) in series.iter().enumerate() {
            let direct = FrameFeature::Volume.evaluate(buffer.samples(), i * 50, 100, 8000.0);
            assert_eq!(value, direct);
        }
    }
}
