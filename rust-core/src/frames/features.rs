//! Per-frame time-domain features
//!
//! Each feature maps one (offset, frame_size) frame of the buffer to a single
//! value. Frames running past the buffer end are truncated, never padded.

use std::fmt;
use std::str::FromStr;

use crate::error::{AnalysisError, NOT_COMPUTABLE};

/// Volume below which a frame counts as silent
pub const SILENCE_VOLUME_THRESHOLD: f64 = 0.02;

/// Zero-crossing rate separating voiced silence from noise-like silence
pub const SILENCE_ZCR_THRESHOLD: f64 = 50.0;

/// Smallest lag (in samples) examined by the pitch estimators
pub const MIN_PITCH_LAG: usize = 40;

/// Time-domain feature evaluated once per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FrameFeature {
    /// Root-mean-square of the frame
    Volume,

    /// Mean of squared samples
    ShortTimeEnergy,

    /// Sign changes per second
    ZeroCrossingRate,

    /// 1.0 for quiet voiced frames, 0.5 for quiet noisy frames, 0.0 otherwise
    SilenceRatio,

    /// Pitch from the autocorrelation maximum
    FundamentalFrequency,

    /// Pitch from the average magnitude difference minimum
    FundamentalFrequencyAmdf,
}

impl FrameFeature {
    /// Every feature, in registration order
    pub const ALL: [FrameFeature; 6] = [
        FrameFeature::Volume,
        FrameFeature::ShortTimeEnergy,
        FrameFeature::ZeroCrossingRate,
        FrameFeature::SilenceRatio,
        FrameFeature::FundamentalFrequency,
        FrameFeature::FundamentalFrequencyAmdf,
    ];

    /// Lookup key
    pub fn name(&self) -> &'static str {
        match self {
            FrameFeature::Volume => "volume",
            FrameFeature::ShortTimeEnergy => "ste",
            FrameFeature::ZeroCrossingRate => "zcr",
            FrameFeature::SilenceRatio => "silence_ratio",
            FrameFeature::FundamentalFrequency => "fundamental_frequency",
            FrameFeature::FundamentalFrequencyAmdf => "fundamental_frequency_amdf",
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            FrameFeature::Volume => "volume",
            FrameFeature::ShortTimeEnergy => "STE",
            FrameFeature::ZeroCrossingRate => "ZCR",
            FrameFeature::SilenceRatio => "Silence ratio",
            FrameFeature::FundamentalFrequency => "Fundamental frequency",
            FrameFeature::FundamentalFrequencyAmdf => "Fundamental frequency (AMDF)",
        }
    }

    /// Evaluate the feature on one frame
    ///
    /// # Arguments
    /// * `samples` - Full sample buffer
    /// * `offset` - Index of the first frame sample
    /// * `frame_size` - Nominal frame length (truncated at the buffer end)
    /// * `sample_rate` - Sample rate in Hz
    pub fn evaluate(&self, samples: &[f64], offset: usize, frame_size: usize, sample_rate: f64) -> f64 {
        let start = offset.min(samples.len());
        let end = offset.saturating_add(frame_size).min(samples.len());
        let frame = &samples[start..end];

        match self {
            FrameFeature::Volume => volume(frame),
            FrameFeature::ShortTimeEnergy => short_time_energy(frame),
            FrameFeature::ZeroCrossingRate => zero_crossing_rate(frame, sample_rate),
            FrameFeature::SilenceRatio => silence_ratio(frame, sample_rate),
            FrameFeature::FundamentalFrequency => {
                autocorrelation_pitch(frame, frame_size, sample_rate)
            }
            FrameFeature::FundamentalFrequencyAmdf => amdf_pitch(frame, frame_size, sample_rate),
        }
    }
}

impl fmt::Display for FrameFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FrameFeature {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FrameFeature::ALL
            .iter()
            .copied()
            .find(|f| f.name().eq_ignore_ascii_case(s) || f.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| AnalysisError::UnknownFeature(s.to_string()))
    }
}

/// RMS of the frame (NaN for an empty frame)
pub fn volume(frame: &[f64]) -> f64 {
    short_time_energy(frame).sqrt()
}

/// Mean square of the frame (NaN for an empty frame)
pub fn short_time_energy(frame: &[f64]) -> f64 {
    let sum: f64 = frame.iter().map(|s| s * s).sum();
    sum / frame.len() as f64
}

/// Sign changes scaled by `sample_rate / N`
///
/// N counts the frame samples but never drops below 1, so an empty or
/// single-sample frame yields 0.0 instead of dividing by zero.
pub fn zero_crossing_rate(frame: &[f64], sample_rate: f64) -> f64 {
    let crossings = frame
        .windows(2)
        .filter(|w| w[0].is_sign_negative() != w[1].is_sign_negative())
        .count();
    let n = frame.len().max(1);

    crossings as f64 * sample_rate / n as f64
}

/// Silence classification from volume and zero-crossing rate
pub fn silence_ratio(frame: &[f64], sample_rate: f64) -> f64 {
    if volume(frame) < SILENCE_VOLUME_THRESHOLD {
        if zero_crossing_rate(frame, sample_rate) > SILENCE_ZCR_THRESHOLD {
            0.5
        } else {
            1.0
        }
    } else {
        0.0
    }
}

/// Exclusive upper bound of the examined lags
fn max_pitch_lag(frame_size: usize) -> usize {
    frame_size * 2 / 3
}

/// Pitch estimate from the unnormalized autocorrelation maximum
///
/// Lags run over `[MIN_PITCH_LAG, 2*frame_size/3)`. The first lag always
/// wins the initial comparison and later lags replace it only when strictly
/// larger, so ties keep the shortest lag.
pub fn autocorrelation_pitch(frame: &[f64], frame_size: usize, sample_rate: f64) -> f64 {
    let max_lag = max_pitch_lag(frame_size);
    if MIN_PITCH_LAG >= max_lag {
        return NOT_COMPUTABLE;
    }

    let mut best_value = f64::MIN;
    let mut best_lag = MIN_PITCH_LAG;

    for lag in MIN_PITCH_LAG..max_lag {
        let shifted = frame.get(lag..).unwrap_or(&[]);
        let r: f64 = frame.iter().zip(shifted).map(|(a, b)| a * b).sum();

        if r > best_value {
            best_value = r;
            best_lag = lag;
        }
    }

    sample_rate / best_lag as f64
}

/// Pitch estimate from the average magnitude difference minimum
///
/// Same lag range as [`autocorrelation_pitch`]; lags with no overlapping
/// sample pair are skipped.
pub fn amdf_pitch(frame: &[f64], frame_size: usize, sample_rate: f64) -> f64 {
    let max_lag = max_pitch_lag(frame_size);
    if MIN_PITCH_LAG >= max_lag {
        return NOT_COMPUTABLE;
    }

    let mut best: Option<(usize, f64)> = None;

    for lag in MIN_PITCH_LAG..max_lag {
        let shifted = match frame.get(lag..) {
            Some(s) if !s.is_empty() => s,
            _ => continue,
        };
        let pairs = shifted.len();
        let d = frame
            .iter()
            .zip(shifted)
            .map(|(a, b)| (a - b).abs())
            .sum::<f64>()
            / pairs as f64;

        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((lag, d)),
        }
    }

    match best {
        Some((lag, _)) => sample_rate / lag as f64,
        None => NOT_COMPUTABLE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn sine(freq: f64, sample_rate: f64, len: usize) -> Vec<f64> {
        (0..len)
            .map(|n| (2.0 * PI * freq * n as f64 / sample_rate).sin())
            .collect()
    }

    #[test]
    fn test_volume_is_sqrt_of_energy() {
        let samples: Vec<f64> = (0..500).map(|i| ((i * 37) % 101) as f64 / 50.0 - 1.0).collect();

        for offset in [0, 120, 450] {
            let v = FrameFeature::Volume.evaluate(&samples, offset, 100, 8000.0);
            let e = FrameFeature::ShortTimeEnergy.evaluate(&samples, offset, 100, 8000.0);
            assert!((v - e.sqrt()).abs() < 1e-12);
        }
    }

    #[test]
    fn test_volume_truncated_tail() {
        let samples = vec![2.0; 10];
        // Only 4 samples in range, all equal: RMS stays 2.0
        let v = FrameFeature::Volume.evaluate(&samples, 6, 100, 8000.0);
        assert!((v - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_volume_past_end_is_nan() {
        let samples = vec![1.0; 10];
        assert!(FrameFeature::Volume.evaluate(&samples, 20, 5, 8000.0).is_nan());
    }

    #[test]
    fn test_zcr_counts_with_biased_denominator() {
        // 3 crossings over 4 samples: 3 * 100 / 4
        let samples = vec![1.0, -1.0, 1.0, -1.0];
        let zcr = FrameFeature::ZeroCrossingRate.evaluate(&samples, 0, 4, 100.0);
        assert!((zcr - 75.0).abs() < 1e-12);

        // Single sample: no pairs, denominator stays 1
        assert_eq!(zero_crossing_rate(&[0.3], 100.0), 0.0);
        assert_eq!(zero_crossing_rate(&[], 100.0), 0.0);
    }

    #[test]
    fn test_zcr_scale_invariant() {
        let samples = sine(440.0, 8000.0, 1200);
        let scaled: Vec<f64> = samples.iter().map(|s| s * 7.5).collect();

        let a = FrameFeature::ZeroCrossingRate.evaluate(&samples, 0, 1200, 8000.0);
        let b = FrameFeature::ZeroCrossingRate.evaluate(&scaled, 0, 1200, 8000.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_silence_ratio_cases() {
        let zeros = vec![0.0; 64];
        assert_eq!(FrameFeature::SilenceRatio.evaluate(&zeros, 0, 64, 8000.0), 1.0);

        // Quiet but rapidly alternating: noise-like silence
        let hiss: Vec<f64> = (0..64).map(|i| if i % 2 == 0 { 0.01 } else { -0.01 }).collect();
        assert_eq!(FrameFeature::SilenceRatio.evaluate(&hiss, 0, 64, 8000.0), 0.5);

        let loud = vec![0.5; 64];
        assert_eq!(FrameFeature::SilenceRatio.evaluate(&loud, 0, 64, 8000.0), 0.0);
    }

    #[test]
    fn test_autocorrelation_pitch_of_sine() {
        let sample_rate = 8000.0;
        // Period of 80 samples lies inside [40, 800)
        let samples = sine(100.0, sample_rate, 1200);
        let f0 = FrameFeature::FundamentalFrequency.evaluate(&samples, 0, 1200, sample_rate);
        assert!((f0 - 100.0).abs() < 1.0, "got {}", f0);
    }

    #[test]
    fn test_autocorrelation_pitch_of_silence_keeps_first_lag() {
        let zeros = vec![0.0; 300];
        let f0 = autocorrelation_pitch(&zeros, 300, 8000.0);
        assert_eq!(f0, 8000.0 / MIN_PITCH_LAG as f64);
    }

    #[test]
    fn test_pitch_with_empty_lag_range() {
        let samples = sine(100.0, 8000.0, 60);
        assert_eq!(autocorrelation_pitch(&samples, 60, 8000.0), NOT_COMPUTABLE);
        assert_eq!(amdf_pitch(&samples, 60, 8000.0), NOT_COMPUTABLE);
    }

    #[test]
    fn test_pitch_never_reads_past_buffer() {
        let samples = sine(100.0, 8000.0, 1000);
        // Frame starts 100 samples before the end
        let f0 = FrameFeature::FundamentalFrequency.evaluate(&samples, 900, 1200, 8000.0);
        assert!(f0.is_finite());
        let f0 = FrameFeature::FundamentalFrequencyAmdf.evaluate(&samples, 900, 1200, 8000.0);
        assert!(f0.is_finite());
    }

    #[test]
    fn test_amdf_pitch_of_sine() {
        let sample_rate = 8000.0;
        // Period of 400 samples: its first multiple (800) falls outside the lag range
        let samples = sine(20.0, sample_rate, 1200);
        let f0 = FrameFeature::FundamentalFrequencyAmdf.evaluate(&samples, 0, 1200, sample_rate);
        assert!((f0 - 20.0).abs() < 0.5, "got {}", f0);
    }

    #[test]
    fn test_lookup_by_name_and_label() {
        assert_eq!("zcr".parse::<FrameFeature>().unwrap(), FrameFeature::ZeroCrossingRate);
        assert_eq!("STE".parse::<FrameFeature>().unwrap(), FrameFeature::ShortTimeEnergy);
        assert_eq!(
            "Fundamental frequency (AMDF)".parse::<FrameFeature>().unwrap(),
            FrameFeature::FundamentalFrequencyAmdf
        );
        assert!(matches!(
            "loudness".parse::<FrameFeature>(),
            Err(AnalysisError::UnknownFeature(_))
        ));
    }
}
