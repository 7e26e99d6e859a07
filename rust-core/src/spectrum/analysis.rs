//! Power spectrum and cepstrum of a windowed segment
//!
//! Combines the FFT engine with the windowed samples produced by
//! [`WindowSpec::extract`](super::windowing::WindowSpec::extract).

use num_complex::Complex;

use super::fft::FftEngine;
use crate::error::{AnalysisError, Result};

/// First cepstral index searched for the dominant periodicity
pub const CEPSTRUM_SEARCH_START: usize = 20;

/// End (exclusive) of the cepstral search range
pub const CEPSTRUM_SEARCH_END: usize = 100;

/// Spectrum analyzer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpectrumConfig {
    /// Zero-pad segments to the next power of two instead of rejecting them
    /// (default: false)
    pub zero_pad: bool,
}

/// Single-sided power spectrum
#[derive(Debug, Clone, PartialEq)]
pub struct PowerSpectrum {
    bins: Vec<f64>,
    sample_rate: f64,
    fft_size: usize,
}

impl PowerSpectrum {
    /// Wrap precomputed power bins
    ///
    /// `fft_size` is the transform length the bins came from (twice the
    /// number of bins for a spectrum computed here).
    pub fn from_bins(bins: Vec<f64>, sample_rate: f64, fft_size: usize) -> Self {
        Self {
            bins,
            sample_rate,
            fft_size,
        }
    }

    /// Get power per bin, 2|X[k]|²/N for k < N/2
    pub fn bins(&self) -> &[f64] {
        &self.bins
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Get sample rate in Hz
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Get transform length
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Upper edge of the spectrum (Nyquist frequency)
    pub fn max_frequency(&self) -> f64 {
        self.sample_rate / 2.0
    }

    /// Frequency of every bin in Hz: k * sample_rate / N
    pub fn frequencies(&self) -> Vec<f64> {
        let df = self.sample_rate / self.fft_size as f64;
        (0..self.bins.len()).map(|k| k as f64 * df).collect()
    }

    /// Index of the strongest bin
    pub fn peak_bin(&self) -> Option<usize> {
        self.bins
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, f64)>, (i, &p)| match best {
                Some((_, max)) if p <= max => best,
                _ => Some((i, p)),
            })
            .map(|(i, _)| i)
    }
}

/// Dominant periodicity found in the real cepstrum
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CepstralPeak {
    /// Quefrency in samples
    pub index: usize,

    /// sample_rate / index
    pub frequency: f64,
}

/// Spectrum analyzer for segments sampled at a fixed rate
#[derive(Debug, Clone)]
pub struct SpectrumAnalyzer {
    config: SpectrumConfig,
    sample_rate: f64,
}

impl SpectrumAnalyzer {
    /// Create new spectrum analyzer
    pub fn new(sample_rate: f64, config: SpectrumConfig) -> Self {
        Self { config, sample_rate }
    }

    /// Get current configuration
    pub fn config(&self) -> &SpectrumConfig {
        &self.config
    }

    /// Update configuration
    pub fn update_config(&mut self, config: SpectrumConfig) {
        self.config = config;
    }

    /// Forward transform of a windowed segment
    fn transform(&self, windowed: &[f64]) -> Result<(FftEngine, Vec<Complex<f64>>)> {
        if windowed.is_empty() {
            return Err(AnalysisError::EmptyRange);
        }

        let fft_size = if self.config.zero_pad {
            windowed.len().next_power_of_two()
        } else {
            windowed.len()
        };
        let engine = FftEngine::new(fft_size)?;

        let mut buffer: Vec<Complex<f64>> = windowed.iter().map(|&s| Complex::new(s, 0.0)).collect();
        buffer.resize(fft_size, Complex::new(0.0, 0.0));
        engine.forward(&mut buffer)?;

        Ok((engine, buffer))
    }

    /// Compute the power spectrum of a windowed segment
    ///
    /// # Arguments
    /// * `windowed` - Windowed samples, power-of-two length unless zero
    ///   padding is enabled
    ///
    /// # Returns
    /// N/2 bins of 2|X[k]|²/N
    ///
    /// # Errors
    /// `NonPowerOfTwo` for other lengths, `EmptyRange` for an empty segment
    pub fn power_spectrum(&self, windowed: &[f64]) -> Result<PowerSpectrum> {
        let (engine, spectrum) = self.transform(windowed)?;
        let n = engine.fft_size();
        let scale = 2.0 / n as f64;

        let bins: Vec<f64> = spectrum[..engine.num_bins()]
            .iter()
            .map(|c| c.norm_sqr() * scale)
            .collect();

        log::debug!(
            "Power spectrum: {} samples -> {} bins (N = {}, {:.1} Hz per bin)",
            windowed.len(),
            bins.len(),
            n,
            self.sample_rate / n as f64
        );

        Ok(PowerSpectrum::from_bins(bins, self.sample_rate, n))
    }

    /// Locate the strongest cepstral component in [20, 100)
    ///
    /// # Returns
    /// `None` when the transform is shorter than 100 points or every value in
    /// the search range is NaN
    pub fn cepstral_peak(&self, windowed: &[f64]) -> Result<Option<CepstralPeak>> {
        let (engine, mut spectrum) = self.transform(windowed)?;
        if engine.fft_size() < CEPSTRUM_SEARCH_END {
            return Ok(None);
        }
        engine.cepstrum(&mut spectrum)?;

        let mut best: Option<(usize, f64)> = None;
        for (index, c) in spectrum
            .iter()
            .enumerate()
            .take(CEPSTRUM_SEARCH_END)
            .skip(CEPSTRUM_SEARCH_START)
        {
            if c.re.is_nan() {
                continue;
            }
            match best {
                Some((_, max)) if c.re <= max => {}
                _ => best = Some((index, c.re)),
            }
        }

        let peak = best.map(|(index, _)| CepstralPeak {
            index,
            frequency: self.sample_rate / index as f64,
        });
        if let Some(p) = &peak {
            log::debug!("Cepstral peak at {} samples ({:.2} Hz)", p.index, p.frequency);
        }
        Ok(peak)
    }
}
