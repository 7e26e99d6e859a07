//! Scalar descriptors of a power spectrum
//!
//! Every parameter maps a sequence of power bins to one value and reports
//! [`NOT_COMPUTABLE`] when the bins cannot support it (too few bins, empty
//! sub-range, zero-sum denominator).

use std::fmt;

use crate::error::{AnalysisError, Result, NOT_COMPUTABLE};
use super::analysis::PowerSpectrum;

/// Fixed octave-like sub-band of the spectrum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubBand {
    /// [0, N/8)
    Band0,
    /// [N/8, N/4)
    Band1,
    /// [N/4, N/2)
    Band2,
    /// [N/2, N)
    Band3,
}

impl SubBand {
    pub const ALL: [SubBand; 4] = [SubBand::Band0, SubBand::Band1, SubBand::Band2, SubBand::Band3];

    /// Band number 0..=3
    pub fn index(&self) -> usize {
        match self {
            SubBand::Band0 => 0,
            SubBand::Band1 => 1,
            SubBand::Band2 => 2,
            SubBand::Band3 => 3,
        }
    }

    /// Bin range of the band in an `n`-bin spectrum
    pub fn bin_range(&self, n: usize) -> std::ops::Range<usize> {
        match self {
            SubBand::Band0 => 0..n / 8,
            SubBand::Band1 => n / 8..n / 4,
            SubBand::Band2 => n / 4..n / 2,
            SubBand::Band3 => n / 2..n,
        }
    }
}

/// Fractional [low, high) sub-range of the spectrum
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandLimits {
    /// Lower edge as a fraction of the spectrum length (default: 0.1)
    pub low: f64,

    /// Upper edge as a fraction of the spectrum length (default: 0.9)
    pub high: f64,
}

impl Default for BandLimits {
    fn default() -> Self {
        Self { low: 0.1, high: 0.9 }
    }
}

impl BandLimits {
    /// Create band limits
    ///
    /// # Errors
    /// `InvalidBandLimits` unless 0 <= low <= high <= 1
    pub fn new(low: f64, high: f64) -> Result<Self> {
        if !(0.0 <= low && low <= high && high <= 1.0) {
            return Err(AnalysisError::InvalidBandLimits { low, high });
        }
        Ok(Self { low, high })
    }

    /// Convert limits given in Hz against the Nyquist frequency
    pub fn from_frequencies(max_freq: f64, low_freq: f64, high_freq: f64) -> Result<Self> {
        Self::new(low_freq / max_freq, high_freq / max_freq)
    }

    /// Bin indices round(n*low) .. round(n*high), clamped to n
    pub fn bin_range(&self, n: usize) -> std::ops::Range<usize> {
        let end = ((n as f64 * self.high).round() as usize).min(n);
        let start = ((n as f64 * self.low).round() as usize).min(end);
        start..end
    }
}

/// User-adjustable settings of the parameterized descriptors
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpectralSettings {
    /// Sub-range used by the flatness measure
    pub flatness: BandLimits,

    /// Sub-range used by the crest factor
    pub crest: BandLimits,
}

impl SpectralSettings {
    /// Default parameter set: volume, centroid, bandwidth, the four sub-band
    /// ratios, flatness and crest
    pub fn parameters(&self) -> Vec<SpectralParameter> {
        let mut params = vec![
            SpectralParameter::Volume,
            SpectralParameter::Centroid,
            SpectralParameter::EffectiveBandwidth,
        ];
        params.extend(SubBand::ALL.iter().map(|&b| SpectralParameter::BandEnergyRatio(b)));
        params.push(SpectralParameter::Flatness(self.flatness));
        params.push(SpectralParameter::Crest(self.crest));
        params
    }
}

/// Descriptor computed from a power spectrum
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpectralParameter {
    /// Sum of absolute bin values
    Volume,

    /// Frequency weighted by the square root of the power
    Centroid,

    /// Power-weighted spread around the centroid
    EffectiveBandwidth,

    /// Share of the total power inside one sub-band
    BandEnergyRatio(SubBand),

    /// Geometric over arithmetic mean inside a sub-range
    Flatness(BandLimits),

    /// Peak over mean inside a sub-range
    Crest(BandLimits),
}

impl SpectralParameter {
    /// Lookup key
    pub fn name(&self) -> String {
        match self {
            SpectralParameter::Volume => "volume".to_string(),
            SpectralParameter::Centroid => "centroid".to_string(),
            SpectralParameter::EffectiveBandwidth => "effective_bandwidth".to_string(),
            SpectralParameter::BandEnergyRatio(band) => format!("band_energy_ratio_{}", band.index()),
            SpectralParameter::Flatness(_) => "flatness".to_string(),
            SpectralParameter::Crest(_) => "crest".to_string(),
        }
    }

    /// Human readable label
    pub fn label(&self) -> String {
        match self {
            SpectralParameter::Volume => "Volume".to_string(),
            SpectralParameter::Centroid => "Frequency centroid".to_string(),
            SpectralParameter::EffectiveBandwidth => "Effective bandwidth".to_string(),
            SpectralParameter::BandEnergyRatio(band) => format!("Sub-band {} ratio", band.index()),
            SpectralParameter::Flatness(_) => "Spectral flatness measure".to_string(),
            SpectralParameter::Crest(_) => "Spectral crest factor".to_string(),
        }
    }

    /// Resolve a parameter by key, taking band limits from `settings`
    pub fn from_name(name: &str, settings: &SpectralSettings) -> Result<Self> {
        settings
            .parameters()
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| AnalysisError::UnknownParameter(name.to_string()))
    }

    /// Evaluate on a power spectrum
    pub fn evaluate(&self, spectrum: &PowerSpectrum) -> f64 {
        self.evaluate_bins(spectrum.bins(), spectrum.max_frequency())
    }

    /// Evaluate on raw power bins
    ///
    /// # Arguments
    /// * `bins` - Power per bin, lowest frequency first
    /// * `max_freq` - Frequency of the upper spectrum edge (Nyquist) in Hz
    pub fn evaluate_bins(&self, bins: &[f64], max_freq: f64) -> f64 {
        match self {
            SpectralParameter::Volume => bins.iter().map(|b| b.abs()).sum(),
            SpectralParameter::Centroid => centroid(bins, max_freq),
            SpectralParameter::EffectiveBandwidth => effective_bandwidth(bins, max_freq),
            SpectralParameter::BandEnergyRatio(band) => band_energy_ratio(bins, *band),
            SpectralParameter::Flatness(limits) => flatness(bins, *limits),
            SpectralParameter::Crest(limits) => crest(bins, *limits),
        }
    }
}

impl fmt::Display for SpectralParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

fn centroid(bins: &[f64], max_freq: f64) -> f64 {
    if bins.is_empty() {
        return NOT_COMPUTABLE;
    }

    let df = max_freq / bins.len() as f64;
    let mut amp_sum = 0.0;
    let mut freq_amp_sum = 0.0;
    for (i, &b) in bins.iter().enumerate() {
        let weight = b.sqrt();
        amp_sum += weight;
        freq_amp_sum += weight * df * i as f64;
    }

    if amp_sum <= 0.0 || !amp_sum.is_finite() {
        return NOT_COMPUTABLE;
    }
    freq_amp_sum / amp_sum
}

fn effective_bandwidth(bins: &[f64], max_freq: f64) -> f64 {
    let fc = centroid(bins, max_freq);
    if fc == NOT_COMPUTABLE {
        return NOT_COMPUTABLE;
    }

    let df = max_freq / bins.len() as f64;
    let amp_sum: f64 = bins.iter().sum();
    if amp_sum <= 0.0 {
        return NOT_COMPUTABLE;
    }

    let spread: f64 = bins
        .iter()
        .enumerate()
        .map(|(i, &b)| b * (df * i as f64 - fc).powi(2))
        .sum();
    (spread / amp_sum).sqrt()
}

fn band_energy_ratio(bins: &[f64], band: SubBand) -> f64 {
    let n = bins.len();
    if n < 8 {
        return NOT_COMPUTABLE;
    }

    let full_sum: f64 = bins.iter().sum();
    if full_sum == 0.0 {
        return NOT_COMPUTABLE;
    }
    let sub_sum: f64 = bins[band.bin_range(n)].iter().sum();
    sub_sum / full_sum
}

fn flatness(bins: &[f64], limits: BandLimits) -> f64 {
    let range = &bins[limits.bin_range(bins.len())];
    if range.is_empty() || range.iter().any(|&b| b < 0.0) {
        return NOT_COMPUTABLE;
    }

    let arith_sum: f64 = range.iter().sum();
    if arith_sum <= 0.0 {
        return NOT_COMPUTABLE;
    }

    // Geometric mean through the log domain; a zero bin drives it to 0
    let len = range.len() as f64;
    let log_mean = range.iter().map(|b| b.ln()).sum::<f64>() / len;
    log_mean.exp() * len / arith_sum
}

fn crest(bins: &[f64], limits: BandLimits) -> f64 {
    let range = &bins[limits.bin_range(bins.len())];
    if range.is_empty() {
        return NOT_COMPUTABLE;
    }

    let sum: f64 = range.iter().sum();
    if sum == 0.0 {
        return NOT_COMPUTABLE;
    }
    let max = range.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    max * range.len() as f64 / sum
}
