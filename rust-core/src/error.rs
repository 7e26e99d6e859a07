//! Error types shared by the time-domain and spectral pipelines

use thiserror::Error;

/// Convenience alias for results produced by the analysis engine
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Sentinel reported by a feature or parameter whose value cannot be computed
/// (too few samples, empty band, zero-sum denominator).
pub const NOT_COMPUTABLE: f64 = -1.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Sample buffer needs at least 2 samples (got {0})")]
    BufferTooShort(usize),

    #[error("Invalid sample rate: {0} Hz")]
    InvalidSampleRate(f64),

    #[error("Invalid duration: {0} s")]
    InvalidDuration(f64),

    #[error("Frame size must be non-zero")]
    InvalidFrameSize,

    #[error("Spectrum length must be a power of two (got {0})")]
    NonPowerOfTwo(usize),

    #[error("Cannot reduce an empty sequence")]
    EmptyRange,

    #[error("Invalid window [{start}, {end}) for a {duration} s buffer")]
    InvalidWindow { start: f64, end: f64, duration: f64 },

    #[error("Window shape parameter a0 must lie in [0, 1] (got {0})")]
    InvalidShapeParam(f64),

    #[error("Band limits must satisfy 0 <= low <= high <= 1 (got {low}, {high})")]
    InvalidBandLimits { low: f64, high: f64 },

    #[error("Unknown frame feature: {0}")]
    UnknownFeature(String),

    #[error("Unknown scalar reducer: {0}")]
    UnknownReducer(String),

    #[error("Unknown spectral parameter: {0}")]
    UnknownParameter(String),
}
