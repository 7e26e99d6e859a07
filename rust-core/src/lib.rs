//! Waveform Inspector - Offline Audio Analysis Core
//!
//! Time-domain frame features with scalar reductions, and windowed spectral
//! analysis (power spectrum, spectral descriptors, cepstrum) of a single
//! decoded channel. Optional Python bindings behind the `python` feature.

// Suppress PyO3 non-local impl warnings (harmless macro-generated code)
#![allow(non_local_definitions)]

pub mod audio;
pub mod error;
pub mod frames;
pub mod spectrum;

#[cfg(feature = "python")]
pub mod python_bindings;

pub use audio::{AnalysisSession, SampleBuffer, ScalarValue};
pub use error::{AnalysisError, Result, NOT_COMPUTABLE};
pub use frames::{FrameConfig, FrameFeature, FrameSeries, ScalarReducer};
pub use spectrum::{
    BandLimits, CepstralPeak, PowerSpectrum, SpectralParameter, SpectralSettings, SpectrumConfig,
    WindowShape, WindowSpec,
};
