//! Spectral analysis with FFT

pub mod fft;
pub mod windowing;
pub mod analysis;
pub mod params;

pub use fft::FftEngine;
pub use windowing::{apply_window, ShapeCurve, WindowShape, WindowSpec};
pub use analysis::{CepstralPeak, PowerSpectrum, SpectrumAnalyzer, SpectrumConfig};
pub use params::{BandLimits, SpectralParameter, SpectralSettings, SubBand};
