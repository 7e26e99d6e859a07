//! Python bindings for the analysis session

use numpy::{PyArray1, PyReadonlyArray1};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use super::window_bindings::PyWindowSpec;
use crate::audio::AnalysisSession;
use crate::frames::FrameConfig;
use crate::spectrum::{BandLimits, SpectralSettings, SpectrumConfig};

fn as_slice<'a>(array: &'a PyReadonlyArray1<f64>) -> PyResult<&'a [f64]> {
    array
        .as_slice()
        .map_err(|e| PyValueError::new_err(format!("Expected a contiguous array: {}", e)))
}

/// Analysis session exposed to Python
#[pyclass(name = "AnalysisSession")]
pub struct PyAnalysisSession {
    session: AnalysisSession,
}

#[pymethods]
impl PyAnalysisSession {
    /// Load a decoded mono channel
    ///
    /// Args:
    ///     samples: Samples as numpy array (at least 2)
    ///     sample_rate: Sample rate in Hz
    ///     duration: Length in seconds (default: len(samples) / sample_rate)
    #[new]
    #[pyo3(signature = (samples, sample_rate, duration=None))]
    fn new(samples: PyReadonlyArray1<f64>, sample_rate: f64, duration: Option<f64>) -> PyResult<Self> {
        let samples = as_slice(&samples)?.to_vec();
        let duration = duration.unwrap_or(samples.len() as f64 / sample_rate);

        Ok(Self {
            session: AnalysisSession::load(samples, sample_rate, duration)?,
        })
    }

    #[getter]
    fn sample_rate(&self) -> f64 {
        self.session.buffer().sample_rate()
    }

    #[getter]
    fn duration(&self) -> f64 {
        self.session.buffer().duration()
    }

    /// Get samples as numpy array
    fn samples<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        PyArray1::from_slice(py, self.session.samples())
    }

    /// Get the time stamp of every sample as numpy array
    fn time_axis<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        PyArray1::from_vec(py, self.session.time_axis())
    }

    /// Compute a frame series
    ///
    /// Args:
    ///     name: Feature key ("volume", "ste", "zcr", "silence_ratio",
    ///         "fundamental_frequency", "fundamental_frequency_amdf")
    ///     frame_size: Frame length in samples
    ///     overlap: Samples shared by consecutive frames
    ///
    /// Returns:
    ///     (timestamps, values) numpy arrays
    #[pyo3(signature = (name, frame_size=1200, overlap=20))]
    fn frame_series<'py>(
        &mut self,
        py: Python<'py>,
        name: &str,
        frame_size: usize,
        overlap: usize,
    ) -> PyResult<(&'py PyArray1<f64>, &'py PyArray1<f64>)> {
        let series = self
            .session
            .compute_frame_series(name, FrameConfig::new(frame_size, overlap))?;

        Ok((
            PyArray1::from_slice(py, series.timestamps()),
            PyArray1::from_slice(py, series.values()),
        ))
    }

    /// Reduce a frame series to one value
    ///
    /// Args:
    ///     reducer: "deviation", "dynamic_range", "low_ratio", "high_ratio"
    ///         or "entropy"
    ///     series: Feature key of the reduced series
    fn compute_scalar(&mut self, reducer: &str, series: &str) -> PyResult<f64> {
        Ok(self.session.compute_scalar(reducer, series)?)
    }

    /// Evaluate the default scalar plan as a list of (name, value)
    fn scalar_report(&mut self) -> PyResult<Vec<(String, f64)>> {
        let report = self.session.scalar_report()?;
        Ok(report.into_iter().map(|v| (v.name, v.value)).collect())
    }

    /// Cut and taper the interval described by `spec`
    fn apply_window<'py>(&self, py: Python<'py>, spec: PyWindowSpec) -> PyResult<&'py PyArray1<f64>> {
        let windowed = self.session.apply_window(&spec.spec)?;
        Ok(PyArray1::from_vec(py, windowed))
    }

    /// Window function preview as (times, values) numpy arrays
    fn window_curve<'py>(
        &self,
        py: Python<'py>,
        spec: PyWindowSpec,
    ) -> PyResult<(&'py PyArray1<f64>, &'py PyArray1<f64>)> {
        let curve = self.session.window_curve(&spec.spec)?;
        Ok((PyArray1::from_vec(py, curve.times), PyArray1::from_vec(py, curve.values)))
    }

    /// Zero-pad windowed segments to the next power of two
    fn set_zero_pad(&mut self, enabled: bool) {
        self.session.set_spectrum_config(SpectrumConfig { zero_pad: enabled });
    }

    /// Power spectrum of a windowed segment
    ///
    /// Returns:
    ///     (frequencies, power) numpy arrays
    fn power_spectrum<'py>(
        &self,
        py: Python<'py>,
        windowed: PyReadonlyArray1<f64>,
    ) -> PyResult<(&'py PyArray1<f64>, &'py PyArray1<f64>)> {
        let spectrum = self.session.compute_spectrum(as_slice(&windowed)?)?;
        Ok((
            PyArray1::from_vec(py, spectrum.frequencies()),
            PyArray1::from_slice(py, spectrum.bins()),
        ))
    }

    /// Set band limits of the flatness and crest descriptors
    #[pyo3(signature = (flatness_low=0.1, flatness_high=0.9, crest_low=0.1, crest_high=0.9))]
    fn set_band_limits(
        &mut self,
        flatness_low: f64,
        flatness_high: f64,
        crest_low: f64,
        crest_high: f64,
    ) -> PyResult<()> {
        self.session.set_spectral_settings(SpectralSettings {
            flatness: BandLimits::new(flatness_low, flatness_high)?,
            crest: BandLimits::new(crest_low, crest_high)?,
        });
        Ok(())
    }

    /// Evaluate one spectral parameter of a windowed segment
    fn spectral_parameter(&self, name: &str, windowed: PyReadonlyArray1<f64>) -> PyResult<f64> {
        let spectrum = self.session.compute_spectrum(as_slice(&windowed)?)?;
        Ok(self.session.compute_spectral_parameter(name, &spectrum)?)
    }

    /// Evaluate every default spectral parameter as a list of (label, value)
    fn spectral_report(&self, windowed: PyReadonlyArray1<f64>) -> PyResult<Vec<(String, f64)>> {
        let spectrum = self.session.compute_spectrum(as_slice(&windowed)?)?;
        let report = self.session.spectral_report(&spectrum);
        Ok(report.into_iter().map(|v| (v.name, v.value)).collect())
    }

    /// Dominant cepstral periodicity as (index, frequency), or None
    fn cepstral_peak(&self, windowed: PyReadonlyArray1<f64>) -> PyResult<Option<(usize, f64)>> {
        let peak = self.session.cepstral_peak(as_slice(&windowed)?)?;
        Ok(peak.map(|p| (p.index, p.frequency)))
    }

    fn __repr__(&self) -> String {
        format!("{:?}", self.session)
    }
}
