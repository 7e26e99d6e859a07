//! Analysis session
//!
//! Owns the loaded buffer and drives both pipelines on demand: frame series
//! and their scalar reductions on one side, windowing and spectral parameters
//! on the other.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;

use crate::audio::SampleBuffer;
use crate::error::{AnalysisError, Result};
use crate::frames::{FrameConfig, FrameFeature, FrameSeries, ScalarReducer};
use crate::spectrum::windowing::SHAPE_CURVE_POINTS;
use crate::spectrum::{
    CepstralPeak, PowerSpectrum, ShapeCurve, SpectralParameter, SpectralSettings, SpectrumAnalyzer,
    SpectrumConfig, WindowSpec,
};

/// Reductions listed by [`AnalysisSession::scalar_report`]
pub const DEFAULT_SCALAR_PLAN: [(ScalarReducer, FrameFeature); 5] = [
    (ScalarReducer::Deviation, FrameFeature::Volume),
    (ScalarReducer::DynamicRange, FrameFeature::Volume),
    (ScalarReducer::LowRatio, FrameFeature::ShortTimeEnergy),
    (ScalarReducer::Deviation, FrameFeature::ZeroCrossingRate),
    (ScalarReducer::HighRatio, FrameFeature::ZeroCrossingRate),
];

/// Named scalar result
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarValue {
    pub name: String,
    pub value: f64,
}

impl ScalarValue {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)
    }
}

/// Analysis session over one loaded buffer
pub struct AnalysisSession {
    /// Loaded samples
    buffer: SampleBuffer,

    /// Frame configuration shared by every cached series
    frame_config: FrameConfig,

    /// Series computed so far, dropped whenever the frame configuration changes
    series: HashMap<FrameFeature, FrameSeries>,

    /// Spectral pipeline
    analyzer: SpectrumAnalyzer,

    /// Band limits of the parameterized spectral descriptors
    spectral_settings: SpectralSettings,
}

impl AnalysisSession {
    /// Load a decoded channel
    ///
    /// # Arguments
    /// * `samples` - Mono samples
    /// * `sample_rate` - Sample rate in Hz
    /// * `duration` - Length in seconds
    ///
    /// # Errors
    /// `BufferTooShort` for fewer than 2 samples, or an invalid rate/duration
    pub fn load(samples: Vec<f64>, sample_rate: f64, duration: f64) -> Result<Self> {
        let buffer = SampleBuffer::new(samples, sample_rate, duration)?;
        log::debug!(
            "Loaded {} samples at {} Hz ({:.3} s)",
            buffer.len(),
            sample_rate,
            duration
        );
        Ok(Self::from_buffer(buffer))
    }

    /// Start a session over an existing buffer with default configuration
    pub fn from_buffer(buffer: SampleBuffer) -> Self {
        let analyzer = SpectrumAnalyzer::new(buffer.sample_rate(), SpectrumConfig::default());
        Self {
            buffer,
            frame_config: FrameConfig::default(),
            series: HashMap::new(),
            analyzer,
            spectral_settings: SpectralSettings::default(),
        }
    }

    /// Get the loaded buffer
    pub fn buffer(&self) -> &SampleBuffer {
        &self.buffer
    }

    /// Get samples
    pub fn samples(&self) -> &[f64] {
        self.buffer.samples()
    }

    /// Time stamp of every sample
    pub fn time_axis(&self) -> Vec<f64> {
        self.buffer.time_axis()
    }

    /// Get current frame configuration
    pub fn frame_config(&self) -> FrameConfig {
        self.frame_config
    }

    /// Change the frame configuration
    ///
    /// Cached series are discarded when the normalized configuration differs.
    pub fn set_frame_config(&mut self, config: FrameConfig) -> Result<()> {
        let config = config.normalized()?;
        if config != self.frame_config {
            log::debug!(
                "Frame configuration {:?} -> {:?}, dropping {} cached series",
                self.frame_config,
                config,
                self.series.len()
            );
            self.frame_config = config;
            self.series.clear();
        }
        Ok(())
    }

    /// Get current spectrum configuration
    pub fn spectrum_config(&self) -> &SpectrumConfig {
        self.analyzer.config()
    }

    /// Change the spectrum configuration
    pub fn set_spectrum_config(&mut self, config: SpectrumConfig) {
        self.analyzer.update_config(config);
    }

    /// Get band limits used by name lookups of spectral parameters
    pub fn spectral_settings(&self) -> &SpectralSettings {
        &self.spectral_settings
    }

    /// Change band limits used by name lookups of spectral parameters
    pub fn set_spectral_settings(&mut self, settings: SpectralSettings) {
        self.spectral_settings = settings;
    }

    /// Compute (or fetch) the series of the feature called `name`
    ///
    /// # Errors
    /// `UnknownFeature` for an unregistered name, `InvalidFrameSize` for a
    /// zero frame size
    pub fn compute_frame_series(&mut self, name: &str, config: FrameConfig) -> Result<&FrameSeries> {
        let feature: FrameFeature = name.parse()?;
        self.set_frame_config(config)?;
        self.series_for(feature)
    }

    /// Series already computed for the feature called `name`
    pub fn series(&self, name: &str) -> Option<&FrameSeries> {
        let feature: FrameFeature = name.parse().ok()?;
        self.series.get(&feature)
    }

    fn series_for(&mut self, feature: FrameFeature) -> Result<&FrameSeries> {
        match self.series.entry(feature) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let series = FrameSeries::compute(&self.buffer, feature, self.frame_config)?;
                Ok(entry.insert(series))
            }
        }
    }

    /// Reduce the series of `series_name` with the reducer `reducer_name`
    ///
    /// The series is computed with the current frame configuration when it is
    /// not cached yet.
    pub fn compute_scalar(&mut self, reducer_name: &str, series_name: &str) -> Result<f64> {
        let reducer: ScalarReducer = reducer_name.parse()?;
        let feature: FrameFeature = series_name.parse()?;
        reducer.reduce(self.series_for(feature)?.values())
    }

    /// Evaluate the default scalar plan
    ///
    /// Entries are named "<reducer> (<feature>)", e.g. "deviation (volume)".
    pub fn scalar_report(&mut self) -> Result<Vec<ScalarValue>> {
        DEFAULT_SCALAR_PLAN
            .iter()
            .map(|&(reducer, feature)| {
                let value = reducer.reduce(self.series_for(feature)?.values())?;
                Ok(ScalarValue::new(format!("{} ({})", reducer, feature), value))
            })
            .collect()
    }

    /// Cut and taper the interval described by `spec`
    pub fn apply_window(&self, spec: &WindowSpec) -> Result<Vec<f64>> {
        spec.extract(&self.buffer)
    }

    /// Preview of the window function over its interval
    pub fn window_curve(&self, spec: &WindowSpec) -> Result<ShapeCurve> {
        spec.validate(self.buffer.duration())?;
        Ok(spec.shape_curve(SHAPE_CURVE_POINTS))
    }

    /// Power spectrum of a windowed segment
    pub fn compute_spectrum(&self, windowed: &[f64]) -> Result<PowerSpectrum> {
        self.analyzer.power_spectrum(windowed)
    }

    /// Evaluate the spectral parameter called `name`
    ///
    /// Flatness and crest use the session's [`SpectralSettings`].
    pub fn compute_spectral_parameter(&self, name: &str, spectrum: &PowerSpectrum) -> Result<f64> {
        let param = SpectralParameter::from_name(name, &self.spectral_settings)?;
        Ok(param.evaluate(spectrum))
    }

    /// Evaluate every default spectral parameter, labelled for display
    ///
    /// Uses the same [`SpectralSettings`] as
    /// [`compute_spectral_parameter`](Self::compute_spectral_parameter).
    pub fn spectral_report(&self, spectrum: &PowerSpectrum) -> Vec<ScalarValue> {
        self.spectral_settings
            .parameters()
            .into_iter()
            .map(|param| ScalarValue::new(param.label(), param.evaluate(spectrum)))
            .collect()
    }

    /// Dominant cepstral periodicity of a windowed segment
    pub fn cepstral_peak(&self, windowed: &[f64]) -> Result<Option<CepstralPeak>> {
        self.analyzer.cepstral_peak(windowed)
    }
}

impl fmt::Debug for AnalysisSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisSession")
            .field("samples", &self.buffer.len())
            .field("sample_rate", &self.buffer.sample_rate())
            .field("frame_config", &self.frame_config)
            .field("cached_series", &self.series.len())
            .finish()
    }
}

impl TryFrom<(Vec<f64>, f64)> for AnalysisSession {
    type Error = AnalysisError;

    /// Session from samples and sample rate, deriving the duration
    fn try_from((samples, sample_rate): (Vec<f64>, f64)) -> Result<Self> {
        Ok(Self::from_buffer(SampleBuffer::from_sample_rate(samples, sample_rate)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectrum::{BandLimits, WindowShape};
    use std::f64::consts::PI;

    fn tone_session(freq: f64, sample_rate: f64, len: usize) -> AnalysisSession {
        let samples = (0..len)
            .map(|i| 0.5 * (2.0 * PI * freq * i as f64 / sample_rate).sin())
            .collect();
        AnalysisSession::load(samples, sample_rate, len as f64 / sample_rate).unwrap()
    }

    #[test]
    fn test_load_rejects_single_sample() {
        assert_eq!(
            AnalysisSession::load(vec![0.1], 8000.0, 1.0).unwrap_err(),
            AnalysisError::BufferTooShort(1)
        );
    }

    #[test]
    fn test_series_cached_per_config() {
        let mut session = tone_session(200.0, 8000.0, 8000);

        let len = session
            .compute_frame_series("volume", FrameConfig::new(400, 0))
            .unwrap()
            .len();
        assert_eq!(len, 20);
        assert!(session.series("volume").is_some());

        // Same config: cache kept, other features added alongside
        session.compute_frame_series("zcr", FrameConfig::new(400, 0)).unwrap();
        assert!(session.series("volume").is_some());

        // New config: cache dropped
        session.compute_frame_series("ste", FrameConfig::new(800, 0)).unwrap();
        assert!(session.series("volume").is_none());
        assert_eq!(session.series("ste").unwrap().len(), 10);
    }

    #[test]
    fn test_unknown_names() {
        let mut session = tone_session(200.0, 8192.0, 8192);

        assert!(matches!(
            session.compute_frame_series("loudness", FrameConfig::default()),
            Err(AnalysisError::UnknownFeature(_))
        ));
        assert!(matches!(
            session.compute_scalar("median", "volume"),
            Err(AnalysisError::UnknownReducer(_))
        ));

        let windowed = session.apply_window(&WindowSpec::new(0.0, 0.125, WindowShape::hann())).unwrap();
        let spectrum = session.compute_spectrum(&windowed).unwrap();
        assert!(matches!(
            session.compute_spectral_parameter("rolloff", &spectrum),
            Err(AnalysisError::UnknownParameter(_))
        ));
    }

    #[test]
    fn test_scalar_computes_missing_series() {
        let mut session = tone_session(200.0, 8000.0, 8000);
        session.set_frame_config(FrameConfig::new(400, 0)).unwrap();

        // Steady tone: every frame has the same ZCR, so no frame is above 1.5x mean
        let high = session.compute_scalar("high_ratio", "zcr").unwrap();
        assert_eq!(high, 0.0);
        assert!(session.series("zcr").is_some());
    }

    #[test]
    fn test_scalar_report_names() {
        let mut session = tone_session(200.0, 8000.0, 8000);
        let report = session.scalar_report().unwrap();

        let names: Vec<&str> = report.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "deviation (volume)",
                "dynamic range (volume)",
                "low ratio (STE)",
                "deviation (ZCR)",
                "high ratio (ZCR)",
            ]
        );
    }

    #[test]
    fn test_spectral_pipeline() {
        // 1024 samples = 0.125 s at 8192 Hz, 8 Hz per bin
        let session = tone_session(1000.0, 8192.0, 8192);
        let windowed = session
            .apply_window(&WindowSpec::new(0.0, 0.125, WindowShape::hann()))
            .unwrap();
        assert_eq!(windowed.len(), 1024);

        let spectrum = session.compute_spectrum(&windowed).unwrap();
        assert_eq!(spectrum.peak_bin(), Some(125));

        let centroid = session.compute_spectral_parameter("centroid", &spectrum).unwrap();
        assert!(centroid > 500.0 && centroid < 1500.0);

        let report = session.spectral_report(&spectrum);
        assert_eq!(report.len(), 9);
        assert_eq!(report[1].name, "Frequency centroid");
        assert_eq!(report[1].value, centroid);
    }

    #[test]
    fn test_spectral_report_follows_session_settings() {
        let mut session = tone_session(1000.0, 8192.0, 8192);
        let windowed = session
            .apply_window(&WindowSpec::new(0.0, 0.125, WindowShape::hann()))
            .unwrap();
        let spectrum = session.compute_spectrum(&windowed).unwrap();
        let default_crest = session.compute_spectral_parameter("crest", &spectrum).unwrap();

        // Narrow range around the 1000 Hz line (bin 125 of 512)
        session.set_spectral_settings(SpectralSettings {
            flatness: BandLimits::new(0.2, 0.3).unwrap(),
            crest: BandLimits::new(0.2, 0.3).unwrap(),
        });
        let crest = session.compute_spectral_parameter("crest", &spectrum).unwrap();
        let flatness = session.compute_spectral_parameter("flatness", &spectrum).unwrap();
        assert_ne!(crest, default_crest);

        let report = session.spectral_report(&spectrum);
        assert_eq!(report[7].value, flatness);
        assert_eq!(report[8].value, crest);
    }

    #[test]
    fn test_window_curve_validates() {
        let session = tone_session(100.0, 8000.0, 800);
        assert!(session.window_curve(&WindowSpec::new(0.0, 5.0, WindowShape::hann())).is_err());

        let curve = session.window_curve(&WindowSpec::new(0.0, 0.05, WindowShape::hamming())).unwrap();
        assert_eq!(curve.values.len(), SHAPE_CURVE_POINTS);
    }
}
