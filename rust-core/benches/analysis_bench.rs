//! Performance benchmarks for frame features and spectral analysis

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use waveform_inspector::{AnalysisSession, FrameConfig, WindowShape, WindowSpec};

fn tone_session(seconds: usize) -> AnalysisSession {
    // Synthetic 220 Hz tone at 16.384 kHz
    let samples: Vec<f64> = (0..16_384 * seconds)
        .map(|i| (i as f64 * 220.0 * 2.0 * std::f64::consts::PI / 16_384.0).sin() * 0.5)
        .collect();
    AnalysisSession::load(samples, 16_384.0, seconds as f64).unwrap()
}

fn bench_frame_series(c: &mut Criterion) {
    let mut session = tone_session(10);

    c.bench_function("volume_series_10s", |b| {
        b.iter(|| {
            // Changing the overlap drops the cache so every pass recomputes
            for overlap in [20, 21] {
                let _ = session.compute_frame_series(black_box("volume"), FrameConfig::new(1200, overlap));
            }
        });
    });

    let mut session = tone_session(2);
    c.bench_function("pitch_series_2s", |b| {
        b.iter(|| {
            for overlap in [20, 21] {
                let _ = session.compute_frame_series(
                    black_box("fundamental_frequency"),
                    FrameConfig::new(1200, overlap),
                );
            }
        });
    });
}

fn bench_spectrum(c: &mut Criterion) {
    let session = tone_session(2);
    let windowed = session
        .apply_window(&WindowSpec::new(0.0, 0.5, WindowShape::hann()))
        .unwrap();

    c.bench_function("power_spectrum_8192", |b| {
        b.iter(|| {
            let _ = session.compute_spectrum(black_box(&windowed));
        });
    });

    c.bench_function("cepstral_peak_8192", |b| {
        b.iter(|| {
            let _ = session.cepstral_peak(black_box(&windowed));
        });
    });
}

criterion_group!(benches, bench_frame_series, bench_spectrum);
criterion_main!(benches);
