//! Radix-2 FFT engine
//!
//! In-place iterative Cooley-Tukey transform over a single owned buffer:
//! bit-reversal permutation followed by log2(N) butterfly passes, with the
//! twiddle factors computed once per engine.

use num_complex::Complex;
use std::f64::consts::PI;

use crate::error::{AnalysisError, Result};

/// FFT engine for a fixed power-of-two size
#[derive(Debug, Clone)]
pub struct FftEngine {
    /// FFT size (number of points)
    fft_size: usize,

    /// exp(-2πik/N) for k = 0..N/2
    twiddles: Vec<Complex<f64>>,
}

impl FftEngine {
    /// Create new FFT engine
    ///
    /// # Arguments
    /// * `fft_size` - Transform length, must be a power of two
    ///
    /// # Errors
    /// `NonPowerOfTwo` for any other length (including 0)
    pub fn new(fft_size: usize) -> Result<Self> {
        if !fft_size.is_power_of_two() {
            return Err(AnalysisError::NonPowerOfTwo(fft_size));
        }

        let twiddles = (0..fft_size / 2)
            .map(|k| Complex::from_polar(1.0, -2.0 * PI * k as f64 / fft_size as f64))
            .collect();

        Ok(Self { fft_size, twiddles })
    }

    /// Forward transform in place
    ///
    /// # Errors
    /// `NonPowerOfTwo` when `buffer.len()` differs from the engine size
    pub fn forward(&self, buffer: &mut [Complex<f64>]) -> Result<()> {
        self.check_len(buffer.len())?;
        let n = self.fft_size;
        if n <= 1 {
            return Ok(());
        }

        bit_reverse_permute(buffer);

        let mut len = 2;
        while len <= n {
            let half = len / 2;
            let step = n / len;
            for start in (0..n).step_by(len) {
                for j in 0..half {
                    let t = self.twiddles[j * step] * buffer[start + j + half];
                    let u = buffer[start + j];
                    buffer[start + j] = u + t;
                    buffer[start + j + half] = u - t;
                }
            }
            len <<= 1;
        }

        Ok(())
    }

    /// Inverse transform in place: conjugate, forward, conjugate, scale by 1/N
    pub fn inverse(&self, buffer: &mut [Complex<f64>]) -> Result<()> {
        self.check_len(buffer.len())?;

        for c in buffer.iter_mut() {
            *c = c.conj();
        }
        self.forward(buffer)?;

        let scale = 1.0 / self.fft_size as f64;
        for c in buffer.iter_mut() {
            *c = c.conj() * scale;
        }

        Ok(())
    }

    /// Complex cepstrum of a spectrum, in place
    ///
    /// Takes the element-wise complex logarithm and inverts the transform.
    /// Zero bins produce infinite logarithms; the result is diagnostic only.
    pub fn cepstrum(&self, spectrum: &mut [Complex<f64>]) -> Result<()> {
        self.check_len(spectrum.len())?;

        for c in spectrum.iter_mut() {
            *c = c.ln();
        }
        self.inverse(spectrum)
    }

    /// Get FFT size
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Number of single-sided power bins (N/2)
    pub fn num_bins(&self) -> usize {
        self.fft_size / 2
    }

    /// Convert bin index to Hz
    pub fn bin_to_hz(&self, bin: usize, sample_rate: f64) -> f64 {
        bin as f64 * sample_rate / self.fft_size as f64
    }

    fn check_len(&self, len: usize) -> Result<()> {
        if len != self.fft_size {
            return Err(AnalysisError::NonPowerOfTwo(len));
        }
        Ok(())
    }
}

/// Reorder `buffer` so that index i holds the element at bit-reversed i
fn bit_reverse_permute(buffer: &mut [Complex<f64>]) {
    let n = buffer.len();
    let mut j = 0;
    for i in 1..n {
        let mut bit = n >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j |= bit;
        if i < j {
            buffer.swap(i, j);
        }
    }
}

/// Forward FFT of a power-of-two length buffer
pub fn fft_in_place(buffer: &mut [Complex<f64>]) -> Result<()> {
    FftEngine::new(buffer.len())?.forward(buffer)
}

/// Inverse FFT of a power-of-two length buffer
pub fn ifft_in_place(buffer: &mut [Complex<f64>]) -> Result<()> {
    FftEngine::new(buffer.len())?.inverse(buffer)
}
