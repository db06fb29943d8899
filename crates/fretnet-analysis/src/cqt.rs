//! Constant-Q Transform
//!
//! Log-frequency magnitude spectrogram with a fixed number of bins per
//! octave. Bin `k` is centered on `min_freq * 2^(k / bins_per_octave)` and
//! analyzed with a Hann-windowed complex exponential whose length
//! `Q * sample_rate / f_k` gives every bin the same quality factor
//! `Q = filter_scale / (2^(1 / bins_per_octave) - 1)`.
//!
//! ## Algorithm
//!
//! Spectral-kernel CQT (Brown & Puckette, 1992):
//!
//! 1. **Kernels** - each time-domain filter is centered in an FFT frame the
//!    size of the longest filter (rounded up to a power of two) and
//!    transformed once. The smallest coefficients, together holding a
//!    `sparsity` fraction of the kernel's total magnitude, are dropped.
//! 2. **Frames** - the signal is zero-padded by half a frame on each side and
//!    cut into frames every `hop_length` samples, so frame `t` is centered on
//!    sample `t * hop_length`. Frame count is `1 + len / hop_length`.
//! 3. **Projection** - each frame is transformed and multiplied against every
//!    sparse kernel; the magnitude of the sum is the bin's energy.
//!
//! Filters are divided by the square root of their length, so a sine on a
//! bin center yields a magnitude proportional to `sqrt(filter_length)`:
//! low bins, with their longer filters, read louder than high bins.

use crate::error::{Error, Result};
use crate::spectrogram::Spectrogram;
use fretnet_core::Waveform;
use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::f64::consts::PI;
use std::sync::Arc;

/// Lowest analyzed frequency (C2).
pub const DEFAULT_MIN_FREQ: f64 = 65.41;

/// Frequency resolution: quarter tones.
pub const DEFAULT_BINS_PER_OCTAVE: usize = 24;

/// Five octaves.
pub const DEFAULT_N_BINS: usize = 5 * DEFAULT_BINS_PER_OCTAVE;

/// Samples between frame centers.
pub const DEFAULT_HOP_LENGTH: usize = 512;

/// Fraction of each kernel's magnitude mass discarded as small coefficients.
pub const DEFAULT_SPARSITY: f32 = 0.01;

/// Transform parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct CqtParams {
    /// Center frequency of bin 0, in Hz
    pub min_freq: f64,
    /// Bins per octave
    pub bins_per_octave: usize,
    /// Total number of bins (image height)
    pub n_bins: usize,
    /// Samples between frames
    pub hop_length: usize,
    /// Scales every filter length; 1.0 gives adjacent bins touching bandwidths
    pub filter_scale: f64,
    /// Share of kernel mass dropped for sparsity (0.0 keeps everything)
    pub sparsity: f32,
}

impl Default for CqtParams {
    fn default() -> Self {
        Self {
            min_freq: DEFAULT_MIN_FREQ,
            bins_per_octave: DEFAULT_BINS_PER_OCTAVE,
            n_bins: DEFAULT_N_BINS,
            hop_length: DEFAULT_HOP_LENGTH,
            filter_scale: 1.0,
            sparsity: DEFAULT_SPARSITY,
        }
    }
}

impl CqtParams {
    /// Quality factor shared by every bin.
    pub fn q(&self) -> f64 {
        self.filter_scale / (2f64.powf(1.0 / self.bins_per_octave as f64) - 1.0)
    }

    /// Center frequency of `bin`.
    pub fn bin_frequency(&self, bin: usize) -> f64 {
        self.min_freq * 2f64.powf(bin as f64 / self.bins_per_octave as f64)
    }

    /// Filter length of `bin` at `sample_rate`.
    pub fn filter_length(&self, bin: usize, sample_rate: u32) -> usize {
        ((self.q() * sample_rate as f64 / self.bin_frequency(bin)).ceil() as usize).max(1)
    }

    /// Number of frames produced for a signal of `num_samples`.
    pub fn frame_count(&self, num_samples: usize) -> usize {
        1 + num_samples / self.hop_length
    }

    /// `(bins, frames)` for a signal of `num_samples`.
    pub fn output_shape(&self, num_samples: usize) -> (usize, usize) {
        (self.n_bins, self.frame_count(num_samples))
    }

    pub fn validate(&self, sample_rate: u32) -> Result<()> {
        if self.n_bins == 0 || self.bins_per_octave == 0 || self.hop_length == 0 {
            return Err(Error::InvalidParameters(
                "n_bins, bins_per_octave and hop_length must be non-zero".into(),
            ));
        }
        if !(self.min_freq.is_finite() && self.min_freq > 0.0) {
            return Err(Error::InvalidParameters(format!(
                "min_freq must be positive, got {}",
                self.min_freq
            )));
        }
        if !(self.filter_scale.is_finite() && self.filter_scale > 0.0) {
            return Err(Error::InvalidParameters(format!(
                "filter_scale must be positive, got {}",
                self.filter_scale
            )));
        }
        if !(0.0..1.0).contains(&self.sparsity) {
            return Err(Error::InvalidParameters(format!(
                "sparsity must be in [0, 1), got {}",
                self.sparsity
            )));
        }
        if sample_rate == 0 {
            return Err(Error::InvalidParameters("sample_rate must be non-zero".into()));
        }

        let nyquist = sample_rate as f64 / 2.0;
        let top = self.bin_frequency(self.n_bins - 1);
        if top >= nyquist {
            return Err(Error::InvalidParameters(format!(
                "top bin at {:.1} Hz is above Nyquist ({:.1} Hz)",
                top, nyquist
            )));
        }
        Ok(())
    }
}

/// One bin's frequency-domain filter, conjugated and scaled by `1 / fft_len`.
struct SparseKernel {
    entries: Vec<(usize, Complex<f32>)>,
}

/// Precomputed Constant-Q filter bank.
///
/// Immutable after construction and `Send + Sync`; share one instance
/// between worker threads.
pub struct ConstantQTransform {
    params: CqtParams,
    sample_rate: u32,
    fft_len: usize,
    fft: Arc<dyn Fft<f32>>,
    kernels: Vec<SparseKernel>,
}

impl std::fmt::Debug for ConstantQTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConstantQTransform")
            .field("params", &self.params)
            .field("sample_rate", &self.sample_rate)
            .field("fft_len", &self.fft_len)
            .field("kernel_entries", &self.kernel_entries())
            .finish()
    }
}

/// Smallest magnitude kept when the weakest coefficients, up to `quantile`
/// of the total, are discarded.
fn mass_threshold(mags: &[f32], quantile: f32) -> f32 {
    let total: f32 = mags.iter().sum();
    if total <= 0.0 || quantile <= 0.0 {
        return 0.0;
    }
    let mut sorted = mags.to_vec();
    sorted.sort_by(f32::total_cmp);

    let mut cumulative = 0.0;
    for &m in &sorted {
        cumulative += m / total;
        if cumulative >= quantile {
            return m;
        }
    }
    sorted.last().copied().unwrap_or(0.0)
}

/// Periodic Hann window value.
fn hann(n: usize, len: usize) -> f64 {
    0.5 - 0.5 * (2.0 * PI * n as f64 / len as f64).cos()
}

impl ConstantQTransform {
    /// Build the filter bank for `params` at `sample_rate`.
    pub fn new(params: CqtParams, sample_rate: u32) -> Result<Self> {
        params.validate(sample_rate)?;

        let fft_len = params.filter_length(0, sample_rate).next_power_of_two();
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_len);
        let mut scratch = vec![Complex::new(0.0, 0.0); fft.get_inplace_scratch_len()];

        let mut kernels = Vec::with_capacity(params.n_bins);
        let mut buffer = vec![Complex::new(0.0f32, 0.0); fft_len];

        for bin in 0..params.n_bins {
            let freq = params.bin_frequency(bin);
            let len = params.filter_length(bin, sample_rate);
            let start = (fft_len - len) / 2;

            buffer.fill(Complex::new(0.0, 0.0));
            for n in 0..len {
                let amp = hann(n, len) / (len as f64).sqrt();
                let phase = 2.0 * PI * freq * (n as f64 - len as f64 / 2.0) / sample_rate as f64;
                buffer[start + n] = Complex::new((amp * phase.cos()) as f32, (amp * phase.sin()) as f32);
            }
            fft.process_with_scratch(&mut buffer, &mut scratch);

            let mags: Vec<f32> = buffer.iter().map(|c| c.norm()).collect();
            let threshold = mass_threshold(&mags, params.sparsity);
            let scale = 1.0 / fft_len as f32;
            let entries = buffer
                .iter()
                .zip(&mags)
                .enumerate()
                .filter(|(_, (_, m))| **m >= threshold)
                .map(|(j, (c, _))| (j, c.conj() * scale))
                .collect();

            kernels.push(SparseKernel { entries });
        }

        let transform = Self {
            params,
            sample_rate,
            fft_len,
            fft,
            kernels,
        };
        tracing::debug!(
            fft_len,
            bins = transform.params.n_bins,
            entries = transform.kernel_entries(),
            "built CQT kernels"
        );
        Ok(transform)
    }

    pub fn params(&self) -> &CqtParams {
        &self.params
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// FFT frame size (longest filter rounded up to a power of two).
    pub fn fft_len(&self) -> usize {
        self.fft_len
    }

    /// Total non-zero kernel coefficients across all bins.
    pub fn kernel_entries(&self) -> usize {
        self.kernels.iter().map(|k| k.entries.len()).sum()
    }

    /// `(bins, frames)` for a signal of `num_samples`.
    pub fn output_shape(&self, num_samples: usize) -> (usize, usize) {
        self.params.output_shape(num_samples)
    }

    /// Magnitude CQT of raw samples at the transform's sample rate.
    pub fn magnitudes(&self, samples: &[f32]) -> Spectrogram {
        let (bins, frames) = self.output_shape(samples.len());
        let hop = self.params.hop_length;
        let pad = self.fft_len / 2;

        let mut data = vec![0.0f32; bins * frames];
        let mut buffer = vec![Complex::new(0.0f32, 0.0); self.fft_len];
        let mut scratch = vec![Complex::new(0.0, 0.0); self.fft.get_inplace_scratch_len()];

        for frame in 0..frames {
            // buffer[j] holds sample (frame * hop + j - pad), zero outside the signal
            let origin = (frame * hop) as isize - pad as isize;
            for (j, slot) in buffer.iter_mut().enumerate() {
                let i = origin + j as isize;
                let s = if i >= 0 && (i as usize) < samples.len() {
                    samples[i as usize]
                } else {
                    0.0
                };
                *slot = Complex::new(s, 0.0);
            }
            self.fft.process_with_scratch(&mut buffer, &mut scratch);

            for (bin, kernel) in self.kernels.iter().enumerate() {
                let sum: Complex<f32> = kernel
                    .entries
                    .iter()
                    .map(|&(j, k)| buffer[j] * k)
                    .sum();
                data[bin * frames + frame] = sum.norm();
            }
        }

        Spectrogram::from_data(bins, frames, data)
    }

    /// Magnitude CQT of a waveform. Fails if its rate differs from the transform's.
    pub fn transform(&self, wave: &Waveform) -> Result<Spectrogram> {
        if wave.sample_rate() != self.sample_rate {
            return Err(Error::SampleRateMismatch {
                expected: self.sample_rate,
                found: wave.sample_rate(),
            });
        }
        Ok(self.magnitudes(wave.samples()))
    }
}
