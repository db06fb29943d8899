//! Mono sample buffers.

use serde::{Deserialize, Serialize};

/// Sample rate of every recording and generated signal, in Hz.
pub const SAMPLE_RATE: u32 = 44100;

/// Length of a generated example signal, in seconds.
pub const SAMPLE_DURATION: f64 = 0.5;

/// Mono audio at a fixed sample rate. Samples are expected in [-1.0, 1.0].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waveform {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl Waveform {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// `len` zero samples.
    pub fn silence(len: usize, sample_rate: u32) -> Self {
        Self::new(vec![0.0; len], sample_rate)
    }

    /// Sample count for `duration` seconds at `sample_rate`, truncated.
    pub fn samples_for(duration: f64, sample_rate: u32) -> usize {
        (duration * sample_rate as f64) as usize
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn samples_mut(&mut self) -> &mut [f32] {
        &mut self.samples
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds.
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Largest absolute sample value.
    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0f32, |a, s| a.max(s.abs()))
    }

    pub fn is_silent(&self) -> bool {
        self.samples.iter().all(|&s| s == 0.0)
    }

    /// First `len` samples, zero-padded if the recording is shorter.
    pub fn window(&self, len: usize) -> impl Iterator<Item = f32> + '_ {
        self.samples
            .iter()
            .copied()
            .chain(std::iter::repeat(0.0))
            .take(len)
    }

    /// Copy scaled by `gain`.
    pub fn scaled(&self, gain: f32) -> Self {
        Self::new(
            self.samples.iter().map(|s| s * gain).collect(),
            self.sample_rate,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_for_default_duration() {
        assert_eq!(Waveform::samples_for(SAMPLE_DURATION, SAMPLE_RATE), 22050);
    }

    #[test]
    fn test_window_truncates_and_pads() {
        let wave = Waveform::new(vec![0.5, -0.5, 0.25], SAMPLE_RATE);

        let short: Vec<f32> = wave.window(2).collect();
        assert_eq!(short, vec![0.5, -0.5]);

        let long: Vec<f32> = wave.window(5).collect();
        assert_eq!(long, vec![0.5, -0.5, 0.25, 0.0, 0.0]);
    }

    #[test]
    fn test_peak_and_silence() {
        let wave = Waveform::new(vec![0.1, -0.8, 0.3], SAMPLE_RATE);
        assert_eq!(wave.peak(), 0.8);
        assert!(!wave.is_silent());
        assert!(Waveform::silence(16, SAMPLE_RATE).is_silent());
        assert_eq!(Waveform::silence(44100, SAMPLE_RATE).duration(), 1.0);
    }
}
