//! Chord synthesis by equal-weight mixing of recorded notes.
//!
//! Every note is fitted to the output window (truncated or zero-padded) and
//! summed with weight `1 / N`, where `N` is the number of notes mixed. The
//! weight keeps the mix inside [-1.0, 1.0] but also lowers the level of each
//! note as chords grow; training labels depend on that exact scaling.

use crate::error::{Error, Result};
use crate::store::SampleStore;
use fretnet_core::{pitch_id, ChordSpecification, FretPosition, Waveform, SAMPLE_RATE};

/// Renders chord specifications to mono signals from a [`SampleStore`].
#[derive(Debug, Clone)]
pub struct ChordSynthesizer<S> {
    store: S,
    sample_rate: u32,
}

impl<S: SampleStore> ChordSynthesizer<S> {
    /// Synthesizer running at [`SAMPLE_RATE`].
    pub fn new(store: S) -> Self {
        Self::with_sample_rate(store, SAMPLE_RATE)
    }

    pub fn with_sample_rate(store: S, sample_rate: u32) -> Self {
        Self { store, sample_rate }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Output length for `duration` seconds.
    pub fn window_len(&self, duration: f64) -> Result<usize> {
        if !duration.is_finite() || duration <= 0.0 {
            return Err(Error::InvalidRequest(format!(
                "duration must be positive, got {duration}"
            )));
        }
        Ok(Waveform::samples_for(duration, self.sample_rate))
    }

    /// Recording for one position, checked against the synthesizer rate.
    fn recording(&self, position: FretPosition) -> Result<std::sync::Arc<Waveform>> {
        let pitch = pitch_id(position);
        let wave = self.store.fetch(&pitch)?;
        if wave.sample_rate() != self.sample_rate {
            return Err(Error::SampleRateMismatch {
                pitch,
                expected: self.sample_rate,
                found: wave.sample_rate(),
            });
        }
        Ok(wave)
    }

    /// One note fitted to `duration` seconds.
    pub fn render_note(&self, position: FretPosition, duration: f64) -> Result<Waveform> {
        let len = self.window_len(duration)?;
        let wave = self.recording(position)?;
        Ok(Waveform::new(wave.window(len).collect(), self.sample_rate))
    }

    /// Mix every note of `chord` into one `duration`-second signal.
    ///
    /// A missing recording fails the whole chord; no note is ever replaced by
    /// silence.
    pub fn synthesize(&self, chord: &ChordSpecification, duration: f64) -> Result<Waveform> {
        let len = self.window_len(duration)?;
        let mut out = vec![0.0f32; len];
        let weight = 1.0 / chord.len() as f32;

        for &position in chord {
            let wave = self.recording(position)?;
            for (acc, s) in out.iter_mut().zip(wave.window(len)) {
                *acc += weight * s;
            }
        }

        tracing::trace!(notes = chord.len(), len, "synthesized chord");
        Ok(Waveform::new(out, self.sample_rate))
    }
}
