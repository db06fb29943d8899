//! Test helpers and fixtures for fretnet integration tests
//!
//! Recordings are synthesized: every fretboard pitch gets a decaying sine at
//! its equal-tempered frequency, so chords render real spectrograms without
//! any audio files in the repository.
//!
//! ## Tolerance Levels
//!
//! Use the appropriate tolerance from [`tolerances`] module:
//! - `FLOAT_EPSILON` (1e-6): Exact operations (mixing weights, gain)
//! - `INT16_EPSILON` (1/32768): Values read back from 16-bit WAV files
//! - `PIXEL_TOLERANCE` (1): Image comparisons across rescaled inputs

#![allow(dead_code)]

pub mod tolerances;

use fretnet::core::{all_pitches, pitch_frequency, FretPosition};
use fretnet::prelude::*;
use std::path::Path;

/// Sample rate of every synthetic recording.
pub const TEST_SAMPLE_RATE: u32 = 44100;

/// Length of synthetic recordings: longer than one example window.
pub const RECORDING_LEN: usize = 30000;

/// Decaying sine at `frequency`, peak 0.8.
pub fn pluck(frequency: f64, sample_rate: u32, num_samples: usize) -> Vec<f32> {
    (0..num_samples)
        .map(|i| {
            let t = i as f64 / sample_rate as f64;
            let envelope = (-3.0 * t).exp();
            (0.8 * envelope * (2.0 * std::f64::consts::PI * frequency * t).sin()) as f32
        })
        .collect()
}

/// In-memory store with a pluck for every pitch on the fretboard.
pub fn pluck_store() -> MemorySampleStore {
    MemorySampleStore::from_fretboard(|pos: FretPosition| {
        Waveform::new(
            pluck(pitch_frequency(pos), TEST_SAMPLE_RATE, RECORDING_LEN),
            TEST_SAMPLE_RATE,
        )
    })
}

/// Generator over [`pluck_store`] with default settings.
pub fn test_generator() -> ExampleGenerator<MemorySampleStore> {
    ExampleGenerator::builder(pluck_store())
        .build()
        .expect("Failed to create test generator")
}

/// Write mono 16-bit PCM.
pub fn save_wav_pcm16(path: &Path, samples: &[f32], sample_rate: u32) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).expect("Failed to create WAV");
    for &s in samples {
        let value = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
        writer.write_sample(value).expect("Failed to write sample");
    }
    writer.finalize().expect("Failed to finalize WAV");
}

/// Write `<pitch>.wav` plucks for every pitch on the fretboard into `dir`.
pub fn write_pluck_library(dir: &Path, num_samples: usize) {
    for pitch in all_pitches() {
        let freq = pitch_frequency_by_name(pitch.as_str());
        let samples = pluck(freq, TEST_SAMPLE_RATE, num_samples);
        save_wav_pcm16(&dir.join(format!("{}.wav", pitch)), &samples, TEST_SAMPLE_RATE);
    }
}

/// Frequency of the first fretboard position sounding `name`.
fn pitch_frequency_by_name(name: &str) -> f64 {
    for string in 0..fretnet::STRING_COUNT {
        for fret in 0..fretnet::FRET_COUNT {
            let pos = FretPosition::new(string, fret).expect("valid position");
            if fretnet::core::pitch_id(pos).as_str() == name {
                return pitch_frequency(pos);
            }
        }
    }
    panic!("pitch {name} is not on the fretboard");
}
