//! # Fretnet Core
//!
//! Shared model types for the fretnet dataset generator.
//!
//! - **Fretboard**: static (string, fret) to pitch-name map for a 6-string,
//!   22-fret guitar in standard tuning
//! - **Chords**: validated [`ChordSpecification`]s and the constrained random
//!   [`SpecificationSampler`]
//! - **Labels**: per-string [`FretLabels`] bit vectors
//! - **Waveforms**: mono sample buffers shared by the sampler and analysis crates
//!
//! ## Example
//!
//! ```rust
//! use fretnet_core::{FretLabels, SpecificationSampler};
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let chord = SpecificationSampler::default().sample(&mut rng).unwrap();
//! let labels = FretLabels::from_specification(&chord);
//! assert_eq!(labels.count(), chord.len());
//! ```

pub mod chord;
pub mod error;
pub mod fretboard;
pub mod labels;
pub mod waveform;

pub use chord::{ChordSpecification, FretPosition, SpecificationSampler};
pub use error::{Error, Result};
pub use fretboard::{
    all_pitches, midi_note, pitch_frequency, pitch_id, PitchId, FRET_COUNT, MAX_CHORD_DIST, MAX_FRET,
    STRING_COUNT,
};
pub use labels::FretLabels;
pub use waveform::{Waveform, SAMPLE_DURATION, SAMPLE_RATE};
