//! Sample stores and chord synthesis.
//!
//! Turns a [`ChordSpecification`](fretnet_core::ChordSpecification) into audio
//! by mixing pre-recorded single-note samples.
//!
//! # Features
//!
//! - **Sample stores**: the [`SampleStore`] trait, an in-memory store for tests
//!   and synthetic data, and [`WavSampleStore`] for a directory of
//!   `<pitch>.wav` recordings
//! - **Decode once**: WAV recordings are decoded on first use and shared
//!   across worker threads
//! - **Mixing**: [`ChordSynthesizer`] sums the notes of a chord with equal
//!   1/N weights into a fixed-length window
//!
//! # Example
//!
//! ```ignore
//! use fretnet_core::{ChordSpecification, SAMPLE_DURATION};
//! use fretnet_sampler::{ChordSynthesizer, WavSampleStore};
//!
//! let store = WavSampleStore::new("samples")?;
//! let synth = ChordSynthesizer::new(store);
//! let chord = ChordSpecification::from_pairs(&[(0, 3), (1, 2)])?;
//! let signal = synth.synthesize(&chord, SAMPLE_DURATION)?;
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod mixer;
pub mod store;
pub mod wav;

pub use mixer::ChordSynthesizer;
pub use store::{MemorySampleStore, SampleStore};
pub use wav::{read_wav, WavSampleStore};
