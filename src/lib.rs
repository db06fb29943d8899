//! # Fretnet - Synthetic Guitar Fretboard Datasets
//!
//! Generates labelled spectrogram images of random guitar chords for
//! training per-string fret classifiers.
//!
//! ## Architecture
//!
//! Fretnet is an umbrella crate that coordinates:
//! - **fretnet-core** - Fretboard model (pitch map, chords, labels, waveforms)
//! - **fretnet-sampler** - Sample stores and 1/N chord mixing
//! - **fretnet-analysis** - Constant-Q transform and spectrogram images
//! - **fretnet-dataset** - On-disk dataset writer and loader
//!
//! One example is: draw a [`ChordSpecification`], build its [`FretLabels`],
//! mix the recordings of its notes, render the mix as an inverted 8-bit CQT
//! image. [`batch`] runs that in parallel and writes training and test sets.
//!
//! ## Quick Start
//!
//! ```ignore
//! use fretnet::prelude::*;
//! use rand::SeedableRng;
//!
//! let store = WavSampleStore::new("samples")?;
//! let generator = ExampleGenerator::builder(store).build()?;
//!
//! // One example
//! let mut rng = rand::rngs::StdRng::seed_from_u64(1);
//! let example = generator.generate(&mut rng)?;
//! assert_eq!(example.image.shape(), (120, 44));
//!
//! // Training and test sets under data/
//! create_input_data(&generator, &DatasetConfig::default())?;
//! let train = load_train_data(&DatasetConfig::default(), 0)?;
//! ```
//!
//! ## Feature Flags
//!
//! - `default` - Library and command-line tool
//! - `cli` - The `fretnet` binary (clap, tracing-subscriber, JSON configs)

/// Re-export of fretnet-core for direct access
pub use fretnet_core as core;

pub use fretnet_analysis as analysis;
pub use fretnet_dataset as dataset;
pub use fretnet_sampler as sampler;

// Fretboard model
pub use fretnet_core::{
    ChordSpecification, FretLabels, FretPosition, PitchId, SpecificationSampler, Waveform,
    FRET_COUNT, MAX_CHORD_DIST, MAX_FRET, SAMPLE_DURATION, SAMPLE_RATE, STRING_COUNT,
};

// Synthesis
pub use fretnet_sampler::{ChordSynthesizer, MemorySampleStore, SampleStore, WavSampleStore};

// Rendering
pub use fretnet_analysis::{CqtParams, SpectrogramImage, SpectrogramRenderer};

// Storage
pub use fretnet_dataset::{DatasetSplit, DatasetWriter, DirectoryWriter};

pub mod batch;
pub mod config;
pub mod error;

mod builder;
mod generator;

pub use batch::{
    create_input_data, generate_dataset, generate_examples, load_test_data, load_train_data,
    needs_input_data, BatchOptions, DatasetSummary, InputDataSummary,
};
pub use builder::ExampleGeneratorBuilder;
pub use config::{DatasetConfig, GeneratorConfig, MissingAssetPolicy};
pub use error::{Error, Result};
pub use generator::{Example, ExampleGenerator};

/// Convenience prelude for common imports
pub mod prelude {
    // Generation
    pub use crate::{Example, ExampleGenerator, ExampleGeneratorBuilder};

    // Configuration
    pub use crate::{DatasetConfig, GeneratorConfig, MissingAssetPolicy};

    // Datasets
    pub use crate::batch::{create_input_data, generate_dataset, load_test_data, load_train_data};

    // Model
    pub use crate::core::{ChordSpecification, FretLabels, FretPosition, Waveform};

    // Stores
    pub use crate::sampler::{MemorySampleStore, SampleStore, WavSampleStore};
}
