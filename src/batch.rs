//! Parallel dataset generation and loading.
//!
//! Example `i` of a set draws from its own `StdRng`, seeded from the set
//! seed, `i` and the redraw attempt. Output therefore depends only on the
//! seed, never on how rayon schedules the work. Examples are rendered in
//! parallel one chunk at a time and written in index order.

use crate::config::{DatasetConfig, MissingAssetPolicy};
use crate::generator::{Example, ExampleGenerator};
use crate::Result;
use fretnet_dataset::{load_dataset, DatasetSplit, DatasetWriter, DirectoryWriter, LABELS_FILE};
use fretnet_sampler::SampleStore;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::ops::Range;
use std::path::{Path, PathBuf};

/// Stream offset separating the test set from the training set.
const TEST_STREAM: u64 = 0x7465_7374;

/// Per-set generation options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    pub seed: u64,
    pub missing_assets: MissingAssetPolicy,
    pub chunk_size: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            seed: 0,
            missing_assets: MissingAssetPolicy::Abort,
            chunk_size: 64,
        }
    }
}

impl From<&DatasetConfig> for BatchOptions {
    fn from(config: &DatasetConfig) -> Self {
        Self {
            seed: config.seed,
            missing_assets: config.missing_assets,
            chunk_size: config.chunk_size,
        }
    }
}

/// What one `generate_dataset` call wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSummary {
    pub dir: PathBuf,
    pub examples: usize,
    /// Fretted positions across all examples.
    pub notes: usize,
    /// Images rendered from silent mixes.
    pub blank_images: usize,
}

/// Summaries of the training and test sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDataSummary {
    pub train: DatasetSummary,
    pub test: DatasetSummary,
}

/// Random stream for one draw of one example.
pub fn example_rng(seed: u64, index: usize, attempt: usize) -> StdRng {
    // splitmix64 finalizer over the combined key
    let mut z = seed
        ^ (index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ (attempt as u64).rotate_left(32);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    StdRng::seed_from_u64(z ^ (z >> 31))
}

fn generate_one<S: SampleStore>(
    generator: &ExampleGenerator<S>,
    index: usize,
    options: &BatchOptions,
) -> Result<Example> {
    let attempts = match options.missing_assets {
        MissingAssetPolicy::Abort => 1,
        MissingAssetPolicy::Redraw { max_attempts } => max_attempts.max(1),
    };

    let mut attempt = 0;
    loop {
        let mut rng = example_rng(options.seed, index, attempt);
        match generator.generate(&mut rng) {
            Err(e) if e.is_missing_asset() && attempt + 1 < attempts => {
                tracing::warn!(index, attempt, error = %e, "missing recording, redrawing example");
                attempt += 1;
            }
            result => return result,
        }
    }
}

/// Render the examples with indices in `range`, in parallel, in index order.
pub fn generate_examples<S: SampleStore>(
    generator: &ExampleGenerator<S>,
    range: Range<usize>,
    options: &BatchOptions,
) -> Result<Vec<Example>> {
    range
        .into_par_iter()
        .map(|index| generate_one(generator, index, options))
        .collect()
}

/// Write `n` examples to `dir`, replacing any dataset already there.
pub fn generate_dataset<S: SampleStore>(
    generator: &ExampleGenerator<S>,
    n: usize,
    dir: impl AsRef<Path>,
    options: &BatchOptions,
) -> Result<DatasetSummary> {
    let dir = dir.as_ref();
    let chunk_size = options.chunk_size.max(1);
    let mut writer = DirectoryWriter::create(dir)?;
    let mut summary = DatasetSummary {
        dir: dir.to_path_buf(),
        examples: 0,
        notes: 0,
        blank_images: 0,
    };

    tracing::info!(dir = %dir.display(), examples = n, seed = options.seed, "generating dataset");
    let mut start = 0;
    while start < n {
        let end = (start + chunk_size).min(n);
        for example in generate_examples(generator, start..end, options)? {
            writer.write(&example.image, &example.labels)?;
            summary.examples += 1;
            summary.notes += example.specification.len();
            summary.blank_images += example.image.is_blank() as usize;
        }
        tracing::debug!(written = end, total = n, "dataset chunk written");
        start = end;
    }
    writer.flush()?;

    if summary.blank_images > 0 {
        tracing::warn!(blank = summary.blank_images, "dataset contains blank images");
    }
    tracing::info!(dir = %dir.display(), examples = summary.examples, "dataset complete");
    Ok(summary)
}

/// Write the training and test sets described by `config`.
///
/// The test set draws from a stream disjoint from the training set's.
pub fn create_input_data<S: SampleStore>(
    generator: &ExampleGenerator<S>,
    config: &DatasetConfig,
) -> Result<InputDataSummary> {
    config.validate()?;
    let options = BatchOptions::from(config);

    let train = generate_dataset(generator, config.training_set_size, &config.train_dir, &options)?;
    let test_options = BatchOptions {
        seed: options.seed ^ TEST_STREAM,
        ..options
    };
    let test = generate_dataset(generator, config.test_set_size, &config.test_dir, &test_options)?;

    Ok(InputDataSummary { train, test })
}

fn is_populated(dir: &Path) -> bool {
    dir.join(LABELS_FILE).is_file()
        && fretnet_dataset::image_paths(dir).is_ok_and(|paths| !paths.is_empty())
}

/// False once both set directories hold labels and at least one image.
pub fn needs_input_data(config: &DatasetConfig) -> bool {
    !(is_populated(&config.train_dir) && is_populated(&config.test_dir))
}

/// Training images with the labels of `string_index`.
pub fn load_train_data(config: &DatasetConfig, string_index: usize) -> Result<DatasetSplit> {
    Ok(load_dataset(string_index, &config.train_dir)?)
}

/// Test images with the labels of `string_index`.
pub fn load_test_data(config: &DatasetConfig, string_index: usize) -> Result<DatasetSplit> {
    Ok(load_dataset(string_index, &config.test_dir)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_example_rng_streams_differ() {
        let a: u64 = example_rng(1, 0, 0).gen();
        let b: u64 = example_rng(1, 1, 0).gen();
        let c: u64 = example_rng(1, 0, 1).gen();
        let d: u64 = example_rng(2, 0, 0).gen();
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);

        let again: u64 = example_rng(1, 0, 0).gen();
        assert_eq!(a, again);
    }

    #[test]
    fn test_options_from_config() {
        let config = DatasetConfig {
            seed: 9,
            chunk_size: 4,
            ..Default::default()
        };
        let options = BatchOptions::from(&config);
        assert_eq!(options.seed, 9);
        assert_eq!(options.chunk_size, 4);
        assert_eq!(options.missing_assets, MissingAssetPolicy::Abort);
    }

    #[test]
    fn test_empty_dirs_need_data() {
        let dir = tempfile::tempdir().unwrap();
        let config = DatasetConfig {
            train_dir: dir.path().join("train"),
            test_dir: dir.path().join("test"),
            ..Default::default()
        };
        assert!(needs_input_data(&config));
    }
}
