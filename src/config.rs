//! Generator and dataset configuration.

use crate::{Error, Result};
use fretnet_analysis::CqtParams;
use fretnet_core::{SAMPLE_DURATION, SAMPLE_RATE};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Examples in the default training set.
pub const TRAINING_SET_SIZE: usize = 10;

/// Examples in the default test set.
pub const TEST_SET_SIZE: usize = 10;

pub const DEFAULT_TRAIN_DIR: &str = "data/train";
pub const DEFAULT_TEST_DIR: &str = "data/test";

/// Configuration for a single-example generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub sample_rate: u32,
    /// Seconds of audio per example.
    pub sample_duration: f64,
    pub cqt: CqtParams,
    /// Fail with [`Error::DegenerateSignal`] instead of rendering a blank image.
    pub reject_silent: bool,
    /// Restarts allowed before the sampler gives up.
    pub max_draw_attempts: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            sample_rate: SAMPLE_RATE,
            sample_duration: SAMPLE_DURATION,
            cqt: CqtParams::default(),
            reject_silent: false,
            max_draw_attempts: 8,
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<()> {
        if !(8000..=384000).contains(&self.sample_rate) {
            return Err(Error::InvalidConfig(format!(
                "sample_rate {} out of range (8000-384000 Hz)",
                self.sample_rate
            )));
        }
        if !self.sample_duration.is_finite() || self.sample_duration <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "sample_duration must be positive, got {}",
                self.sample_duration
            )));
        }
        if self.max_draw_attempts == 0 {
            return Err(Error::InvalidConfig(
                "max_draw_attempts must be at least 1".into(),
            ));
        }
        self.cqt.validate(self.sample_rate)?;
        Ok(())
    }
}

/// What batch generation does when a chord needs a recording the store lacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "policy")]
pub enum MissingAssetPolicy {
    /// Fail the whole batch.
    #[default]
    Abort,
    /// Draw a new chord from a fresh stream, at most `max_attempts` times.
    Redraw { max_attempts: usize },
}

/// Configuration for writing training and test sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub generator: GeneratorConfig,
    pub train_dir: PathBuf,
    pub test_dir: PathBuf,
    pub training_set_size: usize,
    pub test_set_size: usize,
    pub seed: u64,
    pub missing_assets: MissingAssetPolicy,
    /// Examples rendered in parallel before being written out.
    pub chunk_size: usize,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            generator: GeneratorConfig::default(),
            train_dir: PathBuf::from(DEFAULT_TRAIN_DIR),
            test_dir: PathBuf::from(DEFAULT_TEST_DIR),
            training_set_size: TRAINING_SET_SIZE,
            test_set_size: TEST_SET_SIZE,
            seed: 0,
            missing_assets: MissingAssetPolicy::Abort,
            chunk_size: 64,
        }
    }
}

impl DatasetConfig {
    pub fn validate(&self) -> Result<()> {
        self.generator.validate()?;
        if self.chunk_size == 0 {
            return Err(Error::InvalidConfig("chunk_size must be at least 1".into()));
        }
        if self.train_dir == self.test_dir {
            return Err(Error::InvalidConfig(format!(
                "train and test sets share a directory: {}",
                self.train_dir.display()
            )));
        }
        if let MissingAssetPolicy::Redraw { max_attempts: 0 } = self.missing_assets {
            return Err(Error::InvalidConfig(
                "redraw policy needs at least 1 attempt".into(),
            ));
        }
        Ok(())
    }
}
