//! Builder for configuring and constructing an `ExampleGenerator`.

use crate::config::GeneratorConfig;
use crate::{ExampleGenerator, Result};
use fretnet_analysis::CqtParams;
use fretnet_sampler::SampleStore;

/// Unset options keep their [`GeneratorConfig::default`] values. The
/// configuration is validated once, in [`build`](Self::build).
///
/// # Example
///
/// ```ignore
/// use fretnet::prelude::*;
///
/// let store = WavSampleStore::new("samples")?;
/// let generator = ExampleGenerator::builder(store)
///     .reject_silent(true)
///     .build()?;
///
/// let (height, width, _) = generator.input_shape(); // 120 x 44
/// ```
pub struct ExampleGeneratorBuilder<S> {
    store: S,
    config: GeneratorConfig,
}

impl<S: SampleStore> ExampleGeneratorBuilder<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            config: GeneratorConfig::default(),
        }
    }

    /// Replace every option at once.
    pub fn config(mut self, config: GeneratorConfig) -> Self {
        self.config = config;
        self
    }

    /// Default: 44100. Recordings must match it.
    pub fn sample_rate(mut self, sample_rate: u32) -> Self {
        self.config.sample_rate = sample_rate;
        self
    }

    /// Default: 0.5 seconds
    pub fn sample_duration(mut self, seconds: f64) -> Self {
        self.config.sample_duration = seconds;
        self
    }

    pub fn cqt(mut self, params: CqtParams) -> Self {
        self.config.cqt = params;
        self
    }

    /// Default: false
    pub fn reject_silent(mut self, reject: bool) -> Self {
        self.config.reject_silent = reject;
        self
    }

    /// Default: 8
    pub fn max_draw_attempts(mut self, attempts: usize) -> Self {
        self.config.max_draw_attempts = attempts;
        self
    }

    pub fn build(self) -> Result<ExampleGenerator<S>> {
        tracing::debug!(
            sample_rate = self.config.sample_rate,
            duration = self.config.sample_duration,
            bins = self.config.cqt.n_bins,
            "building example generator"
        );
        ExampleGenerator::new(self.store, self.config)
    }
}
