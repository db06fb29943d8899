//! Centralized error type for the fretnet umbrella crate.
//!
//! Wraps all subsystem errors so `?` propagates naturally across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] fretnet_core::Error),

    #[error("Sampler: {0}")]
    Sampler(#[from] fretnet_sampler::Error),

    #[error("Analysis: {0}")]
    Analysis(#[from] fretnet_analysis::Error),

    #[error("Dataset: {0}")]
    Dataset(#[from] fretnet_dataset::DatasetError),

    /// Mixed signal has no amplitude and the generator rejects silence.
    #[error("Degenerate signal for chord {chord}")]
    DegenerateSignal { chord: String },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True if a recording was missing from the sample store.
    pub fn is_missing_asset(&self) -> bool {
        matches!(
            self,
            Error::Sampler(fretnet_sampler::Error::SampleNotFound(_))
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
