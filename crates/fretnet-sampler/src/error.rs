//! Error types.

use fretnet_core::PitchId;
use thiserror::Error;

/// Error type.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// No recording exists for the pitch.
    #[error("Sample not found: {0}")]
    SampleNotFound(PitchId),

    /// Recording uses a layout the store cannot read.
    #[error("Unsupported sample format in {path}: {reason}")]
    UnsupportedFormat { path: String, reason: String },

    /// Recording was made at a different rate than the synthesizer runs at.
    #[error("Sample {pitch} is {found} Hz, expected {expected} Hz")]
    SampleRateMismatch {
        pitch: PitchId,
        expected: u32,
        found: u32,
    },

    /// Invalid synthesis request.
    #[error("Invalid synthesis request: {0}")]
    InvalidRequest(String),

    /// Hound error.
    #[error("Hound error: {0}")]
    HoundError(#[from] hound::Error),
}

/// Result type.
pub type Result<T> = std::result::Result<T, Error>;
