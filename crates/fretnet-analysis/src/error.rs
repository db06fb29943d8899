//! Error types for fretnet-analysis

use thiserror::Error;

/// Analysis error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Transform parameters cannot produce a valid filter bank
    #[error("Invalid CQT parameters: {0}")]
    InvalidParameters(String),

    /// Signal rate differs from the rate the transform was built for
    #[error("Signal is {found} Hz, transform expects {expected} Hz")]
    SampleRateMismatch { expected: u32, found: u32 },

    /// Rendered data does not have the shape the parameters predict
    #[error("Spectrogram shape {found:?} does not match expected {expected:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },
}

/// Result type for analysis operations
pub type Result<T> = std::result::Result<T, Error>;
