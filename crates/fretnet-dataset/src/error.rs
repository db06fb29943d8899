//! Error types for fretnet-dataset

use std::io;
use thiserror::Error;

/// Dataset error type
#[derive(Error, Debug)]
pub enum DatasetError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// PNG encoding or decoding failed
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Pixel buffer does not match the declared dimensions
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    /// A label line is not FRET_COUNT '0'/'1' characters
    #[error("Malformed label at line {line}: {content:?}")]
    MalformedLabel { line: usize, content: String },

    /// Image numbering has a gap: `<index>.png` is absent but later ones exist
    #[error("Missing image {index}.png")]
    MissingImage { index: usize },

    /// Image and label counts disagree
    #[error("Dataset mismatch: {images} images but {labels} label sets")]
    Mismatch { images: usize, labels: usize },

    /// String index outside the instrument
    #[error("Invalid string index: {0}")]
    InvalidString(usize),
}

/// Result type for dataset operations
pub type Result<T> = std::result::Result<T, DatasetError>;
