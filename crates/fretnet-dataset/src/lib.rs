//! # Fretnet Dataset
//!
//! On-disk layout shared by the generator and the training consumer:
//!
//! ```text
//! <dir>/labels.txt   one line per string per example, '0'/'1' x 23
//! <dir>/0.png        grayscale spectrogram of example 0
//! <dir>/1.png
//! ...
//! ```
//!
//! Labels for example `n` occupy lines `n * 6 .. n * 6 + 6`, low E first, so
//! the label of string `s` for image `n` is line `n * 6 + s`. Images are read
//! back in numeric order (`2.png` before `10.png`).

pub mod error;
pub mod loader;
pub mod writer;

pub use error::{DatasetError, Result};
pub use loader::{contiguous_image_paths, image_paths, load_dataset, read_labels, DatasetSplit};
pub use writer::{DatasetWriter, DirectoryWriter, LABELS_FILE};
