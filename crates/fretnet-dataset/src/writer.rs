//! Dataset writer.

use crate::error::{DatasetError, Result};
use crate::loader::{contiguous_image_paths, image_paths, read_labels};
use fretnet_analysis::SpectrogramImage;
use fretnet_core::FretLabels;
use image::{GrayImage, ImageFormat};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Name of the label file inside a dataset directory.
pub const LABELS_FILE: &str = "labels.txt";

/// Sink for generated examples.
pub trait DatasetWriter {
    /// Persist one example. Examples are numbered in call order.
    fn write(&mut self, image: &SpectrogramImage, labels: &FretLabels) -> Result<()>;

    /// Flush buffered label lines.
    fn flush(&mut self) -> Result<()>;
}

/// Writes `labels.txt` plus one `<index>.png` per example into a directory.
pub struct DirectoryWriter {
    dir: PathBuf,
    labels: BufWriter<File>,
    next_index: usize,
}

impl DirectoryWriter {
    /// Start a fresh dataset in `dir`, removing any previous `labels.txt` and
    /// numbered PNGs. Other files are left alone.
    pub fn create(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;

        let stale = image_paths(&dir)?;
        for (_, path) in &stale {
            fs::remove_file(path)?;
        }
        if !stale.is_empty() {
            tracing::info!(dir = %dir.display(), removed = stale.len(), "cleared previous dataset");
        }

        let labels = File::create(dir.join(LABELS_FILE))?;
        Ok(Self {
            dir,
            labels: BufWriter::new(labels),
            next_index: 0,
        })
    }

    /// Continue an existing dataset, numbering new images after the last one.
    ///
    /// Fails with [`DatasetError::Mismatch`] if the directory's images and
    /// labels already disagree, or [`DatasetError::MissingImage`] if the
    /// image numbering has a gap.
    pub fn append(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;

        let images = contiguous_image_paths(&dir)?.len();
        let labels = if dir.join(LABELS_FILE).exists() {
            read_labels(&dir)?.len()
        } else {
            0
        };
        if images != labels {
            return Err(DatasetError::Mismatch { images, labels });
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join(LABELS_FILE))?;
        Ok(Self {
            dir,
            labels: BufWriter::new(file),
            next_index: images,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Index the next example will be written under.
    pub fn next_index(&self) -> usize {
        self.next_index
    }

    pub fn image_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("{}.png", index))
    }
}

impl DatasetWriter for DirectoryWriter {
    fn write(&mut self, image: &SpectrogramImage, labels: &FretLabels) -> Result<()> {
        let (height, width) = image.shape();
        let png = GrayImage::from_raw(width as u32, height as u32, image.pixels().to_vec())
            .ok_or_else(|| {
                DatasetError::InvalidImage(format!(
                    "{} pixels for a {}x{} image",
                    image.pixels().len(),
                    width,
                    height
                ))
            })?;

        // Image first: a failed save must not leave an orphaned label block.
        png.save_with_format(self.image_path(self.next_index), ImageFormat::Png)?;
        for line in labels.to_lines() {
            writeln!(self.labels, "{}", line)?;
        }

        self.next_index += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.labels.flush()?;
        Ok(())
    }
}

impl Drop for DirectoryWriter {
    fn drop(&mut self) {
        if let Err(e) = self.labels.flush() {
            tracing::warn!(dir = %self.dir.display(), error = %e, "failed to flush labels");
        }
    }
}
