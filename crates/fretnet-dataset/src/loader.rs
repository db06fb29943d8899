//! Dataset loader.
//!
//! Reads a dataset directory back for one string: the images in numeric
//! order and, for each image, that string's label row.

use crate::error::{DatasetError, Result};
use crate::writer::LABELS_FILE;
use fretnet_analysis::SpectrogramImage;
use fretnet_core::labels::parse_row;
use fretnet_core::{FretLabels, FRET_COUNT, STRING_COUNT};
use std::fs;
use std::path::{Path, PathBuf};

/// Images and one string's labels, index-aligned.
#[derive(Debug, Clone)]
pub struct DatasetSplit {
    pub string_index: usize,
    pub images: Vec<SpectrogramImage>,
    pub labels: Vec<[bool; FRET_COUNT]>,
}

impl DatasetSplit {
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// `(height, width, channels)` of the stored images, `None` if empty.
    pub fn input_shape(&self) -> Option<(usize, usize, usize)> {
        self.images.first().map(|img| (img.height(), img.width(), 1))
    }

    /// How often each fret is active on this string across the split.
    pub fn fret_histogram(&self) -> [usize; FRET_COUNT] {
        let mut counts = [0; FRET_COUNT];
        for row in &self.labels {
            for (count, &on) in counts.iter_mut().zip(row) {
                *count += on as usize;
            }
        }
        counts
    }
}

/// Numbered PNGs in `dir`, sorted by number. Other files are ignored.
pub fn image_paths(dir: impl AsRef<Path>) -> Result<Vec<(usize, PathBuf)>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir.as_ref())? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("png") {
            continue;
        }
        let index = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|s| s.parse::<usize>().ok());
        if let Some(index) = index {
            paths.push((index, path));
        }
    }
    paths.sort_by_key(|(index, _)| *index);
    Ok(paths)
}

/// Numbered PNGs in `dir`, which must be numbered `0..n` without gaps so
/// that image `n` lines up with label block `n`.
pub fn contiguous_image_paths(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    image_paths(dir)?
        .into_iter()
        .enumerate()
        .map(|(expected, (index, path))| {
            if index == expected {
                Ok(path)
            } else {
                Err(DatasetError::MissingImage { index: expected })
            }
        })
        .collect()
}

/// Every example's labels from `<dir>/labels.txt`.
pub fn read_labels(dir: impl AsRef<Path>) -> Result<Vec<FretLabels>> {
    let text = fs::read_to_string(dir.as_ref().join(LABELS_FILE))?;
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();

    if lines.len() % STRING_COUNT != 0 {
        return Err(DatasetError::MalformedLabel {
            line: lines.len(),
            content: format!(
                "{} lines is not a multiple of {}",
                lines.len(),
                STRING_COUNT
            ),
        });
    }

    lines
        .chunks(STRING_COUNT)
        .enumerate()
        .map(|(n, block)| {
            for (s, line) in block.iter().enumerate() {
                if parse_row(line).is_none() {
                    return Err(DatasetError::MalformedLabel {
                        line: n * STRING_COUNT + s + 1,
                        content: line.to_string(),
                    });
                }
            }
            FretLabels::from_lines(block).map_err(|e| DatasetError::MalformedLabel {
                line: n * STRING_COUNT + 1,
                content: e.to_string(),
            })
        })
        .collect()
}

fn read_image(path: &Path) -> Result<SpectrogramImage> {
    let gray = image::open(path)?.into_luma8();
    let (width, height) = gray.dimensions();
    Ok(SpectrogramImage::from_pixels(
        width as usize,
        height as usize,
        gray.into_raw(),
    ))
}

/// Load the images in `dir` with the labels of `string_index`.
///
/// Image `n` is paired with label line `n * STRING_COUNT + string_index`.
pub fn load_dataset(string_index: usize, dir: impl AsRef<Path>) -> Result<DatasetSplit> {
    if string_index >= STRING_COUNT {
        return Err(DatasetError::InvalidString(string_index));
    }
    let dir = dir.as_ref();

    let paths = contiguous_image_paths(dir)?;
    let all_labels = read_labels(dir)?;
    if paths.len() != all_labels.len() {
        return Err(DatasetError::Mismatch {
            images: paths.len(),
            labels: all_labels.len(),
        });
    }

    let images = paths
        .iter()
        .map(|path| read_image(path))
        .collect::<Result<Vec<_>>>()?;
    let labels = all_labels
        .iter()
        .map(|l| *l.string(string_index))
        .collect();

    tracing::debug!(
        dir = %dir.display(),
        string_index,
        examples = images.len(),
        "loaded dataset"
    );
    Ok(DatasetSplit {
        string_index,
        images,
        labels,
    })
}
