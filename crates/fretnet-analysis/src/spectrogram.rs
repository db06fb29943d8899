//! Spectrogram data and 8-bit spectrogram images.
//!
//! Magnitudes are rescaled over the whole array (not per row or column):
//! the minimum maps to 0, the maximum to 255, values are truncated to bytes
//! and then inverted so the loudest cell is black. A spectrogram with no
//! range (silent input) renders as a uniformly white image.

use crate::cqt::{ConstantQTransform, CqtParams};
use crate::error::{Error, Result};
use fretnet_core::Waveform;

/// Non-negative magnitudes, `bins` rows by `frames` columns, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrogram {
    bins: usize,
    frames: usize,
    data: Vec<f32>,
}

impl Spectrogram {
    /// Panics if `data.len() != bins * frames`.
    pub fn from_data(bins: usize, frames: usize, data: Vec<f32>) -> Self {
        assert_eq!(data.len(), bins * frames, "spectrogram data size mismatch");
        Self { bins, frames, data }
    }

    pub fn bins(&self) -> usize {
        self.bins
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    /// `(bins, frames)`
    pub fn shape(&self) -> (usize, usize) {
        (self.bins, self.frames)
    }

    pub fn get(&self, bin: usize, frame: usize) -> f32 {
        self.data[bin * self.frames + frame]
    }

    pub fn row(&self, bin: usize) -> &[f32] {
        &self.data[bin * self.frames..(bin + 1) * self.frames]
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// `(min, max)` over every cell, `None` if empty.
    pub fn range(&self) -> Option<(f32, f32)> {
        if self.data.is_empty() {
            return None;
        }
        Some(self.data.iter().fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        }))
    }
}

/// Grayscale image of a spectrogram: `height` = bins, `width` = frames.
///
/// Row 0 is the lowest-frequency bin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpectrogramImage {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl SpectrogramImage {
    /// Panics if `pixels.len() != width * height`.
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<u8>) -> Self {
        assert_eq!(pixels.len(), width * height, "image pixel count mismatch");
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// `(height, width)`, matching the `(bins, frames)` of the source.
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        self.pixels[y * self.width + x]
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// True if every pixel is white, which only happens for degenerate input.
    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|&p| p == u8::MAX)
    }
}

/// Min-max rescale to bytes, then invert.
pub fn render_image(spectrogram: &Spectrogram) -> SpectrogramImage {
    let (height, width) = spectrogram.shape();
    let range = spectrogram.range().map(|(lo, hi)| (lo, hi - lo));

    let pixels = match range {
        Some((lo, span)) if span > 0.0 && span.is_finite() => spectrogram
            .data()
            .iter()
            .map(|&v| u8::MAX - ((v - lo) / span * 255.0) as u8)
            .collect(),
        _ => {
            tracing::debug!(height, width, "spectrogram has no range, rendering blank");
            vec![u8::MAX; width * height]
        }
    };

    SpectrogramImage::from_pixels(width, height, pixels)
}

fn check_shape(spectrogram: &Spectrogram, expected: (usize, usize)) -> Result<()> {
    if spectrogram.shape() != expected {
        return Err(Error::ShapeMismatch {
            expected,
            found: spectrogram.shape(),
        });
    }
    Ok(())
}

/// Waveform to spectrogram image, with the output shape checked against the
/// transform parameters.
#[derive(Debug)]
pub struct SpectrogramRenderer {
    cqt: ConstantQTransform,
}

impl SpectrogramRenderer {
    pub fn new(params: CqtParams, sample_rate: u32) -> Result<Self> {
        Ok(Self::from_transform(ConstantQTransform::new(params, sample_rate)?))
    }

    pub fn from_transform(cqt: ConstantQTransform) -> Self {
        Self { cqt }
    }

    pub fn transform(&self) -> &ConstantQTransform {
        &self.cqt
    }

    /// `(height, width)` of the image rendered from `num_samples`: one row
    /// per bin, one column per hop plus the frame centered on sample 0.
    pub fn image_shape(&self, num_samples: usize) -> (usize, usize) {
        let params = self.cqt.params();
        (params.n_bins, 1 + num_samples / params.hop_length)
    }

    pub fn spectrogram(&self, wave: &Waveform) -> Result<Spectrogram> {
        let spectrogram = self.cqt.transform(wave)?;
        check_shape(&spectrogram, self.image_shape(wave.len()))?;
        Ok(spectrogram)
    }

    pub fn render(&self, wave: &Waveform) -> Result<SpectrogramImage> {
        Ok(render_image(&self.spectrogram(wave)?))
    }
}
