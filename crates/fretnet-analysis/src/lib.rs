//! # Fretnet Analysis
//!
//! Time-frequency rendering of synthesized chords.
//!
//! - **Constant-Q transform**: log-spaced magnitude spectrogram computed with
//!   precomputed sparse spectral kernels (Brown & Puckette, 1992)
//! - **Spectrogram images**: global min-max rescale to bytes, inverted so
//!   strong energy renders dark
//!
//! All functions operate on [`Waveform`](fretnet_core::Waveform)s or raw
//! `&[f32]` buffers.
//!
//! ## Example
//!
//! ```rust
//! use fretnet_analysis::{CqtParams, SpectrogramRenderer};
//! use fretnet_core::{Waveform, SAMPLE_RATE};
//!
//! let renderer = SpectrogramRenderer::new(CqtParams::default(), SAMPLE_RATE).unwrap();
//! let silence = Waveform::silence(22050, SAMPLE_RATE);
//! let image = renderer.render(&silence).unwrap();
//! assert_eq!(image.shape(), (120, 44));
//! ```

pub mod cqt;
pub mod error;
pub mod spectrogram;

pub use cqt::{ConstantQTransform, CqtParams};
pub use error::{Error, Result};
pub use spectrogram::{render_image, Spectrogram, SpectrogramImage, SpectrogramRenderer};
