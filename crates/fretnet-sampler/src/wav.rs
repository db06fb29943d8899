//! WAV-backed sample store.
//!
//! Recordings live in one directory, one mono file per pitch, named
//! `<pitch>.wav` (`E2.wav`, `F#2.wav`, `Bb3.wav`, ...). Integer PCM is scaled
//! by `1 / 2^(bits - 1)` into [-1.0, 1.0]; float PCM is taken as is.

use crate::error::{Error, Result};
use crate::store::SampleStore;
use dashmap::DashMap;
use fretnet_core::{PitchId, Waveform};
use hound::{SampleFormat, WavReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Decode a mono WAV file.
pub fn read_wav(path: impl AsRef<Path>) -> Result<Waveform> {
    let path = path.as_ref();
    let reader = WavReader::open(path)?;
    let spec = reader.spec();

    if spec.channels != 1 {
        return Err(Error::UnsupportedFormat {
            path: path.display().to_string(),
            reason: format!("{} channels, only mono is supported", spec.channels),
        });
    }

    let samples: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let bits = spec.bits_per_sample;
            if !(8..=32).contains(&bits) {
                return Err(Error::UnsupportedFormat {
                    path: path.display().to_string(),
                    reason: format!("{bits}-bit integer samples"),
                });
            }
            let max_val = (1i64 << (bits - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|s| s as f32 / max_val))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    Ok(Waveform::new(samples, spec.sample_rate))
}

/// Directory of `<pitch>.wav` recordings.
///
/// Each recording is decoded on first use and kept for the life of the
/// store; the fretboard has few enough pitches that nothing is evicted.
/// Concurrent first fetches of one pitch decode it once.
pub struct WavSampleStore {
    root: PathBuf,
    loaded: DashMap<PitchId, Arc<Waveform>>,
}

impl WavSampleStore {
    /// Open a sample directory. Fails if `root` is not a directory.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("sample directory not found: {}", root.display()),
            )));
        }

        Ok(Self {
            root,
            loaded: DashMap::new(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File a pitch is read from.
    pub fn path_for(&self, pitch: &PitchId) -> PathBuf {
        self.root.join(format!("{}.wav", pitch))
    }

    /// Number of recordings decoded so far.
    pub fn loaded(&self) -> usize {
        self.loaded.len()
    }
}

impl SampleStore for WavSampleStore {
    fn fetch(&self, pitch: &PitchId) -> Result<Arc<Waveform>> {
        if let Some(wave) = self.loaded.get(pitch) {
            return Ok(wave.clone());
        }

        let entry = self.loaded.entry(pitch.clone()).or_try_insert_with(|| {
            let path = self.path_for(pitch);
            if !path.is_file() {
                return Err(Error::SampleNotFound(pitch.clone()));
            }
            tracing::debug!(%pitch, path = %path.display(), "loading sample");
            read_wav(&path).map(Arc::new)
        })?;
        Ok(entry.clone())
    }

    fn contains(&self, pitch: &PitchId) -> bool {
        self.loaded.contains_key(pitch) || self.path_for(pitch).is_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use hound::{WavSpec, WavWriter};

    fn write_i16(path: &Path, channels: u16, samples: &[i16]) {
        let spec = WavSpec {
            channels,
            sample_rate: 44100,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(path, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_read_wav_scales_int16() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("E2.wav");
        write_i16(&path, 1, &[0, 16384, -32768, 32767]);

        let wave = read_wav(&path).unwrap();
        assert_eq!(wave.sample_rate(), 44100);
        assert_eq!(wave.len(), 4);
        assert_abs_diff_eq!(wave.samples()[1], 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(wave.samples()[2], -1.0, epsilon = 1e-6);
        assert!(wave.samples()[3] < 1.0);
    }

    #[test]
    fn test_read_wav_rejects_stereo() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        write_i16(&path, 2, &[0, 0, 100, 100]);

        assert!(matches!(
            read_wav(&path),
            Err(Error::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_store_fetch_and_cache() {
        let dir = tempfile::tempdir().unwrap();
        write_i16(&dir.path().join("F#2.wav"), 1, &[1000; 32]);

        let store = WavSampleStore::new(dir.path()).unwrap();
        let pitch = PitchId::new("F#2");
        assert!(store.contains(&pitch));

        let first = store.fetch(&pitch).unwrap();
        let second = store.fetch(&pitch).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.loaded(), 1);

        // Served from memory once decoded
        std::fs::remove_file(dir.path().join("F#2.wav")).unwrap();
        assert!(store.contains(&pitch));
        assert!(Arc::ptr_eq(&store.fetch(&pitch).unwrap(), &first));
    }

    #[test]
    fn test_concurrent_first_fetch_decodes_once() {
        let dir = tempfile::tempdir().unwrap();
        write_i16(&dir.path().join("A2.wav"), 1, &[500; 4096]);
        let store = WavSampleStore::new(dir.path()).unwrap();
        let pitch = PitchId::new("A2");

        let waves: Vec<Arc<Waveform>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| store.fetch(&pitch).unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert!(waves.iter().all(|w| Arc::ptr_eq(w, &waves[0])));
        assert_eq!(store.loaded(), 1);
    }

    #[test]
    fn test_missing_pitch_is_not_remembered() {
        let dir = tempfile::tempdir().unwrap();
        let store = WavSampleStore::new(dir.path()).unwrap();
        let pitch = PitchId::new("G3");
        assert!(store.fetch(&pitch).is_err());
        assert_eq!(store.loaded(), 0);

        write_i16(&dir.path().join("G3.wav"), 1, &[7; 16]);
        assert_eq!(store.fetch(&pitch).unwrap().len(), 16);
    }

    #[test]
    fn test_store_missing_pitch() {
        let dir = tempfile::tempdir().unwrap();
        let store = WavSampleStore::new(dir.path()).unwrap();

        let err = store.fetch(&PitchId::new("D6")).unwrap_err();
        assert!(matches!(err, Error::SampleNotFound(p) if p.as_str() == "D6"));
    }

    #[test]
    fn test_store_requires_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(WavSampleStore::new(dir.path().join("nope")).is_err());
    }
}
