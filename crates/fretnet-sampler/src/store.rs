//! Sample store trait and the in-memory store.

use crate::error::{Error, Result};
use fretnet_core::{pitch_id, FretPosition, PitchId, Waveform, FRET_COUNT, STRING_COUNT};
use std::collections::HashMap;
use std::sync::Arc;

/// Source of single-note recordings, keyed by pitch.
///
/// Implementations are shared by dataset workers, so lookups take `&self`.
pub trait SampleStore: Send + Sync {
    /// Recording for `pitch`. [`Error::SampleNotFound`] if there is none.
    fn fetch(&self, pitch: &PitchId) -> Result<Arc<Waveform>>;

    /// Whether a recording exists for `pitch`.
    fn contains(&self, pitch: &PitchId) -> bool {
        self.fetch(pitch).is_ok()
    }
}

impl<T: SampleStore + ?Sized> SampleStore for Arc<T> {
    fn fetch(&self, pitch: &PitchId) -> Result<Arc<Waveform>> {
        (**self).fetch(pitch)
    }

    fn contains(&self, pitch: &PitchId) -> bool {
        (**self).contains(pitch)
    }
}

impl<T: SampleStore + ?Sized> SampleStore for &T {
    fn fetch(&self, pitch: &PitchId) -> Result<Arc<Waveform>> {
        (**self).fetch(pitch)
    }

    fn contains(&self, pitch: &PitchId) -> bool {
        (**self).contains(pitch)
    }
}

/// Recordings held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySampleStore {
    samples: HashMap<PitchId, Arc<Waveform>>,
}

impl MemorySampleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store covering the whole fretboard from a per-position renderer.
    ///
    /// Positions that share a pitch are rendered once; the lowest string wins.
    pub fn from_fretboard(mut render: impl FnMut(FretPosition) -> Waveform) -> Self {
        let mut store = Self::new();
        for string in 0..STRING_COUNT {
            for fret in 0..FRET_COUNT {
                let Ok(pos) = FretPosition::new(string, fret) else {
                    continue;
                };
                let pitch = pitch_id(pos);
                if !store.samples.contains_key(&pitch) {
                    store.insert(pitch, render(pos));
                }
            }
        }
        store
    }

    pub fn insert(&mut self, pitch: PitchId, wave: Waveform) {
        self.samples.insert(pitch, Arc::new(wave));
    }

    pub fn remove(&mut self, pitch: &PitchId) -> Option<Arc<Waveform>> {
        self.samples.remove(pitch)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl SampleStore for MemorySampleStore {
    fn fetch(&self, pitch: &PitchId) -> Result<Arc<Waveform>> {
        self.samples
            .get(pitch)
            .cloned()
            .ok_or_else(|| Error::SampleNotFound(pitch.clone()))
    }

    fn contains(&self, pitch: &PitchId) -> bool {
        self.samples.contains_key(pitch)
    }
}
