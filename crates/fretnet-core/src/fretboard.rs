//! Fretboard map
//!
//! Static lookup from (string, fret) to the pitch sounding at that position on
//! a 22-fret guitar in standard E tuning. String 0 is the low E string.
//!
//! The pitch names double as sample-store keys, so their spelling is fixed:
//! sharps for C#, F# and flats for Eb, Ab, Bb.

use crate::chord::FretPosition;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of strings on the instrument.
pub const STRING_COUNT: usize = 6;

/// Highest playable fret.
pub const MAX_FRET: usize = 22;

/// Frets per string including the open string.
pub const FRET_COUNT: usize = MAX_FRET + 1;

/// Fretted (non-open) positions in one chord must be strictly closer than this.
pub const MAX_CHORD_DIST: usize = 4;

/// MIDI note of each open string, low E to high E.
const OPEN_STRING_MIDI: [u8; STRING_COUNT] = [40, 45, 50, 55, 59, 64];

#[rustfmt::skip]
static FRETBOARD: [[&str; FRET_COUNT]; STRING_COUNT] = [
    // Fret: 0     1      2      3      4      5      6      7      8      9      10     11     12     13     14     15     16     17     18     19     20     21     22
    ["E2", "F2",  "F#2", "G2",  "Ab2", "A2",  "Bb2", "B2",  "C3",  "C#3", "D3",  "Eb3", "E3",  "F3",  "F#3", "G3",  "Ab3", "A3",  "Bb3", "B3",  "C4",  "C#4", "D4"],
    ["A2", "Bb2", "B2",  "C3",  "C#3", "D3",  "Eb3", "E3",  "F3",  "F#3", "G3",  "Ab3", "A3",  "Bb3", "B3",  "C4",  "C#4", "D4",  "Eb4", "E4",  "F4",  "F#4", "G4"],
    ["D3", "Eb3", "E3",  "F3",  "F#3", "G3",  "Ab3", "A3",  "Bb3", "B3",  "C4",  "C#4", "D4",  "Eb4", "E4",  "F4",  "F#4", "G4",  "Ab4", "A4",  "Bb4", "B4",  "C5"],
    ["G3", "Ab3", "A3",  "Bb3", "B3",  "C4",  "C#4", "D4",  "Eb4", "E4",  "F4",  "F#4", "G4",  "Ab4", "A4",  "Bb4", "B4",  "C5",  "C#5", "D5",  "Eb5", "E5",  "F5"],
    ["B3", "C4",  "C#4", "D4",  "Eb4", "E4",  "F4",  "F#4", "G4",  "Ab4", "A4",  "Bb4", "B4",  "C5",  "C#5", "D5",  "Eb5", "E5",  "F5",  "F#5", "G5",  "Ab5", "A5"],
    ["E4", "F4",  "F#4", "G4",  "Ab4", "A4",  "Bb4", "B4",  "C5",  "C#5", "D5",  "Eb5", "E5",  "F5",  "F#5", "G5",  "Ab5", "A5",  "Bb5", "B5",  "C6",  "C#6", "D6"],
];

/// Pitch name plus octave, e.g. `"F#2"`. Key into a sample store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PitchId(String);

impl PitchId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PitchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PitchId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Pitch sounding at `position`.
pub fn pitch_id(position: FretPosition) -> PitchId {
    PitchId::new(FRETBOARD[position.string()][position.fret()])
}

/// MIDI note number sounding at `position`.
pub fn midi_note(position: FretPosition) -> u8 {
    OPEN_STRING_MIDI[position.string()] + position.fret() as u8
}

/// Equal-tempered frequency (A4 = 440 Hz) sounding at `position`.
pub fn pitch_frequency(position: FretPosition) -> f64 {
    440.0 * 2f64.powf((midi_note(position) as f64 - 69.0) / 12.0)
}

/// Every distinct pitch on the fretboard, sorted by MIDI note.
pub fn all_pitches() -> Vec<PitchId> {
    let mut positions: Vec<FretPosition> = (0..STRING_COUNT)
        .flat_map(|s| (0..FRET_COUNT).map(move |f| FretPosition::new_unchecked(s, f)))
        .collect();
    positions.sort_by_key(|p| midi_note(*p));
    positions.dedup_by_key(|p| midi_note(*p));
    positions.into_iter().map(pitch_id).collect()
}
