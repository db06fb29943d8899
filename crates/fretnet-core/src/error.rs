//! Error types for fretnet-core.

use thiserror::Error;

/// Error type for fretnet-core operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid fret position: string {string}, fret {fret}")]
    InvalidPosition { string: usize, fret: usize },

    #[error("String {0} is fretted more than once")]
    DuplicateString(usize),

    #[error("Chord too wide: frets {a} and {b} are {span} apart (max {max})")]
    ChordTooWide {
        a: usize,
        b: usize,
        span: usize,
        max: usize,
    },

    #[error("Chord specification is empty")]
    EmptyChord,

    #[error("Fret pool exhausted after {attempts} draws")]
    ConstraintExhaustion { attempts: usize },

    #[error("Malformed labels: {0}")]
    MalformedLabels(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

/// Result type alias.
pub type Result<T> = core::result::Result<T, Error>;
