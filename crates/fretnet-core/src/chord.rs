//! Chord specifications and the constrained random chord sampler.
//!
//! A chord is a set of simultaneously fretted positions, at most one per
//! string. Fretted positions must fit under one hand: any two nonzero frets
//! are strictly closer than [`MAX_CHORD_DIST`]. Open strings never constrain
//! the hand position.
//!
//! ## Sampling
//!
//! [`SpecificationSampler`] draws a string subset, then assigns frets one
//! string at a time from a shrinking candidate pool. After each nonzero pick
//! the pool keeps only frets within reach of it. Fret 0 is never removed, so
//! the pool cannot run dry.

use crate::error::{Error, Result};
use crate::fretboard::{FRET_COUNT, MAX_CHORD_DIST, MAX_FRET, STRING_COUNT};
use rand::seq::{index, SliceRandom};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A (string, fret) pair on the fretboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "(usize, usize)", into = "(usize, usize)")]
pub struct FretPosition {
    string: usize,
    fret: usize,
}

impl FretPosition {
    pub fn new(string: usize, fret: usize) -> Result<Self> {
        if string >= STRING_COUNT || fret > MAX_FRET {
            return Err(Error::InvalidPosition { string, fret });
        }
        Ok(Self { string, fret })
    }

    pub(crate) fn new_unchecked(string: usize, fret: usize) -> Self {
        debug_assert!(string < STRING_COUNT && fret <= MAX_FRET);
        Self { string, fret }
    }

    /// Zero-based string index, starting from low E.
    pub fn string(&self) -> usize {
        self.string
    }

    pub fn fret(&self) -> usize {
        self.fret
    }

    pub fn is_open(&self) -> bool {
        self.fret == 0
    }
}

impl TryFrom<(usize, usize)> for FretPosition {
    type Error = Error;

    fn try_from((string, fret): (usize, usize)) -> Result<Self> {
        Self::new(string, fret)
    }
}

impl From<FretPosition> for (usize, usize) {
    fn from(pos: FretPosition) -> Self {
        (pos.string, pos.fret)
    }
}

/// Whether two frets can be held together.
fn within_reach(a: usize, b: usize) -> bool {
    a == 0 || b == 0 || a.abs_diff(b) < MAX_CHORD_DIST
}

/// Validated set of simultaneously fretted positions.
///
/// Order is the order the positions were drawn in, not string order. Index
/// label data by [`FretPosition::string`], never by list position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<FretPosition>", into = "Vec<FretPosition>")]
pub struct ChordSpecification {
    positions: Vec<FretPosition>,
}

impl ChordSpecification {
    /// Build a chord, checking the one-fret-per-string and reach constraints.
    pub fn new(positions: Vec<FretPosition>) -> Result<Self> {
        if positions.is_empty() {
            return Err(Error::EmptyChord);
        }

        for (i, a) in positions.iter().enumerate() {
            for b in &positions[i + 1..] {
                if a.string == b.string {
                    return Err(Error::DuplicateString(a.string));
                }
                if !within_reach(a.fret, b.fret) {
                    return Err(Error::ChordTooWide {
                        a: a.fret,
                        b: b.fret,
                        span: a.fret.abs_diff(b.fret),
                        max: MAX_CHORD_DIST,
                    });
                }
            }
        }

        Ok(Self { positions })
    }

    /// Build from raw `(string, fret)` pairs.
    pub fn from_pairs(pairs: &[(usize, usize)]) -> Result<Self> {
        let positions = pairs
            .iter()
            .map(|&(s, f)| FretPosition::new(s, f))
            .collect::<Result<Vec<_>>>()?;
        Self::new(positions)
    }

    pub fn positions(&self) -> &[FretPosition] {
        &self.positions
    }

    pub fn iter(&self) -> impl Iterator<Item = &FretPosition> {
        self.positions.iter()
    }

    /// Number of notes in the chord.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Never true for a validated chord.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Fret played on `string`, if the string is part of the chord.
    pub fn fret_on(&self, string: usize) -> Option<usize> {
        self.positions
            .iter()
            .find(|p| p.string == string)
            .map(|p| p.fret)
    }

    pub fn contains(&self, position: FretPosition) -> bool {
        self.positions.contains(&position)
    }
}

impl TryFrom<Vec<FretPosition>> for ChordSpecification {
    type Error = Error;

    fn try_from(positions: Vec<FretPosition>) -> Result<Self> {
        Self::new(positions)
    }
}

impl From<ChordSpecification> for Vec<FretPosition> {
    fn from(chord: ChordSpecification) -> Self {
        chord.positions
    }
}

impl<'a> IntoIterator for &'a ChordSpecification {
    type Item = &'a FretPosition;
    type IntoIter = std::slice::Iter<'a, FretPosition>;

    fn into_iter(self) -> Self::IntoIter {
        self.positions.iter()
    }
}

/// Default number of full redraws before giving up on an empty fret pool.
const DEFAULT_MAX_ATTEMPTS: usize = 8;

/// Random chord generator.
///
/// The random source is always passed in, so callers control seeding and
/// parallel workers can each own an independent stream.
#[derive(Debug, Clone)]
pub struct SpecificationSampler {
    max_attempts: usize,
}

impl Default for SpecificationSampler {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl SpecificationSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how many times a draw is restarted if the fret pool empties (min 1).
    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Draw a random chord using between 1 and `STRING_COUNT - 1` strings.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<ChordSpecification> {
        for attempt in 1..=self.max_attempts {
            if let Some(positions) = Self::draw(rng) {
                tracing::trace!(attempt, notes = positions.len(), "drew chord");
                return Ok(ChordSpecification { positions });
            }
            tracing::debug!(attempt, "fret pool exhausted, redrawing chord");
        }

        Err(Error::ConstraintExhaustion {
            attempts: self.max_attempts,
        })
    }

    /// One pass of the narrowing algorithm. `None` if the pool ever empties.
    fn draw<R: Rng + ?Sized>(rng: &mut R) -> Option<Vec<FretPosition>> {
        let k = rng.gen_range(1..STRING_COUNT);
        let strings = index::sample(rng, STRING_COUNT, k);

        let mut pool: Vec<usize> = (0..FRET_COUNT).collect();
        let mut positions = Vec::with_capacity(k);

        for string in strings.iter() {
            let fret = *pool.choose(rng)?;
            positions.push(FretPosition::new_unchecked(string, fret));

            // Open strings leave the pool untouched.
            if fret != 0 {
                pool.retain(|&f| within_reach(f, fret));
            }
        }

        Some(positions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn assert_valid(chord: &ChordSpecification) {
        let positions = chord.positions();
        assert!(!positions.is_empty());
        assert!(positions.len() < STRING_COUNT);

        for (i, a) in positions.iter().enumerate() {
            for b in &positions[i + 1..] {
                assert_ne!(a.string(), b.string(), "repeated string in {:?}", chord);
                if a.fret() != 0 && b.fret() != 0 {
                    assert!(
                        a.fret().abs_diff(b.fret()) < MAX_CHORD_DIST,
                        "frets too far apart in {:?}",
                        chord
                    );
                }
            }
        }
    }

    #[test]
    fn test_position_bounds() {
        assert!(FretPosition::new(0, 0).is_ok());
        assert!(FretPosition::new(5, 22).is_ok());
        assert_eq!(
            FretPosition::new(6, 0),
            Err(Error::InvalidPosition { string: 6, fret: 0 })
        );
        assert_eq!(
            FretPosition::new(0, 23),
            Err(Error::InvalidPosition { string: 0, fret: 23 })
        );
    }

    #[test]
    fn test_new_rejects_duplicate_string() {
        let err = ChordSpecification::from_pairs(&[(2, 3), (2, 4)]).unwrap_err();
        assert_eq!(err, Error::DuplicateString(2));
    }

    #[test]
    fn test_new_rejects_wide_chord() {
        let err = ChordSpecification::from_pairs(&[(0, 3), (1, 7)]).unwrap_err();
        assert!(matches!(err, Error::ChordTooWide { span: 4, .. }));

        // Distance 3 is fine
        assert!(ChordSpecification::from_pairs(&[(0, 3), (1, 6)]).is_ok());
    }

    #[test]
    fn test_open_strings_exempt_from_reach() {
        let chord = ChordSpecification::from_pairs(&[(0, 0), (1, 22), (2, 0), (3, 20)]).unwrap();
        assert_eq!(chord.len(), 4);
        assert_eq!(chord.fret_on(1), Some(22));
        assert_eq!(chord.fret_on(4), None);
    }

    #[test]
    fn test_new_rejects_empty() {
        assert_eq!(ChordSpecification::new(Vec::new()), Err(Error::EmptyChord));
    }

    #[test]
    fn test_sampler_is_deterministic_for_seed() {
        let sampler = SpecificationSampler::default();
        let a = sampler.sample(&mut StdRng::seed_from_u64(42)).unwrap();
        let b = sampler.sample(&mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_sampler_covers_chord_sizes() {
        let sampler = SpecificationSampler::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut seen = [false; STRING_COUNT];

        for _ in 0..2000 {
            let chord = sampler.sample(&mut rng).unwrap();
            assert_valid(&chord);
            seen[chord.len()] = true;
        }

        assert!(!seen[0], "empty chord drawn");
        assert!(seen[1..].iter().all(|&s| s), "sizes seen: {:?}", seen);
    }

    #[test]
    fn test_sampler_reaches_high_frets_and_open_strings() {
        let sampler = SpecificationSampler::default();
        let mut rng = StdRng::seed_from_u64(9);
        let mut frets = [false; FRET_COUNT];

        for _ in 0..2000 {
            for pos in sampler.sample(&mut rng).unwrap().iter() {
                frets[pos.fret()] = true;
            }
        }

        assert!(frets.iter().all(|&f| f), "unreached frets: {:?}", frets);
    }

    #[test]
    fn test_pair_conversions_validate() {
        let chord = ChordSpecification::from_pairs(&[(0, 5), (3, 7)]).unwrap();
        let pairs: Vec<(usize, usize)> = Vec::<FretPosition>::from(chord)
            .into_iter()
            .map(Into::into)
            .collect();
        assert_eq!(pairs, vec![(0, 5), (3, 7)]);

        assert!(FretPosition::try_from((6, 1)).is_err());
        let duplicate = vec![FretPosition::new(0, 1).unwrap(); 2];
        assert!(ChordSpecification::try_from(duplicate).is_err());
    }

    proptest! {
        #[test]
        fn prop_sampled_chords_are_playable(seed in any::<u64>()) {
            let chord = SpecificationSampler::default()
                .sample(&mut StdRng::seed_from_u64(seed))
                .unwrap();
            assert_valid(&chord);
            prop_assert!(ChordSpecification::new(chord.positions().to_vec()).is_ok());
        }
    }
}
