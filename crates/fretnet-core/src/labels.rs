//! Per-string fret labels.
//!
//! One boolean row per string, `FRET_COUNT` wide. Row `s` has bit `f` set
//! iff string `s` is played at fret `f`. Serialized as one line of `'0'`/`'1'`
//! characters per string, low E first.

use crate::chord::{ChordSpecification, FretPosition};
use crate::error::{Error, Result};
use crate::fretboard::{FRET_COUNT, STRING_COUNT};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FretLabels {
    rows: [[bool; FRET_COUNT]; STRING_COUNT],
}

impl Default for FretLabels {
    fn default() -> Self {
        Self {
            rows: [[false; FRET_COUNT]; STRING_COUNT],
        }
    }
}

impl FretLabels {
    /// All-false labels.
    pub fn new() -> Self {
        Self::default()
    }

    /// Labels for exactly the positions in `chord`.
    pub fn from_specification(chord: &ChordSpecification) -> Self {
        let mut labels = Self::default();
        for pos in chord {
            labels.set(*pos);
        }
        labels
    }

    pub fn set(&mut self, position: FretPosition) {
        self.rows[position.string()][position.fret()] = true;
    }

    pub fn is_set(&self, position: FretPosition) -> bool {
        self.rows[position.string()][position.fret()]
    }

    /// Label row for one string. Panics if `string >= STRING_COUNT`.
    pub fn string(&self, string: usize) -> &[bool; FRET_COUNT] {
        &self.rows[string]
    }

    pub fn rows(&self) -> &[[bool; FRET_COUNT]; STRING_COUNT] {
        &self.rows
    }

    /// Number of set bits across all strings.
    pub fn count(&self) -> usize {
        self.rows.iter().flatten().filter(|&&b| b).count()
    }

    /// Set positions in string order.
    pub fn positions(&self) -> Vec<FretPosition> {
        let mut out = Vec::new();
        for (s, row) in self.rows.iter().enumerate() {
            for (f, &on) in row.iter().enumerate() {
                if on {
                    out.push(FretPosition::new_unchecked(s, f));
                }
            }
        }
        out
    }

    /// `'0'`/`'1'` line for one string.
    pub fn row_line(&self, string: usize) -> String {
        encode_row(&self.rows[string])
    }

    /// One line per string, in string order.
    pub fn to_lines(&self) -> [String; STRING_COUNT] {
        std::array::from_fn(|s| self.row_line(s))
    }

    /// Parse `STRING_COUNT` lines produced by [`FretLabels::to_lines`].
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Result<Self> {
        if lines.len() != STRING_COUNT {
            return Err(Error::MalformedLabels(format!(
                "expected {} label lines, got {}",
                STRING_COUNT,
                lines.len()
            )));
        }

        let mut labels = Self::default();
        for (s, line) in lines.iter().enumerate() {
            labels.rows[s] = parse_row(line.as_ref()).ok_or_else(|| {
                Error::MalformedLabels(format!("malformed label line {}: {:?}", s, line.as_ref()))
            })?;
        }
        Ok(labels)
    }
}

/// Encode a label row as `'0'`/`'1'` characters.
pub fn encode_row(row: &[bool; FRET_COUNT]) -> String {
    row.iter().map(|&b| if b { '1' } else { '0' }).collect()
}

/// Parse a `'0'`/`'1'` label row. `None` on wrong length or other characters.
pub fn parse_row(line: &str) -> Option<[bool; FRET_COUNT]> {
    let line = line.trim();
    if line.len() != FRET_COUNT {
        return None;
    }

    let mut row = [false; FRET_COUNT];
    for (slot, c) in row.iter_mut().zip(line.chars()) {
        *slot = match c {
            '0' => false,
            '1' => true,
            _ => return None,
        };
    }
    Some(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_open_low_string() {
        let chord = ChordSpecification::from_pairs(&[(0, 0)]).unwrap();
        let labels = FretLabels::from_specification(&chord);

        assert!(labels.is_set(FretPosition::new(0, 0).unwrap()));
        assert_eq!(labels.count(), 1);
        assert_eq!(STRING_COUNT * FRET_COUNT - labels.count(), 137);
    }

    #[test]
    fn test_labels_index_by_string_not_order() {
        // Drawn order differs from string order
        let chord = ChordSpecification::from_pairs(&[(4, 7), (1, 5), (3, 0)]).unwrap();
        let labels = FretLabels::from_specification(&chord);

        assert_eq!(labels.count(), 3);
        for s in 0..STRING_COUNT {
            for f in 0..FRET_COUNT {
                let pos = FretPosition::new(s, f).unwrap();
                assert_eq!(labels.is_set(pos), chord.contains(pos), "({s}, {f})");
            }
        }
        assert_eq!(
            labels.positions(),
            vec![
                FretPosition::new(1, 5).unwrap(),
                FretPosition::new(3, 0).unwrap(),
                FretPosition::new(4, 7).unwrap(),
            ]
        );
    }

    #[test]
    fn test_absent_strings_are_all_false() {
        let chord = ChordSpecification::from_pairs(&[(2, 10)]).unwrap();
        let labels = FretLabels::from_specification(&chord);
        for s in [0, 1, 3, 4, 5] {
            assert!(labels.string(s).iter().all(|&b| !b));
        }
    }

    #[test]
    fn test_lines() {
        let chord = ChordSpecification::from_pairs(&[(0, 0), (5, 22)]).unwrap();
        let labels = FretLabels::from_specification(&chord);
        let lines = labels.to_lines();

        assert_eq!(lines[0], "10000000000000000000000");
        assert_eq!(lines[5], "00000000000000000000001");
        assert_eq!(lines[2], "0".repeat(FRET_COUNT));

        assert_eq!(FretLabels::from_lines(&lines).unwrap(), labels);
    }

    #[test]
    fn test_parse_row_rejects_garbage() {
        assert!(parse_row("1").is_none());
        assert!(parse_row(&"2".repeat(FRET_COUNT)).is_none());
        assert!(parse_row(&format!("{}\n", "0".repeat(FRET_COUNT))).is_some());
    }
}
