//! State-key encoding shared with the offline table builder.
//!
//! A key is the board as nine integer codes in board order, rendered as
//! `(c0, c1, ..., c8)` with `", "` separators: `(0, 1, -1, 0, 0, 0, 0, 0, 0)`.
//! Tables are indexed by this exact text, so the rendering must not change.

use super::{Board, Mark, Square};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Binding of the two marks to the numeric codes a table was built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarkMapping {
    x: i8,
    o: i8,
}

impl MarkMapping {
    /// Builds a mapping. Codes must differ from each other and from the empty code 0.
    pub fn new(x: i8, o: i8) -> Option<Self> {
        (x != o && x != 0 && o != 0).then_some(Self { x, o })
    }

    /// The convention of the shipped tables: `O` → +1, `X` → −1.
    pub const fn canonical() -> Self {
        Self { x: -1, o: 1 }
    }

    /// Code for a mark.
    pub fn value(&self, mark: Mark) -> i8 {
        match mark {
            Mark::X => self.x,
            Mark::O => self.o,
        }
    }

    /// Code for a square; empty squares are always 0.
    pub fn code(&self, square: Square) -> i8 {
        match square {
            Square::Empty => 0,
            Square::Occupied(mark) => self.value(mark),
        }
    }
}

impl Default for MarkMapping {
    fn default() -> Self {
        Self::canonical()
    }
}

/// Canonical text key of a board, as found in a decision table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateKey(String);

impl StateKey {
    /// Renders nine codes in key format.
    pub fn from_codes(codes: [i8; 9]) -> Self {
        let joined = codes
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        Self(format!("({})", joined))
    }

    /// Parses key text back into its nine codes.
    ///
    /// Accepts any spacing around the commas; codes must be -1, 0 or 1.
    #[instrument]
    pub fn parse_codes(text: &str) -> Result<[i8; 9], KeyParseError> {
        let inner = text
            .trim()
            .strip_prefix('(')
            .and_then(|s| s.strip_suffix(')'))
            .ok_or_else(|| KeyParseError::new(text, "missing parentheses"))?;

        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        if parts.len() != 9 {
            return Err(KeyParseError::new(
                text,
                format!("expected 9 codes, found {}", parts.len()),
            ));
        }

        let mut codes = [0i8; 9];
        for (slot, part) in codes.iter_mut().zip(parts) {
            let code: i8 = part
                .parse()
                .map_err(|_| KeyParseError::new(text, format!("'{}' is not an integer", part)))?;
            if !(-1..=1).contains(&code) {
                return Err(KeyParseError::new(text, format!("code {} out of range", code)));
            }
            *slot = code;
        }

        Ok(codes)
    }

    /// The key text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the key, returning its text.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for StateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StateKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Encodes a board under `mapping`.
#[instrument(skip(board), fields(occupied = board.occupied()))]
pub fn encode(board: &Board, mapping: MarkMapping) -> StateKey {
    let squares = *board.squares();
    StateKey::from_codes(squares.map(|sq| mapping.code(sq)))
}

/// Error parsing a state key.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("Malformed state key {:?}: {}", key, reason)]
pub struct KeyParseError {
    /// The offending key text.
    pub key: String,
    /// What was wrong with it.
    pub reason: String,
}

impl KeyParseError {
    fn new(key: &str, reason: impl Into<String>) -> Self {
        Self {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Position;

    #[test]
    fn test_empty_board_key() {
        let key = encode(&Board::new(), MarkMapping::canonical());
        assert_eq!(key.as_str(), "(0, 0, 0, 0, 0, 0, 0, 0, 0)");
    }

    #[test]
    fn test_canonical_mapping_key() {
        let mut board = Board::new();
        board.set(Position::TopCenter, Square::Occupied(Mark::O));
        board.set(Position::TopRight, Square::Occupied(Mark::X));
        let key = encode(&board, MarkMapping::canonical());
        assert_eq!(key.as_str(), "(0, 1, -1, 0, 0, 0, 0, 0, 0)");
    }

    #[test]
    fn test_swapped_mapping_flips_signs() {
        let board = Board::parse("XO.......").unwrap();
        let swapped = MarkMapping::new(1, -1).unwrap();
        assert_eq!(encode(&board, swapped).as_str(), "(1, -1, 0, 0, 0, 0, 0, 0, 0)");
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let board = Board::parse("XO..X..O.").unwrap();
        assert_eq!(
            encode(&board, MarkMapping::canonical()),
            encode(&board, MarkMapping::canonical())
        );
    }

    #[test]
    fn test_mapping_rejects_collisions() {
        assert!(MarkMapping::new(1, 1).is_none());
        assert!(MarkMapping::new(0, 1).is_none());
        assert!(MarkMapping::new(-1, 1).is_some());
    }

    #[test]
    fn test_parse_codes_round_trip() {
        let codes = [0, 1, -1, 0, 0, 1, 0, -1, 0];
        let key = StateKey::from_codes(codes);
        assert_eq!(StateKey::parse_codes(key.as_str()), Ok(codes));
    }

    #[test]
    fn test_parse_codes_tolerates_spacing() {
        assert_eq!(
            StateKey::parse_codes("(0,0,0,0,1,0,0,0,0)"),
            Ok([0, 0, 0, 0, 1, 0, 0, 0, 0])
        );
    }

    #[test]
    fn test_parse_codes_rejects_malformed() {
        assert!(StateKey::parse_codes("0, 0, 0, 0, 0, 0, 0, 0, 0").is_err());
        assert!(StateKey::parse_codes("(0, 0, 0)").is_err());
        assert!(StateKey::parse_codes("(0, 0, 0, 0, 2, 0, 0, 0, 0)").is_err());
        assert!(StateKey::parse_codes("(0, 0, 0, 0, a, 0, 0, 0, 0)").is_err());
    }
}
