//! Core domain types for tic-tac-toe.

use super::Position;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A player's mark.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
pub enum Mark {
    /// Mark X (always moves first).
    X,
    /// Mark O.
    O,
}

impl Mark {
    /// Returns the opposing mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// A square on the tic-tac-toe board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Square {
    /// Empty square.
    Empty,
    /// Square occupied by a mark.
    Occupied(Mark),
}

impl Square {
    /// Returns the mark in this square, if any.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Square::Empty => None,
            Square::Occupied(mark) => Some(mark),
        }
    }
}

/// 3x3 tic-tac-toe board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    /// Squares in row-major order (0-8).
    squares: [Square; 9],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            squares: [Square::Empty; 9],
        }
    }

    /// Builds a board from nine squares in row-major order.
    pub fn from_squares(squares: [Square; 9]) -> Self {
        Self { squares }
    }

    /// Parses a board from nine characters: `X`, `O`, and `.`, `-` or `_` for empty.
    ///
    /// Whitespace and `|` separators are ignored, so `"XO.|...|..X"` is accepted.
    #[instrument]
    pub fn parse(text: &str) -> Result<Self, BoardParseError> {
        let cells: Vec<char> = text
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '|')
            .collect();

        if cells.len() != 9 {
            return Err(BoardParseError::WrongLength { found: cells.len() });
        }

        let mut squares = [Square::Empty; 9];
        for (index, cell) in cells.into_iter().enumerate() {
            squares[index] = match cell.to_ascii_uppercase() {
                'X' => Square::Occupied(Mark::X),
                'O' => Square::Occupied(Mark::O),
                '.' | '-' | '_' => Square::Empty,
                other => return Err(BoardParseError::InvalidCell { index, cell: other }),
            };
        }

        Ok(Self { squares })
    }

    /// Gets the square at the given position.
    pub fn get(&self, pos: Position) -> Square {
        self.squares[pos.to_index()]
    }

    /// Sets the square at the given position.
    pub fn set(&mut self, pos: Position, square: Square) {
        self.squares[pos.to_index()] = square;
    }

    /// Checks if a square is empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos) == Square::Empty
    }

    /// Returns all squares as a slice.
    pub fn squares(&self) -> &[Square; 9] {
        &self.squares
    }

    /// Returns each cell as an optional mark, for renderers.
    pub fn cells(&self) -> [Option<Mark>; 9] {
        self.squares.map(Square::mark)
    }

    /// Number of occupied squares.
    pub fn occupied(&self) -> usize {
        self.squares.iter().filter(|s| **s != Square::Empty).count()
    }

    /// Formats the board as a human-readable string.
    ///
    /// Empty squares show their 1-based key so a player can type it.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..3 {
            for col in 0..3 {
                let pos = row * 3 + col;
                let symbol = match self.squares[pos] {
                    Square::Empty => (pos + 1).to_string(),
                    Square::Occupied(mark) => mark.to_string(),
                };
                result.push_str(&symbol);
                if col < 2 {
                    result.push('|');
                }
            }
            if row < 2 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Error returned by [`Board::parse`].
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum BoardParseError {
    /// The text did not contain exactly nine cells.
    #[display("Expected 9 cells, found {}", found)]
    WrongLength {
        /// Number of cells found.
        found: usize,
    },

    /// A cell character was not a mark or an empty marker.
    #[display("Invalid cell '{}' at index {}", cell, index)]
    InvalidCell {
        /// Cell index (0-8).
        index: usize,
        /// Offending character.
        cell: char,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_through_cells() {
        let board = Board::parse("XO.|...|..X").unwrap();
        assert_eq!(
            board.cells(),
            [
                Some(Mark::X),
                Some(Mark::O),
                None,
                None,
                None,
                None,
                None,
                None,
                Some(Mark::X)
            ]
        );
        assert_eq!(board.occupied(), 3);
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        assert_eq!(Board::parse("XO"), Err(BoardParseError::WrongLength { found: 2 }));
    }

    #[test]
    fn test_parse_rejects_unknown_cell() {
        assert_eq!(
            Board::parse("XO.Z....."),
            Err(BoardParseError::InvalidCell { index: 3, cell: 'Z' })
        );
    }

    #[test]
    fn test_display_numbers_empty_squares() {
        let board = Board::parse("X...O....").unwrap();
        assert_eq!(board.display(), "X|2|3\n-+-+-\n4|O|6\n-+-+-\n7|8|9");
    }

    #[test]
    fn test_opponent() {
        assert_eq!(Mark::X.opponent(), Mark::O);
        assert_eq!(Mark::O.opponent(), Mark::X);
    }
}
