//! Win detection logic for tic-tac-toe.

use super::super::{Board, Mark, Position, Square};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// The eight winning lines in scan order: rows, then columns, then diagonals.
pub const LINES: [[Position; 3]; 8] = [
    // Rows
    [Position::TopLeft, Position::TopCenter, Position::TopRight],
    [Position::MiddleLeft, Position::Center, Position::MiddleRight],
    [Position::BottomLeft, Position::BottomCenter, Position::BottomRight],
    // Columns
    [Position::TopLeft, Position::MiddleLeft, Position::BottomLeft],
    [Position::TopCenter, Position::Center, Position::BottomCenter],
    [Position::TopRight, Position::MiddleRight, Position::BottomRight],
    // Diagonals
    [Position::TopLeft, Position::Center, Position::BottomRight],
    [Position::TopRight, Position::Center, Position::BottomLeft],
];

/// One of the eight fixed lines, identified by its ordinal in [`LINES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Line {
    ordinal: usize,
    cells: [Position; 3],
}

impl Line {
    /// Returns the line with the given ordinal (0-7).
    pub fn from_ordinal(ordinal: usize) -> Option<Self> {
        LINES.get(ordinal).map(|&cells| Self { ordinal, cells })
    }

    /// Ordinal of this line in scan order (0-7).
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// The three cells of this line.
    pub fn cells(&self) -> [Position; 3] {
        self.cells
    }

    /// Whether the line passes through `pos`.
    pub fn contains(&self, pos: Position) -> bool {
        self.cells.contains(&pos)
    }
}

/// Checks if there is a winner on the board.
///
/// Returns the mark and the first completed line in scan order,
/// `None` otherwise.
#[instrument(skip(board))]
pub fn check_winner(board: &Board) -> Option<(Mark, Line)> {
    LINES.iter().enumerate().find_map(|(ordinal, &[a, b, c])| {
        let sq = board.get(a);
        match sq {
            Square::Occupied(mark) if sq == board.get(b) && sq == board.get(c) => Some((
                mark,
                Line {
                    ordinal,
                    cells: [a, b, c],
                },
            )),
            _ => None,
        }
    })
}
