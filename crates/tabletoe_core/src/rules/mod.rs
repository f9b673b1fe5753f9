//! Game rules for tic-tac-toe.
//!
//! Pure functions over a [`Board`]. Rules are kept apart from board
//! storage so the orchestrator and the move selector can share them.

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::{LINES, Line, check_winner};

use super::{Board, Mark};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Result of evaluating a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// No line completed and at least one empty square.
    Ongoing,
    /// A mark completed a line.
    Won {
        /// The winning mark.
        mark: Mark,
        /// The completed line.
        line: Line,
    },
    /// Board full with no completed line.
    Draw,
}

impl Outcome {
    /// Returns true once the game can no longer continue.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::Ongoing)
    }

    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<Mark> {
        match self {
            Outcome::Won { mark, .. } => Some(*mark),
            Outcome::Ongoing | Outcome::Draw => None,
        }
    }

    /// Returns the winning line if there is one.
    pub fn winning_line(&self) -> Option<Line> {
        match self {
            Outcome::Won { line, .. } => Some(*line),
            Outcome::Ongoing | Outcome::Draw => None,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Ongoing => write!(f, "In progress"),
            Outcome::Won { mark, .. } => write!(f, "Winner: {}", mark),
            Outcome::Draw => write!(f, "Draw!"),
        }
    }
}

/// Evaluates a board: first completed line in scan order, else draw if full, else ongoing.
#[instrument(skip(board))]
pub fn evaluate(board: &Board) -> Outcome {
    if let Some((mark, line)) = check_winner(board) {
        return Outcome::Won { mark, line };
    }

    if is_full(board) {
        return Outcome::Draw;
    }

    Outcome::Ongoing
}
