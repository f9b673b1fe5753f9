//! Pure tic-tac-toe logic for playing against a precomputed decision table.
//!
//! # Architecture
//!
//! - **Types**: [`Board`], [`Square`], [`Mark`] and [`Position`]
//! - **Rules**: [`evaluate`] scans the eight lines and reports an [`Outcome`]
//! - **Encoding**: [`encode`] turns a board into the [`StateKey`] the table was built with
//! - **Policy**: [`select_move`] picks the AI's cell from a [`DecisionTable`]
//!
//! # Example
//!
//! ```
//! use tabletoe_core::{Board, DecisionTable, Mark, Position, Square, select_move};
//!
//! let mut board = Board::new();
//! board.set(Position::Center, Square::Occupied(Mark::X));
//!
//! let table = DecisionTable::empty();
//! let mut rng = rand::rng();
//! let choice = select_move(&board, Some(&table), &mut rng);
//! assert!(choice.is_some_and(|pos| pos != Position::Center));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod encoding;
mod policy;
mod position;
pub mod rules;
mod table;
mod types;

pub use encoding::{KeyParseError, MarkMapping, StateKey, encode};
pub use policy::select_move;
pub use position::Position;
pub use rules::{Line, Outcome, evaluate};
pub use table::{DecisionTable, MoveValues, TableError};
pub use types::{Board, BoardParseError, Mark, Square};
