//! Table-driven move selection.

use super::{Board, DecisionTable, Position};
use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::{debug, instrument, warn};

/// Chooses the AI's cell.
///
/// Returns `None` only when the board has no empty square. Without a table, or
/// with an empty one, the choice is uniform over empty squares. Otherwise the
/// board is looked up under the table's own mark convention (unknown states read
/// as nine zeros) and the choice is uniform over the empty squares sharing the
/// highest value. NaN values never rank; if nothing ranks, the choice is random.
#[instrument(skip_all, fields(occupied = board.occupied()))]
pub fn select_move<R: Rng + ?Sized>(
    board: &Board,
    table: Option<&DecisionTable>,
    rng: &mut R,
) -> Option<Position> {
    let available = Position::valid_moves(board);
    if available.is_empty() {
        debug!("No empty squares");
        return None;
    }

    let Some(table) = table.filter(|t| !t.is_empty()) else {
        let choice = available.choose(rng).copied();
        debug!(?choice, "No table loaded, picking at random");
        return choice;
    };

    let values = table.values_for(board);
    let best = available
        .iter()
        .map(|pos| values[pos.to_index()])
        .fold(f64::NEG_INFINITY, f64::max);
    let mut candidates: Vec<Position> = available
        .iter()
        .copied()
        .filter(|pos| values[pos.to_index()] == best)
        .collect();
    if candidates.is_empty() {
        // Every available value is NaN.
        warn!("No comparable values for this state, picking at random");
        candidates = available;
    }

    let choice = candidates.choose(rng).copied();
    debug!(best, ties = candidates.len(), ?choice, "Greedy table move");
    choice
}
