//! Key handling for the terminal UI.

use crate::catalog::{Model, Role};
use crossterm::event::KeyCode;
use tabletoe_core::Position;

/// Moves the board cursor with the arrow keys; stops at the edges.
pub fn move_cursor(cursor: Position, key: KeyCode) -> Position {
    let (row, col) = (cursor.row(), cursor.col());
    let (row, col) = match key {
        KeyCode::Up => (row.saturating_sub(1), col),
        KeyCode::Down => ((row + 1).min(2), col),
        KeyCode::Left => (row, col.saturating_sub(1)),
        KeyCode::Right => (row, (col + 1).min(2)),
        _ => (row, col),
    };
    Position::from_index(row * 3 + col).unwrap_or(cursor)
}

/// What a key press asks the session to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Leave the UI.
    Quit,
    /// Select another model.
    ChangeModel(Model),
    /// Flip the role picked on the setup screen.
    ToggleRole,
    /// Start a game with the picked role.
    Start(Role),
    /// Play a cell.
    Click(Position),
    /// Move the cursor.
    Cursor(Position),
    /// Back to setup.
    Restart,
    /// Same role, fresh board.
    Rematch,
    /// Nothing to do.
    None,
}

/// Maps a key to a command given the screen and current selections.
pub fn interpret(key: KeyCode, in_setup: bool, model: Model, role: Role, cursor: Position) -> Command {
    match key {
        KeyCode::Char('q') | KeyCode::Esc => Command::Quit,
        KeyCode::Char('m') => Command::ChangeModel(model.cycle()),
        KeyCode::Tab | KeyCode::Char('f') if in_setup => Command::ToggleRole,
        KeyCode::Enter if in_setup => Command::Start(role),
        KeyCode::Enter | KeyCode::Char(' ') => Command::Click(cursor),
        KeyCode::Char(c) if !in_setup && c.is_ascii_digit() => {
            match Position::from_key_or_label(&c.to_string()) {
                Some(pos) => Command::Click(pos),
                None => Command::None,
            }
        }
        KeyCode::Char('r') if !in_setup => Command::Restart,
        KeyCode::Char('n') if !in_setup => Command::Rematch,
        KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right if !in_setup => {
            Command::Cursor(move_cursor(cursor, key))
        }
        _ => Command::None,
    }
}
