//! Tests for win/draw evaluation.

use tabletoe::{Board, Line, Mark, Outcome, Position, Square, evaluate};
use tabletoe_core::rules::LINES;

/// Every board over {empty, X, O}, in base-3 order.
fn all_boards() -> impl Iterator<Item = Board> {
    (0..3u32.pow(9)).map(|mut n| {
        let mut squares = [Square::Empty; 9];
        for square in squares.iter_mut() {
            *square = match n % 3 {
                0 => Square::Empty,
                1 => Square::Occupied(Mark::X),
                _ => Square::Occupied(Mark::O),
            };
            n /= 3;
        }
        Board::from_squares(squares)
    })
}

fn line_complete(board: &Board, cells: [Position; 3]) -> Option<Mark> {
    let [a, b, c] = cells;
    match board.get(a) {
        Square::Occupied(mark) if board.get(b) == board.get(a) && board.get(c) == board.get(a) => Some(mark),
        _ => None,
    }
}

#[test]
fn test_each_line_reports_its_ordinal() {
    for mark in [Mark::X, Mark::O] {
        for (ordinal, cells) in LINES.iter().enumerate() {
            let mut board = Board::new();
            for pos in cells {
                board.set(*pos, Square::Occupied(mark));
            }
            let outcome = evaluate(&board);
            assert_eq!(outcome.winner(), Some(mark));
            assert_eq!(outcome.winning_line(), Line::from_ordinal(ordinal));
        }
    }
}

#[test]
fn test_every_board_matches_reference() {
    for board in all_boards() {
        let first_line = LINES
            .iter()
            .enumerate()
            .find_map(|(ordinal, cells)| line_complete(&board, *cells).map(|mark| (ordinal, mark)));
        let full = board.occupied() == 9;

        match evaluate(&board) {
            Outcome::Won { mark, line } => {
                assert_eq!(first_line, Some((line.ordinal(), mark)), "{}", board.display());
            }
            Outcome::Draw => {
                assert!(full && first_line.is_none(), "{}", board.display());
            }
            Outcome::Ongoing => {
                assert!(!full && first_line.is_none(), "{}", board.display());
            }
        }
    }
}

#[test]
fn test_evaluation_is_deterministic() {
    let board = Board::parse("XOX.O.X..").unwrap();
    assert_eq!(evaluate(&board), evaluate(&board.clone()));
}

#[test]
fn test_line_free_full_board_is_draw() {
    // X O X / X O O / O X X
    let board = Board::parse("XOXXOOOXX").unwrap();
    assert_eq!(evaluate(&board), Outcome::Draw);
}

#[test]
fn test_alternating_full_board_wins_on_main_diagonal() {
    // A B A / B A B / A B A holds A on 0-4-8 (and 2-4-6); the diagonal scans first.
    let board = Board::parse("OXOXOXOXO").unwrap();
    let outcome = evaluate(&board);
    assert_eq!(outcome.winner(), Some(Mark::O));
    assert_eq!(outcome.winning_line().map(|l| l.ordinal()), Some(6));
}

#[test]
fn test_open_board_without_line_is_ongoing() {
    let board = Board::parse("XO.......").unwrap();
    assert_eq!(evaluate(&board), Outcome::Ongoing);
    assert!(!evaluate(&board).is_terminal());
}
