//! Draw detection.

use super::super::Board;
use tracing::instrument;

/// Checks if the board is full (all squares occupied).
#[instrument(skip(board))]
pub fn is_full(board: &Board) -> bool {
    board.is_full()
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::completes_line;
    use crate::{BoardSize, Mark, Position, Square};

    fn fill(board: &mut Board, rows: &[&str]) {
        for (r, row) in rows.iter().enumerate() {
            for (c, ch) in row.chars().enumerate() {
                let square = match ch {
                    'X' => Square::Occupied(Mark::X),
                    'O' => Square::Occupied(Mark::O),
                    _ => Square::Empty,
                };
                board.set(Position::new(r, c), square).unwrap();
            }
        }
    }

    #[test]
    fn test_empty_board_not_full() {
        let board = Board::new(BoardSize::DEFAULT);
        assert!(!is_full(&board));
    }

    #[test]
    fn test_partial_board_not_full() {
        let mut board = Board::new(BoardSize::DEFAULT);
        fill(&mut board, &["X..", ".O.", "..."]);
        assert!(!is_full(&board));
    }

    #[test]
    fn test_full_board_without_line() {
        let mut board = Board::new(BoardSize::DEFAULT);
        fill(&mut board, &["XOX", "OXX", "OXO"]);
        assert!(is_full(&board));
        assert!(!completes_line(&board, Position::new(2, 2), Mark::O));
    }

    #[test]
    fn test_full_board_with_winning_last_move() {
        let mut board = Board::new(BoardSize::DEFAULT);
        fill(&mut board, &["XOX", "OXO", "OXX"]);
        assert!(is_full(&board));
        assert!(completes_line(&board, Position::new(2, 2), Mark::X));
    }
}
