//! Win detection for N×N boards.

use super::super::{Board, Mark, Position, Square};
use tracing::instrument;

/// Which straight line of the board is meant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    /// A full row.
    Row(usize),
    /// A full column.
    Column(usize),
    /// Top-left to bottom-right.
    MainDiagonal,
    /// Top-right to bottom-left.
    AntiDiagonal,
}

impl Line {
    /// Cells of this line on a board of side `n`.
    pub fn cells(self, n: usize) -> impl Iterator<Item = Position> {
        (0..n).map(move |i| match self {
            Line::Row(row) => Position::new(row, i),
            Line::Column(col) => Position::new(i, col),
            Line::MainDiagonal => Position::new(i, i),
            Line::AntiDiagonal => Position::new(i, n - 1 - i),
        })
    }
}

/// Every row, column and both diagonals of a board of side `n`.
pub fn all_lines(n: usize) -> Vec<Line> {
    (0..n)
        .map(Line::Row)
        .chain((0..n).map(Line::Column))
        .chain([Line::MainDiagonal, Line::AntiDiagonal])
        .collect()
}

/// True if every cell of `line` holds `mark`.
pub fn line_held_by(board: &Board, line: Line, mark: Mark) -> bool {
    line.cells(board.size().get())
        .all(|pos| board.get(pos) == Some(Square::Occupied(mark)))
}

/// Checks whether the mark just placed at `pos` completed a line.
///
/// Only the lines through `pos` are examined: its row and column, plus a
/// diagonal when the cell lies on it.
#[instrument(skip(board), fields(size = %board.size()))]
pub fn completes_line(board: &Board, pos: Position, mark: Mark) -> bool {
    let size = board.size();
    let mut candidates = vec![Line::Row(pos.row()), Line::Column(pos.col())];
    if pos.on_main_diagonal() {
        candidates.push(Line::MainDiagonal);
    }
    if pos.on_anti_diagonal(size) {
        candidates.push(Line::AntiDiagonal);
    }

    candidates
        .into_iter()
        .any(|line| line_held_by(board, line, mark))
}

/// Scans every line and returns the mark holding one, if any.
#[instrument(skip(board), fields(size = %board.size()))]
pub fn check_winner(board: &Board) -> Option<Mark> {
    all_lines(board.size().get()).into_iter().find_map(|line| {
        let first = line.cells(board.size().get()).next()?;
        match board.get(first)? {
            Square::Occupied(mark) if line_held_by(board, line, mark) => Some(mark),
            _ => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BoardSize;

    fn board(n: usize, cells: &[(usize, usize, Mark)]) -> Board {
        let mut board = Board::new(BoardSize::new(n).unwrap());
        for &(row, col, mark) in cells {
            board.set(Position::new(row, col), Square::Occupied(mark)).unwrap();
        }
        board
    }

    #[test]
    fn test_no_winner_empty_board() {
        assert_eq!(check_winner(&board(3, &[])), None);
    }

    #[test]
    fn test_winner_top_row() {
        let b = board(3, &[(0, 0, Mark::X), (0, 1, Mark::X), (0, 2, Mark::X)]);
        assert_eq!(check_winner(&b), Some(Mark::X));
        assert!(completes_line(&b, Position::new(0, 2), Mark::X));
    }

    #[test]
    fn test_winner_column() {
        let b = board(4, &[(0, 2, Mark::O), (1, 2, Mark::O), (2, 2, Mark::O), (3, 2, Mark::O)]);
        assert_eq!(check_winner(&b), Some(Mark::O));
        assert!(completes_line(&b, Position::new(1, 2), Mark::O));
    }

    #[test]
    fn test_winner_anti_diagonal() {
        let b = board(3, &[(0, 2, Mark::O), (1, 1, Mark::O), (2, 0, Mark::O)]);
        assert_eq!(check_winner(&b), Some(Mark::O));
        assert!(completes_line(&b, Position::new(2, 0), Mark::O));
    }

    #[test]
    fn test_line_with_gap_is_not_a_win() {
        let b = board(4, &[(0, 0, Mark::X), (1, 1, Mark::X), (3, 3, Mark::X)]);
        assert_eq!(check_winner(&b), None);
        assert!(!completes_line(&b, Position::new(3, 3), Mark::X));
    }

    #[test]
    fn test_mixed_line_is_not_a_win() {
        let b = board(3, &[(1, 0, Mark::X), (1, 1, Mark::O), (1, 2, Mark::X)]);
        assert_eq!(check_winner(&b), None);
        assert!(!completes_line(&b, Position::new(1, 2), Mark::X));
    }

    #[test]
    fn test_off_diagonal_move_ignores_diagonal() {
        // Main diagonal is full of X but (0, 1) is not on it.
        let b = board(3, &[(0, 0, Mark::X), (1, 1, Mark::X), (2, 2, Mark::X), (0, 1, Mark::X)]);
        assert!(!completes_line(&b, Position::new(0, 1), Mark::X));
        assert_eq!(check_winner(&b), Some(Mark::X));
    }

    #[test]
    fn test_single_cell_board() {
        let b = board(1, &[(0, 0, Mark::X)]);
        assert!(completes_line(&b, Position::new(0, 0), Mark::X));
    }

    #[test]
    fn test_all_lines_count() {
        assert_eq!(all_lines(3).len(), 8);
        assert_eq!(all_lines(5).len(), 12);
    }
}
