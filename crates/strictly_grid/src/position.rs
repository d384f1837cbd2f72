//! Board coordinates.

use super::action::MoveError;
use super::types::BoardSize;
use serde::{Deserialize, Serialize};

/// A cell on the board, addressed by zero-based row and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    row: usize,
    col: usize,
}

impl Position {
    /// Creates a position. Bounds are checked against a board when used.
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Converts signed wire coordinates into a position on a board of `size`.
    ///
    /// Negative values and values `>= size` are rejected.
    pub fn checked(row: i64, col: i64, size: BoardSize) -> Result<Self, MoveError> {
        let n = size.get();
        let out_of_bounds = || MoveError::OutOfBounds {
            row,
            col,
            size: n,
        };

        let r = usize::try_from(row).map_err(|_| out_of_bounds())?;
        let c = usize::try_from(col).map_err(|_| out_of_bounds())?;
        if r >= n || c >= n {
            return Err(out_of_bounds());
        }
        Ok(Self::new(r, c))
    }

    /// Row index.
    pub fn row(self) -> usize {
        self.row
    }

    /// Column index.
    pub fn col(self) -> usize {
        self.col
    }

    /// True if this cell lies on the main (top-left to bottom-right) diagonal.
    pub fn on_main_diagonal(self) -> bool {
        self.row == self.col
    }

    /// True if this cell lies on the anti-diagonal of a board of `size`.
    pub fn on_anti_diagonal(self, size: BoardSize) -> bool {
        self.row + self.col + 1 == size.get()
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
