//! Move types and move errors.
//!
//! A move is a domain event: which mark went where. Rejections are ordinary
//! values, never panics; the protocol layer turns them into `INVALID_MOVE`.

use super::phases::Outcome;
use super::position::Position;
use super::types::Mark;
use derive_new::new;
use serde::{Deserialize, Serialize};

/// A mark placed at a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, new)]
pub struct Move {
    /// The mark that was placed.
    pub mark: Mark,
    /// Row of the cell.
    pub row: usize,
    /// Column of the cell.
    pub col: usize,
}

impl Move {
    /// Cell this move occupied.
    pub fn position(&self) -> Position {
        Position::new(self.row, self.col)
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.mark, self.position())
    }
}

/// Result of an accepted move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct MoveReport {
    /// The placement that was applied.
    pub placed: Move,
    /// Set when this move ended the game.
    pub outcome: Option<Outcome>,
}

impl MoveReport {
    /// True if the move won or drew the game.
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }
}

/// Reasons a move is rejected. The game state is never changed by a rejected move.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum MoveError {
    /// Coordinate is negative or not smaller than the board size.
    #[display("Position ({}, {}) is outside the {}x{} board", row, col, size, size)]
    OutOfBounds {
        /// Requested row.
        row: i64,
        /// Requested column.
        col: i64,
        /// Board side length.
        size: usize,
    },

    /// The square already holds a mark.
    #[display("Square {} is already occupied", _0)]
    SquareOccupied(#[error(not(source))] Position),

    /// The game already ended.
    #[display("Game is already over")]
    GameOver,
}
