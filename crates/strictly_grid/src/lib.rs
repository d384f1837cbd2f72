//! Pure N×N tic-tac-toe game logic.
//!
//! The [`GameEngine`] is the single authority on whose turn it is. It
//! validates placements, detects wins on any row, column or diagonal of an
//! N×N board, detects draws, and starts a fresh game after every result.
//!
//! # Example
//!
//! ```
//! use strictly_grid::{BoardSize, GameEngine, Mark, Outcome};
//!
//! let mut engine = GameEngine::new();
//! engine.configure(BoardSize::new(3).unwrap());
//!
//! for (row, col) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
//!     engine.apply_move(row, col).unwrap();
//! }
//! let report = engine.apply_move(0, 2).unwrap();
//! assert_eq!(report.outcome, Some(Outcome::Winner(Mark::X)));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod game;
mod phases;
mod position;
pub mod rules;
mod types;

pub use action::{Move, MoveError, MoveReport};
pub use game::GameEngine;
pub use phases::Outcome;
pub use position::Position;
pub use types::{Board, BoardSize, GameState, InvalidBoardSize, Mark, Phase, Square};
