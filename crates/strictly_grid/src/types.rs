//! Core domain types for N×N tic-tac-toe.

use super::action::{Move, MoveError, MoveReport};
use super::phases::Outcome;
use super::position::Position;
use super::rules;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, instrument};

/// A player's symbol.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum Mark {
    /// Mark X (always moves first).
    X,
    /// Mark O (moves second).
    O,
}

impl Mark {
    /// Returns the opposing mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// A square on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Square {
    /// Empty square.
    Empty,
    /// Square occupied by a mark.
    Occupied(Mark),
}

/// Side length of a square board, between 1 and [`BoardSize::MAX`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(try_from = "usize", into = "usize")]
pub struct BoardSize(usize);

impl BoardSize {
    /// Size used when a move arrives before any board was configured.
    pub const DEFAULT: BoardSize = BoardSize(3);

    /// Largest supported side length.
    pub const MAX: BoardSize = BoardSize(1024);

    /// Creates a board size, rejecting zero and anything above [`BoardSize::MAX`].
    pub fn new(size: usize) -> Option<Self> {
        (1..=Self::MAX.0).contains(&size).then_some(Self(size))
    }

    /// Returns the side length.
    pub fn get(self) -> usize {
        self.0
    }

    /// Number of cells on a board of this size.
    pub fn cells(self) -> usize {
        self.0 * self.0
    }
}

impl Default for BoardSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Error for a board size that is out of range or not a number.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("Invalid board size '{}': must be an integer from 1 to {}", input, BoardSize::MAX)]
pub struct InvalidBoardSize {
    /// The rejected input.
    pub input: String,
}

impl TryFrom<usize> for BoardSize {
    type Error = InvalidBoardSize;

    fn try_from(size: usize) -> Result<Self, Self::Error> {
        Self::new(size).ok_or_else(|| InvalidBoardSize {
            input: size.to_string(),
        })
    }
}

impl From<BoardSize> for usize {
    fn from(size: BoardSize) -> Self {
        size.0
    }
}

impl FromStr for BoardSize {
    type Err = InvalidBoardSize;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<usize>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| InvalidBoardSize {
                input: s.to_string(),
            })
    }
}

/// N×N board stored in row-major order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    size: BoardSize,
    squares: Vec<Square>,
}

impl Board {
    /// Creates an empty board.
    pub fn new(size: BoardSize) -> Self {
        Self {
            size,
            squares: vec![Square::Empty; size.cells()],
        }
    }

    /// Returns the side length.
    pub fn size(&self) -> BoardSize {
        self.size
    }

    fn index(&self, pos: Position) -> Option<usize> {
        let n = self.size.get();
        (pos.row() < n && pos.col() < n).then(|| pos.row() * n + pos.col())
    }

    /// Gets the square at the given position, `None` if off the board.
    pub fn get(&self, pos: Position) -> Option<Square> {
        self.index(pos).map(|i| self.squares[i])
    }

    /// Sets the square at the given position.
    pub fn set(&mut self, pos: Position, square: Square) -> Result<(), MoveError> {
        let i = self.index(pos).ok_or(MoveError::OutOfBounds {
            row: pos.row() as i64,
            col: pos.col() as i64,
            size: self.size.get(),
        })?;
        self.squares[i] = square;
        Ok(())
    }

    /// Checks if a square is empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        matches!(self.get(pos), Some(Square::Empty))
    }

    /// Checks if every square is occupied.
    pub fn is_full(&self) -> bool {
        self.squares.iter().all(|s| *s != Square::Empty)
    }

    /// Returns all squares in row-major order.
    pub fn squares(&self) -> &[Square] {
        &self.squares
    }

    /// Positions of all empty squares, row by row.
    pub fn empty_positions(&self) -> Vec<Position> {
        let n = self.size.get();
        (0..n)
            .flat_map(|row| (0..n).map(move |col| Position::new(row, col)))
            .filter(|pos| self.is_empty(*pos))
            .collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.size.get();
        for (row, cells) in self.squares.chunks(n).enumerate() {
            let line: Vec<&str> = cells
                .iter()
                .map(|s| match s {
                    Square::Empty => ".",
                    Square::Occupied(Mark::X) => "X",
                    Square::Occupied(Mark::O) => "O",
                })
                .collect();
            f.write_str(&line.join("|"))?;
            if row + 1 < n {
                write!(f, "\n{}\n", vec!["-"; n].join("+"))?;
            }
        }
        Ok(())
    }
}

/// Lifecycle of the engine's current game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// No board has been configured yet.
    NotStarted,
    /// Moves are being accepted.
    InProgress,
    /// The last move won or drew the game.
    Finished,
}

/// Complete state of one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    board: Board,
    current_mark: Mark,
    phase: Phase,
    history: Vec<Move>,
}

impl GameState {
    /// Starts a fresh game with X to move.
    pub fn new(size: BoardSize) -> Self {
        Self {
            board: Board::new(size),
            current_mark: Mark::X,
            phase: Phase::InProgress,
            history: Vec::new(),
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the mark that places next.
    pub fn current_mark(&self) -> Mark {
        self.current_mark
    }

    /// Returns the game phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the moves played so far.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Places the current mark at `(row, col)`.
    ///
    /// Checks bounds, then occupancy, then that the game is still running.
    /// A rejected move leaves the state untouched. A placement that wins or
    /// fills the board moves the game to [`Phase::Finished`]; otherwise the
    /// turn passes to the opponent.
    #[instrument(skip(self), fields(mark = %self.current_mark))]
    pub fn place(&mut self, row: i64, col: i64) -> Result<MoveReport, MoveError> {
        let position = Position::checked(row, col, self.board.size())?;

        if !self.board.is_empty(position) {
            return Err(MoveError::SquareOccupied(position));
        }

        if self.phase != Phase::InProgress {
            return Err(MoveError::GameOver);
        }

        let mark = self.current_mark;
        self.board.set(position, Square::Occupied(mark))?;
        let placed = Move::new(mark, position.row(), position.col());
        self.history.push(placed);

        // Win first: the last free cell can also complete a line.
        let outcome = if rules::completes_line(&self.board, position, mark) {
            Some(Outcome::Winner(mark))
        } else if rules::is_full(&self.board) {
            Some(Outcome::Draw)
        } else {
            None
        };

        match outcome {
            Some(outcome) => {
                debug!(%outcome, moves = self.history.len(), "Game finished");
                self.phase = Phase::Finished;
            }
            None => self.current_mark = mark.opponent(),
        }

        Ok(MoveReport::new(placed, outcome))
    }
}
