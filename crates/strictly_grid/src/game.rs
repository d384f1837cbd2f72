//! The game engine: one live game, resized on demand and reset after each result.

use super::action::{MoveError, MoveReport};
use super::types::{BoardSize, GameState, Mark, Phase};
use tracing::{debug, info, instrument};

/// Authoritative engine for a single N×N game.
///
/// The engine owns at most one [`GameState`]. It is created by
/// [`configure`](Self::configure) or lazily by the first
/// [`apply_move`](Self::apply_move), and replaced wholesale when a finished
/// game receives its next move.
#[derive(Debug, Clone, Default)]
pub struct GameEngine {
    state: Option<GameState>,
    fallback_size: BoardSize,
}

impl GameEngine {
    /// Creates an engine with no board; the first move uses a 3×3 board.
    #[instrument]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine whose lazily created board has side `size`.
    #[instrument]
    pub fn with_fallback_size(size: BoardSize) -> Self {
        Self {
            state: None,
            fallback_size: size,
        }
    }

    /// Starts a fresh game on an empty `size`×`size` board with X to move.
    ///
    /// Any game in progress is discarded.
    #[instrument(skip(self))]
    pub fn configure(&mut self, size: BoardSize) {
        if let Some(previous) = &self.state
            && previous.phase() == Phase::InProgress
            && !previous.history().is_empty()
        {
            debug!(moves = previous.history().len(), "Discarding game in progress");
        }
        info!(%size, "Configuring board");
        self.fallback_size = size;
        self.state = Some(GameState::new(size));
    }

    /// Replaces the current game with an empty board of the same size.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        let size = self.board_size();
        debug!(%size, "Resetting game");
        self.state = Some(GameState::new(size));
    }

    /// Places the current mark at `(row, col)`.
    ///
    /// Creates a board of the fallback size if none exists and starts a new
    /// game if the previous one has finished, so callers never reset the
    /// engine themselves. Rejected moves leave the state unchanged.
    #[instrument(skip(self))]
    pub fn apply_move(&mut self, row: i64, col: i64) -> Result<MoveReport, MoveError> {
        match self.phase() {
            Phase::NotStarted => {
                info!(size = %self.fallback_size, "No board configured, using fallback size");
            }
            Phase::Finished => self.reset(),
            Phase::InProgress => {}
        }

        let state = self
            .state
            .get_or_insert_with(|| GameState::new(self.fallback_size));
        let report = state.place(row, col)?;

        debug!(placed = %report.placed, outcome = ?report.outcome, "Move applied");
        Ok(report)
    }

    /// The live game, if one has been created.
    ///
    /// After a winning or drawing move this still shows the finished board
    /// until the next move arrives.
    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    /// Phase of the live game, `NotStarted` before any board exists.
    pub fn phase(&self) -> Phase {
        self.state
            .as_ref()
            .map_or(Phase::NotStarted, GameState::phase)
    }

    /// The mark that will be placed by the next accepted move.
    pub fn current_mark(&self) -> Mark {
        match &self.state {
            Some(state) if state.phase() == Phase::InProgress => state.current_mark(),
            _ => Mark::X,
        }
    }

    /// Side length of the current board, or of the board the next move will create.
    pub fn board_size(&self) -> BoardSize {
        self.state
            .as_ref()
            .map_or(self.fallback_size, |state| state.board().size())
    }
}
