//! The game state machine.
//!
//! A [`GameState`] is either [`GameState::Playing`] or the terminal
//! [`GameState::GameOver`]. Transitions never mutate: each accepted input
//! produces a wholly new state, and inputs that do not apply to the current
//! phase produce nothing at all.

use crate::rules::{GameStatus, InvalidMove, MoveValidation, Outcome, evaluate, validate_move};
use crate::types::{Board, Player};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Complete game state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    /// Moves are being accepted.
    Playing {
        /// The board.
        board: Board,
        /// Player to move.
        current_player: Player,
        /// Feedback from the last rejected move, cleared by the next accepted one.
        last_validation: Option<InvalidMove>,
    },
    /// The game has finished; only a new game can follow.
    GameOver {
        /// How it ended.
        outcome: Outcome,
    },
}

impl GameState {
    /// Creates the initial state: empty board, X to move, no feedback.
    pub fn new() -> Self {
        Self::Playing {
            board: Board::new(),
            current_player: Player::X,
            last_validation: None,
        }
    }

    /// Returns true once the game has finished.
    pub fn is_game_over(&self) -> bool {
        matches!(self, Self::GameOver { .. })
    }

    /// Returns the board while playing.
    pub fn board(&self) -> Option<&Board> {
        match self {
            Self::Playing { board, .. } => Some(board),
            Self::GameOver { .. } => None,
        }
    }

    /// Returns the player to move while playing.
    pub fn current_player(&self) -> Option<Player> {
        match self {
            Self::Playing { current_player, .. } => Some(*current_player),
            Self::GameOver { .. } => None,
        }
    }

    /// Returns pending move feedback while playing.
    pub fn last_validation(&self) -> Option<InvalidMove> {
        match self {
            Self::Playing {
                last_validation, ..
            } => *last_validation,
            Self::GameOver { .. } => None,
        }
    }

    /// Returns the outcome once the game is over.
    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            Self::Playing { .. } => None,
            Self::GameOver { outcome } => Some(*outcome),
        }
    }

    /// Computes the state that follows the current player marking `index`.
    ///
    /// Returns `None` when the game is over; such input is ignored. A
    /// rejected move keeps the board and the turn and records the reason.
    #[instrument(skip(self))]
    pub fn submit_move(&self, index: i64) -> Option<GameState> {
        let Self::Playing {
            board,
            current_player,
            ..
        } = self
        else {
            debug!("Move ignored, game is over");
            return None;
        };

        let index = match validate_move(index, board) {
            MoveValidation::Invalid(reason) => {
                debug!(%reason, player = %current_player, "Move rejected");
                return Some(Self::Playing {
                    board: board.clone(),
                    current_player: *current_player,
                    last_validation: Some(reason),
                });
            }
            // Validation guarantees 0 <= index < 9.
            MoveValidation::Valid => index as usize,
        };

        let board = board.with_mark(index, *current_player);
        let next = match evaluate(&board) {
            GameStatus::InProgress => Self::Playing {
                board,
                current_player: current_player.opponent(),
                last_validation: None,
            },
            GameStatus::GameOver(outcome) => {
                info!(%outcome, "Game over");
                Self::GameOver { outcome }
            }
        };
        debug!(index, player = %current_player, "Move applied");
        Some(next)
    }

    /// Computes a fresh game, but only from a finished one.
    ///
    /// Returns `None` while a game is still being played.
    #[instrument(skip(self))]
    pub fn start_new_game(&self) -> Option<GameState> {
        match self {
            Self::Playing { .. } => {
                debug!("New game ignored, game still in progress");
                None
            }
            Self::GameOver { .. } => {
                info!("Starting new game");
                Some(Self::new())
            }
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
