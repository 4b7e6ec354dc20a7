//! Steadfast - a tic-tac-toe game whose state survives interruption.
//!
//! # Architecture
//!
//! - **Rules and state machine**: the `steadfast_tictactoe` crate, re-exported here
//! - **Controller**: the single writer that applies moves, persists and notifies
//! - **Persistence**: key-value stores and the snapshot codec
//! - **Config**: where snapshots live
//!
//! # Example
//!
//! ```
//! use steadfast::{CommandResult, GameController, GameState, MemoryStore, Player};
//!
//! let controller = GameController::new(MemoryStore::new());
//! assert!(matches!(controller.submit_move(4), CommandResult::Applied));
//! assert_eq!(controller.state().current_player(), Some(Player::O));
//!
//! // A fresh controller over the same store picks up where we left off.
//! let resumed = GameController::restore(controller.into_store());
//! assert!(matches!(resumed.state(), GameState::Playing { .. }));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod controller;
mod persistence;

pub use config::{ConfigError, GameConfig};
pub use controller::{CommandResult, GameController, SubscriptionId};
pub use persistence::{
    BOARD_KEY, CURRENT_PLAYER_KEY, FileStore, GAME_OVER_KEY, KeyValueStore, LAST_VALIDATION_KEY,
    MemoryStore, OUTCOME_IS_DRAW_KEY, OUTCOME_WINNER_KEY, Scoped, StoreError, StoredValue,
    restore_state, save_state,
};
pub use steadfast_tictactoe::{
    Board, Cell, GameState, GameStatus, InvalidMove, MoveValidation, Outcome, Player, evaluate,
    validate_move,
};
