//! Pure tic-tac-toe game logic.
//!
//! - [`Board`] and [`Cell`]: the immutable 3x3 grid
//! - [`rules`]: outcome evaluation and move validation
//! - [`GameState`]: the `Playing -> Playing | GameOver` state machine
//!
//! Nothing in this crate performs I/O; persistence and observation live in
//! the `steadfast` crate.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod rules;
mod state;
mod types;

pub use rules::{
    GameStatus, InvalidMove, MoveValidation, Outcome, check_winner, evaluate, validate_move,
};
pub use state::GameState;
pub use types::{Board, CELL_COUNT, Cell, LINES, Player};
