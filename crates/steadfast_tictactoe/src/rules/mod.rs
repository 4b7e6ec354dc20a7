//! Game rules for tic-tac-toe.
//!
//! Pure functions over a [`Board`](crate::Board). Nothing here knows whose
//! turn it is or mutates anything; the state machine in
//! [`GameState`](crate::GameState) composes them.

pub mod outcome;
pub mod validation;
pub mod win;

pub use outcome::{GameStatus, Outcome, evaluate};
pub use validation::{InvalidMove, MoveValidation, validate_move};
pub use win::check_winner;
