//! Move legality.

use crate::types::{Board, CELL_COUNT};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Why a move was rejected.
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
    strum::IntoStaticStr,
)]
pub enum InvalidMove {
    /// Index outside 0-8.
    CellOutOfBound,
    /// Target cell already holds a mark.
    CellAlreadyOccupied,
}

/// Result of checking a proposed move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveValidation {
    /// The move may be applied.
    Valid,
    /// The move must be rejected.
    Invalid(InvalidMove),
}

/// Checks whether the cell at `index` may be marked.
///
/// Bounds are checked before occupancy. Turn order is not consulted.
#[instrument(skip(board))]
pub fn validate_move(index: i64, board: &Board) -> MoveValidation {
    let Some(index) = usize::try_from(index).ok().filter(|&i| i < CELL_COUNT) else {
        debug!("Cell index out of bounds");
        return MoveValidation::Invalid(InvalidMove::CellOutOfBound);
    };
    if !board.is_empty_at(index) {
        debug!("Cell already occupied");
        return MoveValidation::Invalid(InvalidMove::CellAlreadyOccupied);
    }
    MoveValidation::Valid
}
