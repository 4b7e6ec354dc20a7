//! Win detection logic for tic-tac-toe.

use crate::types::{Board, Cell, LINES, Player};
use tracing::instrument;

/// Checks if there is a winner on the board.
///
/// Lines are scanned in [`LINES`] order; the owner of the first line held
/// entirely by one player is returned.
#[instrument]
pub fn check_winner(board: &Board) -> Option<Player> {
    LINES.into_iter().find_map(|line| {
        let [a, b, c] = line.map(|index| board.get(index).and_then(Cell::player));
        match (a, b, c) {
            (Some(p1), Some(p2), Some(p3)) if p1 == p2 && p2 == p3 => Some(p1),
            _ => None,
        }
    })
}
