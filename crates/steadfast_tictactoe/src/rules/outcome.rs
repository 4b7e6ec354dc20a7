//! Board classification: in progress, drawn, or won.

use super::win::check_winner;
use crate::types::{Board, Player};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum Outcome {
    /// Board full with no complete line.
    #[display("Draw")]
    Draw,
    /// A player completed a line.
    #[display("{_0} wins")]
    Won(Player),
}

impl Outcome {
    /// Returns the winner, if any.
    pub fn winner(self) -> Option<Player> {
        match self {
            Outcome::Draw => None,
            Outcome::Won(player) => Some(player),
        }
    }
}

/// Classification of a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum GameStatus {
    /// Moves remain and nobody has won.
    #[display("In progress")]
    InProgress,
    /// The board is terminal.
    #[display("{_0}")]
    GameOver(Outcome),
}

/// Classifies a board.
///
/// A complete line wins; otherwise a full board is a draw and anything
/// else is still in progress.
#[instrument]
pub fn evaluate(board: &Board) -> GameStatus {
    if let Some(winner) = check_winner(board) {
        return GameStatus::GameOver(Outcome::Won(winner));
    }
    if board.is_full() {
        GameStatus::GameOver(Outcome::Draw)
    } else {
        GameStatus::InProgress
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CELL_COUNT, Cell};

    fn board_from(pattern: &str) -> Board {
        let mut cells = [Cell::Empty; CELL_COUNT];
        for (cell, symbol) in cells.iter_mut().zip(pattern.chars()) {
            *cell = match symbol {
                'X' => Cell::occupied(Player::X),
                'O' => Cell::occupied(Player::O),
                _ => Cell::Empty,
            };
        }
        Board::from_cells(cells)
    }

    #[test]
    fn test_empty_board_in_progress() {
        assert_eq!(evaluate(&Board::new()), GameStatus::InProgress);
    }

    #[test]
    fn test_partial_board_in_progress() {
        assert_eq!(evaluate(&board_from("XO__X_O__")), GameStatus::InProgress);
    }

    #[test]
    fn test_full_board_without_line_is_draw() {
        assert_eq!(
            evaluate(&board_from("XOXXOOOXX")),
            GameStatus::GameOver(Outcome::Draw)
        );
    }

    #[test]
    fn test_win_on_full_board_beats_draw() {
        assert_eq!(
            evaluate(&board_from("XXXOOXOXO")),
            GameStatus::GameOver(Outcome::Won(Player::X))
        );
    }

    #[test]
    fn test_diagonal_win() {
        assert_eq!(
            evaluate(&board_from("OX_XO___O")),
            GameStatus::GameOver(Outcome::Won(Player::O))
        );
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(Outcome::Won(Player::O).to_string(), "O wins");
        assert_eq!(GameStatus::GameOver(Outcome::Draw).to_string(), "Draw");
    }
}
