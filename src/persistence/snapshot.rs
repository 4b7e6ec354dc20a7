//! Snapshot codec: [`GameState`] to and from key-value entries.
//!
//! Board cells are encoded `0 = Empty`, `1 = X`, `2 = O`. Highlighting is
//! display-only and is not stored. Decoding never fails; missing or
//! unrecognised entries fall back to a new game's values, and a finished
//! game with no readable winner is restored as a draw.

use super::store::{KeyValueStore, StoreError, StoredValue};
use steadfast_tictactoe::{Board, CELL_COUNT, Cell, GameState, InvalidMove, Outcome, Player};
use tracing::{debug, instrument, warn};

/// Key of the board's cell codes.
pub const BOARD_KEY: &str = "board";
/// Key of the player to move.
pub const CURRENT_PLAYER_KEY: &str = "currentPlayer";
/// Key of the finished-game flag.
pub const GAME_OVER_KEY: &str = "gameOver";
/// Key of the draw flag.
pub const OUTCOME_IS_DRAW_KEY: &str = "gameOutcomeIsDraw";
/// Key of the winner.
pub const OUTCOME_WINNER_KEY: &str = "gameOutcomeWinner";
/// Key of pending move feedback.
pub const LAST_VALIDATION_KEY: &str = "lastValidation";

/// Stored in [`LAST_VALIDATION_KEY`] when there is no pending feedback.
const NO_FEEDBACK: &str = "Valid";

fn encode_cell(cell: &Cell) -> u8 {
    match cell.player() {
        None => 0,
        Some(Player::X) => 1,
        Some(Player::O) => 2,
    }
}

fn decode_cell(code: u8) -> Cell {
    match code {
        1 => Cell::occupied(Player::X),
        2 => Cell::occupied(Player::O),
        _ => Cell::Empty,
    }
}

fn encode_board(board: &Board) -> StoredValue {
    StoredValue::Cells(board.cells().iter().map(encode_cell).collect())
}

fn decode_board(value: Option<StoredValue>) -> Board {
    let Some(codes) = value.as_ref().and_then(StoredValue::as_cells) else {
        return Board::new();
    };
    if codes.len() != CELL_COUNT {
        warn!(len = codes.len(), "Stored board has wrong length, using empty board");
        return Board::new();
    }
    let mut cells = [Cell::Empty; CELL_COUNT];
    for (cell, &code) in cells.iter_mut().zip(codes) {
        *cell = decode_cell(code);
    }
    Board::from_cells(cells)
}

fn decode_player(value: Option<StoredValue>) -> Option<Player> {
    value.as_ref()?.as_name()?.parse().ok()
}

fn name(value: impl Into<&'static str>) -> StoredValue {
    StoredValue::Name(value.into().to_string())
}

/// Entries describing `state`, with [`GAME_OVER_KEY`] last.
fn encode_state(state: &GameState) -> Vec<(&'static str, StoredValue)> {
    match state {
        GameState::Playing {
            board,
            current_player,
            last_validation,
        } => {
            let feedback = match last_validation {
                Some(reason) => name(*reason),
                None => StoredValue::Name(NO_FEEDBACK.to_string()),
            };
            vec![
                (BOARD_KEY, encode_board(board)),
                (CURRENT_PLAYER_KEY, name(*current_player)),
                (LAST_VALIDATION_KEY, feedback),
                (GAME_OVER_KEY, StoredValue::Flag(false)),
            ]
        }
        GameState::GameOver { outcome } => match outcome {
            Outcome::Draw => vec![
                (OUTCOME_IS_DRAW_KEY, StoredValue::Flag(true)),
                (GAME_OVER_KEY, StoredValue::Flag(true)),
            ],
            Outcome::Won(winner) => vec![
                (OUTCOME_IS_DRAW_KEY, StoredValue::Flag(false)),
                (OUTCOME_WINNER_KEY, name(*winner)),
                (GAME_OVER_KEY, StoredValue::Flag(true)),
            ],
        },
    }
}

/// A value that decodes the same as `key` being absent.
fn absent_value(key: &str) -> StoredValue {
    match key {
        BOARD_KEY => encode_board(&Board::new()),
        CURRENT_PLAYER_KEY => name(Player::X),
        LAST_VALIDATION_KEY => StoredValue::Name(NO_FEEDBACK.to_string()),
        GAME_OVER_KEY | OUTCOME_IS_DRAW_KEY => StoredValue::Flag(false),
        _ => StoredValue::Name(String::new()),
    }
}

/// Writes every entry describing `state`.
///
/// All keys relevant to the variant are written, so entries left by an
/// earlier game never change what [`restore_state`] returns. The
/// [`GAME_OVER_KEY`] flag goes last. If a write fails, the entries already
/// written are put back, so the store still restores the previous state.
///
/// # Errors
///
/// Returns the first [`StoreError`] raised by the store. Entries written
/// before it are rolled back; a rollback write that also fails is logged.
#[instrument(skip(store))]
pub fn save_state<S: KeyValueStore + ?Sized>(
    store: &mut S,
    state: &GameState,
) -> Result<(), StoreError> {
    let mut written: Vec<(&'static str, StoredValue)> = Vec::new();
    for (key, value) in encode_state(state) {
        let previous = store.get(key).unwrap_or_else(|| absent_value(key));
        if let Err(e) = store.set(key, value) {
            warn!(key, error = %e, "Snapshot write failed, rolling back");
            for (key, previous) in written.into_iter().rev() {
                if let Err(rollback) = store.set(key, previous) {
                    warn!(key, error = %rollback, "Snapshot rollback failed");
                }
            }
            return Err(e);
        }
        written.push((key, previous));
    }
    debug!("Snapshot saved");
    Ok(())
}

/// Rebuilds the state last written by [`save_state`].
#[instrument(skip(store))]
pub fn restore_state<S: KeyValueStore + ?Sized>(store: &S) -> GameState {
    let game_over = store
        .get(GAME_OVER_KEY)
        .and_then(|value| value.as_flag())
        .unwrap_or(false);

    let state = if !game_over {
        GameState::Playing {
            board: decode_board(store.get(BOARD_KEY)),
            current_player: decode_player(store.get(CURRENT_PLAYER_KEY)).unwrap_or(Player::X),
            last_validation: store
                .get(LAST_VALIDATION_KEY)
                .as_ref()
                .and_then(StoredValue::as_name)
                .and_then(|name| name.parse::<InvalidMove>().ok()),
        }
    } else {
        let is_draw = store
            .get(OUTCOME_IS_DRAW_KEY)
            .and_then(|value| value.as_flag())
            .unwrap_or(false);
        let outcome = match decode_player(store.get(OUTCOME_WINNER_KEY)) {
            Some(winner) if !is_draw => Outcome::Won(winner),
            _ => Outcome::Draw,
        };
        GameState::GameOver { outcome }
    };
    debug!(?state, "Snapshot restored");
    state
}
