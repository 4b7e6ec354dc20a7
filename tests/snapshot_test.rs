//! Tests for the snapshot codec.

use proptest::prelude::*;
use steadfast::{
    BOARD_KEY, CURRENT_PLAYER_KEY, GAME_OVER_KEY, GameState, InvalidMove, KeyValueStore,
    LAST_VALIDATION_KEY, MemoryStore, OUTCOME_IS_DRAW_KEY, OUTCOME_WINNER_KEY, Outcome, Player,
    StoredValue, restore_state, save_state,
};

fn round_trip(state: &GameState) -> GameState {
    let mut store = MemoryStore::new();
    save_state(&mut store, state).expect("memory store never fails");
    restore_state(&store)
}

fn name(value: &str) -> StoredValue {
    StoredValue::Name(value.to_string())
}

#[test]
fn test_playing_snapshot_layout() {
    let state = GameState::new()
        .submit_move(0)
        .and_then(|state| state.submit_move(4))
        .expect("game still running");

    let mut store = MemoryStore::new();
    save_state(&mut store, &state).unwrap();

    assert_eq!(store.get(GAME_OVER_KEY), Some(StoredValue::Flag(false)));
    assert_eq!(
        store.get(BOARD_KEY),
        Some(StoredValue::Cells(vec![1, 0, 0, 0, 2, 0, 0, 0, 0]))
    );
    assert_eq!(store.get(CURRENT_PLAYER_KEY), Some(name("X")));
    assert_eq!(store.get(LAST_VALIDATION_KEY), Some(name("Valid")));
}

#[test]
fn test_won_snapshot_layout() {
    let mut store = MemoryStore::new();
    let state = GameState::GameOver {
        outcome: Outcome::Won(Player::O),
    };
    save_state(&mut store, &state).unwrap();

    assert_eq!(store.get(GAME_OVER_KEY), Some(StoredValue::Flag(true)));
    assert_eq!(store.get(OUTCOME_IS_DRAW_KEY), Some(StoredValue::Flag(false)));
    assert_eq!(store.get(OUTCOME_WINNER_KEY), Some(name("O")));
}

#[test]
fn test_round_trip_feedback() {
    let state = GameState::Playing {
        board: Default::default(),
        current_player: Player::O,
        last_validation: Some(InvalidMove::CellOutOfBound),
    };
    assert_eq!(round_trip(&state), state);
}

#[test]
fn test_round_trip_outcomes() {
    for outcome in [Outcome::Draw, Outcome::Won(Player::X), Outcome::Won(Player::O)] {
        let state = GameState::GameOver { outcome };
        assert_eq!(round_trip(&state), state);
    }
}

#[test]
fn test_draw_after_earlier_win_in_same_store() {
    let mut store = MemoryStore::new();
    let won = GameState::GameOver {
        outcome: Outcome::Won(Player::X),
    };
    let draw = GameState::GameOver {
        outcome: Outcome::Draw,
    };
    save_state(&mut store, &won).unwrap();
    save_state(&mut store, &GameState::new()).unwrap();
    save_state(&mut store, &draw).unwrap();
    assert_eq!(restore_state(&store), draw);
}

#[test]
fn test_win_after_earlier_draw_in_same_store() {
    let mut store = MemoryStore::new();
    let draw = GameState::GameOver {
        outcome: Outcome::Draw,
    };
    let won = GameState::GameOver {
        outcome: Outcome::Won(Player::O),
    };
    save_state(&mut store, &draw).unwrap();
    save_state(&mut store, &GameState::new()).unwrap();
    save_state(&mut store, &won).unwrap();
    assert_eq!(restore_state(&store), won);
}

#[test]
fn test_game_over_without_winner_is_draw() {
    let mut store = MemoryStore::new();
    store.set(GAME_OVER_KEY, StoredValue::Flag(true)).unwrap();
    assert_eq!(
        restore_state(&store),
        GameState::GameOver {
            outcome: Outcome::Draw
        }
    );
}

#[test]
fn test_unknown_winner_is_draw() {
    let mut store = MemoryStore::new();
    store.set(GAME_OVER_KEY, StoredValue::Flag(true)).unwrap();
    store.set(OUTCOME_WINNER_KEY, name("Q")).unwrap();
    assert_eq!(
        restore_state(&store),
        GameState::GameOver {
            outcome: Outcome::Draw
        }
    );
}

#[test]
fn test_missing_player_defaults_to_x() {
    let mut store = MemoryStore::new();
    store
        .set(BOARD_KEY, StoredValue::Cells(vec![1, 0, 0, 0, 0, 0, 0, 0, 0]))
        .unwrap();
    store.set(CURRENT_PLAYER_KEY, StoredValue::Flag(true)).unwrap();

    let state = restore_state(&store);
    assert_eq!(state.current_player(), Some(Player::X));
    assert_eq!(state.last_validation(), None);
}

#[test]
fn test_wrongly_typed_game_over_is_playing() {
    let mut store = MemoryStore::new();
    store.set(GAME_OVER_KEY, name("yes")).unwrap();
    assert_eq!(restore_state(&store), GameState::new());
}

proptest! {
    #[test]
    fn reachable_states_round_trip(moves in prop::collection::vec(-2i64..11, 0..20)) {
        let mut state = GameState::new();
        for index in moves {
            let Some(next) = state.submit_move(index) else { break };
            state = next;
            prop_assert_eq!(round_trip(&state), state.clone());
        }
    }
}
