//! Persistence: key-value stores and the snapshot codec.

mod snapshot;
mod store;

pub use snapshot::{
    BOARD_KEY, CURRENT_PLAYER_KEY, GAME_OVER_KEY, LAST_VALIDATION_KEY, OUTCOME_IS_DRAW_KEY,
    OUTCOME_WINNER_KEY, restore_state, save_state,
};
pub use store::{FileStore, KeyValueStore, MemoryStore, Scoped, StoreError, StoredValue};
