//! Game controller: the single writer of the authoritative [`GameState`].
//!
//! Each command runs to completion under one lock: read the current state,
//! compute the next one, store it, persist it, then hand it to every
//! observer. Commands from several threads therefore apply one at a time,
//! each validated against the result of all earlier ones.

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use steadfast_tictactoe::GameState;
use tracing::{debug, info, instrument, warn};

use crate::persistence::{KeyValueStore, StoreError, restore_state, save_state};

/// Handle returned by [`GameController::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// What a command did.
#[derive(Debug, Clone)]
#[must_use]
pub enum CommandResult {
    /// The command does not apply in the current phase; nothing changed.
    Ignored,
    /// The state changed and was persisted.
    Applied,
    /// The state changed but persisting it failed. The new state stands.
    AppliedUnsaved(StoreError),
}

impl CommandResult {
    /// Returns true if the state changed, whether or not it was saved.
    pub fn is_applied(&self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

type Observer = Box<dyn FnMut(&GameState) + Send>;

struct Inner<S> {
    state: GameState,
    store: S,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

/// Owns the current game, its store and its observers.
///
/// Observers run while the controller is locked and must not call back
/// into it.
pub struct GameController<S> {
    inner: Mutex<Inner<S>>,
}

impl<S: KeyValueStore> GameController<S> {
    /// Starts a new game and persists it, replacing whatever `store` held.
    ///
    /// A failed save is logged and the game can still be played; use
    /// [`GameController::start`] to inspect it.
    pub fn new(store: S) -> Self {
        Self::start(store).0
    }

    /// Like [`GameController::new`], also returning the result of the
    /// initial save.
    #[instrument(skip(store))]
    pub fn start(store: S) -> (Self, CommandResult) {
        info!("Creating controller with a new game");
        let controller = Self::with_state(GameState::new(), store);
        let result = {
            let mut inner = controller.lock();
            let Inner { state, store, .. } = &mut *inner;
            persist(store, state)
        };
        (controller, result)
    }

    /// Resumes the game saved in `store`, or a new one if it holds none.
    #[instrument(skip(store))]
    pub fn restore(store: S) -> Self {
        let state = restore_state(&store);
        info!(game_over = state.is_game_over(), "Restored controller");
        Self::with_state(state, store)
    }

    fn with_state(state: GameState, store: S) -> Self {
        Self {
            inner: Mutex::new(Inner {
                state,
                store,
                observers: Vec::new(),
                next_subscription: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<S>> {
        // A panicking observer must not take the game down with it.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a copy of the current state.
    pub fn state(&self) -> GameState {
        self.lock().state.clone()
    }

    /// Runs `f` against the store.
    pub fn with_store<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.lock().store)
    }

    /// Consumes the controller, returning its store.
    pub fn into_store(self) -> S {
        self.inner
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .store
    }

    /// Registers an observer for every future transition.
    ///
    /// The observer is not called with the current state; read
    /// [`GameController::state`] for that.
    #[instrument(skip(self, observer))]
    pub fn subscribe(&self, observer: impl FnMut(&GameState) + Send + 'static) -> SubscriptionId {
        let mut inner = self.lock();
        let id = SubscriptionId(inner.next_subscription);
        inner.next_subscription += 1;
        inner.observers.push((id, Box::new(observer)));
        debug!(?id, observers = inner.observers.len(), "Observer subscribed");
        id
    }

    /// Removes an observer. Returns false if it was not registered.
    #[instrument(skip(self))]
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.lock();
        let before = inner.observers.len();
        inner.observers.retain(|(other, _)| *other != id);
        before != inner.observers.len()
    }

    /// Plays the current player's mark at `index`.
    ///
    /// Ignored once the game is over. A rejected move still counts as a
    /// transition: the state gains feedback, is persisted and is emitted.
    #[instrument(skip(self))]
    pub fn submit_move(&self, index: i64) -> CommandResult {
        self.transition(|state| state.submit_move(index))
    }

    /// Starts over after a finished game. Ignored while playing.
    #[instrument(skip(self))]
    pub fn start_new_game(&self) -> CommandResult {
        self.transition(GameState::start_new_game)
    }

    fn transition(&self, step: impl FnOnce(&GameState) -> Option<GameState>) -> CommandResult {
        let mut inner = self.lock();
        let Some(next) = step(&inner.state) else {
            return CommandResult::Ignored;
        };

        let Inner {
            state,
            store,
            observers,
            ..
        } = &mut *inner;
        *state = next;
        let result = persist(store, state);
        for (_, observer) in observers.iter_mut() {
            observer(&*state);
        }
        result
    }
}

fn persist<S: KeyValueStore>(store: &mut S, state: &GameState) -> CommandResult {
    match save_state(store, state) {
        Ok(()) => CommandResult::Applied,
        Err(e) => {
            warn!(error = %e, "Failed to persist game state, continuing in memory");
            CommandResult::AppliedUnsaved(e)
        }
    }
}

impl<S> fmt::Debug for GameController<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_lock() {
            Ok(inner) => f
                .debug_struct("GameController")
                .field("state", &inner.state)
                .field("observers", &inner.observers.len())
                .finish(),
            Err(_) => f.debug_struct("GameController").finish_non_exhaustive(),
        }
    }
}
