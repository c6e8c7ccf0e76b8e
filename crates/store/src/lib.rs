//! Persistence facade
//!
//! Saves and restores the durable part of a game (level, total score, mode,
//! achievements, settings) as one JSON document in a [`KeyValueStore`].
//! Loading never fails: missing, unreadable or corrupt data yields the defaults
//! and a warning in the log.

pub mod kv;
pub mod saved;

pub use kv::{default_data_dir, FileStore, KeyValueStore, MemoryStore};
pub use saved::{default_settings, SavedState};

/// Key the game state is stored under.
pub const STORAGE_KEY: &str = "make-it-12-game-storage";

#[derive(Debug, Clone)]
pub struct Persistence<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, STORAGE_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn load(&self) -> SavedState {
        let text = match self.store.get(&self.key) {
            Ok(Some(text)) => text,
            Ok(None) => return SavedState::default(),
            Err(e) => {
                log::warn!("could not read saved game, starting fresh: {:#}", e);
                return SavedState::default();
            }
        };
        match serde_json::from_str::<SavedState>(&text) {
            Ok(state) => state.sanitized(),
            Err(e) => {
                log::warn!("saved game is corrupt, starting fresh: {}", e);
                SavedState::default()
            }
        }
    }

    pub fn save(&mut self, state: &SavedState) -> anyhow::Result<()> {
        let text = serde_json::to_string_pretty(state)?;
        self.store.put(&self.key, &text)?;
        log::debug!("saved game at level {}", state.level);
        Ok(())
    }

    pub fn clear(&mut self) -> anyhow::Result<()> {
        self.store.remove(&self.key)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}
