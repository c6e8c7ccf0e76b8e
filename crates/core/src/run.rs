//! Run state - per-game counters shared by scoring and the lifecycle

use serde::{Deserialize, Serialize};

use crate::types::{GameMode, INITIAL_HEALTH};

/// Mutable counters of a game in progress.
///
/// `score` belongs to the current level; `total_score` accumulates the final
/// score of every completed level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunState {
    pub level: u32,
    pub score: u32,
    pub total_score: u32,
    pub health: u32,
    pub combo: u32,
    pub max_combo: u32,
    pub time_left: u32,
    pub time_elapsed: u32,
    /// Accepted tile toggles this level.
    pub moves: u32,
    pub mode: GameMode,
}

impl RunState {
    pub fn new(mode: GameMode) -> Self {
        Self {
            level: 1,
            score: 0,
            total_score: 0,
            health: INITIAL_HEALTH,
            combo: 0,
            max_combo: 0,
            time_left: 0,
            time_elapsed: 0,
            moves: 0,
            mode,
        }
    }

    /// Reset the per-level counters.
    pub fn begin_level(&mut self, initial_combo: u32, time_limit: u32) {
        self.score = 0;
        self.combo = initial_combo;
        self.max_combo = initial_combo;
        self.time_left = time_limit;
        self.time_elapsed = 0;
        self.moves = 0;
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::new(GameMode::default())
    }
}
