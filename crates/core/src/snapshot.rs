use serde::Serialize;

use crate::types::{GameMode, Phase, ScorePolicy, TileId};

/// One occupied cell as seen by a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TileSnapshot {
    pub id: TileId,
    pub value: u32,
    pub selected: bool,
    pub hinted: bool,
}

/// Read model of a game, rebuilt after every input or tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    pub board_size: usize,
    /// Row-major cells; `None` is an empty cell.
    pub cells: Vec<Option<TileSnapshot>>,
    /// Selected tiles in selection order.
    pub selected: Vec<TileId>,
    pub phase: Phase,
    pub mode: GameMode,
    pub policy: ScorePolicy,
    pub level: u32,
    pub score: u32,
    pub total_score: u32,
    pub health: u32,
    pub combo: u32,
    pub max_combo: u32,
    pub time_left: u32,
    pub time_elapsed: u32,
    pub moves: u32,
    pub episode_id: u32,
    pub seed: u32,
    pub achievements_unlocked: usize,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.board_size = 0;
        self.cells.clear();
        self.selected.clear();
        self.phase = Phase::Idle;
        self.mode = GameMode::default();
        self.policy = ScorePolicy::default();
        self.level = 0;
        self.score = 0;
        self.total_score = 0;
        self.health = 0;
        self.combo = 0;
        self.max_combo = 0;
        self.time_left = 0;
        self.time_elapsed = 0;
        self.moves = 0;
        self.episode_id = 0;
        self.seed = 0;
        self.achievements_unlocked = 0;
    }

    /// Cell at (row, col).
    pub fn cell(&self, row: usize, col: usize) -> Option<&TileSnapshot> {
        if row >= self.board_size || col >= self.board_size {
            return None;
        }
        self.cells
            .get(row * self.board_size + col)
            .and_then(Option::as_ref)
    }

    /// Rows of cells, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Option<TileSnapshot>]> + '_ {
        self.cells.chunks(self.board_size.max(1))
    }

    pub fn playable(&self) -> bool {
        self.phase == Phase::Active
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        let mut s = Self {
            board_size: 0,
            cells: Vec::new(),
            selected: Vec::new(),
            phase: Phase::Idle,
            mode: GameMode::default(),
            policy: ScorePolicy::default(),
            level: 0,
            score: 0,
            total_score: 0,
            health: 0,
            combo: 0,
            max_combo: 0,
            time_left: 0,
            time_elapsed: 0,
            moves: 0,
            episode_id: 0,
            seed: 0,
            achievements_unlocked: 0,
        };
        s.clear();
        s
    }
}

/// What the end-of-level screen shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelSummary {
    pub level: u32,
    pub mode: GameMode,
    /// Points scored by matches this level.
    pub score: u32,
    pub time_bonus: u32,
    pub combo_bonus: u32,
    /// `score + time_bonus + combo_bonus`
    pub final_score: u32,
    pub total_score: u32,
    pub time_left: u32,
    pub time_elapsed: u32,
    pub max_combo: u32,
    pub moves: u32,
    pub board_cleared: bool,
}

/// What the game-over screen shows; the run is frozen at this point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameOverSummary {
    pub level: u32,
    pub mode: GameMode,
    /// Completed levels plus the points of the failed level.
    pub final_score: u32,
    pub total_score: u32,
    pub level_score: u32,
    pub max_combo: u32,
}
