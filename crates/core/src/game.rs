//! Game - level lifecycle controller
//!
//! Owns the board, the selection, the run counters, the countdown and the
//! achievements, and is the only thing that mutates them. Views feed it
//! [`GameAction`]s and timer ticks, then drain [`GameEvent`]s and re-render from
//! a [`GameSnapshot`].
//!
//! ```text
//! Idle --start--> Active <--pause/resume--> Paused
//!                   |
//!                   +-- board cleared / no match left --> Completed --next/replay--> Active
//!                   +-- time_left hits 0 --------------> Failed ----restart------> Active
//! ```
//!
//! Commands that do not fit the current phase are ignored and return `false`.

use serde::{Deserialize, Serialize};

use crate::achievements::{Achievement, AchievementTracker, LevelOutcome};
use crate::board::Board;
use crate::generator::generate;
use crate::rng::SimpleRng;
use crate::scoring::{apply_match, initial_combo, level_bonus};
use crate::search::{find_combination, has_valid_combination};
use crate::selection::{Selection, SelectionOutcome};
use crate::snapshot::{GameOverSummary, GameSnapshot, LevelSummary, TileSnapshot};
use crate::timer::{Countdown, TimerHandle};
use crate::types::{
    Expression, GameAction, GameEvent, GameMode, Phase, ScorePolicy, TileId, BASE_TIME_SECS,
    INITIAL_HEALTH, TIME_PER_LEVEL_SECS,
};
use crate::run::RunState;

/// Rules a game is played with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub mode: GameMode,
    pub policy: ScorePolicy,
    /// Refill emptied cells after the gravity collapse.
    ///
    /// Refills happen only when the level goes on: a match that clears the
    /// board or leaves no combination ends the level before any refill.
    pub refill: bool,
    pub base_time_secs: u32,
    pub time_per_level_secs: u32,
    pub initial_health: u32,
}

impl GameConfig {
    /// Countdown length for `level`.
    pub fn time_limit(&self, level: u32) -> u32 {
        self.base_time_secs
            .saturating_add(level.saturating_mul(self.time_per_level_secs))
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::Addition,
            policy: ScorePolicy::Additive,
            refill: false,
            base_time_secs: BASE_TIME_SECS,
            time_per_level_secs: TIME_PER_LEVEL_SECS,
            initial_health: INITIAL_HEALTH,
        }
    }
}

/// Durable part of a game: what survives a restart of the program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub level: u32,
    pub total_score: u32,
    pub mode: GameMode,
    pub achievements: Vec<Achievement>,
}

#[derive(Debug, Clone)]
pub struct Game {
    config: GameConfig,
    seed: u32,
    rng: SimpleRng,
    board: Board,
    selection: Selection,
    hint: Vec<TileId>,
    run: RunState,
    phase: Phase,
    countdown: Countdown,
    achievements: AchievementTracker,
    /// Pending observer events (drained by views).
    events: Vec<GameEvent>,
    /// Monotonic id, increments on restart.
    episode_id: u32,
    level_start_health: u32,
    level_summary: Option<LevelSummary>,
    game_over_summary: Option<GameOverSummary>,
}

impl Game {
    /// New game waiting in `Idle` at level 1.
    pub fn new(config: GameConfig, seed: u32) -> Self {
        let mut rng = SimpleRng::new(seed);
        let board = generate(1, config.mode, &mut rng);
        let mut run = RunState::new(config.mode);
        run.health = config.initial_health;
        run.time_left = config.time_limit(1);

        Self {
            config,
            seed,
            rng,
            board,
            selection: Selection::new(),
            hint: Vec::new(),
            level_start_health: run.health,
            run,
            phase: Phase::Idle,
            countdown: Countdown::new(),
            achievements: AchievementTracker::new(),
            events: Vec::new(),
            episode_id: 0,
            level_summary: None,
            game_over_summary: None,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn run(&self) -> &RunState {
        &self.run
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn selection(&self) -> &[TileId] {
        self.selection.ids()
    }

    pub fn hint_tiles(&self) -> &[TileId] {
        &self.hint
    }

    pub fn achievements(&self) -> &AchievementTracker {
        &self.achievements
    }

    pub fn mode(&self) -> GameMode {
        self.run.mode
    }

    pub fn level(&self) -> u32 {
        self.run.level
    }

    pub fn score(&self) -> u32 {
        self.run.score
    }

    pub fn total_score(&self) -> u32 {
        self.run.total_score
    }

    pub fn time_left(&self) -> u32 {
        self.run.time_left
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    /// Summary of the level that just completed.
    pub fn level_summary(&self) -> Option<&LevelSummary> {
        self.level_summary.as_ref()
    }

    /// Summary of the run that just failed.
    pub fn game_over_summary(&self) -> Option<&GameOverSummary> {
        self.game_over_summary.as_ref()
    }

    /// Handle for the running countdown; `None` unless a level is ticking.
    pub fn timer(&self) -> Option<TimerHandle> {
        self.countdown.handle()
    }

    /// Drain observer events.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Start the current level from `Idle`.
    pub fn start(&mut self) -> bool {
        if self.phase != Phase::Idle {
            return false;
        }
        self.start_level();
        true
    }

    fn start_level(&mut self) {
        let level = self.run.level;
        let mode = self.run.mode;
        self.board = generate(level, mode, &mut self.rng);
        self.selection.clear();
        self.hint.clear();
        self.run
            .begin_level(initial_combo(self.config.policy), self.config.time_limit(level));
        self.level_start_health = self.run.health;
        self.level_summary = None;
        self.game_over_summary = None;
        self.phase = Phase::Active;
        self.countdown.start();

        log::info!(
            "level {} started ({} mode, {}x{} board, {}s)",
            level,
            mode,
            self.board.size(),
            self.board.size(),
            self.run.time_left
        );
        self.events.push(GameEvent::LevelStarted {
            level,
            mode,
            board_size: self.board.size(),
            time_limit: self.run.time_left,
        });
    }

    pub fn pause(&mut self) -> bool {
        if self.phase != Phase::Active {
            return false;
        }
        self.countdown.suspend();
        self.phase = Phase::Paused;
        self.events.push(GameEvent::Paused);
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.phase != Phase::Paused {
            return false;
        }
        self.countdown.resume();
        self.phase = Phase::Active;
        self.events.push(GameEvent::Resumed);
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        match self.phase {
            Phase::Active => self.pause(),
            Phase::Paused => self.resume(),
            _ => false,
        }
    }

    /// One scheduled second. Ticks from a stale handle or outside `Active` are ignored.
    pub fn tick(&mut self, handle: TimerHandle) -> bool {
        if self.phase != Phase::Active || !self.countdown.accepts(handle) {
            log::trace!("ignored stale tick (generation {})", handle.generation());
            return false;
        }
        self.tick_second();
        true
    }

    /// Feed wall-clock time; whole seconds are applied as ticks.
    pub fn advance(&mut self, elapsed_ms: u32) -> bool {
        if self.phase != Phase::Active {
            return false;
        }
        let seconds = self.countdown.advance(elapsed_ms);
        for _ in 0..seconds {
            if self.phase != Phase::Active {
                break;
            }
            self.tick_second();
        }
        seconds > 0
    }

    fn tick_second(&mut self) {
        self.run.time_left = self.run.time_left.saturating_sub(1);
        self.run.time_elapsed = self.run.time_elapsed.saturating_add(1);
        self.events.push(GameEvent::Tick {
            time_left: self.run.time_left,
        });
        if self.run.time_left == 0 {
            self.fail();
        }
    }

    fn fail(&mut self) {
        self.countdown.cancel();
        self.selection.clear();
        self.hint.clear();
        self.phase = Phase::Failed;

        let summary = GameOverSummary {
            level: self.run.level,
            mode: self.run.mode,
            final_score: self.run.total_score.saturating_add(self.run.score),
            total_score: self.run.total_score,
            level_score: self.run.score,
            max_combo: self.run.max_combo,
        };
        log::info!(
            "time up on level {}, final score {}",
            summary.level,
            summary.final_score
        );
        self.events.push(GameEvent::GameOver {
            level: summary.level,
            final_score: summary.final_score,
        });
        self.game_over_summary = Some(summary);
    }

    /// Toggle a tile. Returns false if the toggle was not accepted.
    pub fn toggle(&mut self, id: TileId) -> bool {
        if self.phase != Phase::Active {
            return false;
        }
        let outcome = self.selection.apply(&self.board, self.run.mode, id);
        if outcome == SelectionOutcome::Rejected {
            return false;
        }
        self.run.moves = self.run.moves.saturating_add(1);

        match outcome {
            SelectionOutcome::Rejected => {}
            SelectionOutcome::Pending { selected } => {
                self.events.push(GameEvent::TileToggled { tile: id, selected });
            }
            SelectionOutcome::Reset { tiles, reason } => {
                log::debug!("selection reset ({:?}) after {} tiles", reason, tiles.len());
                self.events.push(GameEvent::TileToggled { tile: id, selected: true });
                self.events.push(GameEvent::SelectionReset { tiles, reason });
            }
            SelectionOutcome::Matched {
                tiles,
                values,
                expression,
            } => {
                self.events.push(GameEvent::TileToggled { tile: id, selected: true });
                self.on_match(tiles, values, expression);
            }
        }
        true
    }

    /// Toggle the tile at a grid position.
    pub fn select_at(&mut self, row: usize, col: usize) -> bool {
        let Some(id) = self.board.get(row, col).map(|t| t.id) else {
            return false;
        };
        self.toggle(id)
    }

    fn on_match(&mut self, tiles: Vec<TileId>, values: Vec<u32>, expression: Expression) {
        let mode = self.run.mode;
        self.board.remove(&tiles);
        self.board.collapse();
        self.hint.clear();

        let scored = apply_match(self.config.policy, &mut self.run, tiles.len());
        log::debug!(
            "matched {} = 12 for {} points, combo now {}",
            expression.render(&values),
            scored.total,
            self.run.combo
        );
        let earned = self.achievements.on_match(&expression, &values, self.run.max_combo);
        self.events.push(GameEvent::Matched {
            tiles,
            values,
            expression,
            points: scored.total,
            combo: self.run.combo,
        });
        for id in earned {
            self.announce(id);
        }

        // The level ends on what the match left behind; refills only top up a
        // board that is still playable.
        if self.board.is_cleared() {
            self.complete(true);
        } else if !has_valid_combination(&self.board.values(), mode) {
            self.complete(false);
        } else if self.config.refill {
            self.board.refill(&mut self.rng, mode);
        }
    }

    fn announce(&mut self, id: crate::types::AchievementId) {
        log::info!("achievement unlocked: {}", id.title());
        self.events.push(GameEvent::AchievementUnlocked(id));
    }

    fn complete(&mut self, board_cleared: bool) {
        self.countdown.cancel();
        self.selection.clear();
        self.hint.clear();
        self.phase = Phase::Completed;

        let bonus = level_bonus(
            self.config.policy,
            self.run.time_left,
            self.run.time_elapsed,
            self.run.max_combo,
        );
        let final_score = self.run.score.saturating_add(bonus.total());
        self.run.total_score = self.run.total_score.saturating_add(final_score);

        let summary = LevelSummary {
            level: self.run.level,
            mode: self.run.mode,
            score: self.run.score,
            time_bonus: bonus.time_bonus,
            combo_bonus: bonus.combo_bonus,
            final_score,
            total_score: self.run.total_score,
            time_left: self.run.time_left,
            time_elapsed: self.run.time_elapsed,
            max_combo: self.run.max_combo,
            moves: self.run.moves,
            board_cleared,
        };
        log::info!(
            "level {} complete: {} points (+{} bonus), total {}",
            summary.level,
            summary.score,
            bonus.total(),
            summary.total_score
        );
        self.events.push(GameEvent::LevelCompleted {
            level: summary.level,
            final_score,
            total_score: summary.total_score,
            board_cleared,
        });
        self.level_summary = Some(summary);

        let outcome = LevelOutcome {
            level: self.run.level,
            mode: self.run.mode,
            time_left: self.run.time_left,
            max_combo: self.run.max_combo,
            total_score: self.run.total_score,
            health_kept: self.run.health >= self.level_start_health,
        };
        for id in self.achievements.on_level_completed(&outcome) {
            self.announce(id);
        }
    }

    /// Advance to the next level after a completed one.
    pub fn next_level(&mut self) -> bool {
        if self.phase != Phase::Completed {
            return false;
        }
        self.run.level = self.run.level.saturating_add(1);
        self.start_level();
        true
    }

    /// Play the completed level again on a fresh board.
    pub fn replay(&mut self) -> bool {
        if self.phase != Phase::Completed {
            return false;
        }
        self.start_level();
        true
    }

    /// Fresh run from level 1, started immediately. Achievements are kept.
    pub fn restart(&mut self) -> bool {
        self.countdown.cancel();
        self.reset_run();
        self.episode_id = self.episode_id.wrapping_add(1);
        self.start_level();
        true
    }

    /// Back to `Idle` at level 1 (leave to menu). Achievements are kept.
    pub fn reset(&mut self) {
        self.countdown.cancel();
        self.reset_run();
        self.phase = Phase::Idle;
        self.board = generate(1, self.run.mode, &mut self.rng);
        self.level_summary = None;
        self.game_over_summary = None;
    }

    fn reset_run(&mut self) {
        self.run = RunState::new(self.run.mode);
        self.run.health = self.config.initial_health;
        self.run.time_left = self.config.time_limit(1);
        self.selection.clear();
        self.hint.clear();
    }

    /// Change mode; only allowed while no level is on the board.
    pub fn set_mode(&mut self, mode: GameMode) -> bool {
        if self.phase.in_level() {
            return false;
        }
        self.config.mode = mode;
        self.run.mode = mode;
        if self.phase == Phase::Idle {
            self.board = generate(self.run.level, mode, &mut self.rng);
        }
        true
    }

    /// Find a valid combination on the board and highlight it.
    pub fn hint(&mut self) -> Option<Vec<TileId>> {
        if self.phase != Phase::Active {
            return None;
        }
        let tiles: Vec<(TileId, u32)> = self.board.tiles().map(|t| (t.id, t.value)).collect();
        let found = find_combination(&tiles, self.run.mode)?;
        self.hint = found.clone();
        self.events.push(GameEvent::HintShown {
            tiles: found.clone(),
        });
        Some(found)
    }

    /// Apply a view command.
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::Start => self.start(),
            GameAction::Toggle(id) => self.toggle(id),
            GameAction::Select { row, col } => self.select_at(row as usize, col as usize),
            GameAction::Pause => self.pause(),
            GameAction::Resume => self.resume(),
            GameAction::TogglePause => self.toggle_pause(),
            GameAction::NextLevel => self.next_level(),
            GameAction::Replay => self.replay(),
            GameAction::Restart => self.restart(),
            GameAction::Hint => self.hint().is_some(),
            GameAction::SetMode(mode) => self.set_mode(mode),
        }
    }

    /// Durable progress for saving.
    ///
    /// A completed level is already paid into `total_score`, so the saved game
    /// resumes at the next level. A lost run resumes from level 1 with nothing
    /// banked; achievements survive both.
    pub fn progress(&self) -> Progress {
        let (level, total_score) = match self.phase {
            Phase::Completed => (self.run.level.saturating_add(1), self.run.total_score),
            Phase::Failed => (1, 0),
            _ => (self.run.level, self.run.total_score),
        };
        Progress {
            level,
            total_score,
            mode: self.run.mode,
            achievements: self.achievements.iter().copied().collect(),
        }
    }

    /// Load saved progress. Only allowed while no level is on the board.
    ///
    /// Achievements are merged, never lowered.
    pub fn restore(&mut self, progress: &Progress) -> bool {
        if self.phase.in_level() {
            return false;
        }
        self.run.level = progress.level.max(1);
        self.run.total_score = progress.total_score;
        self.run.mode = progress.mode;
        self.config.mode = progress.mode;
        self.run.time_left = self.config.time_limit(self.run.level);
        self.achievements.restore(progress.achievements.iter());
        self.phase = Phase::Idle;
        self.board = generate(self.run.level, self.run.mode, &mut self.rng);
        true
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.board_size = self.board.size();
        out.cells.clear();
        for row in 0..self.board.size() {
            for col in 0..self.board.size() {
                out.cells.push(self.board.get(row, col).map(|t| TileSnapshot {
                    id: t.id,
                    value: t.value,
                    selected: self.selection.contains(t.id),
                    hinted: self.hint.contains(&t.id),
                }));
            }
        }
        out.selected.clear();
        out.selected.extend_from_slice(self.selection.ids());
        out.phase = self.phase;
        out.mode = self.run.mode;
        out.policy = self.config.policy;
        out.level = self.run.level;
        out.score = self.run.score;
        out.total_score = self.run.total_score;
        out.health = self.run.health;
        out.combo = self.run.combo;
        out.max_combo = self.run.max_combo;
        out.time_left = self.run.time_left;
        out.time_elapsed = self.run.time_elapsed;
        out.moves = self.run.moves;
        out.episode_id = self.episode_id;
        out.seed = self.seed;
        out.achievements_unlocked = self.achievements.unlocked_count();
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Replace the board (level setup for tests and puzzles).
    pub fn set_board(&mut self, board: Board) {
        self.board = board;
        self.selection.clear();
        self.hint.clear();
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(GameConfig::default(), 1)
    }
}
