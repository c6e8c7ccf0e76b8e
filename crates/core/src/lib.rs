//! Core game logic - pure, deterministic, and testable
//!
//! Everything that decides what happens in a game of Make It 12 lives here:
//! board generation, combination checks, the selection state machine, scoring,
//! achievements and the level lifecycle. There is no I/O; time arrives as ticks
//! and results leave as events and snapshots.
//!
//! - **Deterministic**: the same seed produces the same boards
//! - **Testable**: every rule has unit tests next to it
//! - **Portable**: drive it from a terminal, a socket or a test
//!
//! # Module Structure
//!
//! - [`rng`]: seeded LCG used for every random draw
//! - [`board`]: square grid of numbered tiles with gravity and refill
//! - [`generator`]: solvable boards from curated seed groups plus filler
//! - [`evaluator`]: does a selection make 12, and with which operation
//! - [`search`]: is any match left on the board, and which one (hints)
//! - [`selection`]: toggle state machine over the selected tiles
//! - [`scoring`]: per-match points, combo and end-of-level bonus
//! - [`run`]: level, score and timing counters
//! - [`achievements`]: one-way unlocks with progress
//! - [`timer`]: cancelable countdown with stale-tick protection
//! - [`game`]: the lifecycle controller tying it all together
//! - [`snapshot`]: serializable read models for views
//!
//! # Example
//!
//! ```
//! use make_it_12_core::{Board, Game, GameConfig};
//! use make_it_12_types::{GameAction, Phase};
//!
//! let mut game = Game::new(GameConfig::default(), 12345);
//! game.apply_action(GameAction::Start);
//! game.set_board(Board::from_values(2, &[3, 9, 1, 1]));
//!
//! game.apply_action(GameAction::Select { row: 0, col: 0 });
//! game.apply_action(GameAction::Select { row: 0, col: 1 });
//!
//! // 3 + 9 = 12, and 1 + 1 can never make 12: the level is over.
//! assert!(game.score() > 0);
//! assert_eq!(game.phase(), Phase::Completed);
//! ```
//!
//! # Timing
//!
//! A level counts down from `60 + level * 5` seconds. Drive it either with
//! [`Game::tick`] using the handle from [`Game::timer`] once per second, or with
//! [`Game::advance`] and elapsed milliseconds.

pub use make_it_12_types as types;

pub mod achievements;
pub mod board;
pub mod evaluator;
pub mod game;
pub mod generator;
pub mod rng;
pub mod run;
pub mod scoring;
pub mod search;
pub mod selection;
pub mod snapshot;
pub mod timer;

pub use achievements::{Achievement, AchievementTracker, LevelOutcome};
pub use board::{Board, Tile};
pub use evaluator::{can_extend, evaluate, is_valid_match};
pub use game::{Game, GameConfig, Progress};
pub use generator::{board_size, generate};
pub use rng::SimpleRng;
pub use run::RunState;
pub use scoring::{LevelBonus, MatchScore};
pub use search::{find_combination, has_valid_combination};
pub use selection::{Selection, SelectionOutcome};
pub use snapshot::{GameOverSummary, GameSnapshot, LevelSummary, TileSnapshot};
pub use timer::{Countdown, TimerHandle};
