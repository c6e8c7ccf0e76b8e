//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! Everything here is plain data, usable from the engine, the persistence layer,
//! the record service and any view that renders game state.
//!
//! # Target
//!
//! Every match must reach [`TARGET_SUM`] (12). In [`GameMode::Addition`] the selected
//! values are summed; in [`GameMode::MathOperations`] two or three operands are combined
//! with `+ - * /` in a fixed set of arrangements.
//!
//! # Board Dimensions
//!
//! Boards are square. The side grows with the level and is clamped:
//!
//! | Level | Side |
//! |-------|------|
//! | 1-2 | 4 |
//! | 3-5 | 5 |
//! | 6-8 | 6 |
//! | 9-11 | 7 |
//! | 12+ | 8 |
//!
//! # Timing
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 1000 | Countdown tick interval |
//! | `BASE_TIME_SECS` | 60 | Time limit before the per-level extension |
//! | `TIME_PER_LEVEL_SECS` | 5 | Extra seconds granted per level |
//!
//! # Examples
//!
//! ```
//! use make_it_12_types::{GameAction, GameMode, Operation, TARGET_SUM};
//!
//! assert_eq!(GameMode::from_str("math"), Some(GameMode::MathOperations));
//! assert_eq!(GameMode::Addition.as_str(), "addition");
//! assert_eq!(Operation::Multiply.apply_i64(3, 4), Some(TARGET_SUM as i64));
//! assert_eq!(GameAction::from_str("pause"), Some(GameAction::Pause));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Value every match has to reach.
pub const TARGET_SUM: u32 = 12;

/// Smallest board side.
pub const MIN_BOARD_SIZE: usize = 4;

/// Largest board side.
pub const MAX_BOARD_SIZE: usize = 8;

/// Upper bound on cells for any level (8x8).
pub const MAX_CELLS: usize = MAX_BOARD_SIZE * MAX_BOARD_SIZE;

/// Operand limit in math-operations mode.
pub const MAX_MATH_OPERANDS: usize = 3;

/// Countdown tick interval in milliseconds.
pub const TICK_MS: u32 = 1000;

/// Time limit base in seconds.
pub const BASE_TIME_SECS: u32 = 60;

/// Extra seconds granted per level.
pub const TIME_PER_LEVEL_SECS: u32 = 5;

/// Health at the start of a run.
pub const INITIAL_HEALTH: u32 = 3;

/// Largest filler value in addition mode (1..=9).
pub const ADDITION_FILLER_MAX: u32 = 9;

/// Largest filler value in math-operations mode (1..=20, never the target).
pub const MATH_FILLER_MAX: u32 = 20;

/// Flat points per match under the additive policy.
pub const MATCH_BASE_SCORE: u32 = 100;

/// Points per combo step under the additive policy.
pub const COMBO_STEP_SCORE: u32 = 50;

/// Points per tile under the multiplicative policy.
pub const TILE_SCORE: u32 = 100;

/// End-of-level points per max-combo step.
pub const COMBO_BONUS_PER_STEP: u32 = 100;

/// End-of-level points per second left (countdown variant).
pub const TIME_LEFT_BONUS_FACTOR: u32 = 2;

/// Par time in seconds for the elapsed-time bonus.
pub const ELAPSED_PAR_SECS: u32 = 300;

/// End-of-level points per second under par (elapsed variant).
pub const ELAPSED_BONUS_FACTOR: u32 = 10;

/// Combo needed for `combo_master`.
///
/// Compared against the displayed combo, which starts at 1 under the additive
/// policy: the fourth match in a row reaches a 5x combo. A multiplicative run
/// starts at 0 and needs five matches.
pub const COMBO_MASTER_THRESHOLD: u32 = 5;

/// Seconds left needed for `speed_demon`.
pub const SPEED_DEMON_SECS_LEFT: u32 = 30;

/// Cumulative score needed for `perfect_score`.
pub const PERFECT_SCORE_THRESHOLD: u32 = 1000;

/// Levels without health loss needed for `survivor`.
pub const SURVIVOR_LEVELS: u32 = 5;

/// Math-operations levels needed for `math_wizard`.
pub const MATH_WIZARD_LEVELS: u32 = 3;

/// Time limit for a level in seconds.
///
/// ```
/// use make_it_12_types::time_limit_secs;
///
/// assert_eq!(time_limit_secs(1), 65);
/// assert_eq!(time_limit_secs(4), 80);
/// ```
pub fn time_limit_secs(level: u32) -> u32 {
    BASE_TIME_SECS.saturating_add(level.saturating_mul(TIME_PER_LEVEL_SECS))
}


/// Arithmetic rules a level is played with.
///
/// Fixed for the duration of a level; only changeable between levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameMode {
    /// Selected values must sum to the target.
    #[default]
    #[serde(rename = "addition")]
    Addition,
    /// Two or three operands combined with `+ - * /`.
    #[serde(rename = "math")]
    MathOperations,
}

impl GameMode {
    /// Parse mode from string (case-insensitive)
    ///
    /// ```
    /// use make_it_12_types::GameMode;
    ///
    /// assert_eq!(GameMode::from_str("Addition"), Some(GameMode::Addition));
    /// assert_eq!(GameMode::from_str("+"), Some(GameMode::Addition));
    /// assert_eq!(GameMode::from_str("math_operations"), Some(GameMode::MathOperations));
    /// assert_eq!(GameMode::from_str("chess"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "addition" | "add" | "+" => Some(GameMode::Addition),
            "math" | "math_operations" | "mathoperations" | "ops" => Some(GameMode::MathOperations),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Addition => "addition",
            GameMode::MathOperations => "math",
        }
    }

    /// Short badge shown next to the score.
    pub fn badge(&self) -> &'static str {
        match self {
            GameMode::Addition => "+",
            GameMode::MathOperations => "±×÷",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Binary arithmetic operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    pub fn symbol(&self) -> char {
        match self {
            Operation::Add => '+',
            Operation::Subtract => '-',
            Operation::Multiply => '*',
            Operation::Divide => '/',
        }
    }

    /// `*` and `/` bind tighter than `+` and `-`.
    pub fn binds_tighter_than(&self, other: Operation) -> bool {
        matches!(self, Operation::Multiply | Operation::Divide)
            && matches!(other, Operation::Add | Operation::Subtract)
    }

    /// Integer application; `None` for division by zero or an inexact quotient.
    pub fn apply_i64(&self, a: i64, b: i64) -> Option<i64> {
        match self {
            Operation::Add => a.checked_add(b),
            Operation::Subtract => a.checked_sub(b),
            Operation::Multiply => a.checked_mul(b),
            Operation::Divide => {
                if b == 0 || a % b != 0 {
                    None
                } else {
                    Some(a / b)
                }
            }
        }
    }
}

/// Arrangement of operations that satisfied a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expression {
    /// Addition mode: every selected value summed.
    Sum { terms: usize },
    /// `a op b`, or `b op a` when `reversed`.
    Binary { op: Operation, reversed: bool },
    /// `a first b second c` with the usual precedence.
    Ternary { first: Operation, second: Operation },
}

impl Expression {
    /// Operation of a two-operand match.
    pub fn binary_op(&self) -> Option<Operation> {
        match self {
            Expression::Binary { op, .. } => Some(*op),
            _ => None,
        }
    }

    /// Render with concrete operand values, e.g. `15 - 3`.
    ///
    /// ```
    /// use make_it_12_types::{Expression, Operation};
    ///
    /// let e = Expression::Binary { op: Operation::Divide, reversed: true };
    /// assert_eq!(e.render(&[2, 24]), "24 / 2");
    /// let e = Expression::Sum { terms: 3 };
    /// assert_eq!(e.render(&[3, 4, 5]), "3 + 4 + 5");
    /// ```
    pub fn render(&self, values: &[u32]) -> String {
        match (self, values) {
            (Expression::Sum { .. }, _) => values
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(" + "),
            (Expression::Binary { op, reversed }, [a, b]) => {
                let (l, r) = if *reversed { (b, a) } else { (a, b) };
                format!("{} {} {}", l, op.symbol(), r)
            }
            (Expression::Ternary { first, second }, [a, b, c]) => {
                format!("{} {} {} {} {}", a, first.symbol(), b, second.symbol(), c)
            }
            _ => String::new(),
        }
    }
}

/// Stable tile identifier, unique within a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(pub u32);

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Level lifecycle phase.
///
/// `Idle -> Active -> {Paused <-> Active} -> Completed | Failed -> Idle`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Active,
    Paused,
    Completed,
    Failed,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Active => "active",
            Phase::Paused => "paused",
            Phase::Completed => "completed",
            Phase::Failed => "failed",
        }
    }

    /// A level is on the board (running or paused).
    pub fn in_level(&self) -> bool {
        matches!(self, Phase::Active | Phase::Paused)
    }
}

/// Scoring formula used for a whole game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorePolicy {
    /// `100 + combo*50 + floor(time_left/10)*10` per match; combo starts at 1.
    #[default]
    Additive,
    /// `tiles*100 * 2^combo` per match; combo starts at 0.
    Multiplicative,
}

impl ScorePolicy {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "additive" | "a" | "linear" => Some(ScorePolicy::Additive),
            "multiplicative" | "b" | "exponential" => Some(ScorePolicy::Multiplicative),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScorePolicy::Additive => "additive",
            ScorePolicy::Multiplicative => "multiplicative",
        }
    }
}

/// Named achievements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementId {
    FirstLevel,
    ComboMaster,
    SpeedDemon,
    PerfectScore,
    Survivor,
    MathWizard,
    MultiplicationMaster,
    DivisionExpert,
}

impl AchievementId {
    pub const ALL: [AchievementId; 8] = [
        AchievementId::FirstLevel,
        AchievementId::ComboMaster,
        AchievementId::SpeedDemon,
        AchievementId::PerfectScore,
        AchievementId::Survivor,
        AchievementId::MathWizard,
        AchievementId::MultiplicationMaster,
        AchievementId::DivisionExpert,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AchievementId::FirstLevel => "first_level",
            AchievementId::ComboMaster => "combo_master",
            AchievementId::SpeedDemon => "speed_demon",
            AchievementId::PerfectScore => "perfect_score",
            AchievementId::Survivor => "survivor",
            AchievementId::MathWizard => "math_wizard",
            AchievementId::MultiplicationMaster => "multiplication_master",
            AchievementId::DivisionExpert => "division_expert",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|id| id.as_str() == s)
    }

    pub fn title(&self) -> &'static str {
        match self {
            AchievementId::FirstLevel => "First Steps",
            AchievementId::ComboMaster => "Combo Master",
            AchievementId::SpeedDemon => "Speed Demon",
            AchievementId::PerfectScore => "Perfect Score",
            AchievementId::Survivor => "Survivor",
            AchievementId::MathWizard => "Math Wizard",
            AchievementId::MultiplicationMaster => "Multiplication Master",
            AchievementId::DivisionExpert => "Division Expert",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AchievementId::FirstLevel => "Complete your first level",
            AchievementId::ComboMaster => "Achieve a 5x combo",
            AchievementId::SpeedDemon => "Complete a level with 30 seconds to spare",
            AchievementId::PerfectScore => "Reach a total score of 1000",
            AchievementId::Survivor => "Complete 5 levels without losing health",
            AchievementId::MathWizard => "Complete 3 levels in Math Operations mode",
            AchievementId::MultiplicationMaster => "Use multiplication to make 12",
            AchievementId::DivisionExpert => "Use division to make 12",
        }
    }

    /// Progress needed to unlock.
    pub fn max_progress(&self) -> u32 {
        match self {
            AchievementId::ComboMaster => COMBO_MASTER_THRESHOLD,
            AchievementId::Survivor => SURVIVOR_LEVELS,
            AchievementId::MathWizard => MATH_WIZARD_LEVELS,
            _ => 1,
        }
    }
}

impl fmt::Display for AchievementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Commands a view (or test) can apply to a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Start the current level from `Idle`.
    Start,
    /// Toggle a tile by id.
    Toggle(TileId),
    /// Toggle the tile at a grid position.
    Select { row: u8, col: u8 },
    Pause,
    Resume,
    /// Pause when running, resume when paused.
    TogglePause,
    /// Advance after a completed level.
    NextLevel,
    /// Replay a completed level.
    Replay,
    /// Back to level 1 with a fresh run.
    Restart,
    /// Ask for a valid combination on the current board.
    Hint,
    /// Change mode between levels.
    SetMode(GameMode),
}

impl GameAction {
    /// Parse argument-free actions.
    ///
    /// ```
    /// use make_it_12_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("nextLevel"), Some(GameAction::NextLevel));
    /// assert_eq!(GameAction::from_str("HINT"), Some(GameAction::Hint));
    /// assert_eq!(GameAction::from_str("toggle"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "start" => Some(GameAction::Start),
            "pause" => Some(GameAction::Pause),
            "resume" => Some(GameAction::Resume),
            "togglepause" => Some(GameAction::TogglePause),
            "nextlevel" | "next" => Some(GameAction::NextLevel),
            "replay" => Some(GameAction::Replay),
            "restart" => Some(GameAction::Restart),
            "hint" => Some(GameAction::Hint),
            _ => None,
        }
    }
}

/// Why a selection was dropped without scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetReason {
    /// Addition sum went past the target.
    Overshoot,
    /// Math-operations selection hit the operand limit without a match.
    OperandLimit,
}

/// Observer stream emitted by the engine.
///
/// Views drain these after every input or tick and re-render from a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    LevelStarted {
        level: u32,
        mode: GameMode,
        board_size: usize,
        time_limit: u32,
    },
    TileToggled {
        tile: TileId,
        selected: bool,
    },
    Matched {
        tiles: Vec<TileId>,
        values: Vec<u32>,
        expression: Expression,
        points: u32,
        combo: u32,
    },
    SelectionReset {
        tiles: Vec<TileId>,
        reason: ResetReason,
    },
    Tick {
        time_left: u32,
    },
    Paused,
    Resumed,
    AchievementUnlocked(AchievementId),
    HintShown {
        tiles: Vec<TileId>,
    },
    LevelCompleted {
        level: u32,
        final_score: u32,
        total_score: u32,
        board_cleared: bool,
    },
    GameOver {
        level: u32,
        final_score: u32,
    },
}
