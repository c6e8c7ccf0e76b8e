//! Scoring and combo rules
//!
//! Two policies exist and a game uses exactly one of them:
//!
//! | Policy | Per match | Combo starts at | Level time bonus |
//! |---|---|---|---|
//! | Additive | `100 + combo*50 + floor(time_left/10)*10` | 1 | `time_left * 2` |
//! | Multiplicative | `tiles*100 * 2^combo` | 0 | `max(0, 300 - elapsed) * 10` |
//!
//! Both use the combo *before* it is incremented, and both add
//! `max_combo * 100` once when the level completes. The combo never decays
//! within a level.

use serde::Serialize;

use crate::run::RunState;
use crate::types::{
    ScorePolicy, COMBO_BONUS_PER_STEP, COMBO_STEP_SCORE, ELAPSED_BONUS_FACTOR, ELAPSED_PAR_SECS,
    MATCH_BASE_SCORE, TILE_SCORE, TIME_LEFT_BONUS_FACTOR,
};

/// Points awarded for one match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MatchScore {
    pub base: u32,
    pub combo_bonus: u32,
    pub time_bonus: u32,
    pub total: u32,
}

/// End-of-level bonus breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LevelBonus {
    pub time_bonus: u32,
    pub combo_bonus: u32,
}

impl LevelBonus {
    pub fn total(&self) -> u32 {
        self.time_bonus.saturating_add(self.combo_bonus)
    }
}

/// Combo value at level start.
pub fn initial_combo(policy: ScorePolicy) -> u32 {
    match policy {
        ScorePolicy::Additive => 1,
        ScorePolicy::Multiplicative => 0,
    }
}

/// Score a match of `tiles` tiles with the current combo.
pub fn score_match(policy: ScorePolicy, tiles: usize, combo: u32, time_left: u32) -> MatchScore {
    match policy {
        ScorePolicy::Additive => {
            let combo_bonus = combo.saturating_mul(COMBO_STEP_SCORE);
            let time_bonus = (time_left / 10) * 10;
            MatchScore {
                base: MATCH_BASE_SCORE,
                combo_bonus,
                time_bonus,
                total: MATCH_BASE_SCORE
                    .saturating_add(combo_bonus)
                    .saturating_add(time_bonus),
            }
        }
        ScorePolicy::Multiplicative => {
            let base = (tiles as u32).saturating_mul(TILE_SCORE);
            let multiplier = 1u32.checked_shl(combo).unwrap_or(u32::MAX);
            let total = base.saturating_mul(multiplier);
            MatchScore {
                base,
                combo_bonus: total - base,
                time_bonus: 0,
                total,
            }
        }
    }
}

/// Apply a match to the run: add points, then advance the combo.
pub fn apply_match(policy: ScorePolicy, run: &mut RunState, tiles: usize) -> MatchScore {
    let scored = score_match(policy, tiles, run.combo, run.time_left);
    run.score = run.score.saturating_add(scored.total);
    run.combo = run.combo.saturating_add(1);
    run.max_combo = run.max_combo.max(run.combo);
    scored
}

/// Bonus added once when a level completes.
pub fn level_bonus(policy: ScorePolicy, time_left: u32, time_elapsed: u32, max_combo: u32) -> LevelBonus {
    let time_bonus = match policy {
        ScorePolicy::Additive => time_left.saturating_mul(TIME_LEFT_BONUS_FACTOR),
        ScorePolicy::Multiplicative => {
            ELAPSED_PAR_SECS.saturating_sub(time_elapsed) * ELAPSED_BONUS_FACTOR
        }
    };
    LevelBonus {
        time_bonus,
        combo_bonus: max_combo.saturating_mul(COMBO_BONUS_PER_STEP),
    }
}
