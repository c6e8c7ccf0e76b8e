//! Achievement tracker
//!
//! Progress only grows and `unlocked` is a one-way latch; re-checking an
//! unlocked achievement does nothing. Each hook returns the ids that were
//! unlocked by that call so the caller can announce them exactly once.

use serde::{Deserialize, Serialize};

use crate::types::{
    AchievementId, Expression, GameMode, Operation, PERFECT_SCORE_THRESHOLD, SPEED_DEMON_SECS_LEFT,
    TARGET_SUM,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: AchievementId,
    pub unlocked: bool,
    pub progress: u32,
    pub max_progress: u32,
}

impl Achievement {
    pub fn new(id: AchievementId) -> Self {
        Self {
            id,
            unlocked: false,
            progress: 0,
            max_progress: id.max_progress(),
        }
    }

    /// Raise progress to at least `value`. Returns true if this call unlocked it.
    pub fn raise(&mut self, value: u32) -> bool {
        if self.unlocked {
            return false;
        }
        self.progress = self.progress.max(value.min(self.max_progress));
        if self.progress >= self.max_progress {
            self.unlocked = true;
            return true;
        }
        false
    }

    pub fn advance(&mut self, step: u32) -> bool {
        self.raise(self.progress.saturating_add(step))
    }

    /// Unlock outright, filling progress.
    pub fn unlock(&mut self) -> bool {
        self.raise(self.max_progress)
    }
}

/// Facts about a completed level used by the level hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelOutcome {
    pub level: u32,
    pub mode: GameMode,
    pub time_left: u32,
    pub max_combo: u32,
    /// Total after this level's final score was added.
    pub total_score: u32,
    /// Health at completion equals health at level start.
    pub health_kept: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AchievementTracker {
    items: Vec<Achievement>,
}

impl AchievementTracker {
    pub fn new() -> Self {
        Self {
            items: AchievementId::ALL.iter().map(|&id| Achievement::new(id)).collect(),
        }
    }

    fn entry(&mut self, id: AchievementId) -> Option<&mut Achievement> {
        self.items.iter_mut().find(|a| a.id == id)
    }

    pub fn get(&self, id: AchievementId) -> Option<&Achievement> {
        self.items.iter().find(|a| a.id == id)
    }

    pub fn is_unlocked(&self, id: AchievementId) -> bool {
        self.get(id).is_some_and(|a| a.unlocked)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Achievement> + '_ {
        self.items.iter()
    }

    pub fn unlocked_count(&self) -> usize {
        self.items.iter().filter(|a| a.unlocked).count()
    }

    pub fn unlock(&mut self, id: AchievementId) -> bool {
        self.entry(id).is_some_and(Achievement::unlock)
    }

    fn raise(&mut self, id: AchievementId, value: u32) -> bool {
        self.entry(id).is_some_and(|a| a.raise(value))
    }

    fn advance(&mut self, id: AchievementId) -> bool {
        self.entry(id).is_some_and(|a| a.advance(1))
    }

    /// Hook run after every match.
    ///
    /// A two-operand match credits multiplication and division independently,
    /// so `12 / 1` still counts as a division even though `12 * 1` is found first.
    pub fn on_match(
        &mut self,
        expression: &Expression,
        values: &[u32],
        max_combo: u32,
    ) -> Vec<AchievementId> {
        let mut unlocked = Vec::new();
        if self.raise(AchievementId::ComboMaster, max_combo) {
            unlocked.push(AchievementId::ComboMaster);
        }
        if let (Expression::Binary { .. }, &[a, b]) = (expression, values) {
            let (a, b) = (i64::from(a), i64::from(b));
            let target = Some(i64::from(TARGET_SUM));
            let credits = [
                (
                    AchievementId::MultiplicationMaster,
                    Operation::Multiply.apply_i64(a, b) == target,
                ),
                (
                    AchievementId::DivisionExpert,
                    Operation::Divide.apply_i64(a, b) == target
                        || Operation::Divide.apply_i64(b, a) == target,
                ),
            ];
            for (id, hit) in credits {
                if hit && self.unlock(id) {
                    unlocked.push(id);
                }
            }
        }
        unlocked
    }

    /// Hook run once per completed level.
    pub fn on_level_completed(&mut self, outcome: &LevelOutcome) -> Vec<AchievementId> {
        let mut unlocked = Vec::new();
        let mut note = |id: AchievementId, hit: bool| {
            if hit {
                unlocked.push(id);
            }
        };

        if outcome.level == 1 {
            let hit = self.unlock(AchievementId::FirstLevel);
            note(AchievementId::FirstLevel, hit);
        }
        let hit = self.raise(AchievementId::ComboMaster, outcome.max_combo);
        note(AchievementId::ComboMaster, hit);
        if outcome.time_left >= SPEED_DEMON_SECS_LEFT {
            let hit = self.unlock(AchievementId::SpeedDemon);
            note(AchievementId::SpeedDemon, hit);
        }
        if outcome.total_score >= PERFECT_SCORE_THRESHOLD {
            let hit = self.unlock(AchievementId::PerfectScore);
            note(AchievementId::PerfectScore, hit);
        }
        if outcome.health_kept {
            let hit = self.advance(AchievementId::Survivor);
            note(AchievementId::Survivor, hit);
        }
        if outcome.mode == GameMode::MathOperations {
            let hit = self.advance(AchievementId::MathWizard);
            note(AchievementId::MathWizard, hit);
        }
        unlocked
    }

    /// Merge saved achievements in without ever lowering progress or relocking.
    pub fn restore<'a>(&mut self, saved: impl IntoIterator<Item = &'a Achievement>) {
        for s in saved {
            if let Some(a) = self.entry(s.id) {
                if s.unlocked {
                    a.unlock();
                } else {
                    a.raise(s.progress);
                }
            }
        }
    }
}

impl Default for AchievementTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(level: u32) -> LevelOutcome {
        LevelOutcome {
            level,
            mode: GameMode::Addition,
            time_left: 10,
            max_combo: 1,
            total_score: 100,
            health_kept: false,
        }
    }

    #[test]
    fn test_unlock_is_a_latch() {
        let mut a = Achievement::new(AchievementId::Survivor);
        assert!(!a.advance(1));
        assert_eq!(a.progress, 1);
        assert!(a.raise(9));
        assert!(a.unlocked);
        assert_eq!(a.progress, 5);
        assert!(!a.unlock());
        assert!(!a.raise(0));
        assert!(a.unlocked);
        assert_eq!(a.progress, 5);
    }

    #[test]
    fn test_first_level_once() {
        let mut t = AchievementTracker::new();
        assert_eq!(t.on_level_completed(&outcome(1)), vec![AchievementId::FirstLevel]);
        assert!(t.on_level_completed(&outcome(1)).is_empty());
        assert!(t.on_level_completed(&outcome(2)).is_empty());
        assert_eq!(t.unlocked_count(), 1);
    }

    #[test]
    fn test_combo_master_threshold() {
        let mut t = AchievementTracker::new();
        let sum = Expression::Sum { terms: 2 };
        assert!(t.on_match(&sum, &[5, 7], 4).is_empty());
        assert_eq!(t.get(AchievementId::ComboMaster).map(|a| a.progress), Some(4));
        assert_eq!(t.on_match(&sum, &[5, 7], 5), vec![AchievementId::ComboMaster]);
        assert!(t.on_match(&sum, &[5, 7], 9).is_empty());
    }

    #[test]
    fn test_operation_achievements() {
        let mut t = AchievementTracker::new();
        let mul = Expression::Binary { op: Operation::Multiply, reversed: false };
        let div = Expression::Binary { op: Operation::Divide, reversed: true };
        let ternary = Expression::Ternary { first: Operation::Multiply, second: Operation::Add };

        assert!(t.on_match(&ternary, &[2, 5, 2], 0).is_empty());
        assert_eq!(t.on_match(&mul, &[3, 4], 0), vec![AchievementId::MultiplicationMaster]);
        assert_eq!(t.on_match(&div, &[2, 24], 0), vec![AchievementId::DivisionExpert]);
        assert!(t.on_match(&div, &[2, 24], 0).is_empty());
    }

    #[test]
    fn test_pair_credits_both_operations() {
        let mut t = AchievementTracker::new();
        // 12 * 1 is the reported arrangement, 12 / 1 holds as well.
        let mul = Expression::Binary { op: Operation::Multiply, reversed: false };
        assert_eq!(
            t.on_match(&mul, &[12, 1], 0),
            vec![AchievementId::MultiplicationMaster, AchievementId::DivisionExpert]
        );

        let mut t = AchievementTracker::new();
        let add = Expression::Binary { op: Operation::Add, reversed: false };
        assert!(t.on_match(&add, &[10, 2], 0).is_empty());
    }

    #[test]
    fn test_progress_achievements() {
        let mut t = AchievementTracker::new();
        let mut o = outcome(2);
        o.mode = GameMode::MathOperations;
        o.health_kept = true;

        for _ in 0..2 {
            assert!(t.on_level_completed(&o).is_empty());
        }
        assert_eq!(t.on_level_completed(&o), vec![AchievementId::MathWizard]);
        assert!(t.on_level_completed(&o).is_empty());
        assert_eq!(t.on_level_completed(&o), vec![AchievementId::Survivor]);
    }

    #[test]
    fn test_speed_and_score_thresholds() {
        let mut t = AchievementTracker::new();
        let mut o = outcome(3);
        o.time_left = 30;
        o.total_score = 1000;
        assert_eq!(
            t.on_level_completed(&o),
            vec![AchievementId::SpeedDemon, AchievementId::PerfectScore]
        );
    }

    #[test]
    fn test_restore_never_lowers() {
        let mut t = AchievementTracker::new();
        t.unlock(AchievementId::SpeedDemon);
        let mut survivor = Achievement::new(AchievementId::Survivor);
        survivor.progress = 3;
        let mut stale = Achievement::new(AchievementId::SpeedDemon);
        stale.unlocked = false;

        t.restore([&survivor, &stale]);
        assert!(t.is_unlocked(AchievementId::SpeedDemon));
        assert_eq!(t.get(AchievementId::Survivor).map(|a| a.progress), Some(3));
    }
}
