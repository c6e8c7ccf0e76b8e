use std::cmp::Ordering;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use make_it_12_types::GameMode;

/// A player as stored by the record service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: String,
    pub name: String,
    /// Display form, e.g. `(555) 123-4567`.
    pub phone: String,
    pub high_score: u32,
    pub current_level: u32,
    pub games_played: u32,
    pub total_score: u64,
    pub best_combo: u32,
    /// Milliseconds since the Unix epoch.
    pub last_played: u64,
    pub game_mode: GameMode,
}

impl PlayerRecord {
    pub fn new(id: String, name: String, phone: String, now: u64) -> Self {
        Self {
            id,
            name,
            phone,
            high_score: 0,
            current_level: 1,
            games_played: 0,
            total_score: 0,
            best_combo: 0,
            last_played: now,
            game_mode: GameMode::Addition,
        }
    }

    /// Fold a finished game into the record.
    pub fn apply_score(&mut self, update: &ScoreUpdate, now: u64) {
        self.high_score = self.high_score.max(update.score);
        self.current_level = update.level;
        self.games_played = self.games_played.saturating_add(1);
        self.total_score = self.total_score.saturating_add(u64::from(update.score));
        self.best_combo = self.best_combo.max(update.combo);
        self.last_played = now;
        self.game_mode = update.mode;
    }

    pub fn stats(&self) -> PlayerStats {
        let average_score = if self.games_played > 0 {
            let games = u64::from(self.games_played);
            // round half up
            ((self.total_score + games / 2) / games) as u32
        } else {
            0
        };
        PlayerStats {
            record: self.clone(),
            average_score,
        }
    }
}

/// Leaderboard order: high score, then level, both descending.
///
/// Ties keep the order the caller supplies (creation order for stored records).
pub fn rank_order(a: &PlayerRecord, b: &PlayerRecord) -> Ordering {
    b.high_score
        .cmp(&a.high_score)
        .then_with(|| b.current_level.cmp(&a.current_level))
}

/// Result of one game, sent after it ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreUpdate {
    pub score: u32,
    pub level: u32,
    pub combo: u32,
    pub mode: GameMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// 1-based.
    pub rank: u32,
    #[serde(flatten)]
    pub record: PlayerRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ranking {
    pub rank: u32,
    pub total_players: u32,
    pub player: LeaderboardEntry,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    #[serde(flatten)]
    pub record: PlayerRecord,
    pub average_score: u32,
}

pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, high: u32, level: u32) -> PlayerRecord {
        let mut r = PlayerRecord::new(id.into(), "Ada".into(), "(555) 000-0000".into(), 0);
        r.high_score = high;
        r.current_level = level;
        r
    }

    #[test]
    fn apply_score_keeps_bests() {
        let mut r = record("a", 500, 3);
        r.best_combo = 6;
        r.apply_score(
            &ScoreUpdate {
                score: 300,
                level: 4,
                combo: 2,
                mode: GameMode::MathOperations,
            },
            99,
        );
        assert_eq!(r.high_score, 500);
        assert_eq!(r.best_combo, 6);
        assert_eq!(r.current_level, 4);
        assert_eq!(r.games_played, 1);
        assert_eq!(r.total_score, 300);
        assert_eq!(r.last_played, 99);
        assert_eq!(r.game_mode, GameMode::MathOperations);
    }

    #[test]
    fn average_rounds() {
        let mut r = record("a", 0, 1);
        assert_eq!(r.stats().average_score, 0);
        r.games_played = 2;
        r.total_score = 301;
        assert_eq!(r.stats().average_score, 151);
        r.games_played = 3;
        r.total_score = 100;
        assert_eq!(r.stats().average_score, 33);
    }

    #[test]
    fn ranking_order() {
        let mut v = vec![record("a", 100, 2), record("b", 300, 1), record("c", 100, 5), record("d", 100, 2)];
        v.sort_by(rank_order);
        let ids: Vec<_> = v.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["b", "c", "a", "d"]);
    }
}
