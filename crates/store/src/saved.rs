use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use make_it_12_core::{Achievement, Game, Progress};
use make_it_12_types::GameMode;

/// Player preferences with their out-of-the-box values.
pub fn default_settings() -> BTreeMap<String, Value> {
    let mut settings = BTreeMap::new();
    settings.insert("sound_enabled".to_string(), Value::Bool(true));
    settings.insert("music_enabled".to_string(), Value::Bool(true));
    settings.insert("ai_assist_enabled".to_string(), Value::Bool(false));
    settings.insert("language".to_string(), Value::from("en"));
    settings.insert("font_size".to_string(), Value::from("medium"));
    settings
}

/// What is written to the store between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SavedState {
    pub level: u32,
    pub total_score: u32,
    pub mode: GameMode,
    /// Keyed by achievement id (`first_level`, `combo_master`, ...).
    pub achievements: BTreeMap<String, Achievement>,
    pub settings: BTreeMap<String, Value>,
}

impl Default for SavedState {
    fn default() -> Self {
        Self {
            level: 1,
            total_score: 0,
            mode: GameMode::default(),
            achievements: BTreeMap::new(),
            settings: default_settings(),
        }
    }
}

impl SavedState {
    /// Take the durable part of a game plus the current settings.
    pub fn capture(game: &Game, settings: &BTreeMap<String, Value>) -> Self {
        let progress = game.progress();
        Self {
            level: progress.level,
            total_score: progress.total_score,
            mode: progress.mode,
            achievements: progress
                .achievements
                .into_iter()
                .map(|a| (a.id.as_str().to_string(), a))
                .collect(),
            settings: settings.clone(),
        }
    }

    pub fn progress(&self) -> Progress {
        Progress {
            level: self.level,
            total_score: self.total_score,
            mode: self.mode,
            achievements: self.achievements.values().copied().collect(),
        }
    }

    /// Load into a game that has no level on the board.
    pub fn apply(&self, game: &mut Game) -> bool {
        game.restore(&self.progress())
    }

    /// Repair values a hand-edited or older file could carry.
    pub fn sanitized(mut self) -> Self {
        self.level = self.level.max(1);
        for (key, value) in default_settings() {
            self.settings.entry(key).or_insert(value);
        }
        self
    }

    pub fn setting_bool(&self, key: &str) -> Option<bool> {
        self.settings.get(key).and_then(Value::as_bool)
    }
}
