//! Save/load through the persistence facade, including damaged data.

use std::path::PathBuf;

use serde_json::Value;

use make_it_12::core::{Board, Game, GameConfig};
use make_it_12::store::{
    default_settings, FileStore, KeyValueStore, MemoryStore, Persistence, SavedState, STORAGE_KEY,
};
use make_it_12::types::{AchievementId, GameMode, Phase};

fn unique_temp_dir(tag: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    std::env::temp_dir().join(format!("make_it_12_{tag}_{nanos}"))
}

/// A game that has completed level 1 on a tiny board.
fn game_after_level_one() -> Game {
    let mut game = Game::new(GameConfig::default(), 11);
    game.start();
    game.set_board(Board::from_values(2, &[6, 6, 1, 1]));
    for col in 0..2 {
        let id = game.board().get(0, col).unwrap().id;
        game.toggle(id);
    }
    assert_eq!(game.phase(), Phase::Completed);
    game.next_level();
    game
}

#[test]
fn test_file_roundtrip_restores_progress() {
    let dir = unique_temp_dir("roundtrip");
    let game = game_after_level_one();
    let mut settings = default_settings();
    settings.insert("ai_assist_enabled".into(), Value::Bool(true));

    let mut persistence = Persistence::new(FileStore::new(&dir));
    persistence
        .save(&SavedState::capture(&game, &settings))
        .unwrap();
    assert!(dir.join(format!("{STORAGE_KEY}.json")).exists());

    let loaded = Persistence::new(FileStore::new(&dir)).load();
    assert_eq!(loaded.level, 2);
    assert_eq!(loaded.total_score, game.total_score());
    assert_eq!(loaded.setting_bool("ai_assist_enabled"), Some(true));

    let mut fresh = Game::new(GameConfig::default(), 99);
    assert!(loaded.apply(&mut fresh));
    assert_eq!(fresh.level(), 2);
    assert_eq!(fresh.total_score(), game.total_score());
    assert_eq!(fresh.phase(), Phase::Idle);
    assert_eq!(fresh.board().size(), 4);
    assert!(fresh.achievements().is_unlocked(AchievementId::FirstLevel));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_save_on_completion_resumes_at_next_level() {
    let mut game = Game::new(GameConfig::default(), 11);
    game.start();
    game.set_board(Board::from_values(2, &[6, 6, 1, 1]));
    for col in 0..2 {
        let id = game.board().get(0, col).unwrap().id;
        game.toggle(id);
    }
    assert_eq!(game.phase(), Phase::Completed);

    let saved = SavedState::capture(&game, &default_settings());
    assert_eq!(saved.level, 2);
    assert_eq!(saved.total_score, game.total_score());

    let mut fresh = Game::new(GameConfig::default(), 3);
    assert!(saved.apply(&mut fresh));
    assert_eq!(fresh.level(), 2);
    assert_eq!(fresh.total_score(), game.total_score());
}

#[test]
fn test_corrupt_file_falls_back_to_defaults() {
    let dir = unique_temp_dir("corrupt");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join(format!("{STORAGE_KEY}.json")), "{\"level\": 4, \"total_sc").unwrap();

    let loaded = Persistence::new(FileStore::new(&dir)).load();
    assert_eq!(loaded, SavedState::default());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_missing_dir_is_fresh_install() {
    let dir = unique_temp_dir("missing");
    let loaded = Persistence::new(FileStore::new(&dir)).load();
    assert_eq!(loaded.level, 1);
    assert_eq!(loaded.total_score, 0);
    assert!(loaded.achievements.is_empty());
}

#[test]
fn test_partial_document_keeps_known_fields() {
    let mut store = MemoryStore::new();
    store
        .put(
            STORAGE_KEY,
            r#"{"level": 0, "mode": "math", "settings": {"language": "fr"}}"#,
        )
        .unwrap();
    let loaded = Persistence::new(store).load();
    // Level 0 is repaired, missing settings are filled in.
    assert_eq!(loaded.level, 1);
    assert_eq!(loaded.mode, GameMode::MathOperations);
    assert_eq!(loaded.settings["language"], "fr");
    assert_eq!(loaded.setting_bool("sound_enabled"), Some(true));
}

#[test]
fn test_saved_achievements_never_regress() {
    let game = game_after_level_one();
    let mut saved = SavedState::capture(&game, &default_settings());
    // An older file that predates first_level being unlocked.
    if let Some(a) = saved.achievements.get_mut("first_level") {
        a.unlocked = false;
        a.progress = 0;
    }

    let mut live = game_after_level_one();
    live.reset();
    assert!(saved.apply(&mut live));
    assert!(live.achievements().is_unlocked(AchievementId::FirstLevel));
}

#[test]
fn test_restore_refused_mid_level() {
    let mut game = Game::new(GameConfig::default(), 1);
    game.start();
    let saved = SavedState {
        level: 7,
        ..SavedState::default()
    };
    assert!(!saved.apply(&mut game));
    assert_eq!(game.level(), 1);
}
