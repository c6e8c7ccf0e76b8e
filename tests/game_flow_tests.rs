//! Lifecycle scenarios driven through the facade crate.

use make_it_12::core::{Board, Game, GameConfig};
use make_it_12::types::{
    AchievementId, Expression, GameAction, GameEvent, GameMode, Operation, Phase, ResetReason,
    ScorePolicy, TileId,
};

fn id_at(game: &Game, row: usize, col: usize) -> TileId {
    game.board().get(row, col).unwrap().id
}

fn math_config() -> GameConfig {
    GameConfig {
        mode: GameMode::MathOperations,
        ..GameConfig::default()
    }
}

fn started(config: GameConfig, values: &[u32], size: usize) -> Game {
    let mut game = Game::new(config, 9);
    assert!(game.apply_action(GameAction::Start));
    game.set_board(Board::from_values(size, values));
    game.take_events();
    game
}

/// Play the current level to completion by following hints.
fn autoplay_level(game: &mut Game) {
    for _ in 0..500 {
        if game.phase() != Phase::Active {
            break;
        }
        let hint = game.hint().expect("active level always has a match");
        for id in hint {
            assert!(game.toggle(id));
        }
    }
    assert_eq!(game.phase(), Phase::Completed);
}

#[test]
fn test_same_seed_same_game() {
    let mut a = Game::new(GameConfig::default(), 2024);
    let mut b = Game::new(GameConfig::default(), 2024);
    a.start();
    b.start();
    assert_eq!(a.snapshot(), b.snapshot());

    autoplay_level(&mut a);
    autoplay_level(&mut b);
    a.next_level();
    b.next_level();
    assert_eq!(a.snapshot(), b.snapshot());
    assert_eq!(a.total_score(), b.total_score());
}

#[test]
fn test_five_addition_levels_by_hint() {
    let mut game = Game::new(GameConfig::default(), 77);
    game.start();
    let mut last_total = 0;
    for level in 1..=5 {
        assert_eq!(game.level(), level);
        autoplay_level(&mut game);
        let summary = *game.level_summary().unwrap();
        assert_eq!(summary.level, level);
        assert_eq!(summary.final_score, summary.score + summary.time_bonus + summary.combo_bonus);
        assert_eq!(summary.total_score, last_total + summary.final_score);
        // No time passed, so the full countdown is paid out.
        assert_eq!(summary.time_bonus, (60 + level * 5) * 2);
        last_total = summary.total_score;
        assert!(game.next_level());
    }

    let achievements = game.achievements();
    assert!(achievements.is_unlocked(AchievementId::FirstLevel));
    assert!(achievements.is_unlocked(AchievementId::SpeedDemon));
    assert!(achievements.is_unlocked(AchievementId::PerfectScore));
    assert!(achievements.is_unlocked(AchievementId::Survivor));
    assert!(!achievements.is_unlocked(AchievementId::MathWizard));
    assert_eq!(game.level(), 6);
    assert_eq!(game.board().size(), 6);
}

#[test]
fn test_three_math_levels_unlock_math_wizard() {
    let mut game = Game::new(math_config(), 5);
    game.start();
    for _ in 0..3 {
        autoplay_level(&mut game);
        game.next_level();
    }
    assert!(game.achievements().is_unlocked(AchievementId::MathWizard));
}

#[test]
fn test_math_operations_unlock_by_operator() {
    let mut game = started(math_config(), &[3, 4, 24, 2], 2);
    game.toggle(id_at(&game, 0, 0));
    game.toggle(id_at(&game, 0, 1));
    let events = game.take_events();
    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::Matched {
            expression: Expression::Binary { op: Operation::Multiply, .. },
            ..
        }
    )));
    assert!(events.contains(&GameEvent::AchievementUnlocked(AchievementId::MultiplicationMaster)));

    // 24 and 2 are now alone on the bottom row.
    game.toggle(id_at(&game, 1, 0));
    game.toggle(id_at(&game, 1, 1));
    let events = game.take_events();
    assert!(events.contains(&GameEvent::AchievementUnlocked(AchievementId::DivisionExpert)));
    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::LevelCompleted { board_cleared: true, .. }
    )));
    assert_eq!(game.phase(), Phase::Completed);
}

#[test]
fn test_three_operand_match() {
    let mut game = started(math_config(), &[2, 5, 2, 7], 2);
    game.toggle(id_at(&game, 0, 0));
    game.toggle(id_at(&game, 0, 1));
    assert_eq!(game.selection().len(), 2);
    game.toggle(id_at(&game, 1, 0));
    let events = game.take_events();
    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::Matched { expression: Expression::Ternary { .. }, .. }
    )));
    // Only the 7 is left, which can never make 12.
    assert_eq!(game.phase(), Phase::Completed);
    assert!(!game.level_summary().unwrap().board_cleared);
}

#[test]
fn test_operand_limit_resets_selection() {
    let mut game = started(math_config(), &[1, 1, 1, 20], 2);
    game.toggle(id_at(&game, 0, 0));
    game.toggle(id_at(&game, 0, 1));
    game.toggle(id_at(&game, 1, 0));
    assert!(game.selection().is_empty());
    assert_eq!(game.score(), 0);
    assert_eq!(game.board().remaining(), 4);
    assert!(game.take_events().iter().any(|e| matches!(
        e,
        GameEvent::SelectionReset { reason: ResetReason::OperandLimit, tiles } if tiles.len() == 3
    )));
}

#[test]
fn test_multiplicative_policy_level() {
    let config = GameConfig {
        policy: ScorePolicy::Multiplicative,
        ..GameConfig::default()
    };
    let mut game = started(config, &[6, 6, 4, 8], 2);
    assert_eq!(game.run().combo, 0);
    game.advance(10_000);

    game.toggle(id_at(&game, 0, 0));
    game.toggle(id_at(&game, 0, 1));
    // 2 tiles * 100 * 2^0
    assert_eq!(game.score(), 200);
    game.toggle(id_at(&game, 1, 0));
    game.toggle(id_at(&game, 1, 1));

    let summary = *game.level_summary().unwrap();
    // 200 + 2*100*2^1
    assert_eq!(summary.score, 600);
    // (300 - 10) * 10
    assert_eq!(summary.time_bonus, 2900);
    assert_eq!(summary.combo_bonus, 200);
    assert_eq!(summary.final_score, 3700);
    assert!(game.achievements().is_unlocked(AchievementId::PerfectScore));
}

#[test]
fn test_deselect_then_complete_addition_group() {
    let mut game = started(GameConfig::default(), &[5, 7, 6, 9], 2);
    let five = id_at(&game, 0, 0);
    let seven = id_at(&game, 0, 1);
    game.toggle(five);
    game.toggle(five);
    assert!(game.selection().is_empty());
    game.toggle(seven);
    game.toggle(five);
    assert!(!game.board().contains(five));
    assert!(!game.board().contains(seven));
    assert_eq!(game.run().moves, 4);
}

#[test]
fn test_commands_outside_their_phase_are_ignored() {
    let mut game = Game::new(GameConfig::default(), 1);
    assert!(!game.apply_action(GameAction::Pause));
    assert!(!game.apply_action(GameAction::NextLevel));
    assert!(!game.apply_action(GameAction::Hint));
    assert!(!game.apply_action(GameAction::Select { row: 0, col: 0 }));
    assert!(game.apply_action(GameAction::Start));
    assert!(!game.apply_action(GameAction::Replay));
    assert!(!game.apply_action(GameAction::SetMode(GameMode::MathOperations)));
    assert!(!game.apply_action(GameAction::Select { row: 9, col: 9 }));

    assert!(game.apply_action(GameAction::TogglePause));
    assert_eq!(game.phase(), Phase::Paused);
    assert!(!game.apply_action(GameAction::Select { row: 0, col: 0 }));
    assert!(game.apply_action(GameAction::TogglePause));
    assert_eq!(game.phase(), Phase::Active);
}

#[test]
fn test_time_out_then_restart() {
    let mut game = started(GameConfig::default(), &[6, 6, 1, 1], 2);
    game.toggle(id_at(&game, 1, 0));
    for _ in 0..64 {
        let handle = game.timer().unwrap();
        assert!(game.tick(handle));
    }
    assert_eq!(game.phase(), Phase::Active);
    let handle = game.timer().unwrap();
    game.tick(handle);
    assert_eq!(game.phase(), Phase::Failed);
    assert!(game.selection().is_empty());
    assert!(!game.tick(handle));

    let events = game.take_events();
    assert_eq!(
        events.last(),
        Some(&GameEvent::GameOver {
            level: 1,
            final_score: 0
        })
    );

    assert!(game.apply_action(GameAction::Restart));
    assert_eq!(game.phase(), Phase::Active);
    assert_eq!(game.time_left(), 65);
    assert!(game.game_over_summary().is_none());
}
