//! Text driver: command parsing and plain-text rendering.
//!
//! Everything here is pure so the binary stays a thin I/O loop.

use std::fmt::Write as _;

use make_it_12_core::{GameSnapshot, LevelSummary};
use make_it_12_types::{AchievementId, GameAction, GameEvent, GameMode, Phase, ResetReason};

pub const HELP: &str = "\
commands:
  ROW COL        toggle the tile at ROW, COL (1-based)
  start          start the level
  p              pause / resume
  hint           show a valid combination (needs assist on)
  assist on|off  enable or disable hints
  next           next level after completing one
  replay         replay the completed level
  restart        new game from level 1
  mode addition|math
                 change mode between levels
  show           redraw the board
  json           print the game snapshot as JSON
  top            show the leaderboard (with --records)
  help           this text
  quit           save and exit";

/// One line of driver input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Action(GameAction),
    Assist(bool),
    Show,
    Json,
    Leaderboard,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Command, String> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some(first) = words.first() else {
        return Ok(Command::Show);
    };

    if let [row, col] = words.as_slice() {
        if let (Ok(row), Ok(col)) = (row.parse::<u8>(), col.parse::<u8>()) {
            if row == 0 || col == 0 {
                return Err("rows and columns start at 1".to_string());
            }
            return Ok(Command::Action(GameAction::Select {
                row: row - 1,
                col: col - 1,
            }));
        }
    }

    match (first.to_lowercase().as_str(), &words[1..]) {
        ("q" | "quit" | "exit", []) => Ok(Command::Quit),
        ("h" | "help" | "?", []) => Ok(Command::Help),
        ("s" | "show" | "board", []) => Ok(Command::Show),
        ("json", []) => Ok(Command::Json),
        ("top" | "leaderboard", []) => Ok(Command::Leaderboard),
        ("p", []) => Ok(Command::Action(GameAction::TogglePause)),
        ("assist", [arg]) => match arg.to_lowercase().as_str() {
            "on" => Ok(Command::Assist(true)),
            "off" => Ok(Command::Assist(false)),
            _ => Err(format!("assist takes on or off, not {:?}", arg)),
        },
        ("mode", [arg]) => GameMode::from_str(arg)
            .map(|mode| Command::Action(GameAction::SetMode(mode)))
            .ok_or_else(|| format!("unknown mode {:?}", arg)),
        (word, []) => GameAction::from_str(word)
            .map(Command::Action)
            .ok_or_else(|| format!("unknown command {:?} (try help)", line.trim())),
        _ => Err(format!("unknown command {:?} (try help)", line.trim())),
    }
}

/// Grid with 1-based row/column labels. Selected tiles are bracketed, hinted
/// tiles starred.
pub fn render_board(s: &GameSnapshot) -> String {
    let mut out = String::new();
    out.push_str("    ");
    for col in 1..=s.board_size {
        let _ = write!(out, "{:^5}", col);
    }
    out.push('\n');
    for (row, cells) in s.rows().enumerate() {
        let _ = write!(out, "{:>3} ", row + 1);
        for cell in cells {
            match cell {
                None => out.push_str("  .  "),
                Some(t) if t.selected => {
                    let _ = write!(out, "[{:^3}]", t.value);
                }
                Some(t) if t.hinted => {
                    let _ = write!(out, "*{:^3}*", t.value);
                }
                Some(t) => {
                    let _ = write!(out, " {:^3} ", t.value);
                }
            }
        }
        out.push('\n');
    }
    out
}

pub fn status_line(s: &GameSnapshot) -> String {
    let mut line = format!(
        "level {} [{}]  score {}  total {}  combo x{}  time {}s  moves {}",
        s.level,
        s.mode.badge(),
        s.score,
        s.total_score,
        s.combo,
        s.time_left,
        s.moves
    );
    match s.phase {
        Phase::Idle => line.push_str("  (type start)"),
        Phase::Paused => line.push_str("  PAUSED"),
        Phase::Completed => line.push_str("  (next / replay)"),
        Phase::Failed => line.push_str("  GAME OVER (restart)"),
        Phase::Active => {}
    }
    line
}

pub fn level_report(summary: &LevelSummary) -> String {
    format!(
        "level {} {}: score {} + time bonus {} + combo bonus {} = {}  (total {}, best combo x{}, {} moves)",
        summary.level,
        if summary.board_cleared { "cleared" } else { "complete, no moves left" },
        summary.score,
        summary.time_bonus,
        summary.combo_bonus,
        summary.final_score,
        summary.total_score,
        summary.max_combo,
        summary.moves
    )
}

fn achievement_line(id: AchievementId) -> String {
    format!("achievement unlocked: {} ({})", id.title(), id.description())
}

/// Human text for an engine event; `None` for events not worth a line.
pub fn describe_event(event: &GameEvent) -> Option<String> {
    match event {
        GameEvent::LevelStarted {
            level,
            mode,
            board_size,
            time_limit,
        } => Some(format!(
            "level {} ({} mode): {}x{} board, {}s on the clock",
            level, mode, board_size, board_size, time_limit
        )),
        GameEvent::Matched {
            values,
            expression,
            points,
            combo,
            ..
        } => Some(format!(
            "{} = 12!  +{} (combo x{})",
            expression.render(values),
            points,
            combo
        )),
        GameEvent::SelectionReset { reason, .. } => Some(
            match reason {
                ResetReason::Overshoot => "over 12, selection cleared",
                ResetReason::OperandLimit => "no way to make 12 from those three, selection cleared",
            }
            .to_string(),
        ),
        GameEvent::Tick { time_left } if *time_left <= 10 && *time_left > 0 => {
            Some(format!("{}s left", time_left))
        }
        GameEvent::Paused => Some("paused".to_string()),
        GameEvent::Resumed => Some("resumed".to_string()),
        GameEvent::AchievementUnlocked(id) => Some(achievement_line(*id)),
        GameEvent::HintShown { tiles } => Some(format!("hint: {} tiles marked with *", tiles.len())),
        GameEvent::GameOver { level, final_score } => Some(format!(
            "time is up on level {}. final score {}",
            level, final_score
        )),
        GameEvent::TileToggled { .. } | GameEvent::Tick { .. } | GameEvent::LevelCompleted { .. } => {
            None
        }
    }
}
