//! Make It 12 text runner (default binary).
//!
//! Reads commands from stdin and prints the board to stdout. A single owner
//! loop applies input lines and timer ticks to the game in arrival order.

use std::collections::BTreeMap;
use std::io::BufRead;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::Result;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use make_it_12::config::{AppConfig, USAGE};
use make_it_12::core::{Game, TimerHandle};
use make_it_12::driver::{
    describe_event, level_report, parse_command, render_board, status_line, Command, HELP,
};
use make_it_12::records::{register, PlayerRecord, PlayerRecordService, ScoreUpdate, TcpRecordClient};
use make_it_12::store::{FileStore, Persistence, SavedState};
use make_it_12::types::{GameAction, GameEvent, Phase, TICK_MS};

const ASSIST_SETTING: &str = "ai_assist_enabled";

#[derive(Debug)]
enum LoopEvent {
    Input(String),
    InputClosed,
    Tick(TimerHandle),
}

/// Cloud profile in use this session.
struct RecordSync {
    client: TcpRecordClient,
    player: PlayerRecord,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env().with_args(std::env::args().skip(1))?;
    if config.show_help {
        println!("{}", USAGE);
        return Ok(());
    }

    let mut persistence = Persistence::new(FileStore::new(config.data_dir.clone()));
    let saved = persistence.load();
    let mut settings = saved.settings.clone();

    let seed = config.seed.unwrap_or_else(clock_seed);
    let mut game = Game::new(config.game_config(), seed);
    saved.apply(&mut game);
    if let Some(mode) = config.mode {
        game.set_mode(mode);
    }
    log::info!(
        "seed {}, resuming at level {} with {} points",
        seed,
        game.level(),
        game.total_score()
    );

    let sync = connect_records(&config).await;

    let (tx, mut rx) = mpsc::channel::<LoopEvent>(64);
    spawn_stdin(tx.clone());

    let mut ticker: Option<(TimerHandle, JoinHandle<()>)> = None;

    println!("{}", HELP);
    print_game(&game);

    while let Some(event) = rx.recv().await {
        let mut redraw = false;
        match event {
            LoopEvent::Input(line) => match parse_command(&line) {
                Ok(Command::Quit) => break,
                Ok(Command::Help) => println!("{}", HELP),
                Ok(Command::Show) => redraw = true,
                Ok(Command::Json) => match serde_json::to_string_pretty(&game.snapshot()) {
                    Ok(text) => println!("{}", text),
                    Err(e) => log::warn!("snapshot serialization failed: {}", e),
                },
                Ok(Command::Leaderboard) => show_leaderboard(sync.as_ref()).await,
                Ok(Command::Assist(on)) => {
                    settings.insert(ASSIST_SETTING.to_string(), Value::Bool(on));
                    println!("hints {}", if on { "enabled" } else { "disabled" });
                    save(&mut persistence, &game, &settings);
                }
                Ok(Command::Action(GameAction::Hint)) if !assist_enabled(&settings) => {
                    println!("hints are off (assist on to enable)");
                }
                Ok(Command::Action(action)) => {
                    if game.apply_action(action) {
                        redraw = true;
                    } else {
                        println!("not now ({})", game.phase().as_str());
                    }
                }
                Err(msg) => println!("{}", msg),
            },
            LoopEvent::Tick(handle) => {
                game.tick(handle);
            }
            LoopEvent::InputClosed => break,
        }

        let mut finished = false;
        let mut game_over = false;
        for event in game.take_events() {
            if let Some(text) = describe_event(&event) {
                println!("{}", text);
            }
            match event {
                GameEvent::LevelCompleted { .. } => {
                    if let Some(summary) = game.level_summary() {
                        println!("{}", level_report(summary));
                    }
                    finished = true;
                }
                GameEvent::GameOver { .. } => {
                    finished = true;
                    game_over = true;
                }
                _ => {}
            }
        }
        if finished {
            save(&mut persistence, &game, &settings);
            redraw = true;
        }
        if game_over {
            if let Some(sync) = sync.as_ref() {
                push_score(sync, &game).await;
            }
        }
        if redraw {
            print_game(&game);
        }

        // Keep exactly one ticker alive, bound to the current countdown.
        let current = game.timer();
        if ticker.as_ref().map(|(h, _)| *h) != current {
            if let Some((_, task)) = ticker.take() {
                task.abort();
            }
            ticker = current.map(|handle| (handle, spawn_ticker(handle, tx.clone())));
        }
    }

    if let Some((_, task)) = ticker.take() {
        task.abort();
    }
    save(&mut persistence, &game, &settings);
    // A run abandoned mid-way still counts as a played game.
    if game.phase() != Phase::Failed && game.total_score() > 0 {
        if let Some(sync) = sync.as_ref() {
            push_score(sync, &game).await;
        }
    }
    Ok(())
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}

fn print_game(game: &Game) {
    let snapshot = game.snapshot();
    print!("{}", render_board(&snapshot));
    println!("{}", status_line(&snapshot));
}

fn assist_enabled(settings: &BTreeMap<String, Value>) -> bool {
    settings
        .get(ASSIST_SETTING)
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

fn save(persistence: &mut Persistence<FileStore>, game: &Game, settings: &BTreeMap<String, Value>) {
    if let Err(e) = persistence.save(&SavedState::capture(game, settings)) {
        log::warn!("could not save progress: {:#}", e);
    }
}

/// Stdin is read on a plain thread so a pending read never holds up shutdown.
fn spawn_stdin(tx: mpsc::Sender<LoopEvent>) {
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.blocking_send(LoopEvent::Input(line)).is_err() {
                        return;
                    }
                }
                Err(e) => {
                    log::warn!("stdin error: {}", e);
                    break;
                }
            }
        }
        let _ = tx.blocking_send(LoopEvent::InputClosed);
    });
}

fn spawn_ticker(handle: TimerHandle, tx: mpsc::Sender<LoopEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let period = Duration::from_millis(u64::from(TICK_MS));
        let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        loop {
            interval.tick().await;
            if tx.send(LoopEvent::Tick(handle)).await.is_err() {
                return;
            }
        }
    })
}

/// Connect and register when asked to. Any failure leaves the game offline.
async fn connect_records(config: &AppConfig) -> Option<RecordSync> {
    let addr = config.records_addr.as_deref()?;
    let client = match TcpRecordClient::connect(addr).await {
        Ok(client) => client,
        Err(e) => {
            log::warn!("record service unavailable, playing offline: {}", e);
            return None;
        }
    };
    let Some((name, phone)) = config.register.as_ref() else {
        log::info!("connected to {} without a profile (use --register NAME PHONE)", addr);
        return None;
    };
    match register(&client, name, phone).await {
        Ok(player) => {
            println!("playing as {} ({})", player.name, player.phone);
            Some(RecordSync { client, player })
        }
        Err(e) => {
            log::warn!("registration failed, playing offline: {}", e);
            None
        }
    }
}

async fn push_score(sync: &RecordSync, game: &Game) {
    let score = game
        .game_over_summary()
        .map(|s| s.final_score)
        .unwrap_or_else(|| game.total_score());
    let update = ScoreUpdate {
        score,
        level: game.level(),
        combo: game.run().max_combo,
        mode: game.mode(),
    };
    if let Err(e) = sync.client.update_player_score(&sync.player.id, update).await {
        log::warn!("score sync failed ({:?}): {}", e.kind(), e);
        return;
    }
    match sync.client.get_player_ranking(&sync.player.phone).await {
        Ok(Some(ranking)) => println!("rank {} of {}", ranking.rank, ranking.total_players),
        Ok(None) => {}
        Err(e) => log::warn!("ranking lookup failed: {}", e),
    }
}

async fn show_leaderboard(sync: Option<&RecordSync>) {
    let Some(sync) = sync else {
        println!("no record service (start with --records HOST:PORT --register NAME PHONE)");
        return;
    };
    match sync.client.get_leaderboard(10).await {
        Ok(entries) => {
            for entry in entries {
                println!(
                    "{:>3}. {:<20} {:>7}  level {}",
                    entry.rank, entry.record.name, entry.record.high_score, entry.record.current_level
                );
            }
        }
        Err(e) => println!("leaderboard unavailable: {}", e),
    }
}
