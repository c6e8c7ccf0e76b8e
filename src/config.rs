//! Application configuration
//!
//! Environment variables first, then command-line flags on top.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context};

use make_it_12_core::GameConfig;
use make_it_12_store::default_data_dir;
use make_it_12_types::{GameMode, ScorePolicy};

pub const USAGE: &str = "\
usage: make-it-12 [options]

options:
  --mode addition|math         game mode (default: saved mode)
  --policy additive|multiplicative
                               score policy (default: additive)
  --seed N                     board seed (default: from the clock)
  --refill                     refill the board after each match
  --data-dir PATH              where progress is saved
  --records HOST:PORT          sync with a records-server
  --register NAME PHONE        record profile to use with --records
  -h, --help                   show this help

environment:
  MAKE12_MODE, MAKE12_SCORE_POLICY, MAKE12_SEED, MAKE12_REFILL,
  MAKE12_DATA_DIR, MAKE12_RECORDS_ADDR, RUST_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// `None` keeps whatever mode the saved game had.
    pub mode: Option<GameMode>,
    pub policy: ScorePolicy,
    pub seed: Option<u32>,
    pub refill: bool,
    pub data_dir: PathBuf,
    pub records_addr: Option<String>,
    pub register: Option<(String, String)>,
    pub show_help: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mode: None,
            policy: ScorePolicy::default(),
            seed: None,
            refill: false,
            data_dir: default_data_dir(),
            records_addr: None,
            register: None,
            show_help: false,
        }
    }
}

fn non_empty(s: String) -> Option<String> {
    let s = s.trim().to_string();
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

fn parse_flag(s: &str) -> bool {
    matches!(s.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Unparseable values fall back to the default with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();

        if let Some(v) = lookup("MAKE12_MODE").and_then(non_empty) {
            cfg.mode = GameMode::from_str(&v);
            if cfg.mode.is_none() {
                log::warn!("ignoring MAKE12_MODE={:?}", v);
            }
        }
        if let Some(v) = lookup("MAKE12_SCORE_POLICY").and_then(non_empty) {
            match ScorePolicy::from_str(&v) {
                Some(p) => cfg.policy = p,
                None => log::warn!("ignoring MAKE12_SCORE_POLICY={:?}", v),
            }
        }
        if let Some(v) = lookup("MAKE12_SEED").and_then(non_empty) {
            cfg.seed = v.parse().ok();
            if cfg.seed.is_none() {
                log::warn!("ignoring MAKE12_SEED={:?}", v);
            }
        }
        if let Some(v) = lookup("MAKE12_REFILL") {
            cfg.refill = parse_flag(&v);
        }
        if let Some(v) = lookup("MAKE12_DATA_DIR").and_then(non_empty) {
            cfg.data_dir = PathBuf::from(v);
        }
        cfg.records_addr = lookup("MAKE12_RECORDS_ADDR").and_then(non_empty);
        cfg
    }

    /// Apply command-line flags (without the program name).
    pub fn with_args<I>(mut self, args: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            let mut value = |flag: &str| {
                args.next()
                    .ok_or_else(|| anyhow!("{} needs a value", flag))
            };
            match arg.as_str() {
                "-h" | "--help" => self.show_help = true,
                "--mode" => {
                    let v = value("--mode")?;
                    self.mode = Some(
                        GameMode::from_str(&v).ok_or_else(|| anyhow!("unknown mode {:?}", v))?,
                    );
                }
                "--policy" => {
                    let v = value("--policy")?;
                    self.policy = ScorePolicy::from_str(&v)
                        .ok_or_else(|| anyhow!("unknown score policy {:?}", v))?;
                }
                "--seed" => {
                    let v = value("--seed")?;
                    self.seed = Some(v.parse().with_context(|| format!("bad seed {:?}", v))?);
                }
                "--refill" => self.refill = true,
                "--data-dir" => self.data_dir = PathBuf::from(value("--data-dir")?),
                "--records" => self.records_addr = Some(value("--records")?),
                "--register" => {
                    let name = value("--register")?;
                    let phone = value("--register")?;
                    self.register = Some((name, phone));
                }
                other => bail!("unknown argument {:?}\n\n{}", other, USAGE),
            }
        }
        Ok(self)
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            mode: self.mode.unwrap_or_default(),
            policy: self.policy,
            refill: self.refill,
            ..GameConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn env_values() {
        let cfg = AppConfig::from_lookup(|key| match key {
            "MAKE12_MODE" => Some("math".into()),
            "MAKE12_SCORE_POLICY" => Some("multiplicative".into()),
            "MAKE12_SEED" => Some("42".into()),
            "MAKE12_REFILL" => Some("true".into()),
            "MAKE12_DATA_DIR" => Some("/tmp/m12".into()),
            "MAKE12_RECORDS_ADDR" => Some("127.0.0.1:7878".into()),
            _ => None,
        });
        assert_eq!(cfg.mode, Some(GameMode::MathOperations));
        assert_eq!(cfg.policy, ScorePolicy::Multiplicative);
        assert_eq!(cfg.seed, Some(42));
        assert!(cfg.refill);
        assert_eq!(cfg.data_dir, PathBuf::from("/tmp/m12"));
        assert_eq!(cfg.records_addr.as_deref(), Some("127.0.0.1:7878"));
    }

    #[test]
    fn bad_env_values_fall_back() {
        let cfg = AppConfig::from_lookup(|key| match key {
            "MAKE12_MODE" => Some("chess".into()),
            "MAKE12_SEED" => Some("-1".into()),
            "MAKE12_RECORDS_ADDR" => Some("  ".into()),
            _ => None,
        });
        assert_eq!(cfg.mode, None);
        assert_eq!(cfg.seed, None);
        assert_eq!(cfg.records_addr, None);
    }

    #[test]
    fn flags_override_env() {
        let cfg = AppConfig::from_lookup(|key| match key {
            "MAKE12_MODE" => Some("math".into()),
            _ => None,
        })
        .with_args(args(&[
            "--mode", "addition", "--seed", "7", "--refill", "--register", "Ada", "5551234567",
        ]))
        .unwrap();
        assert_eq!(cfg.mode, Some(GameMode::Addition));
        assert_eq!(cfg.seed, Some(7));
        assert!(cfg.refill);
        assert_eq!(
            cfg.register,
            Some(("Ada".to_string(), "5551234567".to_string()))
        );
        assert!(cfg.game_config().refill);
    }

    #[test]
    fn bad_flags_are_errors() {
        assert!(AppConfig::default().with_args(args(&["--seed"])).is_err());
        assert!(AppConfig::default().with_args(args(&["--mode", "chess"])).is_err());
        assert!(AppConfig::default().with_args(args(&["--register", "Ada"])).is_err());
        assert!(AppConfig::default().with_args(args(&["--wat"])).is_err());
        assert!(AppConfig::default().with_args(args(&["--help"])).unwrap().show_help);
    }
}
