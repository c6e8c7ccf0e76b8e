//! Player Record Service
//!
//! Optional cloud profile for a player: registration, score sync and the
//! leaderboard. The game stays fully playable without it; every call returns a
//! [`RecordError`] whose [`ErrorKind`] tells a network outage apart from bad
//! input or a missing record.

pub mod client;
pub mod error;
pub mod memory;
pub mod model;
pub mod protocol;
pub mod server;
pub mod service;
pub mod validate;

pub use client::TcpRecordClient;
pub use error::{ErrorKind, RecordError, ValidationError};
pub use memory::MemoryRecords;
pub use model::{LeaderboardEntry, PlayerRecord, PlayerStats, Ranking, ScoreUpdate};
pub use server::{run_server, RecordServerConfig};
pub use service::{register, PlayerRecordService, RANKING_WINDOW};
pub use validate::{format_phone, validate_name, validate_phone};
