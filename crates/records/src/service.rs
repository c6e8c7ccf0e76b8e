//! Player record service seam
//!
//! The game talks to player records only through [`PlayerRecordService`], handed
//! in by the caller. [`MemoryRecords`](crate::MemoryRecords) implements it
//! in-process and [`TcpRecordClient`](crate::TcpRecordClient) forwards it to a
//! `records-server`. Every operation is fallible and reports a distinguishable
//! [`RecordError`] kind.

use std::future::Future;

use crate::error::RecordError;
use crate::model::{LeaderboardEntry, PlayerRecord, PlayerStats, Ranking, ScoreUpdate};
use crate::validate::{phone_digits, validate_name, validate_phone};

/// How many leaderboard rows a ranking lookup scans.
pub const RANKING_WINDOW: usize = 100;

pub trait PlayerRecordService: Send + Sync {
    fn create_player(
        &self,
        name: &str,
        phone: &str,
    ) -> impl Future<Output = Result<PlayerRecord, RecordError>> + Send;

    fn get_player_by_phone(
        &self,
        phone: &str,
    ) -> impl Future<Output = Result<Option<PlayerRecord>, RecordError>> + Send;

    fn update_player_score(
        &self,
        id: &str,
        update: ScoreUpdate,
    ) -> impl Future<Output = Result<PlayerRecord, RecordError>> + Send;

    fn rename_player(
        &self,
        id: &str,
        name: &str,
    ) -> impl Future<Output = Result<PlayerRecord, RecordError>> + Send;

    /// Top `limit` players in leaderboard order.
    fn get_leaderboard(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<LeaderboardEntry>, RecordError>> + Send;

    /// Case-insensitive name substring or phone digit substring.
    fn search_players(
        &self,
        term: &str,
    ) -> impl Future<Output = Result<Vec<PlayerRecord>, RecordError>> + Send;

    fn delete_player(&self, id: &str) -> impl Future<Output = Result<(), RecordError>> + Send;

    fn get_player_stats(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<PlayerStats, RecordError>> + Send;

    /// Rank of a player within the top [`RANKING_WINDOW`]; `None` outside it.
    fn get_player_ranking(
        &self,
        phone: &str,
    ) -> impl Future<Output = Result<Option<Ranking>, RecordError>> + Send {
        async move {
            let board = self.get_leaderboard(RANKING_WINDOW).await?;
            let wanted = phone_digits(phone);
            let total_players = board.len() as u32;
            Ok(board
                .into_iter()
                .find(|entry| phone_digits(&entry.record.phone) == wanted)
                .map(|player| Ranking {
                    rank: player.rank,
                    total_players,
                    player,
                }))
        }
    }
}

/// Registration flow: validate, then look the phone up and create or rename.
pub async fn register<S: PlayerRecordService>(
    service: &S,
    name: &str,
    phone: &str,
) -> Result<PlayerRecord, RecordError> {
    let name = validate_name(name)?;
    validate_phone(phone)?;

    match service.get_player_by_phone(phone).await? {
        Some(existing) if existing.name != name => {
            log::info!("renaming player {} to {}", existing.id, name);
            service.rename_player(&existing.id, &name).await
        }
        Some(existing) => Ok(existing),
        None => {
            let created = service.create_player(&name, phone).await?;
            log::info!("registered new player {}", created.id);
            Ok(created)
        }
    }
}
