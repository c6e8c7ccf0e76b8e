//! In-process record store

use tokio::sync::RwLock;

use crate::error::RecordError;
use crate::model::{
    now_millis, rank_order, LeaderboardEntry, PlayerRecord, PlayerStats, ScoreUpdate,
};
use crate::service::PlayerRecordService;
use crate::validate::{format_phone, phone_digits, validate_name, validate_phone};

#[derive(Debug, Default)]
struct Inner {
    /// Creation order; ties on the leaderboard keep it.
    records: Vec<PlayerRecord>,
    next_id: u64,
}

/// Player records held in memory behind an async lock.
#[derive(Debug, Default)]
pub struct MemoryRecords {
    inner: RwLock<Inner>,
}

impl MemoryRecords {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.records.len()
    }

    fn not_found(id: &str) -> RecordError {
        RecordError::NotFound(format!("player {id}"))
    }
}

impl PlayerRecordService for MemoryRecords {
    async fn create_player(&self, name: &str, phone: &str) -> Result<PlayerRecord, RecordError> {
        let name = validate_name(name)?;
        let digits = validate_phone(phone)?;

        let mut inner = self.inner.write().await;
        if inner
            .records
            .iter()
            .any(|r| phone_digits(&r.phone) == digits)
        {
            return Err(RecordError::Service(format!(
                "phone {} is already registered",
                format_phone(&digits)
            )));
        }
        inner.next_id += 1;
        let record = PlayerRecord::new(
            format!("rec{:06}", inner.next_id),
            name,
            format_phone(&digits),
            now_millis(),
        );
        inner.records.push(record.clone());
        Ok(record)
    }

    async fn get_player_by_phone(&self, phone: &str) -> Result<Option<PlayerRecord>, RecordError> {
        let wanted = phone_digits(phone);
        if wanted.is_empty() {
            return Ok(None);
        }
        let inner = self.inner.read().await;
        Ok(inner
            .records
            .iter()
            .find(|r| phone_digits(&r.phone) == wanted)
            .cloned())
    }

    async fn update_player_score(
        &self,
        id: &str,
        update: ScoreUpdate,
    ) -> Result<PlayerRecord, RecordError> {
        let mut inner = self.inner.write().await;
        let record = inner
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| Self::not_found(id))?;
        record.apply_score(&update, now_millis());
        Ok(record.clone())
    }

    async fn rename_player(&self, id: &str, name: &str) -> Result<PlayerRecord, RecordError> {
        let name = validate_name(name)?;
        let mut inner = self.inner.write().await;
        let record = inner
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| Self::not_found(id))?;
        record.name = name;
        Ok(record.clone())
    }

    async fn get_leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, RecordError> {
        let mut records = self.inner.read().await.records.clone();
        records.sort_by(rank_order);
        Ok(records
            .into_iter()
            .take(limit)
            .enumerate()
            .map(|(i, record)| LeaderboardEntry {
                rank: i as u32 + 1,
                record,
            })
            .collect())
    }

    async fn search_players(&self, term: &str) -> Result<Vec<PlayerRecord>, RecordError> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }
        let needle_digits = phone_digits(&needle);
        let inner = self.inner.read().await;
        Ok(inner
            .records
            .iter()
            .filter(|r| {
                r.name.to_lowercase().contains(&needle)
                    || (!needle_digits.is_empty() && phone_digits(&r.phone).contains(&needle_digits))
            })
            .cloned()
            .collect())
    }

    async fn delete_player(&self, id: &str) -> Result<(), RecordError> {
        let mut inner = self.inner.write().await;
        let before = inner.records.len();
        inner.records.retain(|r| r.id != id);
        if inner.records.len() == before {
            return Err(Self::not_found(id));
        }
        Ok(())
    }

    async fn get_player_stats(&self, id: &str) -> Result<PlayerStats, RecordError> {
        let inner = self.inner.read().await;
        inner
            .records
            .iter()
            .find(|r| r.id == id)
            .map(PlayerRecord::stats)
            .ok_or_else(|| Self::not_found(id))
    }
}
