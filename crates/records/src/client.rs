//! TCP client speaking to a `records-server`

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::sync::Mutex;

use crate::error::RecordError;
use crate::model::{LeaderboardEntry, PlayerRecord, PlayerStats, Ranking, ScoreUpdate};
use crate::protocol::{Request, RequestEnvelope, ResponseEnvelope};
use crate::service::PlayerRecordService;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

struct Connection {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    line: String,
}

/// Remote [`PlayerRecordService`]. Requests on one client are serialized.
pub struct TcpRecordClient {
    conn: Mutex<Connection>,
    next_seq: AtomicU64,
    timeout: Duration,
}

impl TcpRecordClient {
    pub async fn connect(addr: impl ToSocketAddrs) -> Result<Self, RecordError> {
        Self::connect_with_timeout(addr, DEFAULT_TIMEOUT).await
    }

    pub async fn connect_with_timeout(
        addr: impl ToSocketAddrs,
        timeout: Duration,
    ) -> Result<Self, RecordError> {
        let stream = tokio::time::timeout(timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| RecordError::Network("connect timed out".into()))??;
        let (reader, writer) = stream.into_split();
        Ok(Self {
            conn: Mutex::new(Connection {
                reader: BufReader::new(reader),
                writer,
                line: String::new(),
            }),
            next_seq: AtomicU64::new(1),
            timeout,
        })
    }

    pub async fn ping(&self) -> Result<(), RecordError> {
        let _: String = self.call(Request::Ping).await?;
        Ok(())
    }

    async fn call<T: DeserializeOwned>(&self, request: Request) -> Result<T, RecordError> {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let mut line = serde_json::to_string(&RequestEnvelope { seq, request })?;
        line.push('\n');

        let mut conn = self.conn.lock().await;
        let conn = &mut *conn;
        let exchange = async {
            conn.writer.write_all(line.as_bytes()).await?;
            conn.writer.flush().await?;
            loop {
                conn.line.clear();
                if conn.reader.read_line(&mut conn.line).await? == 0 {
                    return Err(RecordError::Network("record server closed the connection".into()));
                }
                let response: ResponseEnvelope = serde_json::from_str(conn.line.trim())?;
                // Late answers to requests that already timed out.
                if response.seq < seq {
                    log::debug!("discarding stale response to seq {}", response.seq);
                    continue;
                }
                return Ok(response);
            }
        };
        let response = tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| RecordError::Network(format!("request {seq} timed out")))??;

        if response.seq != seq {
            return Err(RecordError::Protocol(format!(
                "expected response to seq {seq}, got {}",
                response.seq
            )));
        }
        response.into_result()
    }
}

impl PlayerRecordService for TcpRecordClient {
    async fn create_player(&self, name: &str, phone: &str) -> Result<PlayerRecord, RecordError> {
        self.call(Request::CreatePlayer {
            name: name.to_string(),
            phone: phone.to_string(),
        })
        .await
    }

    async fn get_player_by_phone(&self, phone: &str) -> Result<Option<PlayerRecord>, RecordError> {
        self.call(Request::GetPlayerByPhone {
            phone: phone.to_string(),
        })
        .await
    }

    async fn update_player_score(
        &self,
        id: &str,
        update: ScoreUpdate,
    ) -> Result<PlayerRecord, RecordError> {
        self.call(Request::UpdatePlayerScore {
            id: id.to_string(),
            update,
        })
        .await
    }

    async fn rename_player(&self, id: &str, name: &str) -> Result<PlayerRecord, RecordError> {
        self.call(Request::RenamePlayer {
            id: id.to_string(),
            name: name.to_string(),
        })
        .await
    }

    async fn get_leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, RecordError> {
        self.call(Request::GetLeaderboard { limit }).await
    }

    async fn get_player_ranking(&self, phone: &str) -> Result<Option<Ranking>, RecordError> {
        self.call(Request::GetPlayerRanking {
            phone: phone.to_string(),
        })
        .await
    }

    async fn search_players(&self, term: &str) -> Result<Vec<PlayerRecord>, RecordError> {
        self.call(Request::SearchPlayers {
            term: term.to_string(),
        })
        .await
    }

    async fn delete_player(&self, id: &str) -> Result<(), RecordError> {
        let _: serde_json::Value = self.call(Request::DeletePlayer { id: id.to_string() }).await?;
        Ok(())
    }

    async fn get_player_stats(&self, id: &str) -> Result<PlayerStats, RecordError> {
        self.call(Request::GetPlayerStats { id: id.to_string() }).await
    }
}
