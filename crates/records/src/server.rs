//! TCP host for a [`PlayerRecordService`]
//!
//! Accepts line-delimited JSON requests (see [`crate::protocol`]) and answers
//! each one in order on the same connection.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use serde::Serialize;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

use crate::error::RecordError;
use crate::protocol::{parse_request, Request, ResponseEnvelope};
use crate::service::PlayerRecordService;

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for RecordServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7878,
        }
    }
}

impl RecordServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let host = lookup("MAKE12_RECORDS_HOST")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.host);
        let port = lookup("MAKE12_RECORDS_PORT")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.port);
        Self { host, port }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Bind and serve forever.
///
/// The bound address is sent on `ready_tx` once listening, which lets callers
/// pass port 0 and learn the real port.
pub async fn run_server<S>(
    config: RecordServerConfig,
    service: Arc<S>,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()>
where
    S: PlayerRecordService + 'static,
{
    let listener = TcpListener::bind(config.addr())
        .await
        .with_context(|| format!("binding record server to {}", config.addr()))?;
    let bound = listener.local_addr()?;
    log::info!("record server listening on {}", bound);
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let mut client_id_counter = 0usize;
    loop {
        let (socket, addr) = listener.accept().await?;
        client_id_counter += 1;
        let client_id = client_id_counter;
        log::debug!("client {} connected from {}", client_id, addr);

        let service = Arc::clone(&service);
        tokio::spawn(async move {
            if let Err(e) = handle_client(socket, service).await {
                log::warn!("client {} error: {:#}", client_id, e);
            }
            log::debug!("client {} disconnected", client_id);
        });
    }
}

async fn handle_client<S: PlayerRecordService>(
    socket: TcpStream,
    service: Arc<S>,
) -> anyhow::Result<()> {
    let (reader, mut writer) = socket.into_split();
    let mut reader = BufReader::new(reader);
    let mut line = String::new();
    let mut buf: Vec<u8> = Vec::with_capacity(1024);

    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            return Ok(());
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let response = match parse_request(trimmed) {
            Ok(env) => {
                log::debug!("request seq={} {:?}", env.seq, env.request);
                ResponseEnvelope::from_result(env.seq, dispatch(service.as_ref(), env.request).await)
            }
            Err(bad) => {
                log::warn!("rejecting malformed request: {}", bad.error);
                ResponseEnvelope::from_result(bad.seq, Err(bad.error))
            }
        };

        buf.clear();
        serde_json::to_writer(&mut buf, &response)?;
        buf.push(b'\n');
        writer.write_all(&buf).await?;
        writer.flush().await?;
    }
}

fn to_data<T: Serialize>(value: T) -> Result<Value, RecordError> {
    Ok(serde_json::to_value(value)?)
}

/// Run one request against the service.
pub async fn dispatch<S: PlayerRecordService>(
    service: &S,
    request: Request,
) -> Result<Value, RecordError> {
    match request {
        Request::Ping => Ok(Value::String("pong".into())),
        Request::CreatePlayer { name, phone } => to_data(service.create_player(&name, &phone).await?),
        Request::GetPlayerByPhone { phone } => to_data(service.get_player_by_phone(&phone).await?),
        Request::UpdatePlayerScore { id, update } => {
            to_data(service.update_player_score(&id, update).await?)
        }
        Request::RenamePlayer { id, name } => to_data(service.rename_player(&id, &name).await?),
        Request::GetLeaderboard { limit } => to_data(service.get_leaderboard(limit).await?),
        Request::GetPlayerRanking { phone } => to_data(service.get_player_ranking(&phone).await?),
        Request::SearchPlayers { term } => to_data(service.search_players(&term).await?),
        Request::DeletePlayer { id } => {
            service.delete_player(&id).await?;
            Ok(Value::Null)
        }
        Request::GetPlayerStats { id } => to_data(service.get_player_stats(&id).await?),
    }
}
