//! Line-delimited JSON protocol for the record service
//!
//! Each request is one JSON object per line:
//!
//! ```text
//! {"seq":1,"op":"create_player","name":"Ada","phone":"555-123-4567"}
//! {"seq":2,"op":"get_leaderboard","limit":10}
//! ```
//!
//! and each response echoes `seq`:
//!
//! ```text
//! {"seq":1,"status":"ok","data":{...}}
//! {"seq":2,"status":"error","kind":"not_found","message":"player rec000009"}
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ErrorKind, RecordError};
use crate::model::ScoreUpdate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    Ping,
    CreatePlayer { name: String, phone: String },
    GetPlayerByPhone { phone: String },
    UpdatePlayerScore { id: String, update: ScoreUpdate },
    RenamePlayer { id: String, name: String },
    GetLeaderboard { limit: usize },
    GetPlayerRanking { phone: String },
    SearchPlayers { term: String },
    DeletePlayer { id: String },
    GetPlayerStats { id: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestEnvelope {
    pub seq: u64,
    #[serde(flatten)]
    pub request: Request,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response {
    Ok { data: Value },
    Error { kind: ErrorKind, message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub seq: u64,
    #[serde(flatten)]
    pub response: Response,
}

impl ResponseEnvelope {
    pub fn from_result(seq: u64, result: Result<Value, RecordError>) -> Self {
        let response = match result {
            Ok(data) => Response::Ok { data },
            Err(e) => Response::Error {
                kind: e.kind(),
                message: e.message(),
            },
        };
        Self { seq, response }
    }

    pub fn into_result<T: DeserializeOwned>(self) -> Result<T, RecordError> {
        match self.response {
            Response::Ok { data } => Ok(serde_json::from_value(data)?),
            Response::Error { kind, message } => Err(RecordError::from_kind(kind, message)),
        }
    }
}

/// A line that could not be decoded, with whatever `seq` could be salvaged.
#[derive(Debug)]
pub struct BadRequest {
    pub seq: u64,
    pub error: RecordError,
}

pub fn parse_request(line: &str) -> Result<RequestEnvelope, BadRequest> {
    serde_json::from_str(line).map_err(|e| BadRequest {
        seq: extract_seq_best_effort(line).unwrap_or(0),
        error: RecordError::Protocol(e.to_string()),
    })
}

fn extract_seq_best_effort(s: &str) -> Option<u64> {
    let start = s.find("\"seq\"")?;
    let after_key = &s[start + 5..];
    let colon = after_key.find(':')?;
    let rest = after_key[colon + 1..].trim_start();
    let end = rest.bytes().take_while(u8::is_ascii_digit).count();
    if end == 0 {
        return None;
    }
    rest[..end].parse().ok()
}
