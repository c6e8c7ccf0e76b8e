use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable failure category, carried across the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Network,
    Validation,
    NotFound,
    Protocol,
    Service,
}

/// Registration input problems.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name must be between 2 and 50 characters")]
    NameLength,
    #[error("phone number may only contain digits, spaces, +, -, ( and )")]
    PhoneCharacters,
    #[error("phone number must have at least 10 digits")]
    PhoneTooShort,
    #[error("{0}")]
    Rejected(String),
}

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("protocol error: {0}")]
    Protocol(String),
    #[error("record service error: {0}")]
    Service(String),
}

impl RecordError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RecordError::Network(_) => ErrorKind::Network,
            RecordError::Validation(_) => ErrorKind::Validation,
            RecordError::NotFound(_) => ErrorKind::NotFound,
            RecordError::Protocol(_) => ErrorKind::Protocol,
            RecordError::Service(_) => ErrorKind::Service,
        }
    }

    /// Message without the kind prefix, as sent on the wire.
    pub fn message(&self) -> String {
        match self {
            RecordError::Network(m)
            | RecordError::NotFound(m)
            | RecordError::Protocol(m)
            | RecordError::Service(m) => m.clone(),
            RecordError::Validation(v) => v.to_string(),
        }
    }

    /// Rebuild an error received from a remote service.
    pub fn from_kind(kind: ErrorKind, message: String) -> Self {
        match kind {
            ErrorKind::Network => RecordError::Network(message),
            ErrorKind::Validation => RecordError::Validation(ValidationError::Rejected(message)),
            ErrorKind::NotFound => RecordError::NotFound(message),
            ErrorKind::Protocol => RecordError::Protocol(message),
            ErrorKind::Service => RecordError::Service(message),
        }
    }

    /// Worth retrying later (the game keeps running offline meanwhile).
    pub fn is_transient(&self) -> bool {
        matches!(self.kind(), ErrorKind::Network | ErrorKind::Service)
    }
}

impl From<std::io::Error> for RecordError {
    fn from(e: std::io::Error) -> Self {
        RecordError::Network(e.to_string())
    }
}

impl From<serde_json::Error> for RecordError {
    fn from(e: serde_json::Error) -> Self {
        RecordError::Protocol(e.to_string())
    }
}
