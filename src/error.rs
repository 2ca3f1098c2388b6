//! Error types for the session, the room channel and durable storage.

/// Misuse of the local session API. Transport problems never surface here.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("No round in progress")]
    RoundNotActive,

    #[error("Unknown item: {0}")]
    UnknownItem(String),

    #[error("Only the room owner can reset the room")]
    NotRoomOwner,

    #[error("Participant name must not be empty")]
    EmptyName,
}

/// Errors from subscribing to or publishing on a room channel
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Invalid channel URL: {0}")]
    InvalidUrl(String),

    #[error("Subscribe handshake failed: {0}")]
    Connect(String),

    #[error("Channel closed")]
    Closed,

    #[error("Send failed: {0}")]
    Send(String),

    #[error("Event encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors from durable upserts and the local leaderboard file
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upsert rejected with status {status}: {message}")]
    Rejected {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Invalid leaderboard snapshot: {0}")]
    Snapshot(String),
}

/// Backend codes meaning the target relation does not exist
const MISSING_RELATION_CODES: &[&str] = &["PGRST116", "PGRST205", "42P01"];

impl StoreError {
    /// True when the backing table is missing, which is the normal state
    /// of a development setup without the schema applied.
    pub fn is_missing_relation(&self) -> bool {
        match self {
            StoreError::Rejected {
                code: Some(code), ..
            } => MISSING_RELATION_CODES.contains(&code.as_str()),
            _ => false,
        }
    }
}
