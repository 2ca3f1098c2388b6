//! Environment-driven configuration.
//!
//! Sync is optional: without both connection parameters every client runs
//! fully local, which is a downgrade and never an error.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Room joined when none is given
pub const DEFAULT_ROOM: &str = "demo-classroom";

/// Author label for pieces received from a room but unknown locally
pub const DEFAULT_UNKNOWN_LABEL: &str = "Teammate";

/// Text for unknown pieces whose event carried no text
pub const DEFAULT_UNKNOWN_TEXT: &str = "Player entry";

fn env_trimmed(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

/// Client-side sync configuration
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Base URL of the sync backend (None = local mode)
    pub endpoint: Option<String>,
    /// Access key sent with every request (None = local mode)
    pub access_key: Option<String>,
    /// Whether sends also attempt durable upserts
    pub durable_writes: bool,
    /// Where the local leaderboard is kept (None = memory only)
    pub leaderboard_path: Option<PathBuf>,
    /// Author label for unknown remote pieces
    pub unknown_label: String,
    pub default_room: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            access_key: None,
            durable_writes: true,
            leaderboard_path: None,
            unknown_label: DEFAULT_UNKNOWN_LABEL.to_string(),
            default_room: DEFAULT_ROOM.to_string(),
        }
    }
}

impl SyncConfig {
    /// Load configuration from environment variables.
    /// ELEPHANT_SYNC_URL and ELEPHANT_SYNC_KEY must both be set to enable sync.
    pub fn from_env() -> Self {
        let endpoint = env_trimmed("ELEPHANT_SYNC_URL");
        let access_key = env_trimmed("ELEPHANT_SYNC_KEY");

        let (endpoint, access_key) = if endpoint.is_some() && access_key.is_some() {
            tracing::info!("Room sync configured");
            (endpoint, access_key)
        } else {
            if endpoint.is_some() || access_key.is_some() {
                tracing::warn!(
                    "ELEPHANT_SYNC_URL and ELEPHANT_SYNC_KEY must both be set to enable sync"
                );
            }
            tracing::info!("Room sync not configured, running in local mode");
            (None, None)
        };

        let durable_writes = env_trimmed("ELEPHANT_SYNC_DURABLE")
            .map(|v| !matches!(v.to_lowercase().as_str(), "0" | "false" | "off" | "no"))
            .unwrap_or(true);

        Self {
            endpoint,
            access_key,
            durable_writes,
            leaderboard_path: env_trimmed("ELEPHANT_LEADERBOARD_PATH").map(PathBuf::from),
            unknown_label: env_trimmed("ELEPHANT_UNKNOWN_LABEL")
                .unwrap_or_else(|| DEFAULT_UNKNOWN_LABEL.to_string()),
            default_room: env_trimmed("ELEPHANT_DEFAULT_ROOM")
                .unwrap_or_else(|| DEFAULT_ROOM.to_string()),
        }
    }

    /// Check if room sync is enabled
    pub fn is_online(&self) -> bool {
        self.endpoint.is_some() && self.access_key.is_some()
    }
}

/// Relay server configuration
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub bind: SocketAddr,
    /// Per-room broadcast buffer; slow sockets beyond it lose events
    pub room_capacity: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 6574)),
            room_capacity: 256,
        }
    }
}

impl RelayConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let bind = match env_trimmed("ELEPHANT_BIND") {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!("Invalid ELEPHANT_BIND '{}': {}, using {}", raw, e, defaults.bind);
                defaults.bind
            }),
            None => defaults.bind,
        };

        Self {
            bind,
            room_capacity: env_trimmed("ELEPHANT_ROOM_CAPACITY")
                .and_then(|s| s.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.room_capacity),
        }
    }
}
