//! Serializable leaderboard snapshot for local persistence across sessions.

use super::{normalize, LEADERBOARD_CAPACITY};
use crate::types::ScoreEntry;
use serde::{Deserialize, Serialize};

/// Schema version for snapshot format compatibility
/// Version 1: entries wrapped with schema version and save time
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

/// A leaderboard as written to local storage
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeaderboardSnapshot {
    /// Schema version for forward compatibility
    pub schema_version: u32,
    /// Save timestamp (ISO8601)
    pub saved_at: String,
    pub entries: Vec<ScoreEntry>,
}

/// Anything found in the leaderboard file.
///
/// Older saves are a bare JSON array of entries.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StoredLeaderboard {
    Snapshot(LeaderboardSnapshot),
    Legacy(Vec<ScoreEntry>),
}

impl LeaderboardSnapshot {
    /// Create a snapshot with the current timestamp
    pub fn new(entries: Vec<ScoreEntry>) -> Self {
        Self {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            saved_at: chrono::Utc::now().to_rfc3339(),
            entries,
        }
    }

    /// Validate the snapshot before loading it
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version > SNAPSHOT_SCHEMA_VERSION {
            return Err(format!(
                "Snapshot schema version {} is newer than supported version {}",
                self.schema_version, SNAPSHOT_SCHEMA_VERSION
            ));
        }
        Ok(())
    }
}

impl StoredLeaderboard {
    /// Validated, ranked and bounded entries
    pub fn into_entries(self) -> Result<Vec<ScoreEntry>, String> {
        let entries = match self {
            StoredLeaderboard::Snapshot(snapshot) => {
                snapshot.validate()?;
                snapshot.entries
            }
            StoredLeaderboard::Legacy(entries) => entries,
        };

        if entries.len() > LEADERBOARD_CAPACITY {
            tracing::debug!(
                "Stored leaderboard has {} entries, keeping top {}",
                entries.len(),
                LEADERBOARD_CAPACITY
            );
        }
        Ok(normalize(entries))
    }
}
