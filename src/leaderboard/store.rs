//! Local leaderboard persistence: load once at startup, rewrite on change.

use super::{LeaderboardSnapshot, StoredLeaderboard};
use crate::error::StoreError;
use crate::types::ScoreEntry;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Key/value style persistence of a single leaderboard
pub trait LeaderboardStore: Send {
    /// Load the saved leaderboard. A missing save is an empty board.
    fn load(&self) -> Result<Vec<ScoreEntry>, StoreError>;

    fn save(&self, entries: &[ScoreEntry]) -> Result<(), StoreError>;
}

/// Leaderboard kept in a JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LeaderboardStore for JsonFileStore {
    fn load(&self) -> Result<Vec<ScoreEntry>, StoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let stored: StoredLeaderboard = serde_json::from_str(&raw)?;
        stored.into_entries().map_err(StoreError::Snapshot)
    }

    fn save(&self, entries: &[ScoreEntry]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        // Write-then-rename so a crash never leaves a truncated file
        let json = serde_json::to_string_pretty(&LeaderboardSnapshot::new(entries.to_vec()))?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// In-memory store; clones share the same contents
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<Vec<ScoreEntry>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<ScoreEntry>) -> Self {
        Self {
            entries: Arc::new(Mutex::new(entries)),
        }
    }

    /// Currently saved entries
    pub fn entries(&self) -> Vec<ScoreEntry> {
        self.entries
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl LeaderboardStore for MemoryStore {
    fn load(&self) -> Result<Vec<ScoreEntry>, StoreError> {
        Ok(self.entries())
    }

    fn save(&self, entries: &[ScoreEntry]) -> Result<(), StoreError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|_| StoreError::Snapshot("memory store poisoned".to_string()))?;
        *guard = entries.to_vec();
        Ok(())
    }
}
