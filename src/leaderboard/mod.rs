//! Bounded, ordered ranking of finished rounds.
//!
//! Every client keeps its own copy and folds in whatever score events it
//! observes; there is no canonical leaderboard.

mod snapshot;
mod store;

pub use snapshot::{LeaderboardSnapshot, StoredLeaderboard, SNAPSHOT_SCHEMA_VERSION};
pub use store::{JsonFileStore, LeaderboardStore, MemoryStore};

use crate::types::ScoreEntry;
use std::cmp::Ordering;

/// Maximum number of entries a leaderboard keeps
pub const LEADERBOARD_CAPACITY: usize = 10;

/// Ranking order: higher score first, then faster time
fn rank(a: &ScoreEntry, b: &ScoreEntry) -> Ordering {
    b.score.cmp(&a.score).then(a.time.cmp(&b.time))
}

/// Fold `new_entry` into `existing`, returning the re-sorted top entries.
///
/// The sort is stable, so entries tied on (score, time) keep their
/// insertion order. Origin of the entry does not matter.
pub fn merge(existing: &[ScoreEntry], new_entry: ScoreEntry) -> Vec<ScoreEntry> {
    let mut merged = Vec::with_capacity(existing.len() + 1);
    merged.extend_from_slice(existing);
    merged.push(new_entry);
    merged.sort_by(rank);
    merged.truncate(LEADERBOARD_CAPACITY);
    merged
}

/// Rebuild a valid leaderboard from arbitrary entries
pub fn normalize(entries: Vec<ScoreEntry>) -> Vec<ScoreEntry> {
    entries
        .into_iter()
        .fold(Vec::new(), |board, entry| merge(&board, entry))
}
