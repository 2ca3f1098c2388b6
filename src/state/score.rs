use super::GameSession;
use crate::leaderboard;
use crate::protocol::ScoreEvent;
use crate::types::*;

impl GameSession {
    /// Fold this client's finished round into the leaderboard and share it
    pub(super) fn record_score(&mut self, entry: ScoreEntry) {
        self.leaderboard = leaderboard::merge(&self.leaderboard, entry.clone());
        self.persist_leaderboard();
        self.last_score = Some(entry.clone());

        if self.participant.is_some() {
            self.channel.emit_score(ScoreEvent {
                entry,
                game_id: self.room.clone(),
            });
        }
    }

    /// Fold a score observed on the room channel. Same merge as local
    /// scores, never re-broadcast.
    pub fn receive_score(&mut self, entry: ScoreEntry) {
        tracing::debug!(
            "Received score {} for '{}' ({} ms)",
            entry.score,
            entry.name,
            entry.time
        );
        self.leaderboard = leaderboard::merge(&self.leaderboard, entry);
        self.persist_leaderboard();
    }

    /// This participant's entry on the leaderboard, else the top entry
    pub fn own_score(&self) -> Option<&ScoreEntry> {
        let own_id = self.participant.as_ref().map(|p| p.id.as_str());
        self.leaderboard
            .iter()
            .find(|e| own_id.is_some() && e.player_id.as_deref() == own_id)
            .or_else(|| self.leaderboard.first())
    }

    pub(super) fn persist_leaderboard(&self) {
        if let Err(e) = self.leaderboard_store.save(&self.leaderboard) {
            tracing::warn!("Failed to save leaderboard: {}", e);
        }
    }
}
