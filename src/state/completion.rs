use super::GameSession;
use crate::types::*;
use tokio::time::Instant;

impl GameSession {
    /// Finish the round once every pool item has a placement.
    ///
    /// Only depends on final coverage, so the order in which placements
    /// arrived does not matter. Fires at most once per round.
    pub fn check_completion(&mut self) -> Option<ScoreEntry> {
        if self.status != RoundStatus::InProgress {
            return None;
        }

        let total = self.store.total();
        if total == 0 || self.store.placed_count() != total {
            return None;
        }

        let now = Instant::now();
        self.finished_at = Some(now);
        self.status = RoundStatus::Completed;

        let elapsed = self
            .started_at
            .map(|start| now.saturating_duration_since(start).as_millis() as u64)
            .unwrap_or(0);
        let correct = self.store.correct_count() as u32;

        let entry = ScoreEntry {
            name: self
                .participant
                .as_ref()
                .map(|p| p.name.clone())
                .unwrap_or_else(|| "Player".to_string()),
            score: correct,
            time: elapsed,
            timestamp: chrono::Utc::now().timestamp_millis(),
            player_id: self.participant.as_ref().map(|p| p.id.clone()),
        };

        tracing::info!(
            "Round complete in room '{}': {}/{} correct in {} ms",
            self.room,
            correct,
            total,
            elapsed
        );

        self.record_score(entry.clone());
        Some(entry)
    }
}
