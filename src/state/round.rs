use super::GameSession;
use crate::error::SessionError;
use crate::types::*;
use tokio::time::Instant;

/// Everything a participant enters on the start screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartRequest {
    pub name: String,
    /// Free-text "creative moment"; becomes an extra piece when non-empty
    pub answer: Option<String>,
    pub role: Role,
    /// Room to play in; the default room when unset or blank
    pub room: Option<RoomId>,
}

impl StartRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            answer: None,
            role: Role::Player,
            room: None,
        }
    }

    pub fn with_answer(mut self, answer: impl Into<String>) -> Self {
        self.answer = Some(answer.into());
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn in_room(mut self, room: impl Into<RoomId>) -> Self {
        self.room = Some(room.into());
        self
    }
}

impl GameSession {
    /// Begin a new round with a fresh participant identity.
    ///
    /// Clears placements and the leaderboard, seeds the pool and switches
    /// rooms if needed.
    pub async fn start(&mut self, request: StartRequest) -> Result<&Participant, SessionError> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(SessionError::EmptyName);
        }

        let room = request
            .room
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(self.default_room.as_str())
            .to_string();

        let participant = Participant::new(name.to_string(), request.role);
        let user_entry = request
            .answer
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(|answer| Item::user_entry(&participant, answer));

        let pool = self
            .catalog
            .quotes()
            .iter()
            .chain(self.catalog.titles())
            .cloned()
            .chain(user_entry.clone());
        self.store.seed(pool);

        self.user_entry = user_entry;
        self.leaderboard.clear();
        self.persist_leaderboard();
        self.last_score = None;
        self.started_at = Some(Instant::now());
        self.finished_at = None;
        self.status = RoundStatus::InProgress;

        tracing::info!(
            "Round started for '{}' ({:?}) in room '{}' with {} pieces",
            participant.name,
            participant.role,
            room,
            self.store.total()
        );
        if self.channel.room() != Some(room.as_str()) {
            self.join(&room).await;
        }

        Ok(self.participant.insert(participant))
    }

    fn wipe(&mut self) {
        self.status = RoundStatus::NotStarted;
        self.store.clear();
        self.user_entry = None;
        self.leaderboard.clear();
        self.persist_leaderboard();
        self.last_score = None;
        self.started_at = None;
        self.finished_at = None;
    }

    /// Wipe local state and tell the room to do the same
    pub fn reset(&mut self) {
        self.wipe();
        self.channel.emit_reset();
        tracing::info!("Room '{}' reset", self.room);
    }

    /// Reset on behalf of the participant; only the room owner may do it
    pub fn request_room_reset(&mut self) -> Result<(), SessionError> {
        match &self.participant {
            Some(p) if p.can_reset_room() => {
                self.reset();
                Ok(())
            }
            _ => Err(SessionError::NotRoomOwner),
        }
    }

    /// Reset received from the room. Never re-broadcast.
    pub fn apply_remote_reset(&mut self) {
        self.wipe();
        tracing::info!("Room '{}' was reset by another participant", self.room);
    }

    pub fn placed_count(&self) -> usize {
        self.store.placed_count()
    }

    pub fn total_pieces(&self) -> usize {
        self.store.total()
    }

    /// Pieces left in the pool
    pub fn remaining(&self) -> usize {
        self.total_pieces() - self.placed_count()
    }

    /// Completed fraction, 0.0 before the round starts
    pub fn progress(&self) -> f64 {
        match self.total_pieces() {
            0 => 0.0,
            total => self.placed_count() as f64 / total as f64,
        }
    }

    /// Round time so far; frozen once the round completes
    pub fn elapsed_ms(&self) -> u64 {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => end.saturating_duration_since(start).as_millis() as u64,
            (Some(start), None) => start.elapsed().as_millis() as u64,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::error::SessionError;
    use crate::leaderboard::MemoryStore;
    use crate::state::{GameSession, StartRequest};
    use crate::types::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_start_seeds_pool() {
        let mut session = GameSession::offline();
        let participant = session
            .start(StartRequest::new("  Ada ").with_answer("   "))
            .await
            .unwrap()
            .clone();

        assert_eq!(participant.name, "Ada");
        assert_eq!(participant.role, Role::Player);
        assert!(session.user_entry().is_none());
        assert_eq!(session.total_pieces(), 31);
        assert_eq!(session.remaining(), 31);
        assert_eq!(session.round_status(), RoundStatus::InProgress);
        assert_eq!(session.room(), "demo-classroom");
    }

    #[tokio::test]
    async fn test_start_requires_name() {
        let mut session = GameSession::offline();
        assert_eq!(
            session.start(StartRequest::new(" ")).await.unwrap_err(),
            SessionError::EmptyName
        );
        assert_eq!(session.round_status(), RoundStatus::NotStarted);
    }

    #[tokio::test]
    async fn test_start_gives_fresh_identity_and_clears_leaderboard() {
        let store = MemoryStore::with_entries(vec![ScoreEntry {
            name: "Old".to_string(),
            score: 1,
            time: 1,
            timestamp: 0,
            player_id: None,
        }]);
        let mut session = GameSession::offline().with_leaderboard_store(Box::new(store.clone()));
        assert_eq!(session.leaderboard().len(), 1);

        let first = session.start(StartRequest::new("Ada")).await.unwrap().id.clone();
        let second = session.start(StartRequest::new("Ada")).await.unwrap().id.clone();

        assert_ne!(first, second);
        assert!(session.leaderboard().is_empty());
        assert!(store.entries().is_empty());
    }

    #[tokio::test]
    async fn test_reset_wipes_everything() {
        let mut session = GameSession::offline();
        session
            .start(StartRequest::new("Ada").with_answer("Eureka in the bath"))
            .await
            .unwrap();
        session.place("prep-1", Phase::Preparation).unwrap();

        session.reset();

        assert_eq!(session.round_status(), RoundStatus::NotStarted);
        assert_eq!(session.placed_count(), 0);
        assert_eq!(session.total_pieces(), 0);
        assert!(session.available().is_empty());
        assert!(session.user_entry().is_none());
        assert!(session.leaderboard().is_empty());
        assert_eq!(session.elapsed_ms(), 0);
    }

    #[tokio::test]
    async fn test_only_room_owner_can_reset_room() {
        let mut session = GameSession::offline();
        assert_eq!(session.request_room_reset(), Err(SessionError::NotRoomOwner));

        session.start(StartRequest::new("Ada")).await.unwrap();
        session.place("prep-1", Phase::Preparation).unwrap();
        assert_eq!(session.request_room_reset(), Err(SessionError::NotRoomOwner));
        assert_eq!(session.placed_count(), 1);

        session
            .start(StartRequest::new("Grace").with_role(Role::RoomOwner))
            .await
            .unwrap();
        assert!(session.request_room_reset().is_ok());
        assert_eq!(session.round_status(), RoundStatus::NotStarted);
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_and_timer() {
        let mut session = GameSession::offline();
        assert_eq!(session.progress(), 0.0);

        session.start(StartRequest::new("Ada").in_room("class-b")).await.unwrap();
        assert_eq!(session.room(), "class-b");

        tokio::time::advance(Duration::from_millis(1500)).await;
        assert_eq!(session.elapsed_ms(), 1500);

        let ids: Vec<_> = session.available().iter().map(|i| i.id.clone()).collect();
        for id in &ids[..31] {
            if session.placed_count() + 1 < session.total_pieces() {
                session.place(id, Phase::Preparation).unwrap();
            }
        }
        assert_eq!(session.remaining(), 1);
        assert!(session.progress() > 0.96 && session.progress() < 1.0);

        session.place(&ids[30], Phase::Preparation).unwrap();
        tokio::time::advance(Duration::from_millis(5000)).await;
        assert_eq!(session.elapsed_ms(), 1500);
    }
}
