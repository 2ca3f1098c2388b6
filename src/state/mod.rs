mod completion;
mod placement;
mod round;
mod score;
mod store;

pub use placement::{PlacementOutcome, UnknownItemPolicy};
pub use round::StartRequest;
pub use store::{Board, Column, PlacementStore};

use crate::catalog::Catalog;
use crate::channel::{ChannelAdapter, ConnectionStatus};
use crate::config::{SyncConfig, DEFAULT_ROOM};
use crate::leaderboard::{JsonFileStore, LeaderboardStore, MemoryStore};
use crate::protocol::ChannelEvent;
use crate::types::*;
use std::sync::Arc;
use tokio::time::Instant;

/// One client's view of a room: its placements, round and leaderboard.
///
/// Owned by a single event loop. Local input and room events both go
/// through the same reconciliation paths.
pub struct GameSession {
    catalog: Arc<Catalog>,
    policy: UnknownItemPolicy,
    default_room: RoomId,
    room: RoomId,
    participant: Option<Participant>,
    user_entry: Option<Item>,
    status: RoundStatus,
    started_at: Option<Instant>,
    finished_at: Option<Instant>,
    store: PlacementStore,
    leaderboard: Vec<ScoreEntry>,
    leaderboard_store: Box<dyn LeaderboardStore>,
    last_score: Option<ScoreEntry>,
    channel: ChannelAdapter,
}

fn load_leaderboard(store: &dyn LeaderboardStore) -> Vec<ScoreEntry> {
    store.load().unwrap_or_else(|e| {
        tracing::warn!("Failed to load leaderboard, starting empty: {}", e);
        Vec::new()
    })
}

impl GameSession {
    pub fn new(
        catalog: Arc<Catalog>,
        channel: ChannelAdapter,
        leaderboard_store: Box<dyn LeaderboardStore>,
        default_room: RoomId,
    ) -> Self {
        Self {
            catalog,
            policy: UnknownItemPolicy::default(),
            room: default_room.clone(),
            default_room,
            participant: None,
            user_entry: None,
            status: RoundStatus::NotStarted,
            started_at: None,
            finished_at: None,
            store: PlacementStore::new(),
            leaderboard: load_leaderboard(leaderboard_store.as_ref()),
            leaderboard_store,
            last_score: None,
            channel,
        }
    }

    /// Single-client session with the builtin catalog and no sync
    pub fn offline() -> Self {
        Self::new(
            Arc::new(Catalog::builtin()),
            ChannelAdapter::offline(),
            Box::new(MemoryStore::new()),
            DEFAULT_ROOM.to_string(),
        )
    }

    pub fn from_config(config: &SyncConfig) -> Self {
        let leaderboard_store: Box<dyn LeaderboardStore> = match &config.leaderboard_path {
            Some(path) => Box::new(JsonFileStore::new(path.clone())),
            None => Box::new(MemoryStore::new()),
        };

        Self::new(
            Arc::new(Catalog::builtin()),
            ChannelAdapter::from_config(config),
            leaderboard_store,
            config.default_room.clone(),
        )
        .with_policy(UnknownItemPolicy::with_label(config.unknown_label.clone()))
    }

    pub fn with_policy(mut self, policy: UnknownItemPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Swap the leaderboard persistence and load what it holds
    pub fn with_leaderboard_store(mut self, store: Box<dyn LeaderboardStore>) -> Self {
        self.leaderboard = load_leaderboard(store.as_ref());
        self.leaderboard_store = store;
        self
    }

    /// Switch to `room`, replacing the current subscription
    pub async fn join(&mut self, room: &str) -> ConnectionStatus {
        self.room = room.to_string();
        self.channel.connect(room).await
    }

    /// Dispatch one room event
    pub fn handle_event(&mut self, event: ChannelEvent) {
        match event {
            ChannelEvent::Placement(placement) => {
                self.reconcile(placement);
            }
            ChannelEvent::Score(score) => self.receive_score(score.entry),
            ChannelEvent::Reset(_) => self.apply_remote_reset(),
        }
    }

    /// Apply every room event that has already arrived. Returns how many.
    pub fn poll_inbound(&mut self) -> usize {
        let mut applied = 0;
        while let Some(event) = self.channel.try_recv() {
            self.handle_event(event);
            applied += 1;
        }
        applied
    }

    /// Wait for the next room event and apply it
    pub async fn next_inbound(&mut self) -> Option<ChannelEvent> {
        let event = self.channel.recv().await?;
        self.handle_event(event.clone());
        Some(event)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn policy(&self) -> &UnknownItemPolicy {
        &self.policy
    }

    pub fn room(&self) -> &str {
        &self.room
    }

    pub fn participant(&self) -> Option<&Participant> {
        self.participant.as_ref()
    }

    pub fn user_entry(&self) -> Option<&Item> {
        self.user_entry.as_ref()
    }

    pub fn round_status(&self) -> RoundStatus {
        self.status
    }

    pub fn connection_status(&self) -> ConnectionStatus {
        self.channel.status()
    }

    pub fn leaderboard(&self) -> &[ScoreEntry] {
        &self.leaderboard
    }

    /// Score of this client's last completed round
    pub fn last_score(&self) -> Option<&ScoreEntry> {
        self.last_score.as_ref()
    }

    pub fn phase_of(&self, item_id: &str) -> Option<Phase> {
        self.store.phase_of(item_id)
    }

    /// Pool pieces not placed yet
    pub fn available(&self) -> Vec<&Item> {
        self.store.available()
    }

    pub fn board(&self) -> Board {
        self.store.board()
    }

    pub fn placements(&self) -> &PlacementStore {
        &self.store
    }
}
