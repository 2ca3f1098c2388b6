//! Self-hostable room relay: websocket fan-out per room plus a small
//! read-only HTTP API.

use crate::config::RelayConfig;
use crate::leaderboard;
use crate::protocol::ChannelEvent;
use crate::transport::RoomHub;
use crate::types::{RoomId, ScoreEntry};
use crate::{api, ws};
use axum::{routing::get, Router};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared relay state
#[derive(Clone)]
pub struct RelayState {
    pub hub: RoomHub,
    /// The relay's own replicated view of each room's leaderboard
    pub leaderboards: Arc<RwLock<HashMap<RoomId, Vec<ScoreEntry>>>>,
    pub started_at: DateTime<Utc>,
}

impl RelayState {
    pub fn new(config: &RelayConfig) -> Self {
        Self {
            hub: RoomHub::new(config.room_capacity),
            leaderboards: Arc::new(RwLock::new(HashMap::new())),
            started_at: Utc::now(),
        }
    }

    /// Fold a relayed event into the room's leaderboard view
    pub async fn observe(&self, room: &str, event: &ChannelEvent) {
        match event {
            ChannelEvent::Score(score) => {
                let mut boards = self.leaderboards.write().await;
                let board = boards.entry(room.to_string()).or_default();
                *board = leaderboard::merge(board, score.entry.clone());
            }
            ChannelEvent::Reset(_) => {
                self.leaderboards.write().await.remove(room);
            }
            ChannelEvent::Placement(_) => {}
        }
    }

    pub async fn leaderboard(&self, room: &str) -> Vec<ScoreEntry> {
        self.leaderboards
            .read()
            .await
            .get(room)
            .cloned()
            .unwrap_or_default()
    }
}

impl Default for RelayState {
    fn default() -> Self {
        Self::new(&RelayConfig::default())
    }
}

pub fn router(state: RelayState) -> Router {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .route("/api/health", get(api::health))
        .route("/api/rooms/{room}/leaderboard", get(api::room_leaderboard))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the relay on an already bound listener until it fails
pub async fn serve(listener: tokio::net::TcpListener, state: RelayState) -> std::io::Result<()> {
    axum::serve(listener, router(state)).await
}
