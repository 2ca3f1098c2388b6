//! Read-only HTTP endpoints of the relay.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::relay::RelayState;
use crate::types::{RoomId, ScoreEntry};

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub rooms: usize,
    pub uptime_secs: i64,
}

/// GET /api/health
pub async fn health(State(state): State<RelayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        rooms: state.hub.room_count().await,
        uptime_secs: (chrono::Utc::now() - state.started_at).num_seconds(),
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct RoomLeaderboardResponse {
    pub room: RoomId,
    /// Sockets currently connected to the room
    pub members: usize,
    pub entries: Vec<ScoreEntry>,
}

/// GET /api/rooms/{room}/leaderboard
///
/// Returns the scores the relay has seen pass through the room since its
/// last reset. An unknown room is an empty leaderboard.
pub async fn room_leaderboard(
    Path(room): Path<String>,
    State(state): State<RelayState>,
) -> Json<RoomLeaderboardResponse> {
    Json(RoomLeaderboardResponse {
        members: state.hub.member_count(&room).await,
        entries: state.leaderboard(&room).await,
        room,
    })
}

#[cfg(test)]
mod tests {
    use crate::protocol::{ChannelEvent, ScoreEvent};
    use crate::relay::{router, RelayState};
    use crate::types::ScoreEntry;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn get_json(state: RelayState, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = router(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, json) = get_json(RelayState::default(), "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["rooms"], 0);
    }

    #[tokio::test]
    async fn test_room_leaderboard() {
        let state = RelayState::default();
        state
            .observe(
                "class a",
                &ChannelEvent::Score(ScoreEvent {
                    entry: ScoreEntry {
                        name: "Ada".to_string(),
                        score: 30,
                        time: 61_000,
                        timestamp: 0,
                        player_id: Some("p1".to_string()),
                    },
                    game_id: "class a".to_string(),
                }),
            )
            .await;

        let (status, json) = get_json(state, "/api/rooms/class%20a/leaderboard").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["room"], "class a");
        assert_eq!(json["members"], 0);
        assert_eq!(json["entries"][0]["name"], "Ada");
        assert_eq!(json["entries"][0]["playerId"], "p1");
    }

    #[tokio::test]
    async fn test_unknown_room_is_empty() {
        let (_, json) = get_json(RelayState::default(), "/api/rooms/nowhere/leaderboard").await;
        assert_eq!(json["entries"].as_array().unwrap().len(), 0);
    }
}
