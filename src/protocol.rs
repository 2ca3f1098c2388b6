use crate::types::*;
use serde::{Deserialize, Serialize};

/// Events exchanged over a room channel.
///
/// Encoded as `{"event": "<name>", "payload": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "payload", rename_all = "snake_case")]
pub enum ChannelEvent {
    Placement(PlacementEvent),
    Score(ScoreEvent),
    /// Full room wipe
    Reset(ResetPayload),
}

impl ChannelEvent {
    pub fn reset() -> Self {
        ChannelEvent::Reset(ResetPayload {})
    }

    pub fn name(&self) -> &'static str {
        match self {
            ChannelEvent::Placement(_) => "placement",
            ChannelEvent::Score(_) => "score",
            ChannelEvent::Reset(_) => "reset",
        }
    }

    pub fn encode(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn decode(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

/// Piece kind as carried on the wire. User entries travel as quotes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    Quote,
    Title,
}

impl From<ItemKind> for PieceKind {
    fn from(kind: ItemKind) -> Self {
        match kind {
            ItemKind::Title => PieceKind::Title,
            ItemKind::Quote | ItemKind::UserEntry => PieceKind::Quote,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlacementEvent {
    pub piece_id: ItemId,
    pub phase: Phase,
    pub kind: PieceKind,
    pub player_id: PlayerId,
    /// Only set for user entries, so receivers can materialize the piece
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoreEvent {
    #[serde(flatten)]
    pub entry: ScoreEntry,
    pub game_id: RoomId,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ResetPayload {}

/// Row written to the `placements` relation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlacementRecord {
    pub game_id: RoomId,
    pub player_id: PlayerId,
    pub piece_id: ItemId,
    pub phase: Phase,
    pub kind: PieceKind,
}

/// Row written to the `scores` relation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreRecord {
    pub game_id: RoomId,
    pub player_id: Option<PlayerId>,
    pub name: String,
    pub score: u32,
    pub time_ms: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DurableRecord {
    Placement(PlacementRecord),
    Score(ScoreRecord),
}

impl DurableRecord {
    /// Relation the record is upserted into
    pub fn table(&self) -> &'static str {
        match self {
            DurableRecord::Placement(_) => "placements",
            DurableRecord::Score(_) => "scores",
        }
    }

    pub fn for_placement(room: &str, event: &PlacementEvent) -> Self {
        DurableRecord::Placement(PlacementRecord {
            game_id: room.to_string(),
            player_id: event.player_id.clone(),
            piece_id: event.piece_id.clone(),
            phase: event.phase,
            kind: event.kind,
        })
    }

    pub fn for_score(event: &ScoreEvent) -> Self {
        DurableRecord::Score(ScoreRecord {
            game_id: event.game_id.clone(),
            player_id: event.entry.player_id.clone(),
            name: event.entry.name.clone(),
            score: event.entry.score,
            time_ms: event.entry.time,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_wire_format() {
        let event = ChannelEvent::Placement(PlacementEvent {
            piece_id: "inc-2".to_string(),
            phase: Phase::Incubation,
            kind: PieceKind::Quote,
            player_id: "p1".to_string(),
            text: None,
        });

        let json: serde_json::Value = serde_json::from_str(&event.encode().unwrap()).unwrap();
        assert_eq!(json["event"], "placement");
        assert_eq!(json["payload"]["pieceId"], "inc-2");
        assert_eq!(json["payload"]["phase"], "incubation");
        assert_eq!(json["payload"]["kind"], "quote");
        assert_eq!(json["payload"]["playerId"], "p1");
        assert!(json["payload"].get("text").is_none());
    }

    #[test]
    fn test_score_payload_is_flat() {
        let raw = r#"{"event":"score","payload":{"name":"Ada","score":9,"time":42000,
            "timestamp":1700000000000,"playerId":"p1","gameId":"demo-classroom"}}"#;

        match ChannelEvent::decode(raw).unwrap() {
            ChannelEvent::Score(score) => {
                assert_eq!(score.entry.name, "Ada");
                assert_eq!(score.entry.score, 9);
                assert_eq!(score.entry.player_id.as_deref(), Some("p1"));
                assert_eq!(score.game_id, "demo-classroom");
            }
            other => panic!("Expected score event, got {:?}", other),
        }
    }

    #[test]
    fn test_reset_carries_empty_payload() {
        let json = ChannelEvent::reset().encode().unwrap();
        assert_eq!(json, r#"{"event":"reset","payload":{}}"#);
        assert_eq!(ChannelEvent::decode(&json).unwrap(), ChannelEvent::reset());
    }

    #[test]
    fn test_unknown_event_is_rejected() {
        assert!(ChannelEvent::decode(r#"{"event":"cursor","payload":{}}"#).is_err());
        assert!(ChannelEvent::decode(
            r#"{"event":"placement","payload":{"pieceId":"x","phase":"dreaming","kind":"quote","playerId":"p"}}"#
        )
        .is_err());
    }

    #[test]
    fn test_user_entry_travels_as_quote() {
        assert_eq!(PieceKind::from(ItemKind::UserEntry), PieceKind::Quote);
        assert_eq!(PieceKind::from(ItemKind::Title), PieceKind::Title);
    }

    #[test]
    fn test_durable_records() {
        let placement = PlacementEvent {
            piece_id: "ver-1".to_string(),
            phase: Phase::Verification,
            kind: PieceKind::Quote,
            player_id: "p1".to_string(),
            text: None,
        };
        let record = DurableRecord::for_placement("room-a", &placement);
        assert_eq!(record.table(), "placements");

        let score = ScoreEvent {
            entry: ScoreEntry {
                name: "Ada".to_string(),
                score: 3,
                time: 900,
                timestamp: 0,
                player_id: Some("p1".to_string()),
            },
            game_id: "room-a".to_string(),
        };
        match DurableRecord::for_score(&score) {
            DurableRecord::Score(row) => {
                assert_eq!(row.time_ms, 900);
                assert_eq!(row.game_id, "room-a");
            }
            other => panic!("Expected score record, got {:?}", other),
        }
    }
}
