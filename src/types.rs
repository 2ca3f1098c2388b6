use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque ID types for readability
pub type ItemId = String;
pub type PlayerId = String;
pub type RoomId = String;

/// The four classification buckets of the creative process.
///
/// Declaration order is the display order of the board.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Preparation,
    Incubation,
    Illumination,
    Verification,
}

impl Phase {
    pub const ALL: [Phase; 4] = [
        Phase::Preparation,
        Phase::Incubation,
        Phase::Illumination,
        Phase::Verification,
    ];

    /// Wire name, as used in placement events
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Preparation => "preparation",
            Phase::Incubation => "incubation",
            Phase::Illumination => "illumination",
            Phase::Verification => "verification",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Phase::Preparation => "Preparation",
            Phase::Incubation => "Incubation",
            Phase::Illumination => "Illumination",
            Phase::Verification => "Verification",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ItemKind {
    Quote,
    Title,
    /// A participant's free-text "creative moment"
    UserEntry,
}

/// A placeable piece: catalog quote, phase title or a participant's entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub id: ItemId,
    pub text: String,
    pub author: String,
    pub correct_phase: Phase,
    pub kind: ItemKind,
}

impl Item {
    pub fn quote(id: &str, text: &str, author: &str, phase: Phase) -> Self {
        Self {
            id: id.to_string(),
            text: text.to_string(),
            author: author.to_string(),
            correct_phase: phase,
            kind: ItemKind::Quote,
        }
    }

    pub fn title(id: &str, text: &str, phase: Phase) -> Self {
        Self {
            id: id.to_string(),
            text: text.to_string(),
            author: String::new(),
            correct_phase: phase,
            kind: ItemKind::Title,
        }
    }

    /// Build the puzzle piece for a participant's own submission.
    /// User entries always belong to incubation.
    pub fn user_entry(participant: &Participant, text: &str) -> Self {
        Self {
            id: user_entry_id(&participant.id),
            text: text.to_string(),
            author: participant.name.clone(),
            correct_phase: Phase::Incubation,
            kind: ItemKind::UserEntry,
        }
    }

    /// Whether dropping this item on `phase` counts as correct
    pub fn is_correct(&self, phase: Phase) -> bool {
        match self.kind {
            ItemKind::UserEntry => phase == Phase::Incubation,
            ItemKind::Quote | ItemKind::Title => phase == self.correct_phase,
        }
    }
}

pub fn user_entry_id(player_id: &str) -> ItemId {
    format!("user-{}", player_id)
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Player,
    /// Game master; the only role allowed to reset a room
    #[serde(alias = "gm")]
    RoomOwner,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Participant {
    pub id: PlayerId,
    pub name: String,
    pub role: Role,
}

impl Participant {
    /// Create a participant with a fresh identity
    pub fn new(name: String, role: Role) -> Self {
        Self {
            id: ulid::Ulid::new().to_string(),
            name,
            role,
        }
    }

    pub fn can_reset_room(&self) -> bool {
        self.role == Role::RoomOwner
    }
}

/// A finished round as it appears on a leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
    /// Elapsed round time in milliseconds
    pub time: u64,
    /// Creation time, epoch milliseconds
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_id: Option<PlayerId>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RoundStatus {
    NotStarted,
    InProgress,
    Completed,
}

/// Where a placement came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// This client's input layer; gets broadcast
    Local,
    /// Received from the room channel; never re-broadcast
    Remote,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_entry_correct_only_in_incubation() {
        let p = Participant::new("Ada".to_string(), Role::Player);
        let entry = Item::user_entry(&p, "Shower thoughts");

        assert_eq!(entry.id, format!("user-{}", p.id));
        assert_eq!(entry.author, "Ada");
        assert!(entry.is_correct(Phase::Incubation));
        assert!(!entry.is_correct(Phase::Illumination));
    }

    #[test]
    fn test_quote_correctness_follows_answer_key() {
        let quote = Item::quote("ver-1", "Trust, but verify.", "Proverb", Phase::Verification);
        assert!(quote.is_correct(Phase::Verification));
        assert!(!quote.is_correct(Phase::Preparation));
    }

    #[test]
    fn test_role_accepts_gm_alias() {
        let role: Role = serde_json::from_str("\"gm\"").unwrap();
        assert_eq!(role, Role::RoomOwner);
        assert_eq!(serde_json::to_string(&Role::Player).unwrap(), "\"player\"");
    }

    #[test]
    fn test_score_entry_wire_names() {
        let entry = ScoreEntry {
            name: "Ada".to_string(),
            score: 7,
            time: 1500,
            timestamp: 1_700_000_000_000,
            player_id: None,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["time"], 1500);
        assert!(json.get("playerId").is_none());
    }
}
