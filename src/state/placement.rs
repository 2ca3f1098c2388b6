use super::GameSession;
use crate::config::{DEFAULT_UNKNOWN_LABEL, DEFAULT_UNKNOWN_TEXT};
use crate::error::SessionError;
use crate::protocol::{PieceKind, PlacementEvent};
use crate::types::*;
use serde::Serialize;

/// How a piece id nobody here has seen gets turned into a board item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownItemPolicy {
    /// Author shown on materialized pieces
    pub label: String,
    /// Text used when the event carried none
    pub fallback_text: String,
}

impl Default for UnknownItemPolicy {
    fn default() -> Self {
        Self {
            label: DEFAULT_UNKNOWN_LABEL.to_string(),
            fallback_text: DEFAULT_UNKNOWN_TEXT.to_string(),
        }
    }
}

impl UnknownItemPolicy {
    pub fn with_label(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn materialize(&self, id: &str, text: Option<&str>) -> Item {
        let text = text
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(&self.fallback_text);
        Item {
            id: id.to_string(),
            text: text.to_string(),
            author: self.label.clone(),
            correct_phase: Phase::Incubation,
            kind: ItemKind::UserEntry,
        }
    }
}

/// Result of a drop, for UI feedback
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PlacementOutcome {
    pub item_id: ItemId,
    pub phase: Phase,
    pub correct: bool,
    pub previous: Option<Phase>,
    /// False when the item already sat on `phase`
    pub changed: bool,
}

impl PlacementOutcome {
    pub fn feedback(&self) -> &'static str {
        if self.correct {
            "Nice drop!"
        } else {
            "Try another phase"
        }
    }
}

impl GameSession {
    /// Look up a piece for a placement. Remote quote ids nobody knows are
    /// materialized; everything else must already exist.
    fn resolve_item(
        &self,
        item_id: &str,
        kind: PieceKind,
        origin: Origin,
        text: Option<&str>,
    ) -> Option<Item> {
        let known = match kind {
            PieceKind::Title => self.catalog.title(item_id).cloned(),
            PieceKind::Quote => self
                .catalog
                .quote(item_id)
                .or_else(|| self.user_entry.as_ref().filter(|e| e.id == item_id))
                .or_else(|| {
                    self.store
                        .item(item_id)
                        .filter(|i| i.kind != ItemKind::Title)
                })
                .cloned(),
        };

        known.or_else(|| match (kind, origin) {
            (PieceKind::Quote, Origin::Remote) => Some(self.policy.materialize(item_id, text)),
            _ => None,
        })
    }

    /// Move an item to `target`, from wherever it currently is.
    ///
    /// Local drops are broadcast to the room; remote ones never are.
    /// Completion is checked after every change.
    pub fn apply_placement(
        &mut self,
        item_id: &str,
        target: Phase,
        kind: PieceKind,
        origin: Origin,
    ) -> Result<PlacementOutcome, SessionError> {
        let item = self.resolve_item(item_id, kind, origin, None);
        self.place_resolved(item, item_id, target, origin)
    }

    fn place_resolved(
        &mut self,
        item: Option<Item>,
        item_id: &str,
        target: Phase,
        origin: Origin,
    ) -> Result<PlacementOutcome, SessionError> {
        match (origin, self.status) {
            (Origin::Local, RoundStatus::InProgress) => {}
            (Origin::Remote, RoundStatus::InProgress | RoundStatus::Completed) => {}
            _ => return Err(SessionError::RoundNotActive),
        }

        let item = item.ok_or_else(|| SessionError::UnknownItem(item_id.to_string()))?;
        let previous = self.store.place(&item, target);
        let changed = previous != Some(target);

        if origin == Origin::Local {
            if let Some(participant) = &self.participant {
                self.channel.emit_placement(PlacementEvent {
                    piece_id: item.id.clone(),
                    phase: target,
                    kind: item.kind.into(),
                    player_id: participant.id.clone(),
                    text: (item.kind == ItemKind::UserEntry).then(|| item.text.clone()),
                });
            }
        }

        if changed {
            self.check_completion();
        }

        Ok(PlacementOutcome {
            item_id: item.id.clone(),
            phase: target,
            correct: item.is_correct(target),
            previous,
            changed,
        })
    }

    /// Drop from this client's input layer
    pub fn place(&mut self, item_id: &str, target: Phase) -> Result<PlacementOutcome, SessionError> {
        let kind = if self.catalog.title(item_id).is_some() {
            PieceKind::Title
        } else {
            PieceKind::Quote
        };
        self.apply_placement(item_id, target, kind, Origin::Local)
    }

    /// Apply a placement event received from the room
    pub fn reconcile(&mut self, event: PlacementEvent) -> Option<PlacementOutcome> {
        let item = self.resolve_item(
            &event.piece_id,
            event.kind,
            Origin::Remote,
            event.text.as_deref(),
        );

        match self.place_resolved(item, &event.piece_id, event.phase, Origin::Remote) {
            Ok(outcome) => {
                tracing::debug!(
                    "Applied remote placement {} -> {} from {}",
                    event.piece_id,
                    event.phase,
                    event.player_id
                );
                Some(outcome)
            }
            Err(SessionError::UnknownItem(id)) => {
                tracing::debug!("Ignoring placement of unknown title '{}'", id);
                None
            }
            Err(e) => {
                tracing::debug!("Ignoring remote placement of '{}': {}", event.piece_id, e);
                None
            }
        }
    }
}
