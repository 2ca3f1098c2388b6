use crate::types::*;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Placement {
    phase: Phase,
    /// Drop order, used to order the board
    seq: u64,
}

/// Per-client map of where every item currently sits.
///
/// Each item has at most one placement; moving replaces it. The pool is
/// the set of items the round is scored on; items learned from the room
/// are kept next to it but never count towards completion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlacementStore {
    items: HashMap<ItemId, Item>,
    pool: Vec<ItemId>,
    placements: HashMap<ItemId, Placement>,
    next_seq: u64,
}

/// One phase column of the board
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Column {
    pub phase: Phase,
    /// Most recently dropped title on this phase
    pub title: Option<Item>,
    /// Non-title pieces in drop order
    pub quotes: Vec<Item>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Board {
    pub columns: Vec<Column>,
}

impl Board {
    pub fn column(&self, phase: Phase) -> Option<&Column> {
        self.columns.iter().find(|c| c.phase == phase)
    }
}

impl PlacementStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace everything with a fresh, unplaced pool
    pub fn seed(&mut self, pool: impl IntoIterator<Item = Item>) {
        self.clear();
        for item in pool {
            if !self.items.contains_key(&item.id) {
                self.pool.push(item.id.clone());
            }
            self.items.insert(item.id.clone(), item);
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.pool.clear();
        self.placements.clear();
        self.next_seq = 0;
    }

    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.get(id)
    }

    /// Place `item` on `phase`, removing it from wherever it was.
    ///
    /// Returns the previous phase. Placing an item where it already is
    /// leaves the store untouched.
    pub fn place(&mut self, item: &Item, phase: Phase) -> Option<Phase> {
        let previous = self.phase_of(&item.id);
        if previous == Some(phase) {
            return previous;
        }

        self.items
            .entry(item.id.clone())
            .or_insert_with(|| item.clone());

        self.next_seq += 1;
        self.placements.insert(
            item.id.clone(),
            Placement {
                phase,
                seq: self.next_seq,
            },
        );
        previous
    }

    pub fn phase_of(&self, id: &str) -> Option<Phase> {
        self.placements.get(id).map(|p| p.phase)
    }

    /// Pool items with any placement
    pub fn placed_count(&self) -> usize {
        self.pool
            .iter()
            .filter(|id| self.placements.contains_key(*id))
            .count()
    }

    pub fn total(&self) -> usize {
        self.pool.len()
    }

    /// Pool items sitting on their correct phase
    pub fn correct_count(&self) -> usize {
        self.pool
            .iter()
            .filter_map(|id| Some((self.items.get(id)?, self.phase_of(id)?)))
            .filter(|(item, phase)| item.is_correct(*phase))
            .count()
    }

    /// Pool items not placed yet, in pool order
    pub fn available(&self) -> Vec<&Item> {
        self.pool
            .iter()
            .filter(|id| !self.placements.contains_key(*id))
            .filter_map(|id| self.items.get(id))
            .collect()
    }

    pub fn board(&self) -> Board {
        let mut placed: Vec<(&Item, Placement)> = self
            .placements
            .iter()
            .filter_map(|(id, p)| Some((self.items.get(id)?, *p)))
            .collect();
        placed.sort_by_key(|(_, p)| p.seq);

        let columns = Phase::ALL
            .iter()
            .map(|&phase| {
                let here = placed.iter().filter(|(_, p)| p.phase == phase);
                Column {
                    phase,
                    title: here
                        .clone()
                        .filter(|(item, _)| item.kind == ItemKind::Title)
                        .last()
                        .map(|(item, _)| (*item).clone()),
                    quotes: here
                        .filter(|(item, _)| item.kind != ItemKind::Title)
                        .map(|(item, _)| (*item).clone())
                        .collect(),
                }
            })
            .collect();

        Board { columns }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> Vec<Item> {
        vec![
            Item::quote("a", "A", "x", Phase::Preparation),
            Item::quote("b", "B", "x", Phase::Incubation),
            Item::title("t-prep", "Preparation", Phase::Preparation),
            Item::title("t-inc", "Incubation", Phase::Incubation),
        ]
    }

    fn seeded() -> PlacementStore {
        let mut store = PlacementStore::new();
        store.seed(pool());
        store
    }

    #[test]
    fn test_item_has_one_location() {
        let mut store = seeded();
        let a = store.item("a").unwrap().clone();

        assert_eq!(store.place(&a, Phase::Incubation), None);
        assert_eq!(store.place(&a, Phase::Verification), Some(Phase::Incubation));

        let board = store.board();
        let holding: Vec<_> = board
            .columns
            .iter()
            .filter(|c| c.quotes.iter().any(|q| q.id == "a"))
            .map(|c| c.phase)
            .collect();
        assert_eq!(holding, vec![Phase::Verification]);
        assert_eq!(store.placed_count(), 1);
    }

    #[test]
    fn test_same_placement_twice_is_noop() {
        let mut store = seeded();
        let a = store.item("a").unwrap().clone();
        store.place(&a, Phase::Preparation);
        let before = store.clone();

        store.place(&a, Phase::Preparation);
        assert_eq!(store, before);
    }

    #[test]
    fn test_available_shrinks_as_items_are_placed() {
        let mut store = seeded();
        assert_eq!(store.available().len(), 4);

        let b = store.item("b").unwrap().clone();
        store.place(&b, Phase::Incubation);
        let ids: Vec<_> = store.available().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "t-prep", "t-inc"]);
    }

    #[test]
    fn test_foreign_items_do_not_count() {
        let mut store = seeded();
        let foreign = Item::quote("user-zz", "Hello", "Teammate", Phase::Incubation);
        store.place(&foreign, Phase::Illumination);

        assert_eq!(store.placed_count(), 0);
        assert_eq!(store.total(), 4);
        assert_eq!(
            store.board().column(Phase::Illumination).unwrap().quotes[0].id,
            "user-zz"
        );
    }

    #[test]
    fn test_correct_count() {
        let mut store = seeded();
        for (id, phase) in [
            ("a", Phase::Preparation),
            ("b", Phase::Illumination),
            ("t-prep", Phase::Preparation),
            ("t-inc", Phase::Incubation),
        ] {
            let item = store.item(id).unwrap().clone();
            store.place(&item, phase);
        }
        assert_eq!(store.placed_count(), 4);
        assert_eq!(store.correct_count(), 3);
    }

    #[test]
    fn test_board_shows_latest_title_and_drop_order() {
        let mut store = seeded();
        let items: Vec<Item> = pool();
        store.place(&items[1], Phase::Preparation);
        store.place(&items[0], Phase::Preparation);
        store.place(&items[2], Phase::Preparation);
        store.place(&items[3], Phase::Preparation);

        let board = store.board();
        let column = board.column(Phase::Preparation).unwrap();
        assert_eq!(column.title.as_ref().unwrap().id, "t-inc");
        let order: Vec<_> = column.quotes.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(order, vec!["b", "a"]);

        // Moving the title away vacates its old slot
        store.place(&items[3], Phase::Incubation);
        let board = store.board();
        assert_eq!(
            board.column(Phase::Preparation).unwrap().title.as_ref().unwrap().id,
            "t-prep"
        );
        assert_eq!(
            board.column(Phase::Incubation).unwrap().title.as_ref().unwrap().id,
            "t-inc"
        );
    }
}
