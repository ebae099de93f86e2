//! The dealt board.

use im::Vector;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::cards::{Card, CardId, FaceId};

/// An ordered sequence of cards laid out on a `rows x cols` grid.
///
/// Card `i` sits in slot `i`, filled row-major. When the grid has an odd
/// slot count the last slot stays empty.
///
/// Cards are stored in a persistent vector, so cloning a board to hand a
/// snapshot to a view or a replay log is O(1).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    rows: u32,
    cols: u32,
    cards: Vector<Card>,
}

impl Board {
    /// Create an empty board with the given grid.
    #[must_use]
    pub fn new(rows: u32, cols: u32) -> Self {
        Self {
            rows,
            cols,
            cards: Vector::new(),
        }
    }

    /// Grid rows.
    #[must_use]
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Grid columns.
    #[must_use]
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Total grid slots, filled or not.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// Slots left without a card.
    #[must_use]
    pub fn empty_slots(&self) -> usize {
        self.slot_count().saturating_sub(self.cards.len())
    }

    /// Number of cards dealt.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// True if no cards were dealt.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Number of pairs dealt.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.cards.len() / 2
    }

    /// Get a card by ID.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.cards.get(id.index())
    }

    pub(crate) fn get_mut(&mut self, id: CardId) -> Option<&mut Card> {
        self.cards.get_mut(id.index())
    }

    /// Iterate over all cards in slot order.
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// Grid position `(row, col)` of a card.
    #[must_use]
    pub fn position(&self, id: CardId) -> Option<(u32, u32)> {
        if id.index() >= self.cards.len() || self.cols == 0 {
            return None;
        }
        Some((id.raw() / self.cols, id.raw() % self.cols))
    }

    /// Number of matched cards.
    #[must_use]
    pub fn matched_count(&self) -> usize {
        self.cards.iter().filter(|c| c.is_matched()).count()
    }

    /// True once every dealt card is matched.
    #[must_use]
    pub fn all_matched(&self) -> bool {
        self.cards.iter().all(Card::is_matched)
    }

    /// How many cards carry each face.
    #[must_use]
    pub fn face_counts(&self) -> FxHashMap<FaceId, usize> {
        let mut counts = FxHashMap::default();
        for card in &self.cards {
            *counts.entry(card.face().clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Every face appears exactly twice and the cards fit the grid.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.cards.len() <= self.slot_count()
            && self.face_counts().values().all(|&n| n == 2)
            && self.cards.iter().enumerate().all(|(i, c)| c.id().index() == i)
    }

    /// Replace the grid and lay out `faces`, reusing existing card instances.
    ///
    /// Surplus cards are dropped; missing ones are created.
    pub(crate) fn relayout(&mut self, rows: u32, cols: u32, faces: Vec<FaceId>) {
        self.rows = rows;
        self.cols = cols;
        // im's truncate panics when asked to grow.
        if self.cards.len() > faces.len() {
            self.cards.truncate(faces.len());
        }

        for (i, face) in faces.into_iter().enumerate() {
            match self.cards.get_mut(i) {
                Some(card) => card.reset(face),
                None => self.cards.push_back(Card::new(CardId::new(i as u32), face)),
            }
        }
    }
}
