//! Card entities - runtime card state.
//!
//! A `Card` is one slot on the board. It carries its face identity and two
//! flags. `matched` is terminal: once a card is locked it stays face-up for
//! the rest of the build.

use serde::{Deserialize, Serialize};

use super::faces::FaceId;

/// Card identifier: the card's slot on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// The ID as a board index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// A card on the board.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    id: CardId,
    face: FaceId,
    face_up: bool,
    matched: bool,
}

impl Card {
    /// Create a face-down, unmatched card.
    pub fn new(id: CardId, face: FaceId) -> Self {
        Self {
            id,
            face,
            face_up: false,
            matched: false,
        }
    }

    /// The card's slot ID.
    #[must_use]
    pub fn id(&self) -> CardId {
        self.id
    }

    /// The card's face identity.
    #[must_use]
    pub fn face(&self) -> &FaceId {
        &self.face
    }

    /// Is the card showing its face?
    #[must_use]
    pub fn is_face_up(&self) -> bool {
        self.face_up
    }

    /// Has the card been matched?
    #[must_use]
    pub fn is_matched(&self) -> bool {
        self.matched
    }

    /// Can the card become a new pending selection?
    #[must_use]
    pub fn is_selectable(&self) -> bool {
        !self.matched && !self.face_up
    }

    /// Turn the card face-up. No-op if it already is.
    pub fn flip_up(&mut self) {
        self.face_up = true;
    }

    /// Turn the card face-down. Matched cards stay face-up.
    pub fn flip_down(&mut self) {
        if !self.matched {
            self.face_up = false;
        }
    }

    /// Lock the card as matched. Irreversible.
    pub fn lock(&mut self) {
        self.matched = true;
        self.face_up = true;
    }

    /// Reinitialise a recycled card with a new face.
    pub(crate) fn reset(&mut self, face: FaceId) {
        self.face = face;
        self.face_up = false;
        self.matched = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(face: &str) -> Card {
        Card::new(CardId::new(0), FaceId::from(face))
    }

    #[test]
    fn test_card_id() {
        let id = CardId::new(7);
        assert_eq!(id.raw(), 7);
        assert_eq!(id.index(), 7);
        assert_eq!(format!("{}", id), "Card(7)");
    }

    #[test]
    fn test_new_card_is_hidden() {
        let c = card("A");
        assert!(!c.is_face_up());
        assert!(!c.is_matched());
        assert!(c.is_selectable());
        assert_eq!(c.face().as_str(), "A");
    }

    #[test]
    fn test_flip_is_idempotent() {
        let mut c = card("A");
        c.flip_up();
        c.flip_up();
        assert!(c.is_face_up());
        assert!(!c.is_selectable());

        c.flip_down();
        c.flip_down();
        assert!(!c.is_face_up());
    }

    #[test]
    fn test_lock_is_terminal() {
        let mut c = card("A");
        c.lock();
        assert!(c.is_matched());
        assert!(c.is_face_up());

        c.flip_down();
        assert!(c.is_face_up(), "matched cards stay face-up");
        assert!(!c.is_selectable());
    }

    #[test]
    fn test_reset_recycles() {
        let mut c = card("A");
        c.lock();
        c.reset(FaceId::from("B"));

        assert_eq!(c.face().as_str(), "B");
        assert!(!c.is_matched());
        assert!(!c.is_face_up());
        assert_eq!(c.id(), CardId::new(0));
    }
}
