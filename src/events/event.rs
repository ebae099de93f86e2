//! Game event types.
//!
//! Events describe what happened, in the order it happened. The core raises
//! them; hosts subscribe to drive views, audio and menus.

use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::core::LevelDef;

/// Why a level was lost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LossReason {
    /// The move limit was reached with pairs still hidden.
    Moves,
    /// The time limit elapsed.
    Time,
}

impl LossReason {
    /// The reason as a stable lowercase string.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LossReason::Moves => "moves",
            LossReason::Time => "time",
        }
    }
}

impl std::fmt::Display for LossReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something that happened during play.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// A card was accepted as a pending selection and turned face-up.
    CardSelected {
        /// The selected card.
        card: CardId,
    },

    /// Two pending cards shared a face and are now locked.
    PairMatched {
        /// First selection.
        first: CardId,
        /// Second selection.
        second: CardId,
    },

    /// Two pending cards had different faces.
    PairMismatched {
        /// First selection.
        first: CardId,
        /// Second selection.
        second: CardId,
    },

    /// The number of unmatched pairs changed.
    RemainingPairsChanged {
        /// Pairs still hidden.
        remaining: usize,
    },

    /// Every pair on the board is matched.
    GameWon,

    /// The level ended in a loss.
    GameLost {
        /// Which limit was hit.
        reason: LossReason,
    },

    /// A level was dealt and is ready for input.
    LevelStarted {
        /// The level's definition.
        level: LevelDef,
        /// Zero-based level index.
        index: usize,
    },

    /// A level was won.
    LevelCompleted {
        /// Zero-based level index.
        index: usize,
    },
}

impl GameEvent {
    /// The event's kind, without payload.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::CardSelected { .. } => EventKind::CardSelected,
            GameEvent::PairMatched { .. } => EventKind::PairMatched,
            GameEvent::PairMismatched { .. } => EventKind::PairMismatched,
            GameEvent::RemainingPairsChanged { .. } => EventKind::RemainingPairsChanged,
            GameEvent::GameWon => EventKind::GameWon,
            GameEvent::GameLost { .. } => EventKind::GameLost,
            GameEvent::LevelStarted { .. } => EventKind::LevelStarted,
            GameEvent::LevelCompleted { .. } => EventKind::LevelCompleted,
        }
    }

    /// Is this a resolved pair (a "move")?
    #[must_use]
    pub fn is_move(&self) -> bool {
        matches!(
            self,
            GameEvent::PairMatched { .. } | GameEvent::PairMismatched { .. }
        )
    }

    /// Does this event end the current level?
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameEvent::GameWon | GameEvent::GameLost { .. })
    }
}

/// Payload-free discriminant of a `GameEvent`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    CardSelected,
    PairMatched,
    PairMismatched,
    RemainingPairsChanged,
    GameWon,
    GameLost,
    LevelStarted,
    LevelCompleted,
}
