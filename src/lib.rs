//! # pairwise
//!
//! A headless core for tile-matching ("memory") card games.
//!
//! ## Design Principles
//!
//! 1. **Engine-Agnostic**: No rendering, audio or widgets. Hosts plug in
//!    through an identity pool, a key-value store, the event bus and a frame
//!    clock.
//!
//! 2. **Deterministic**: Boards are dealt from seeded ChaCha streams and all
//!    timed steps run on a virtual clock the host advances with `tick(dt)`.
//!
//! 3. **Single Owner**: The resolver alone writes the pending selections and
//!    the remaining-pair count; the rule monitor alone writes the move count
//!    and the concluded latch. The `Game` wires them together.
//!
//! ## Architecture
//!
//! - **Continuations, not callbacks**: delayed steps (settle, mismatch hide,
//!   flip back) are scheduled payloads tagged with a generation, so anything
//!   left over from an earlier level is dropped instead of running.
//!
//! - **Persistent boards**: `im::Vector` makes board snapshots O(1).
//!
//! ## Modules
//!
//! - `core`: RNG, configuration, errors
//! - `cards`: Card entities and face identities
//! - `board`: Board layout and the board generator
//! - `events`: Game events and the event bus
//! - `schedule`: Virtual-clock continuation queue
//! - `resolver`: Selection/match state machine
//! - `rules`: Move and time limits
//! - `progress`: Unlocked-level watermark persistence
//! - `game`: Level orchestration

pub mod core;
pub mod cards;
pub mod board;
pub mod events;
pub mod schedule;
pub mod resolver;
pub mod rules;
pub mod progress;
pub mod game;

// Re-export commonly used types
pub use crate::core::{
    ConfigError, GameConfig, GameRng, GameRngState, LevelDef, LevelTable, StoreError, Timing,
};

pub use crate::cards::{Card, CardId, CardSet, FaceId, IdentityPool};

pub use crate::board::{Board, BoardGenerator, BuildReport};

pub use crate::events::{EventBus, EventKind, EventLog, Flow, GameEvent, LossReason, Scope, SubscriptionId};

pub use crate::schedule::Scheduler;

pub use crate::resolver::{
    Continuation, IgnoreReason, ResolveStep, Resolver, ResolverState, SelectOutcome,
};

pub use crate::rules::{LevelTimer, RuleMonitor};

pub use crate::progress::{KeyValueStore, MemoryStore, ProgressService, HIGHEST_LEVEL_KEY};

pub use crate::game::{Game, GameBuilder, GameSnapshot, LevelPhase};
