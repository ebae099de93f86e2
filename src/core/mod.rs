//! Core types: RNG, configuration, errors.
//!
//! Everything here is independent of cards and boards. Hosts configure the
//! game through `GameConfig` and `LevelTable` rather than by touching the
//! state machines directly.

pub mod config;
pub mod error;
pub mod rng;

pub use config::{
    GameConfig, LevelDef, LevelTable, Timing, DEFAULT_FLIP_DURATION_SECS,
    DEFAULT_MISMATCH_HIDE_DELAY_SECS, DEFAULT_SETTLE_DELAY_SECS,
};
pub use error::{ConfigError, StoreError};
pub use rng::{GameRng, GameRngState};
