//! Error types for the ambient layers.
//!
//! Gameplay itself never fails: short pools under-fill, invalid selections
//! are ignored and conclusion races are settled by the rule latch. Errors
//! only come from loading configuration and from external stores.

use thiserror::Error;

/// Failure while loading or validating level configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The level table could not be parsed.
    #[error("failed to parse level table: {0}")]
    Parse(#[from] serde_json::Error),

    /// A level has a zero row or column count.
    #[error("level {index} has an empty grid ({rows}x{cols})")]
    EmptyGrid {
        /// Zero-based level index.
        index: usize,
        /// Configured rows.
        rows: u32,
        /// Configured columns.
        cols: u32,
    },

    /// A level has a negative or non-finite timing value.
    #[error("level {index} has invalid {field}: {value}")]
    InvalidTiming {
        /// Zero-based level index.
        index: usize,
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f32,
    },

    /// The table holds no levels.
    #[error("level table is empty")]
    NoLevels,
}

/// Failure reported by a key-value store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The backing store could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A stored value exists but is not an integer.
    #[error("value under `{key}` is not an integer")]
    NotAnInteger {
        /// The key that was read.
        key: String,
    },
}
