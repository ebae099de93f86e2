//! Game configuration types.
//!
//! Hosts configure the core at startup by providing:
//! - `GameConfig`: timing defaults and flow options
//! - `LevelDef`: one level's grid and limits
//! - `LevelTable`: the ordered list of levels
//!
//! Level definitions are static: the core only reads them. Per-level timing
//! overrides are resolved into a fresh `Timing` each time a level starts and
//! never written back into the shared config.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Default pause between the second selection and the comparison.
pub const DEFAULT_SETTLE_DELAY_SECS: f32 = 0.05;

/// Default delay before a mismatched pair is turned back over.
pub const DEFAULT_MISMATCH_HIDE_DELAY_SECS: f32 = 0.7;

/// Default duration of a single flip animation.
pub const DEFAULT_FLIP_DURATION_SECS: f32 = 0.25;

/// Convert configured seconds into a duration.
///
/// Zero, negative and non-finite values all collapse to zero. Values are
/// rounded to whole microseconds so `0.7` means exactly 700 ms.
pub(crate) fn secs(value: f32) -> Duration {
    if value.is_finite() && value > 0.0 {
        Duration::from_micros((f64::from(value) * 1_000_000.0).round() as u64)
    } else {
        Duration::ZERO
    }
}

/// Effective timings for one level run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timing {
    /// Pause between the second selection and the comparison.
    pub settle_delay: Duration,
    /// Delay before a mismatched pair starts turning back over.
    pub mismatch_hide_delay: Duration,
    /// Duration of the flip-down animation.
    pub flip_duration: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        GameConfig::default().timing_for(&LevelDef::default())
    }
}

/// Complete game configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Settle delay in seconds.
    pub settle_delay: f32,

    /// Mismatch hide delay in seconds. Levels may override it.
    pub mismatch_hide_delay: f32,

    /// Flip animation duration in seconds. Levels may override it.
    pub flip_duration: f32,

    /// Start the next level on a win and retry on a loss without waiting
    /// for the host to decide.
    pub auto_advance: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            settle_delay: DEFAULT_SETTLE_DELAY_SECS,
            mismatch_hide_delay: DEFAULT_MISMATCH_HIDE_DELAY_SECS,
            flip_duration: DEFAULT_FLIP_DURATION_SECS,
            auto_advance: false,
        }
    }
}

impl GameConfig {
    /// Create a configuration with the default timings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the settle delay.
    #[must_use]
    pub fn with_settle_delay(mut self, secs: f32) -> Self {
        self.settle_delay = secs;
        self
    }

    /// Set the default mismatch hide delay.
    #[must_use]
    pub fn with_mismatch_hide_delay(mut self, secs: f32) -> Self {
        self.mismatch_hide_delay = secs;
        self
    }

    /// Set the default flip duration.
    #[must_use]
    pub fn with_flip_duration(mut self, secs: f32) -> Self {
        self.flip_duration = secs;
        self
    }

    /// Enable or disable automatic level advance.
    #[must_use]
    pub fn with_auto_advance(mut self, enabled: bool) -> Self {
        self.auto_advance = enabled;
        self
    }

    /// Resolve the timings for a level, applying its overrides.
    ///
    /// An override of zero means "use the game default".
    #[must_use]
    pub fn timing_for(&self, level: &LevelDef) -> Timing {
        let hide = if level.mismatch_hide_delay > 0.0 {
            level.mismatch_hide_delay
        } else {
            self.mismatch_hide_delay
        };
        let flip = if level.flip_duration > 0.0 {
            level.flip_duration
        } else {
            self.flip_duration
        };

        Timing {
            settle_delay: secs(self.settle_delay),
            mismatch_hide_delay: secs(hide),
            flip_duration: secs(flip),
        }
    }
}

/// Definition of a single level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelDef {
    /// Grid rows.
    pub rows: u32,

    /// Grid columns.
    pub cols: u32,

    /// Maximum resolved pairs allowed (0 = unlimited).
    #[serde(default)]
    pub move_limit: u32,

    /// Time limit in seconds (0 = unlimited).
    #[serde(default)]
    pub time_limit_secs: f32,

    /// Flip duration override in seconds (0 = use default).
    #[serde(default)]
    pub flip_duration: f32,

    /// Mismatch hide delay override in seconds (0 = use default).
    #[serde(default)]
    pub mismatch_hide_delay: f32,
}

impl Default for LevelDef {
    fn default() -> Self {
        Self::new(2, 2)
    }
}

impl LevelDef {
    /// Create an unlimited level with the given grid.
    #[must_use]
    pub fn new(rows: u32, cols: u32) -> Self {
        Self {
            rows,
            cols,
            move_limit: 0,
            time_limit_secs: 0.0,
            flip_duration: 0.0,
            mismatch_hide_delay: 0.0,
        }
    }

    /// Set the move limit.
    #[must_use]
    pub fn with_move_limit(mut self, moves: u32) -> Self {
        self.move_limit = moves;
        self
    }

    /// Set the time limit in seconds.
    #[must_use]
    pub fn with_time_limit(mut self, secs: f32) -> Self {
        self.time_limit_secs = secs;
        self
    }

    /// Override the flip duration for this level.
    #[must_use]
    pub fn with_flip_duration(mut self, secs: f32) -> Self {
        self.flip_duration = secs;
        self
    }

    /// Override the mismatch hide delay for this level.
    #[must_use]
    pub fn with_mismatch_hide_delay(mut self, secs: f32) -> Self {
        self.mismatch_hide_delay = secs;
        self
    }

    /// Total grid slots.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// Pairs the grid can hold (odd grids leave one slot empty).
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.slot_count() / 2
    }

    /// Move limit, if any.
    #[must_use]
    pub fn move_limit(&self) -> Option<u32> {
        (self.move_limit > 0).then_some(self.move_limit)
    }

    /// Time limit, if any.
    #[must_use]
    pub fn time_limit(&self) -> Option<Duration> {
        let limit = secs(self.time_limit_secs);
        (!limit.is_zero()).then_some(limit)
    }

    fn validate(&self, index: usize) -> Result<(), ConfigError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ConfigError::EmptyGrid {
                index,
                rows: self.rows,
                cols: self.cols,
            });
        }

        let timings = [
            ("time_limit_secs", self.time_limit_secs),
            ("flip_duration", self.flip_duration),
            ("mismatch_hide_delay", self.mismatch_hide_delay),
        ];
        for (field, value) in timings {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidTiming { index, field, value });
            }
        }

        Ok(())
    }
}

/// Ordered list of levels, indexed by level number.
///
/// Deserializing goes through [`LevelTable::new`], so a parsed table is
/// always validated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LevelTableFile")]
pub struct LevelTable {
    levels: Vec<LevelDef>,
}

/// Unvalidated on-disk form of a `LevelTable`.
#[derive(Deserialize)]
struct LevelTableFile {
    levels: Vec<LevelDef>,
}

impl TryFrom<LevelTableFile> for LevelTable {
    type Error = ConfigError;

    fn try_from(file: LevelTableFile) -> Result<Self, Self::Error> {
        Self::new(file.levels)
    }
}

impl LevelTable {
    /// Create a table, validating every level.
    pub fn new(levels: Vec<LevelDef>) -> Result<Self, ConfigError> {
        if levels.is_empty() {
            return Err(ConfigError::NoLevels);
        }
        for (index, level) in levels.iter().enumerate() {
            level.validate(index)?;
        }
        Ok(Self { levels })
    }

    /// Parse a table from JSON of the form `{"levels": [{"rows": 2, "cols": 2}, ...]}`.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let file: LevelTableFile = serde_json::from_str(json)?;
        Self::new(file.levels)
    }

    /// The built-in 30-level campaign.
    ///
    /// Levels 1-10 are unlimited, 11-20 add either a move or a time limit,
    /// 21-30 add both.
    #[must_use]
    pub fn campaign() -> Self {
        let lv = LevelDef::new;
        let levels = vec![
            lv(2, 2),
            lv(2, 3),
            lv(2, 4),
            lv(3, 3),
            lv(3, 4),
            lv(4, 3),
            lv(4, 4),
            lv(3, 6),
            lv(4, 5),
            lv(5, 4),
            lv(4, 4).with_move_limit(32),
            lv(4, 5).with_move_limit(40),
            lv(5, 4).with_time_limit(120.0),
            lv(4, 6).with_move_limit(48),
            lv(5, 5).with_time_limit(150.0),
            lv(6, 4).with_move_limit(48),
            lv(5, 6).with_time_limit(180.0),
            lv(6, 5).with_move_limit(60),
            lv(6, 6).with_time_limit(210.0),
            lv(7, 5).with_move_limit(70),
            lv(6, 6).with_move_limit(54).with_time_limit(180.0),
            lv(7, 5).with_move_limit(60).with_time_limit(165.0),
            lv(6, 7).with_move_limit(63).with_time_limit(180.0),
            lv(7, 6).with_move_limit(70).with_time_limit(195.0),
            lv(8, 5).with_move_limit(65).with_time_limit(180.0),
            lv(7, 7).with_move_limit(77).with_time_limit(210.0),
            lv(8, 6).with_move_limit(72).with_time_limit(195.0),
            lv(6, 9).with_move_limit(81).with_time_limit(225.0),
            lv(8, 7).with_move_limit(84).with_time_limit(210.0),
            lv(8, 8).with_move_limit(96).with_time_limit(240.0),
        ];
        Self { levels }
    }

    /// Number of levels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Always false for a validated table.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Get a level by index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&LevelDef> {
        self.levels.get(index)
    }

    /// Map a requested index into the table.
    ///
    /// Anything past the last level wraps back to the first.
    #[must_use]
    pub fn wrap_index(&self, index: usize) -> usize {
        if index < self.levels.len() {
            index
        } else {
            0
        }
    }

    /// Largest slot count of any level.
    #[must_use]
    pub fn max_cards_per_level(&self) -> usize {
        self.levels.iter().map(LevelDef::slot_count).max().unwrap_or(0)
    }

    /// Iterate over all levels.
    pub fn iter(&self) -> impl Iterator<Item = &LevelDef> {
        self.levels.iter()
    }
}

impl Default for LevelTable {
    fn default() -> Self {
        Self::campaign()
    }
}
