//! Level win/loss rules.
//!
//! The resolver reports wins. This module enforces the limits that turn a
//! level into a loss:
//! - `RuleMonitor`: move counter, move limit, time limit, concluded latch
//! - `LevelTimer`: frame-driven stopwatch polled by the monitor
//!
//! ## Example Usage
//!
//! ```
//! use std::time::Duration;
//! use pairwise::core::LevelDef;
//! use pairwise::events::{GameEvent, LossReason};
//! use pairwise::rules::{LevelTimer, RuleMonitor};
//!
//! let mut monitor = RuleMonitor::new();
//! monitor.begin(&LevelDef::new(2, 2).with_time_limit(10.0));
//!
//! let mut timer = LevelTimer::new();
//! timer.start();
//! timer.tick(Duration::from_secs(10));
//!
//! assert_eq!(
//!     monitor.check_time(&mut timer),
//!     Some(GameEvent::GameLost { reason: LossReason::Time })
//! );
//! assert_eq!(monitor.check_time(&mut timer), None);
//! ```

mod monitor;
mod timer;

pub use monitor::RuleMonitor;
pub use timer::LevelTimer;
