//! Per-level move and time limits.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::LevelDef;
use crate::events::{GameEvent, LossReason};

use super::timer::LevelTimer;

/// Enforces a level's move and time limits.
///
/// The monitor owns the move counter and the concluded latch. The latch is
/// one-way: the first conclusion (win or loss) wins and every later call is
/// a no-op, so a level can never report both a win and a loss.
///
/// ## Tie-break
///
/// A move that completes the last pair is a win even if it also reaches the
/// move limit. Any other move that reaches the limit is a loss, whether the
/// pair matched or not.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleMonitor {
    moves: u32,
    move_limit: Option<u32>,
    time_limit: Option<Duration>,
    concluded: bool,
}

impl RuleMonitor {
    /// A monitor with no limits, not yet begun.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset for a new level.
    pub fn begin(&mut self, level: &LevelDef) {
        self.moves = 0;
        self.move_limit = level.move_limit();
        self.time_limit = level.time_limit();
        self.concluded = false;
    }

    /// Record a resolved pair.
    ///
    /// `remaining_pairs` is the count after this move. Returns the loss
    /// event if this move used up the move limit.
    pub fn on_pair_resolved(&mut self, remaining_pairs: usize) -> Option<GameEvent> {
        if self.concluded {
            return None;
        }
        self.moves += 1;

        let limit = self.move_limit?;
        if self.moves >= limit && remaining_pairs > 0 {
            self.concluded = true;
            info!(moves = self.moves, limit, remaining_pairs, "move limit reached");
            return Some(GameEvent::GameLost {
                reason: LossReason::Moves,
            });
        }
        None
    }

    /// Check the time limit against the level timer.
    ///
    /// On expiry the timer is stopped and the loss event returned. Polling
    /// again after that returns `None`.
    pub fn check_time(&mut self, timer: &mut LevelTimer) -> Option<GameEvent> {
        if self.concluded {
            return None;
        }
        let limit = self.time_limit?;
        if timer.elapsed() < limit {
            return None;
        }

        self.concluded = true;
        timer.stop();
        info!(elapsed = ?timer.elapsed(), ?limit, "time limit reached");
        Some(GameEvent::GameLost {
            reason: LossReason::Time,
        })
    }

    /// The resolver reported a win. Latches without emitting anything.
    pub fn on_game_won(&mut self) {
        self.concluded = true;
    }

    /// Moves taken this level.
    #[must_use]
    pub fn moves(&self) -> u32 {
        self.moves
    }

    /// Moves left before the limit, if there is one.
    #[must_use]
    pub fn moves_left(&self) -> Option<u32> {
        self.move_limit.map(|limit| limit.saturating_sub(self.moves))
    }

    /// Time left before the limit, if there is one.
    #[must_use]
    pub fn time_left(&self, timer: &LevelTimer) -> Option<Duration> {
        self.time_limit
            .map(|limit| limit.saturating_sub(timer.elapsed()))
    }

    /// Has the level concluded?
    #[must_use]
    pub fn is_concluded(&self) -> bool {
        self.concluded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lost(reason: LossReason) -> Option<GameEvent> {
        Some(GameEvent::GameLost { reason })
    }

    #[test]
    fn test_unlimited_never_loses() {
        let mut monitor = RuleMonitor::new();
        monitor.begin(&LevelDef::new(4, 4));

        let mut timer = LevelTimer::new();
        timer.start();
        timer.tick(Duration::from_secs(3600));

        for _ in 0..500 {
            assert_eq!(monitor.on_pair_resolved(3), None);
        }
        assert_eq!(monitor.check_time(&mut timer), None);
        assert_eq!(monitor.moves(), 500);
        assert_eq!(monitor.moves_left(), None);
    }

    #[test]
    fn test_move_limit_loss() {
        let mut monitor = RuleMonitor::new();
        monitor.begin(&LevelDef::new(2, 2).with_move_limit(1));

        assert_eq!(monitor.on_pair_resolved(2), lost(LossReason::Moves));
        assert!(monitor.is_concluded());
        assert_eq!(monitor.on_pair_resolved(2), None);
        assert_eq!(monitor.moves(), 1);
    }

    #[test]
    fn test_final_pair_on_limit_is_a_win() {
        let mut monitor = RuleMonitor::new();
        monitor.begin(&LevelDef::new(2, 2).with_move_limit(2));

        assert_eq!(monitor.on_pair_resolved(1), None);
        assert_eq!(monitor.on_pair_resolved(0), None);
        assert!(!monitor.is_concluded());

        monitor.on_game_won();
        assert!(monitor.is_concluded());
    }

    #[test]
    fn test_non_final_match_on_limit_loses() {
        let mut monitor = RuleMonitor::new();
        monitor.begin(&LevelDef::new(2, 3).with_move_limit(1));

        assert_eq!(monitor.on_pair_resolved(2), lost(LossReason::Moves));
    }

    #[test]
    fn test_time_limit_loss_once() {
        let mut monitor = RuleMonitor::new();
        monitor.begin(&LevelDef::new(2, 2).with_time_limit(10.0));
        let mut timer = LevelTimer::new();
        timer.start();

        timer.tick(Duration::from_millis(9_999));
        assert_eq!(monitor.check_time(&mut timer), None);
        assert_eq!(monitor.time_left(&timer), Some(Duration::from_millis(1)));

        timer.tick(Duration::from_millis(1));
        assert_eq!(monitor.check_time(&mut timer), lost(LossReason::Time));
        assert!(!timer.is_running());

        timer.tick(Duration::from_secs(5));
        assert_eq!(monitor.check_time(&mut timer), None);
    }

    #[test]
    fn test_win_blocks_later_loss() {
        let mut monitor = RuleMonitor::new();
        monitor.begin(&LevelDef::new(2, 2).with_move_limit(1).with_time_limit(1.0));
        monitor.on_game_won();

        let mut timer = LevelTimer::new();
        timer.start();
        timer.tick(Duration::from_secs(2));

        assert_eq!(monitor.check_time(&mut timer), None);
        assert_eq!(monitor.on_pair_resolved(1), None);
        assert!(timer.is_running());
    }

    #[test]
    fn test_begin_resets() {
        let mut monitor = RuleMonitor::new();
        monitor.begin(&LevelDef::new(2, 2).with_move_limit(1));
        monitor.on_pair_resolved(2);

        monitor.begin(&LevelDef::new(2, 2).with_move_limit(3));
        assert_eq!(monitor.moves(), 0);
        assert_eq!(monitor.moves_left(), Some(3));
        assert!(!monitor.is_concluded());
    }
}
