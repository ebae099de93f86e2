//! Level stopwatch driven by frame deltas.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Elapsed play time for the current level.
///
/// Time only accumulates while the timer is running; pausing the game stops
/// it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelTimer {
    elapsed: Duration,
    running: bool,
}

impl LevelTimer {
    /// A stopped timer at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Back to zero. Does not change the running flag.
    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    /// Add one frame's worth of time, if running.
    pub fn tick(&mut self, dt: Duration) {
        if self.running {
            self.elapsed += dt;
        }
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_counts_while_running() {
        let mut timer = LevelTimer::new();
        timer.tick(Duration::from_secs(1));
        assert_eq!(timer.elapsed(), Duration::ZERO);

        timer.start();
        timer.tick(Duration::from_millis(500));
        timer.tick(Duration::from_millis(500));
        assert_eq!(timer.elapsed(), Duration::from_secs(1));

        timer.stop();
        timer.tick(Duration::from_secs(5));
        assert_eq!(timer.elapsed(), Duration::from_secs(1));
        assert!(!timer.is_running());
    }

    #[test]
    fn test_reset_keeps_running_flag() {
        let mut timer = LevelTimer::new();
        timer.start();
        timer.tick(Duration::from_secs(3));
        timer.reset();

        assert_eq!(timer.elapsed(), Duration::ZERO);
        assert!(timer.is_running());
    }
}
