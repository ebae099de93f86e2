//! Unlocked-level watermark.

use tracing::{debug, warn};

use super::store::{KeyValueStore, MemoryStore};

/// Store key holding the highest unlocked level index.
pub const HIGHEST_LEVEL_KEY: &str = "highest_level";

/// Tracks the highest unlocked level index in a `KeyValueStore`.
///
/// The watermark only moves up: completing a level lower than the stored
/// watermark leaves it alone. Store failures are logged and swallowed, so
/// a broken store degrades to "start at level 0" rather than stopping play.
#[derive(Clone, Debug, Default)]
pub struct ProgressService<S: KeyValueStore = MemoryStore> {
    store: S,
}

impl<S: KeyValueStore> ProgressService<S> {
    /// Wrap a store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The level to start from: the stored watermark, clamped to zero.
    #[must_use]
    pub fn current_level_index(&self) -> usize {
        usize::try_from(self.read()).unwrap_or(0)
    }

    /// How many levels of a `total`-level table are playable, at least one.
    #[must_use]
    pub fn unlocked_level_count(&self, total: usize) -> usize {
        self.current_level_index()
            .saturating_add(1)
            .clamp(1, total.max(1))
    }

    /// Is `index` playable?
    #[must_use]
    pub fn is_unlocked(&self, index: usize) -> bool {
        index <= self.current_level_index()
    }

    /// Record that `completed` was just won.
    ///
    /// Stores `max(stored, completed + 1)` and returns the new watermark.
    pub fn unlock_next(&mut self, completed: usize) -> usize {
        let stored = self.read();
        let candidate = i64::try_from(completed).unwrap_or(i64::MAX).saturating_add(1);
        let next = stored.max(candidate);

        if next != stored {
            if let Err(err) = self.store.set_int(HIGHEST_LEVEL_KEY, next) {
                warn!(%err, next, "failed to store progress");
            }
        }
        if let Err(err) = self.store.flush() {
            warn!(%err, "failed to flush progress");
        }
        debug!(completed, watermark = next, "progress updated");
        usize::try_from(next).unwrap_or(0)
    }

    /// Forget all progress.
    pub fn reset(&mut self) {
        if let Err(err) = self.store.delete_key(HIGHEST_LEVEL_KEY) {
            warn!(%err, "failed to reset progress");
        }
        if let Err(err) = self.store.flush() {
            warn!(%err, "failed to flush progress");
        }
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the underlying store.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    fn read(&self) -> i64 {
        match self.store.get_int(HIGHEST_LEVEL_KEY, 0) {
            Ok(value) => value.max(0),
            Err(err) => {
                warn!(%err, "failed to read progress, assuming level 0");
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_store_starts_at_zero() {
        let progress = ProgressService::new(MemoryStore::new());
        assert_eq!(progress.current_level_index(), 0);
        assert_eq!(progress.unlocked_level_count(30), 1);
        assert!(progress.is_unlocked(0));
        assert!(!progress.is_unlocked(1));
    }

    #[test]
    fn test_watermark_is_monotonic() {
        let mut progress = ProgressService::new(MemoryStore::new());

        assert_eq!(progress.unlock_next(3), 4);
        assert_eq!(progress.unlock_next(1), 4);
        assert_eq!(progress.current_level_index(), 4);
        assert_eq!(progress.unlock_next(4), 5);
    }

    #[test]
    fn test_unlocked_count_clamps_to_table() {
        let progress = ProgressService::new(MemoryStore::new().with_int(HIGHEST_LEVEL_KEY, 40));
        assert_eq!(progress.unlocked_level_count(30), 30);
        assert_eq!(progress.unlocked_level_count(0), 1);
    }

    #[test]
    fn test_negative_stored_value_clamps() {
        let progress = ProgressService::new(MemoryStore::new().with_int(HIGHEST_LEVEL_KEY, -5));
        assert_eq!(progress.current_level_index(), 0);
    }

    #[test]
    fn test_reset() {
        let mut progress = ProgressService::new(MemoryStore::new());
        progress.unlock_next(5);
        progress.reset();

        assert_eq!(progress.current_level_index(), 0);
        assert!(!progress.store().contains_key(HIGHEST_LEVEL_KEY));
    }

    #[test]
    fn test_store_failure_falls_back() {
        let mut progress = ProgressService::new(MemoryStore::new().with_int(HIGHEST_LEVEL_KEY, 2));
        progress.store_mut().set_available(false);

        assert_eq!(progress.current_level_index(), 0);
        assert_eq!(progress.unlock_next(0), 1);

        progress.store_mut().set_available(true);
        assert_eq!(progress.current_level_index(), 2);
    }

    #[test]
    fn test_garbage_value_reads_as_zero() {
        let mut store = MemoryStore::new();
        store.set_text(HIGHEST_LEVEL_KEY, "lots");
        let mut progress = ProgressService::new(store);

        assert_eq!(progress.current_level_index(), 0);
        assert_eq!(progress.unlock_next(0), 1);
        assert_eq!(progress.current_level_index(), 1);
    }
}
