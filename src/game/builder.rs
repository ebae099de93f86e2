//! Game construction.

use crate::cards::{FaceId, IdentityPool};
use crate::core::{GameConfig, GameRng, LevelTable};
use crate::progress::{KeyValueStore, MemoryStore, ProgressService};

use super::game::Game;

/// Builder for [`Game`].
///
/// Everything has a default: the built-in campaign, default timings, an
/// in-memory progress store, an entropy seed, and a generated identity pool
/// large enough for the biggest level.
#[derive(Clone, Debug)]
pub struct GameBuilder<S: KeyValueStore = MemoryStore> {
    config: GameConfig,
    levels: LevelTable,
    pool: Option<Vec<FaceId>>,
    store: S,
    seed: Option<u64>,
}

impl Default for GameBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GameBuilder {
    /// Start from the defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: GameConfig::default(),
            levels: LevelTable::campaign(),
            pool: None,
            store: MemoryStore::new(),
            seed: None,
        }
    }
}

impl<S: KeyValueStore> GameBuilder<S> {
    /// Set timings and flags.
    #[must_use]
    pub fn with_config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the level table.
    #[must_use]
    pub fn with_levels(mut self, levels: LevelTable) -> Self {
        self.levels = levels;
        self
    }

    /// Deal faces from `pool`.
    #[must_use]
    pub fn with_identities<P>(mut self, pool: &P) -> Self
    where
        P: IdentityPool + ?Sized,
    {
        self.pool = Some(pool.identities());
        self
    }

    /// Fix the board generator seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Persist progress in `store`.
    #[must_use]
    pub fn with_store<T: KeyValueStore>(self, store: T) -> GameBuilder<T> {
        GameBuilder {
            config: self.config,
            levels: self.levels,
            pool: self.pool,
            store,
            seed: self.seed,
        }
    }

    /// Build an idle game. Call [`Game::start`] to deal the first level.
    #[must_use]
    pub fn build(self) -> Game<S> {
        let seed = self.seed.unwrap_or_else(|| GameRng::from_entropy().seed());
        let levels = self.levels;
        let pool = self
            .pool
            .unwrap_or_else(|| numbered_faces(levels.max_cards_per_level() / 2));

        Game::from_parts(self.config, levels, pool, ProgressService::new(self.store), seed)
    }
}

fn numbered_faces(count: usize) -> Vec<FaceId> {
    (0..count)
        .map(|i| FaceId::new(format!("face-{:02}", i)))
        .collect()
}
