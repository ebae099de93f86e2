//! Deterministic random number generation for board dealing.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces the same boards
//! - **Context streams**: Independent sequences for identity picking and layout
//! - **Serializable**: O(1) state capture and restore
//!
//! ```
//! use pairwise::core::GameRng;
//!
//! let rng = GameRng::new(42);
//!
//! // Picking faces and shuffling the layout draw from separate streams,
//! // so changing the pool size never perturbs an unrelated sequence.
//! let mut layout = rng.for_context("layout");
//! let mut again = GameRng::new(42).for_context("layout");
//! assert_eq!(layout.index_below(1000), again.index_below(1000));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Deterministic RNG used by the board generator.
///
/// Uses ChaCha8 for speed while keeping a well-distributed stream.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create an RNG seeded from the thread-local entropy source.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::thread_rng().gen())
    }

    /// The seed this stream was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Create an independent stream for a specific context.
    ///
    /// The same context always produces the same stream from the same seed.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;

        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Uniform index in `[0, upper)`, or `None` if the range is empty.
    pub fn index_below(&mut self, upper: usize) -> Option<usize> {
        (upper > 0).then(|| self.inner.gen_range(0..upper))
    }

    /// Fisher–Yates shuffle in place.
    ///
    /// Walks from the last index down to 1 and swaps each element with a
    /// uniformly chosen element in `[0, i]`.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            if let Some(j) = self.index_below(i + 1) {
                slice.swap(i, j);
            }
        }
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

/// Serializable RNG state.
///
/// Uses the ChaCha8 word position so capture is O(1) regardless of
/// how many numbers have been drawn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.index_below(1000), rng2.index_below(1000));
        }
    }

    #[test]
    fn test_different_seeds() {
        let mut rng1 = GameRng::new(1);
        let mut rng2 = GameRng::new(2);

        let seq1: Vec<_> = (0..10).map(|_| rng1.index_below(1000)).collect();
        let seq2: Vec<_> = (0..10).map(|_| rng2.index_below(1000)).collect();

        assert_ne!(seq1, seq2);
    }

    #[test]
    fn test_context_is_deterministic() {
        let rng1 = GameRng::new(42);
        let rng2 = GameRng::new(42);

        let mut ctx1 = rng1.for_context("layout");
        let mut ctx2 = rng2.for_context("layout");

        for _ in 0..10 {
            assert_eq!(ctx1.index_below(1000), ctx2.index_below(1000));
        }
    }

    #[test]
    fn test_contexts_differ() {
        let rng = GameRng::new(42);
        let mut faces = rng.for_context("faces");
        let mut layout = rng.for_context("layout");

        let seq1: Vec<_> = (0..10).map(|_| faces.index_below(1000)).collect();
        let seq2: Vec<_> = (0..10).map(|_| layout.index_below(1000)).collect();

        assert_ne!(seq1, seq2);
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = GameRng::new(42);
        let mut data: Vec<u32> = (1..=10).collect();
        let original = data.clone();

        rng.shuffle(&mut data);

        assert_ne!(data, original);
        data.sort_unstable();
        assert_eq!(data, original);
    }

    #[test]
    fn test_index_below_empty_range() {
        let mut rng = GameRng::new(3);
        assert_eq!(rng.index_below(0), None);
        assert_eq!(rng.index_below(1), Some(0));
        assert!((0..100).all(|_| rng.index_below(6).is_some_and(|i| i < 6)));
    }

    #[test]
    fn test_shuffle_small_slices() {
        let mut rng = GameRng::new(7);

        let mut empty: Vec<u8> = vec![];
        rng.shuffle(&mut empty);
        assert!(empty.is_empty());

        let mut single = vec![9];
        rng.shuffle(&mut single);
        assert_eq!(single, vec![9]);
    }

    #[test]
    fn test_state_round_trip() {
        let mut rng = GameRng::new(42);
        for _ in 0..100 {
            rng.index_below(1000);
        }

        let state = rng.state();
        let expected: Vec<_> = (0..10).map(|_| rng.index_below(1000)).collect();

        let mut restored = GameRng::from_state(&state);
        let actual: Vec<_> = (0..10).map(|_| restored.index_below(1000)).collect();

        assert_eq!(expected, actual);
    }

    #[test]
    fn test_state_serde() {
        let state = GameRngState {
            seed: 42,
            word_pos: 12345,
        };

        let json = serde_json::to_string(&state).unwrap();
        let deserialized: GameRngState = serde_json::from_str(&json).unwrap();

        assert_eq!(state, deserialized);
    }
}
