//! Board generation: pick faces, pair them, shuffle, lay out.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cards::{FaceId, IdentityPool};
use crate::core::{GameRng, GameRngState};

use super::board::Board;

/// What a build actually produced.
///
/// Odd grids and short pools are not errors: the board is under-filled and
/// the report says by how much.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildReport {
    /// Pairs the grid could hold.
    pub requested_pairs: usize,
    /// Pairs actually dealt.
    pub pairs: usize,
    /// Grid slots left without a card.
    pub empty_slots: usize,
    /// Pairs missing because the pool ran out of faces.
    pub face_shortfall: usize,
}

impl BuildReport {
    /// True if any slot was left empty.
    #[must_use]
    pub fn is_underfilled(&self) -> bool {
        self.empty_slots > 0
    }
}

/// Deals shuffled, paired boards from an identity pool.
///
/// Face picking and layout draw from separate RNG streams, so a change in
/// pool size never shifts the layout sequence of later boards.
#[derive(Clone, Debug)]
pub struct BoardGenerator {
    faces_rng: GameRng,
    layout_rng: GameRng,
}

impl BoardGenerator {
    /// Create a generator from a seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::from_rng(&GameRng::new(seed))
    }

    /// Create a generator whose streams derive from `rng`.
    #[must_use]
    pub fn from_rng(rng: &GameRng) -> Self {
        Self {
            faces_rng: rng.for_context("faces"),
            layout_rng: rng.for_context("layout"),
        }
    }

    /// Capture both stream positions.
    #[must_use]
    pub fn state(&self) -> (GameRngState, GameRngState) {
        (self.faces_rng.state(), self.layout_rng.state())
    }

    /// Resume from positions captured by [`BoardGenerator::state`].
    #[must_use]
    pub fn from_state(state: &(GameRngState, GameRngState)) -> Self {
        let (faces, layout) = state;
        Self {
            faces_rng: GameRng::from_state(faces),
            layout_rng: GameRng::from_state(layout),
        }
    }

    /// Choose up to `pair_count` distinct faces from the pool.
    ///
    /// Repeated identities in the pool count once. A short pool yields all
    /// of its faces. The pool is not mutated.
    pub fn pick_faces<P>(&mut self, pool: &P, pair_count: usize) -> Vec<FaceId>
    where
        P: IdentityPool + ?Sized,
    {
        let mut available = pool.identities();
        let mut seen = FxHashSet::default();
        available.retain(|face| seen.insert(face.clone()));

        self.faces_rng.shuffle(&mut available);
        available.truncate(pair_count);
        available
    }

    /// Produce a shuffled sequence in which every picked face appears twice.
    ///
    /// ```
    /// use pairwise::board::BoardGenerator;
    /// use pairwise::cards::CardSet;
    ///
    /// let pool = CardSet::from_names(["A", "B", "C"]);
    /// let mut generator = BoardGenerator::new(7);
    ///
    /// let dealt = generator.deal(&pool, 2);
    /// assert_eq!(dealt.len(), 4);
    /// assert!(generator.deal(&pool, 0).is_empty());
    /// ```
    pub fn deal<P>(&mut self, pool: &P, pair_count: usize) -> Vec<FaceId>
    where
        P: IdentityPool + ?Sized,
    {
        let picked = self.pick_faces(pool, pair_count);

        let mut dealt = Vec::with_capacity(picked.len() * 2);
        for face in picked {
            dealt.push(face.clone());
            dealt.push(face);
        }

        self.layout_rng.shuffle(&mut dealt);
        dealt
    }

    /// Build a fresh board for a `rows x cols` grid.
    pub fn build<P>(&mut self, rows: u32, cols: u32, pool: &P) -> (Board, BuildReport)
    where
        P: IdentityPool + ?Sized,
    {
        let mut board = Board::new(rows, cols);
        let report = self.rebuild(&mut board, rows, cols, pool);
        (board, report)
    }

    /// Rebuild an existing board in place, recycling its card instances.
    pub fn rebuild<P>(&mut self, board: &mut Board, rows: u32, cols: u32, pool: &P) -> BuildReport
    where
        P: IdentityPool + ?Sized,
    {
        let slots = rows as usize * cols as usize;
        let requested_pairs = slots / 2;
        let usable = requested_pairs * 2;

        if usable != slots {
            warn!(
                rows,
                cols,
                slots,
                usable,
                "odd grid, leaving {} slot(s) empty",
                slots - usable
            );
        }

        let dealt = self.deal(pool, requested_pairs);
        let pairs = dealt.len() / 2;
        let face_shortfall = requested_pairs - pairs;

        if face_shortfall > 0 {
            warn!(
                requested_pairs,
                pairs, "identity pool too small, dealing {} fewer pair(s)", face_shortfall
            );
        }

        board.relayout(rows, cols, dealt);
        debug!(rows, cols, pairs, "board dealt");

        BuildReport {
            requested_pairs,
            pairs,
            empty_slots: board.empty_slots(),
            face_shortfall,
        }
    }
}
