//! Selection and match resolution.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::board::Board;
use crate::cards::CardId;
use crate::core::Timing;
use crate::events::GameEvent;
use crate::schedule::Scheduler;

/// Resolver state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolverState {
    /// No pending selection.
    #[default]
    Idle,
    /// One card is face-up and waiting for a partner.
    OneSelected,
    /// Two cards are being compared or turned back. Input is locked.
    Resolving,
}

/// The resolution step a continuation resumes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolveStep {
    /// Settle delay elapsed: compare the two pending faces.
    Compare,
    /// Mismatch hide delay elapsed: turn both cards face-down.
    Conceal,
    /// Flip-down animation finished: release input.
    Release,
}

/// A scheduled resolution step, tagged with the generation it belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Continuation {
    /// Resolver generation when this was scheduled.
    pub generation: u64,
    /// Step to run.
    pub step: ResolveStep,
}

/// Why a selection was ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IgnoreReason {
    /// A resolution is in flight, or the level has concluded.
    InputLocked,
    /// No card with that ID on the board.
    UnknownCard,
    /// The card is already the pending selection.
    AlreadyPending,
    /// The card is already matched.
    Matched,
    /// The card is already face-up.
    FaceUp,
}

/// Result of a selection attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectOutcome {
    /// The card is the first of a pair.
    Pending,
    /// The card completed a pair; resolution has started.
    Resolving,
    /// Nothing happened.
    Ignored(IgnoreReason),
}

impl SelectOutcome {
    /// Was the selection accepted?
    #[must_use]
    pub fn is_accepted(self) -> bool {
        !matches!(self, SelectOutcome::Ignored(_))
    }
}

/// The selection/match state machine.
///
/// Owns the pending slots, the remaining-pair counter and the input lock.
/// Nothing else writes them.
///
/// Timed steps go through a `Scheduler<Continuation>` supplied by the caller.
/// Every continuation carries the generation current when it was scheduled;
/// `begin` and `halt` bump the generation so leftovers from an earlier level
/// or an aborted resolution are discarded by `resume`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Resolver {
    state: ResolverState,
    pending: SmallVec<[CardId; 2]>,
    remaining_pairs: usize,
    input_enabled: bool,
    won: bool,
    generation: u64,
    #[serde(skip)]
    timing: Timing,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolver {
    /// Create an idle resolver with no pairs. Input stays locked until `begin`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: ResolverState::Idle,
            pending: SmallVec::new(),
            remaining_pairs: 0,
            input_enabled: false,
            won: false,
            generation: 0,
            timing: Timing::default(),
        }
    }

    /// Start a new level with `pairs` hidden pairs.
    pub fn begin(&mut self, pairs: usize, timing: Timing) {
        self.generation += 1;
        self.state = ResolverState::Idle;
        self.pending.clear();
        self.remaining_pairs = pairs;
        self.input_enabled = true;
        self.won = false;
        self.timing = timing;
    }

    /// Abort any resolution in flight and lock input.
    ///
    /// Continuations scheduled before the halt become stale.
    pub fn halt(&mut self) {
        self.generation += 1;
        self.state = ResolverState::Idle;
        self.pending.clear();
        self.input_enabled = false;
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> ResolverState {
        self.state
    }

    /// Pending selections, in selection order.
    #[must_use]
    pub fn pending(&self) -> &[CardId] {
        &self.pending
    }

    /// Pairs still hidden.
    #[must_use]
    pub fn remaining_pairs(&self) -> usize {
        self.remaining_pairs
    }

    /// Does the resolver accept selections right now?
    #[must_use]
    pub fn input_enabled(&self) -> bool {
        self.input_enabled
    }

    /// Has this level's last pair been matched?
    #[must_use]
    pub fn is_won(&self) -> bool {
        self.won
    }

    /// Current generation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Timings in effect for this level.
    #[must_use]
    pub fn timing(&self) -> Timing {
        self.timing
    }

    /// Handle a player's selection of `card`.
    ///
    /// Ignored selections change nothing and emit nothing.
    pub fn select(
        &mut self,
        board: &mut Board,
        card: CardId,
        scheduler: &mut Scheduler<Continuation>,
        events: &mut Vec<GameEvent>,
    ) -> SelectOutcome {
        if let Err(reason) = self.check_selectable(board, card) {
            trace!(%card, ?reason, "selection ignored");
            return SelectOutcome::Ignored(reason);
        }

        if let Some(selected) = board.get_mut(card) {
            selected.flip_up();
        }
        self.pending.push(card);
        events.push(GameEvent::CardSelected { card });

        if self.pending.len() < 2 {
            self.state = ResolverState::OneSelected;
            debug!(%card, "first card selected");
            return SelectOutcome::Pending;
        }

        self.state = ResolverState::Resolving;
        self.input_enabled = false;
        self.schedule(scheduler, self.timing.settle_delay, ResolveStep::Compare);
        debug!(first = %self.pending[0], second = %card, "pair selected, resolving");
        SelectOutcome::Resolving
    }

    fn check_selectable(&self, board: &Board, card: CardId) -> Result<(), IgnoreReason> {
        if !self.input_enabled || self.state == ResolverState::Resolving {
            return Err(IgnoreReason::InputLocked);
        }
        let Some(target) = board.get(card) else {
            return Err(IgnoreReason::UnknownCard);
        };
        if self.pending.contains(&card) {
            return Err(IgnoreReason::AlreadyPending);
        }
        if target.is_matched() {
            return Err(IgnoreReason::Matched);
        }
        if target.is_face_up() {
            return Err(IgnoreReason::FaceUp);
        }
        Ok(())
    }

    /// Run a scheduled step.
    ///
    /// Returns false if the continuation was stale and was dropped.
    pub fn resume(
        &mut self,
        continuation: Continuation,
        board: &mut Board,
        scheduler: &mut Scheduler<Continuation>,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        if continuation.generation != self.generation
            || self.state != ResolverState::Resolving
            || self.pending.len() != 2
        {
            debug!(
                generation = continuation.generation,
                current = self.generation,
                step = ?continuation.step,
                "dropping stale continuation"
            );
            return false;
        }

        match continuation.step {
            ResolveStep::Compare => self.compare(board, scheduler, events),
            ResolveStep::Conceal => {
                for &id in &self.pending {
                    if let Some(card) = board.get_mut(id) {
                        card.flip_down();
                    }
                }
                self.schedule(scheduler, self.timing.flip_duration, ResolveStep::Release);
            }
            ResolveStep::Release => self.finish(),
        }
        true
    }

    fn compare(
        &mut self,
        board: &mut Board,
        scheduler: &mut Scheduler<Continuation>,
        events: &mut Vec<GameEvent>,
    ) {
        let (first, second) = (self.pending[0], self.pending[1]);
        let same_face = match (board.get(first), board.get(second)) {
            (Some(a), Some(b)) => a.face() == b.face(),
            _ => {
                self.finish();
                return;
            }
        };

        if !same_face {
            debug!(%first, %second, "mismatch");
            events.push(GameEvent::PairMismatched { first, second });
            self.schedule(scheduler, self.timing.mismatch_hide_delay, ResolveStep::Conceal);
            return;
        }

        for id in [first, second] {
            if let Some(card) = board.get_mut(id) {
                card.lock();
            }
        }
        self.remaining_pairs = self.remaining_pairs.saturating_sub(1);
        debug!(%first, %second, remaining = self.remaining_pairs, "match");

        events.push(GameEvent::PairMatched { first, second });
        events.push(GameEvent::RemainingPairsChanged {
            remaining: self.remaining_pairs,
        });
        if self.remaining_pairs == 0 && !self.won {
            self.won = true;
            events.push(GameEvent::GameWon);
        }

        self.finish();
    }

    fn finish(&mut self) {
        self.pending.clear();
        self.state = ResolverState::Idle;
        self.input_enabled = !self.won;
    }

    fn schedule(&self, scheduler: &mut Scheduler<Continuation>, delay: std::time::Duration, step: ResolveStep) {
        scheduler.after(
            delay,
            Continuation {
                generation: self.generation,
                step,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardGenerator;
    use crate::cards::{CardSet, FaceId};
    use std::time::Duration;

    struct Rig {
        board: Board,
        resolver: Resolver,
        scheduler: Scheduler<Continuation>,
        events: Vec<GameEvent>,
    }

    impl Rig {
        fn new(rows: u32, cols: u32, faces: &[&str]) -> Self {
            let (board, report) = BoardGenerator::new(42).build(rows, cols, &CardSet::from_names(faces));
            let mut resolver = Resolver::new();
            resolver.begin(report.pairs, Timing::default());
            Self {
                board,
                resolver,
                scheduler: Scheduler::new(),
                events: Vec::new(),
            }
        }

        fn select(&mut self, id: CardId) -> SelectOutcome {
            self.resolver
                .select(&mut self.board, id, &mut self.scheduler, &mut self.events)
        }

        fn run(&mut self, dt: Duration) {
            for cont in self.scheduler.advance(dt) {
                self.resolver
                    .resume(cont, &mut self.board, &mut self.scheduler, &mut self.events);
            }
        }

        fn run_all(&mut self) {
            while let Some(wait) = self.scheduler.until_next() {
                self.run(wait);
            }
        }

        fn ids_with(&self, face: &str) -> Vec<CardId> {
            let face = FaceId::from(face);
            self.board
                .cards()
                .filter(|c| *c.face() == face)
                .map(|c| c.id())
                .collect()
        }
    }

    #[test]
    fn test_first_selection() {
        let mut rig = Rig::new(2, 2, &["A", "B"]);
        let a = rig.ids_with("A");

        assert_eq!(rig.select(a[0]), SelectOutcome::Pending);
        assert_eq!(rig.resolver.state(), ResolverState::OneSelected);
        assert_eq!(rig.resolver.pending(), &[a[0]]);
        assert!(rig.board.get(a[0]).unwrap().is_face_up());
        assert_eq!(rig.events, vec![GameEvent::CardSelected { card: a[0] }]);
    }

    #[test]
    fn test_same_card_twice_is_ignored() {
        let mut rig = Rig::new(2, 2, &["A", "B"]);
        let a = rig.ids_with("A");

        rig.select(a[0]);
        assert_eq!(
            rig.select(a[0]),
            SelectOutcome::Ignored(IgnoreReason::AlreadyPending)
        );
        assert_eq!(rig.resolver.state(), ResolverState::OneSelected);
        assert_eq!(rig.events.len(), 1);
    }

    #[test]
    fn test_match_resolves_after_settle() {
        let mut rig = Rig::new(2, 2, &["A", "B"]);
        let a = rig.ids_with("A");

        rig.select(a[0]);
        assert_eq!(rig.select(a[1]), SelectOutcome::Resolving);
        assert!(!rig.resolver.input_enabled());

        rig.run(Duration::from_millis(49));
        assert_eq!(rig.resolver.state(), ResolverState::Resolving);

        rig.run(Duration::from_millis(1));
        assert_eq!(rig.resolver.state(), ResolverState::Idle);
        assert_eq!(rig.resolver.remaining_pairs(), 1);
        assert!(rig.board.get(a[0]).unwrap().is_matched());
        assert!(rig.board.get(a[1]).unwrap().is_matched());
        assert_eq!(
            rig.events[2..],
            [
                GameEvent::PairMatched { first: a[0], second: a[1] },
                GameEvent::RemainingPairsChanged { remaining: 1 },
            ]
        );
    }

    #[test]
    fn test_mismatch_flips_back() {
        let mut rig = Rig::new(2, 2, &["A", "B"]);
        let (a, b) = (rig.ids_with("A")[0], rig.ids_with("B")[0]);

        rig.select(a);
        rig.select(b);
        rig.run(Duration::from_millis(50));

        assert_eq!(
            rig.events.last(),
            Some(&GameEvent::PairMismatched { first: a, second: b })
        );
        assert_eq!(rig.resolver.state(), ResolverState::Resolving);
        assert!(rig.board.get(a).unwrap().is_face_up());

        rig.run(Duration::from_millis(700));
        assert!(!rig.board.get(a).unwrap().is_face_up());
        assert!(!rig.board.get(b).unwrap().is_face_up());
        assert!(!rig.resolver.input_enabled(), "still animating");

        rig.run(Duration::from_millis(250));
        assert_eq!(rig.resolver.state(), ResolverState::Idle);
        assert!(rig.resolver.input_enabled());
        assert_eq!(rig.resolver.remaining_pairs(), 2);
    }

    #[test]
    fn test_third_selection_rejected_while_resolving() {
        let mut rig = Rig::new(2, 3, &["A", "B", "C"]);
        let (a, b, c) = (rig.ids_with("A")[0], rig.ids_with("B")[0], rig.ids_with("C")[0]);

        rig.select(a);
        rig.select(b);
        assert_eq!(rig.select(c), SelectOutcome::Ignored(IgnoreReason::InputLocked));
        assert_eq!(rig.resolver.pending().len(), 2);
        assert!(!rig.board.get(c).unwrap().is_face_up());
    }

    #[test]
    fn test_matched_card_is_ignored() {
        let mut rig = Rig::new(2, 2, &["A", "B"]);
        let a = rig.ids_with("A");
        rig.select(a[0]);
        rig.select(a[1]);
        rig.run_all();
        let before = rig.events.len();

        assert_eq!(rig.select(a[0]), SelectOutcome::Ignored(IgnoreReason::Matched));
        assert_eq!(rig.events.len(), before);
        assert_eq!(rig.resolver.state(), ResolverState::Idle);
    }

    #[test]
    fn test_face_up_card_is_ignored() {
        let mut rig = Rig::new(2, 2, &["A", "B"]);
        let b = rig.ids_with("B")[0];
        rig.board.get_mut(b).unwrap().flip_up();

        assert_eq!(rig.select(b), SelectOutcome::Ignored(IgnoreReason::FaceUp));
        assert!(rig.events.is_empty());
    }

    #[test]
    fn test_unknown_card_is_ignored() {
        let mut rig = Rig::new(2, 2, &["A", "B"]);
        assert_eq!(
            rig.select(CardId::new(99)),
            SelectOutcome::Ignored(IgnoreReason::UnknownCard)
        );
    }

    #[test]
    fn test_game_won_once() {
        let mut rig = Rig::new(2, 2, &["A", "B"]);
        for face in ["A", "B"] {
            let ids = rig.ids_with(face);
            rig.select(ids[0]);
            rig.select(ids[1]);
            rig.run_all();
        }

        assert!(rig.resolver.is_won());
        assert_eq!(rig.resolver.remaining_pairs(), 0);
        assert!(!rig.resolver.input_enabled());
        let wins = rig.events.iter().filter(|e| **e == GameEvent::GameWon).count();
        assert_eq!(wins, 1);

        let a = rig.ids_with("A")[0];
        assert!(!rig.select(a).is_accepted());
    }

    #[test]
    fn test_halt_discards_in_flight_resolution() {
        let mut rig = Rig::new(2, 2, &["A", "B"]);
        let a = rig.ids_with("A");
        rig.select(a[0]);
        rig.select(a[1]);

        rig.resolver.halt();
        rig.run_all();

        assert_eq!(rig.resolver.remaining_pairs(), 2);
        assert!(!rig.board.get(a[0]).unwrap().is_matched());
        assert!(!rig.resolver.input_enabled());
        assert_eq!(rig.select(a[0]), SelectOutcome::Ignored(IgnoreReason::InputLocked));
    }

    #[test]
    fn test_begin_invalidates_previous_generation() {
        let mut rig = Rig::new(2, 2, &["A", "B"]);
        let (a, b) = (rig.ids_with("A")[0], rig.ids_with("B")[0]);
        rig.select(a);
        rig.select(b);
        let stale = Continuation {
            generation: rig.resolver.generation(),
            step: ResolveStep::Compare,
        };

        rig.resolver.begin(2, Timing::default());
        assert!(!rig
            .resolver
            .resume(stale, &mut rig.board, &mut rig.scheduler, &mut rig.events));
    }
}
