//! The level orchestrator.

use std::collections::VecDeque;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::board::{Board, BoardGenerator, BuildReport};
use crate::cards::{CardId, FaceId, IdentityPool};
use crate::core::{GameConfig, LevelDef, LevelTable};
use crate::events::{EventBus, EventLog, Flow, GameEvent, LossReason, Scope, SubscriptionId};
use crate::progress::{KeyValueStore, MemoryStore, ProgressService};
use crate::resolver::{Continuation, IgnoreReason, Resolver, ResolverState, SelectOutcome};
use crate::rules::{LevelTimer, RuleMonitor};
use crate::schedule::Scheduler;

/// Where the current level stands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LevelPhase {
    /// No level loaded, or the player went home.
    #[default]
    Idle,
    /// Accepting input; the level timer runs.
    InProgress,
    /// Timer and continuations frozen, input ignored.
    Paused,
    /// Every pair matched.
    Won,
    /// A move or time limit was hit.
    Lost,
}

impl LevelPhase {
    /// Has the level finished, one way or the other?
    #[must_use]
    pub fn is_concluded(self) -> bool {
        matches!(self, LevelPhase::Won | LevelPhase::Lost)
    }
}

/// Everything a view needs to draw one frame.
///
/// Cheap to take: the board is a persistent structure and is shared, not
/// copied.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub phase: LevelPhase,
    pub level_index: usize,
    pub level: LevelDef,
    pub board: Board,
    pub remaining_pairs: usize,
    pub moves: u32,
    pub moves_left: Option<u32>,
    pub elapsed: Duration,
    pub time_left: Option<Duration>,
    pub input_enabled: bool,
    pub resolver_state: ResolverState,
}

/// Drives levels from deal to win or loss.
///
/// The game owns every piece of level state and is the only thing that
/// connects them. Events produced by the resolver are queued, published to
/// the bus in order, then routed to the rule monitor; any event the monitor
/// raises joins the back of the same queue.
///
/// The host calls [`Game::tick`] once per frame and [`Game::select_card`]
/// on input.
pub struct Game<S: KeyValueStore = MemoryStore> {
    config: GameConfig,
    levels: LevelTable,
    pool: Vec<FaceId>,
    generator: BoardGenerator,
    board: Board,
    last_build: Option<BuildReport>,
    resolver: Resolver,
    monitor: RuleMonitor,
    timer: LevelTimer,
    scheduler: Scheduler<Continuation>,
    bus: EventBus,
    progress: ProgressService<S>,
    level_index: usize,
    phase: LevelPhase,
    seed: u64,
}

impl<S: KeyValueStore> std::fmt::Debug for Game<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("level_index", &self.level_index)
            .field("phase", &self.phase)
            .field("remaining_pairs", &self.resolver.remaining_pairs())
            .field("moves", &self.monitor.moves())
            .field("scheduler", &self.scheduler)
            .field("bus", &self.bus)
            .finish()
    }
}

impl<S: KeyValueStore> Game<S> {
    pub(crate) fn from_parts(
        config: GameConfig,
        levels: LevelTable,
        pool: Vec<FaceId>,
        progress: ProgressService<S>,
        seed: u64,
    ) -> Self {
        Self {
            config,
            levels,
            pool,
            generator: BoardGenerator::new(seed),
            board: Board::default(),
            last_build: None,
            resolver: Resolver::new(),
            monitor: RuleMonitor::new(),
            timer: LevelTimer::new(),
            scheduler: Scheduler::new(),
            bus: EventBus::new(),
            progress,
            level_index: 0,
            phase: LevelPhase::Idle,
            seed,
        }
    }

    // === Level lifecycle ===

    /// Start at the highest unlocked level.
    pub fn start(&mut self) -> usize {
        let index = self.progress.current_level_index();
        self.start_level(index)
    }

    /// Tear down whatever is running and deal level `index`.
    ///
    /// An index past the end of the table wraps to the first level. Returns
    /// the index actually started.
    pub fn start_level(&mut self, index: usize) -> usize {
        let wrapped = self.levels.wrap_index(index);
        if wrapped != index {
            info!(requested = index, "level index out of range, restarting from the first level");
        }

        self.teardown();

        let level = self.levels.get(wrapped).cloned().unwrap_or_default();
        let timing = self.config.timing_for(&level);
        let report = self
            .generator
            .rebuild(&mut self.board, level.rows, level.cols, self.pool.as_slice());

        self.level_index = wrapped;
        self.last_build = Some(report);
        self.resolver.begin(report.pairs, timing);
        self.timer.reset();
        self.timer.start();
        self.monitor.begin(&level);
        self.phase = LevelPhase::InProgress;

        info!(
            level = wrapped + 1,
            rows = level.rows,
            cols = level.cols,
            pairs = report.pairs,
            "level started"
        );

        self.dispatch(vec![
            GameEvent::RemainingPairsChanged {
                remaining: report.pairs,
            },
            GameEvent::LevelStarted {
                level,
                index: wrapped,
            },
        ]);
        wrapped
    }

    /// Start the level after a won one. Past the last level this wraps to
    /// the first.
    pub fn next_level(&mut self) -> Option<usize> {
        if self.phase != LevelPhase::Won {
            return None;
        }
        Some(self.start_level(self.level_index + 1))
    }

    /// Restart the current level from scratch.
    pub fn retry(&mut self) -> Option<usize> {
        if self.phase == LevelPhase::Idle {
            return None;
        }
        Some(self.start_level(self.level_index))
    }

    /// Freeze the level. Returns false unless a level was in progress.
    pub fn pause(&mut self) -> bool {
        if self.phase != LevelPhase::InProgress {
            return false;
        }
        self.timer.stop();
        self.phase = LevelPhase::Paused;
        debug!(level = self.level_index + 1, "paused");
        true
    }

    /// Unfreeze a paused level.
    pub fn resume(&mut self) -> bool {
        if self.phase != LevelPhase::Paused {
            return false;
        }
        self.timer.start();
        self.phase = LevelPhase::InProgress;
        debug!(level = self.level_index + 1, "resumed");
        true
    }

    /// Abandon the current level and return to the idle state.
    pub fn go_home(&mut self) {
        self.teardown();
        self.timer.stop();
        self.phase = LevelPhase::Idle;
        debug!("returned home");
    }

    /// Forget all unlocked levels.
    pub fn reset_progress(&mut self) {
        self.progress.reset();
        info!("progress reset");
    }

    fn teardown(&mut self) {
        let dropped = self.scheduler.clear();
        self.resolver.halt();
        let listeners = self.bus.clear_scope(Scope::Level);
        debug!(dropped, listeners, "level torn down");
    }

    // === Input and time ===

    /// Route a card selection to the resolver.
    pub fn select_card(&mut self, card: CardId) -> SelectOutcome {
        if self.phase != LevelPhase::InProgress {
            return SelectOutcome::Ignored(IgnoreReason::InputLocked);
        }

        let mut events = Vec::new();
        let outcome = self
            .resolver
            .select(&mut self.board, card, &mut self.scheduler, &mut events);
        self.dispatch(events);
        outcome
    }

    /// Advance one frame.
    ///
    /// Order: level timer, time limit, then due continuations. Does nothing
    /// unless a level is in progress.
    pub fn tick(&mut self, dt: Duration) {
        if self.phase != LevelPhase::InProgress {
            return;
        }

        self.timer.tick(dt);
        if let Some(lost) = self.monitor.check_time(&mut self.timer) {
            self.dispatch(vec![lost]);
            return;
        }

        for continuation in self.scheduler.advance(dt) {
            if self.phase != LevelPhase::InProgress {
                break;
            }
            let mut events = Vec::new();
            self.resolver
                .resume(continuation, &mut self.board, &mut self.scheduler, &mut events);
            self.dispatch(events);
        }
    }

    /// Jump the clock to each pending continuation until none remain.
    ///
    /// For headless drivers that do not care about frame pacing. The level
    /// timer advances by the same amounts, so time limits still apply.
    pub fn flush(&mut self) {
        while self.phase == LevelPhase::InProgress {
            let Some(wait) = self.scheduler.until_next() else {
                break;
            };
            self.tick(wait);
        }
    }

    // === Event routing ===

    fn dispatch(&mut self, events: Vec<GameEvent>) {
        if events.is_empty() {
            return;
        }

        let mut queue = VecDeque::from(events);
        while let Some(event) = queue.pop_front() {
            self.bus.publish(&event);
            if let Some(follow_up) = self.route(&event) {
                queue.push_back(follow_up);
            }
        }

        if self.config.auto_advance {
            match self.phase {
                LevelPhase::Won => {
                    self.start_level(self.level_index + 1);
                }
                LevelPhase::Lost => {
                    self.start_level(self.level_index);
                }
                _ => {}
            }
        }
    }

    fn route(&mut self, event: &GameEvent) -> Option<GameEvent> {
        match event {
            GameEvent::PairMatched { .. } | GameEvent::PairMismatched { .. } => {
                if self.phase != LevelPhase::InProgress {
                    return None;
                }
                self.monitor.on_pair_resolved(self.resolver.remaining_pairs())
            }
            GameEvent::GameWon => {
                if self.phase != LevelPhase::InProgress {
                    return None;
                }
                self.monitor.on_game_won();
                self.timer.stop();
                self.phase = LevelPhase::Won;
                info!(
                    level = self.level_index + 1,
                    moves = self.monitor.moves(),
                    elapsed = ?self.timer.elapsed(),
                    "level won"
                );
                Some(GameEvent::LevelCompleted {
                    index: self.level_index,
                })
            }
            GameEvent::LevelCompleted { index } => {
                self.progress.unlock_next(*index);
                None
            }
            GameEvent::GameLost { reason } => {
                self.conclude_lost(*reason);
                None
            }
            _ => None,
        }
    }

    fn conclude_lost(&mut self, reason: LossReason) {
        if self.phase.is_concluded() {
            return;
        }
        self.timer.stop();
        self.resolver.halt();
        self.scheduler.clear();
        self.phase = LevelPhase::Lost;
        info!(
            level = self.level_index + 1,
            %reason,
            moves = self.monitor.moves(),
            "level lost"
        );
    }

    // === Subscriptions ===

    /// Subscribe to every event.
    pub fn subscribe<F>(&mut self, scope: Scope, handler: F) -> SubscriptionId
    where
        F: FnMut(&GameEvent) -> Flow + 'static,
    {
        self.bus.subscribe(scope, handler)
    }

    /// Record every event published from now on.
    pub fn record(&mut self, scope: Scope) -> EventLog {
        self.bus.record(scope)
    }

    /// Remove a subscription.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// The event bus, for filtered subscriptions.
    pub fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    // === Queries ===

    #[must_use]
    pub fn phase(&self) -> LevelPhase {
        self.phase
    }

    #[must_use]
    pub fn level_index(&self) -> usize {
        self.level_index
    }

    /// Definition of the current (or last) level.
    #[must_use]
    pub fn level(&self) -> Option<&LevelDef> {
        self.levels.get(self.level_index)
    }

    #[must_use]
    pub fn levels(&self) -> &LevelTable {
        &self.levels
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// What the last deal produced.
    #[must_use]
    pub fn last_build(&self) -> Option<BuildReport> {
        self.last_build
    }

    #[must_use]
    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    #[must_use]
    pub fn monitor(&self) -> &RuleMonitor {
        &self.monitor
    }

    #[must_use]
    pub fn timer(&self) -> &LevelTimer {
        &self.timer
    }

    #[must_use]
    pub fn remaining_pairs(&self) -> usize {
        self.resolver.remaining_pairs()
    }

    #[must_use]
    pub fn moves(&self) -> u32 {
        self.monitor.moves()
    }

    #[must_use]
    pub fn progress(&self) -> &ProgressService<S> {
        &self.progress
    }

    pub fn progress_mut(&mut self) -> &mut ProgressService<S> {
        &mut self.progress
    }

    /// Seed the board generator was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Replace the identity pool. Takes effect at the next deal.
    pub fn set_identities<P>(&mut self, pool: &P)
    where
        P: IdentityPool + ?Sized,
    {
        self.pool = pool.identities();
    }

    /// Capture the state a view needs.
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            phase: self.phase,
            level_index: self.level_index,
            level: self.level().cloned().unwrap_or_default(),
            board: self.board.clone(),
            remaining_pairs: self.resolver.remaining_pairs(),
            moves: self.monitor.moves(),
            moves_left: self.monitor.moves_left(),
            elapsed: self.timer.elapsed(),
            time_left: self.monitor.time_left(&self.timer),
            input_enabled: self.phase == LevelPhase::InProgress && self.resolver.input_enabled(),
            resolver_state: self.resolver.state(),
        }
    }
}
