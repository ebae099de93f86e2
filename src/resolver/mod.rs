//! Selection/match resolution.
//!
//! The resolver turns card selections into match and mismatch outcomes:
//!
//! ```text
//! Idle --select--> OneSelected --select--> Resolving --(settle)--> compare
//!   ^                                                               |
//!   |<------------------------ match -------------------------------+
//!   |                                                               |
//!   +<-- Release <--(flip)-- Conceal <--(hide delay)-- mismatch ----+
//! ```
//!
//! While `Resolving`, every selection is rejected, so at most one resolution
//! is ever in flight.
//!
//! ## Example Usage
//!
//! ```
//! use std::time::Duration;
//! use pairwise::board::BoardGenerator;
//! use pairwise::cards::CardSet;
//! use pairwise::core::Timing;
//! use pairwise::events::GameEvent;
//! use pairwise::resolver::{Resolver, ResolverState, SelectOutcome};
//! use pairwise::schedule::Scheduler;
//!
//! let (mut board, report) = BoardGenerator::new(1).build(1, 2, &CardSet::from_names(["A"]));
//! let mut resolver = Resolver::new();
//! resolver.begin(report.pairs, Timing::default());
//!
//! let mut scheduler = Scheduler::new();
//! let mut events = Vec::new();
//! let ids: Vec<_> = board.cards().map(|c| c.id()).collect();
//!
//! resolver.select(&mut board, ids[0], &mut scheduler, &mut events);
//! let outcome = resolver.select(&mut board, ids[1], &mut scheduler, &mut events);
//! assert_eq!(outcome, SelectOutcome::Resolving);
//!
//! for step in scheduler.advance(Duration::from_millis(50)) {
//!     resolver.resume(step, &mut board, &mut scheduler, &mut events);
//! }
//! assert_eq!(resolver.state(), ResolverState::Idle);
//! assert_eq!(events.last(), Some(&GameEvent::GameWon));
//! ```

#[allow(clippy::module_inception)]
mod resolver;

pub use resolver::{
    Continuation, IgnoreReason, ResolveStep, Resolver, ResolverState, SelectOutcome,
};
