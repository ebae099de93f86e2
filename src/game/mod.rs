//! Level orchestration.
//!
//! `Game` ties the board generator, resolver, rule monitor, timer,
//! scheduler, event bus and progress store together:
//!
//! ```text
//! start_level(i) -> InProgress --(GameWon)--> Won  --next_level--> start_level(i+1)
//!                      |   ^                   \--retry--> start_level(i)
//!                 pause|   |resume
//!                      v   |
//!                     Paused      --(GameLost)--> Lost --retry--> start_level(i)
//! ```
//!
//! ## Example Usage
//!
//! ```
//! use std::time::Duration;
//! use pairwise::cards::CardSet;
//! use pairwise::core::{LevelDef, LevelTable};
//! use pairwise::events::{GameEvent, Scope};
//! use pairwise::game::{GameBuilder, LevelPhase};
//!
//! let levels = LevelTable::new(vec![LevelDef::new(1, 2), LevelDef::new(2, 2)]).unwrap();
//! let mut game = GameBuilder::new()
//!     .with_levels(levels)
//!     .with_identities(&CardSet::from_names(["A", "B"]))
//!     .with_seed(5)
//!     .build();
//! let log = game.record(Scope::Session);
//!
//! game.start();
//! let ids: Vec<_> = game.board().cards().map(|c| c.id()).collect();
//! game.select_card(ids[0]);
//! game.select_card(ids[1]);
//! game.tick(Duration::from_millis(50));
//!
//! assert_eq!(game.phase(), LevelPhase::Won);
//! assert!(log.events().contains(&GameEvent::LevelCompleted { index: 0 }));
//! assert_eq!(game.progress().current_level_index(), 1);
//! ```

mod builder;
#[allow(clippy::module_inception)]
mod game;

pub use builder::GameBuilder;
pub use game::{Game, GameSnapshot, LevelPhase};
