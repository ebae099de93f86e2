//! Level progression persistence.
//!
//! `ProgressService` keeps a single watermark, the highest unlocked level
//! index, in a host-supplied `KeyValueStore`.
//!
//! ## Example Usage
//!
//! ```
//! use pairwise::progress::{MemoryStore, ProgressService};
//!
//! let mut progress = ProgressService::new(MemoryStore::new());
//! progress.unlock_next(2);
//! progress.unlock_next(0);
//! assert_eq!(progress.current_level_index(), 3);
//! ```

mod service;
mod store;

pub use service::{ProgressService, HIGHEST_LEVEL_KEY};
pub use store::{KeyValueStore, MemoryStore};
