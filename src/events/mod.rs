//! Events and the event bus.
//!
//! The core raises `GameEvent`s in the order things happen. The `Game`
//! owns an `EventBus` and publishes every event to subscribers before
//! routing it to the rule monitor.
//!
//! ## Example Usage
//!
//! ```
//! use pairwise::events::{EventBus, EventKind, Flow, GameEvent, Scope};
//!
//! let mut bus = EventBus::new();
//! let log = bus.record(Scope::Session);
//!
//! // A one-shot listener: it sees the first win and then removes itself.
//! bus.subscribe_to(Scope::Level, &[EventKind::GameWon], |_| Flow::Unsubscribe);
//!
//! bus.publish(&GameEvent::GameWon);
//! assert_eq!(log.count(EventKind::GameWon), 1);
//! assert_eq!(bus.len(), 1);
//! ```

mod bus;
mod event;

pub use bus::{EventBus, EventLog, Flow, Scope, SubscriptionId};
pub use event::{EventKind, GameEvent, LossReason};
