//! Synchronous in-process event bus.
//!
//! The bus is owned by the `Game`; there is no global registry. Handlers run
//! in subscription order, on the caller's thread, before `publish` returns.
//!
//! ## Re-entrancy
//!
//! - Handlers get `&GameEvent` only. They cannot reach the game, so a handler
//!   can never start a nested selection or resolution.
//! - A handler removes itself by returning [`Flow::Unsubscribe`]. The current
//!   call completes; no further events reach it, including later events of
//!   the same batch.
//! - [`Scope::Level`] subscriptions are dropped whenever a level is torn
//!   down, so per-level listeners cannot leak into the next level.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::event::{EventKind, GameEvent};

/// Unique identifier for a subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(pub u32);

impl SubscriptionId {
    /// Create a new subscription ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Subscription({})", self.0)
    }
}

/// How long a subscription lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Scope {
    /// Until explicitly removed.
    #[default]
    Session,
    /// Until the current level is torn down.
    Level,
}

/// Returned by a handler to keep or drop its subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    /// Keep receiving events.
    Continue,
    /// Remove this subscription after the current call.
    Unsubscribe,
}

type Handler = Box<dyn FnMut(&GameEvent) -> Flow>;

struct Subscription {
    id: SubscriptionId,
    scope: Scope,
    /// `None` accepts every kind.
    kinds: Option<Vec<EventKind>>,
    handler: Handler,
}

impl Subscription {
    fn accepts(&self, kind: EventKind) -> bool {
        self.kinds.as_ref().map_or(true, |kinds| kinds.contains(&kind))
    }
}

/// Publish/subscribe channel for `GameEvent`s.
#[derive(Default)]
pub struct EventBus {
    subscriptions: Vec<Subscription>,
    next_id: u32,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriptions", &self.subscriptions.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

impl EventBus {
    /// Create an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to every event.
    pub fn subscribe<F>(&mut self, scope: Scope, handler: F) -> SubscriptionId
    where
        F: FnMut(&GameEvent) -> Flow + 'static,
    {
        self.insert(scope, None, Box::new(handler))
    }

    /// Subscribe to specific event kinds only.
    pub fn subscribe_to<F>(&mut self, scope: Scope, kinds: &[EventKind], handler: F) -> SubscriptionId
    where
        F: FnMut(&GameEvent) -> Flow + 'static,
    {
        self.insert(scope, Some(kinds.to_vec()), Box::new(handler))
    }

    /// Record every event into a shared log.
    pub fn record(&mut self, scope: Scope) -> EventLog {
        let log = EventLog::default();
        let sink = log.clone();
        self.subscribe(scope, move |event| {
            sink.push(event.clone());
            Flow::Continue
        });
        log
    }

    fn insert(&mut self, scope: Scope, kinds: Option<Vec<EventKind>>, handler: Handler) -> SubscriptionId {
        let id = SubscriptionId::new(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription {
            id,
            scope,
            kinds,
            handler,
        });
        id
    }

    /// Remove a subscription. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    /// Drop every subscription in a scope. Returns how many were removed.
    pub fn clear_scope(&mut self, scope: Scope) -> usize {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.scope != scope);
        before - self.subscriptions.len()
    }

    /// Deliver an event to all interested subscribers, in subscription order.
    ///
    /// Returns the number of handlers called.
    pub fn publish(&mut self, event: &GameEvent) -> usize {
        let kind = event.kind();
        let mut delivered = 0;

        self.subscriptions.retain_mut(|sub| {
            if !sub.accepts(kind) {
                return true;
            }
            delivered += 1;
            (sub.handler)(event) == Flow::Continue
        });

        delivered
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    /// True if nobody is subscribed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}

/// Shared, append-only log of published events.
///
/// Single-threaded: clones share the same buffer.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<GameEvent>>>,
}

impl EventLog {
    fn push(&self, event: GameEvent) {
        self.events.borrow_mut().push(event);
    }

    /// Copy of everything recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<GameEvent> {
        self.events.borrow().clone()
    }

    /// Kinds of everything recorded so far.
    #[must_use]
    pub fn kinds(&self) -> Vec<EventKind> {
        self.events.borrow().iter().map(GameEvent::kind).collect()
    }

    /// How many recorded events have the given kind.
    #[must_use]
    pub fn count(&self, kind: EventKind) -> usize {
        self.events.borrow().iter().filter(|e| e.kind() == kind).count()
    }

    /// Drain the log.
    pub fn take(&self) -> Vec<GameEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    /// True if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}
