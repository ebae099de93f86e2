//! Frame-quantised timed continuations.
//!
//! The host drives a virtual clock with `advance(dt)` once per frame. A
//! payload scheduled with `after(delay, ..)` comes back from the first
//! `advance` whose new time reaches its due time. Payloads due on the same
//! frame come back ordered by due time, then by scheduling order.
//!
//! The scheduler has no per-entry cancellation. Payloads that can go stale
//! carry a generation number that their consumer checks; `clear` drops
//! everything at level teardown.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::Duration;

struct Entry<T> {
    due: Duration,
    seq: u64,
    payload: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.due, self.seq).cmp(&(other.due, other.seq))
    }
}

/// Queue of payloads waiting for the virtual clock.
pub struct Scheduler<T> {
    now: Duration,
    next_seq: u64,
    queue: BinaryHeap<Reverse<Entry<T>>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_seq: 0,
            queue: BinaryHeap::new(),
        }
    }
}

impl<T> std::fmt::Debug for Scheduler<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("now", &self.now)
            .field("pending", &self.queue.len())
            .finish()
    }
}

impl<T> Scheduler<T> {
    /// Create an empty scheduler at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule `payload` to fire `delay` from now. Returns its due time.
    pub fn after(&mut self, delay: Duration, payload: T) -> Duration {
        let due = self.now + delay;
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Reverse(Entry { due, seq, payload }));
        due
    }

    /// Move the clock forward and return every payload now due.
    pub fn advance(&mut self, dt: Duration) -> Vec<T> {
        self.now += dt;

        let mut due = Vec::new();
        while let Some(Reverse(entry)) = self.queue.peek() {
            if entry.due > self.now {
                break;
            }
            if let Some(Reverse(entry)) = self.queue.pop() {
                due.push(entry.payload);
            }
        }
        due
    }

    /// Absolute time of the earliest pending payload.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.queue.peek().map(|Reverse(entry)| entry.due)
    }

    /// Time left until the earliest pending payload.
    #[must_use]
    pub fn until_next(&self) -> Option<Duration> {
        self.next_due().map(|due| due.saturating_sub(self.now))
    }

    /// Drop everything pending. Returns how many payloads were dropped.
    pub fn clear(&mut self) -> usize {
        let dropped = self.queue.len();
        self.queue.clear();
        dropped
    }

    /// Number of pending payloads.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// True if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
