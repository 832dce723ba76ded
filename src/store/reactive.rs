//! Reactive State Store
//!
//! Holds the latest reading and a bounded history, and notifies subscribed
//! views after every `record`. Subscribers run synchronously, in the order
//! they were registered.

use serde::Serialize;

use super::history::History;
use crate::reading::Reading;

/// Handle returned by [`ReactiveStore::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Store lifecycle. `Populated` is terminal.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreState {
    Empty,
    Populated,
}

/// Owned, read-only copy of the store contents
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Snapshot {
    /// Readings oldest first
    pub history: Vec<Reading>,
    /// Most recent reading, `None` while the store is empty
    pub latest: Option<Reading>,
    /// Maximum history length
    pub capacity: usize,
    /// Readings recorded since the store was created, evicted ones included
    pub total_recorded: u64,
}

impl Snapshot {
    pub fn state(&self) -> StoreState {
        if self.latest.is_some() {
            StoreState::Populated
        } else {
            StoreState::Empty
        }
    }

    pub fn is_empty(&self) -> bool {
        self.latest.is_none()
    }
}

type Subscriber = Box<dyn FnMut(&Snapshot) + Send>;

/// Exclusive owner of a session's reading history
pub struct ReactiveStore {
    history: History,
    latest: Option<Reading>,
    total_recorded: u64,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl ReactiveStore {
    /// Create an empty store keeping at most `capacity` readings
    pub fn new(capacity: usize) -> Self {
        Self {
            history: History::new(capacity),
            latest: None,
            total_recorded: 0,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Append a reading, evict the oldest if over capacity, then notify
    pub fn record(&mut self, reading: Reading) {
        let evicted = self.history.push(reading);
        self.latest = Some(reading);
        self.total_recorded += 1;

        if let Some(old) = evicted {
            tracing::trace!(
                evicted_at = %old.formatted_timestamp(),
                len = self.history.len(),
                "Evicted oldest reading"
            );
        }

        if self.subscribers.is_empty() {
            return;
        }

        let snapshot = self.snapshot();
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(&snapshot);
        }
    }

    /// Current contents as an owned copy
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            history: self.history.to_vec(),
            latest: self.latest,
            capacity: self.history.capacity(),
            total_recorded: self.total_recorded,
        }
    }

    /// Register a callback invoked with a fresh snapshot after every `record`
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&Snapshot) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a subscriber. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
        self.subscribers.len() != before
    }

    pub fn state(&self) -> StoreState {
        if self.latest.is_some() {
            StoreState::Populated
        } else {
            StoreState::Empty
        }
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.history.capacity()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
