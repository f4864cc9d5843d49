//! Shared notification hub for changes to the backend event collection.
//!
//! Producers (anything that creates or deletes an event) call
//! [`EventStore::notify_added`] / [`EventStore::notify_deleted`]; consumers
//! hold an [`EventSubscription`] and re-fetch when one arrives.
//! Notifications carry no payload.

use tokio::sync::broadcast::{self, error::TryRecvError};

const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventsChanged {
    Added,
    Deleted,
}

impl EventsChanged {
    /// Wire name used by the dashboard's other widgets.
    pub fn name(&self) -> &'static str {
        match self {
            EventsChanged::Added => "kanban-event-added",
            EventsChanged::Deleted => "kanban-event-deleted",
        }
    }
}

#[derive(Debug)]
pub struct EventStore {
    tx: broadcast::Sender<EventsChanged>,
}

impl Default for EventStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EventStore {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    pub fn notify_added(&self) -> usize {
        self.notify(EventsChanged::Added)
    }

    pub fn notify_deleted(&self) -> usize {
        self.notify(EventsChanged::Deleted)
    }

    /// Broadcast `change`; returns how many subscribers were reached.
    pub fn notify(&self, change: EventsChanged) -> usize {
        match self.tx.send(change) {
            Ok(n) => {
                tracing::debug!(signal = change.name(), subscribers = n, "Events changed");
                n
            }
            Err(_) => {
                tracing::debug!(signal = change.name(), "Events changed with no subscribers");
                0
            }
        }
    }

    pub fn subscribe(&self) -> EventSubscription {
        EventSubscription {
            rx: self.tx.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// A live subscription. Dropping it unsubscribes.
#[derive(Debug)]
pub struct EventSubscription {
    rx: broadcast::Receiver<EventsChanged>,
}

impl EventSubscription {
    /// Next pending notification without waiting.
    ///
    /// A lagged receiver reports a single `Added`, since every
    /// notification means the same thing to a consumer: re-fetch.
    pub fn try_next(&mut self) -> Option<EventsChanged> {
        match self.rx.try_recv() {
            Ok(change) => Some(change),
            Err(TryRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Event subscription lagged");
                Some(EventsChanged::Added)
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => None,
        }
    }
}
