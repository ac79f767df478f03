//! Fan-out of [`StoreEvent`]s to views.
//!
//! Stores publish after reconciling state; a view holds a receiver and
//! re-reads the store it cares about. Slow views lag and lose the oldest
//! notifications, which is harmless because events carry no state a view
//! could not read back from the store.

use tokio::sync::broadcast;

use super::StoreEvent;

/// Cloneable handle on one broadcast channel shared by all stores.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<StoreEvent>,
}

impl EventBus {
    /// Bus buffering up to `capacity` undelivered events (at least one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Sends `event` to every live view and returns how many got it.
    /// With no view subscribed the event is dropped.
    pub fn publish(&self, event: StoreEvent) -> usize {
        tracing::trace!(event_type = event.event_type_str(), "store event");
        self.sender.send(event).unwrap_or(0)
    }

    /// Receiver for events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.sender.subscribe()
    }

    /// Number of live receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
