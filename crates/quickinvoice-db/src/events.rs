//! # Change Notifications
//!
//! A broadcast signal the repository fires after every committed mutation,
//! so list views can re-query instead of polling.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  save/finalize/delete                                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  transaction commits  ──────►  StoreEvent::InvoicesChanged broadcast   │
//! │  (never notify-before-commit)                                           │
//! │                                                                         │
//! │  The event carries no payload guarantee beyond "the collection         │
//! │  changed" - a listener racing the writer must re-fetch current state,  │
//! │  not trust anything piggybacked on the notification.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Fire-and-forget: a send with no live subscribers is not an error, and a
//! slow subscriber that overflows the channel just observes a `Lagged` gap
//! and re-queries.

use tokio::sync::broadcast;

/// What changed. Deliberately payload-free.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    /// The invoice collection changed (a record was saved or deleted).
    InvoicesChanged,
}

/// Capacity of the broadcast channel. Listeners that fall further behind
/// than this see `Lagged` and should simply re-query.
const EVENT_CAPACITY: usize = 16;

/// The repository-owned notification channel.
#[derive(Debug, Clone)]
pub(crate) struct EventBus {
    sender: broadcast::Sender<StoreEvent>,
}

impl EventBus {
    pub(crate) fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CAPACITY);
        EventBus { sender }
    }

    /// Subscribes a new listener. Events sent before this call are not
    /// replayed.
    pub(crate) fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.sender.subscribe()
    }

    /// Broadcasts a change. Must only be called after the backing
    /// transaction has committed.
    pub(crate) fn notify(&self, event: StoreEvent) {
        // No subscribers is fine; the send result only reports that.
        let _ = self.sender.send(event);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribe_then_notify() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        bus.notify(StoreEvent::InvoicesChanged);
        assert_eq!(rx.recv().await.unwrap(), StoreEvent::InvoicesChanged);
    }

    #[tokio::test]
    async fn test_notify_without_subscribers_is_silent() {
        let bus = EventBus::new();
        bus.notify(StoreEvent::InvoicesChanged);
        // Nothing to assert: the call simply must not panic or error.
    }
}
