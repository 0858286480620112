//! # Event bus for broadcasting manager events.
//!
//! [`Bus`] wraps a [`tokio::sync::broadcast`] channel of `Arc<Event>`: the manager and every
//! task runner publish into it, and each receiver (the subscriber listener, callers of
//! [`TaskManager::subscribe`](crate::TaskManager::subscribe)) sees the same allocation.
//!
//! ```text
//!   run_once (task 1) ──┐
//!   run_once (task N) ──┼──► Bus ──► subscriber listener ──► SubscriberSet
//!   TaskManager       ──┘      └───► TaskManager::subscribe() receivers
//! ```
//!
//! Publishing never blocks and never fails. Events sent while nobody listens are gone;
//! a receiver that falls more than `capacity` events behind gets `RecvError::Lagged`.

use std::sync::Arc;

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for manager events. Clones share the channel.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Arc<Event>>,
}

impl Bus {
    /// Creates a bus retaining up to `capacity` undelivered events (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Sends `ev` to every current receiver.
    pub fn publish(&self, ev: Event) {
        // Err only means there is no receiver right now.
        let _ = self.tx.send(Arc::new(ev));
    }

    /// Returns a receiver for events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<Event>> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[tokio::test]
    async fn test_receivers_share_one_event() {
        let bus = Bus::new(8);
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();

        bus.publish(Event::new(EventKind::ShutdownRequested).with_reason("SIGTERM"));

        let (ea, eb) = (a.recv().await.expect("a"), b.recv().await.expect("b"));
        assert_eq!(ea.kind, EventKind::ShutdownRequested);
        assert_eq!(eb.reason.as_deref(), Some("SIGTERM"));
        assert!(Arc::ptr_eq(&ea, &eb));
    }

    #[test]
    fn test_publish_without_receivers_is_noop() {
        let bus = Bus::new(0);
        bus.publish(Event::new(EventKind::GraceExceeded));
    }

    #[tokio::test]
    async fn test_late_receiver_misses_earlier_events() {
        let bus = Bus::new(4);
        bus.publish(Event::new(EventKind::TaskSpawned));

        let mut rx = bus.subscribe();
        bus.publish(Event::new(EventKind::TaskStarting));
        assert_eq!(rx.recv().await.expect("rx").kind, EventKind::TaskStarting);
    }
}
