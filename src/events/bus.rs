//! # Event bus for connector events.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`] used by the
//! connector, the callback bridge and the retry worker.
//!
//! ## Architecture
//! ```text
//! Publishers:                        Subscribers:
//!   ServiceConnector ──┐
//!   CallbackBridge   ──┼──► Bus ──► listener ──► SubscriberSet ──► LogWriter, ...
//!   RetryWorker      ──┘       └──► ServiceConnector::subscribe() (raw receivers)
//! ```
//!
//! ## Rules
//! - **Non-blocking publish**: safe to call with the connector lock held.
//! - **Bounded capacity**: slow receivers get `RecvError::Lagged(n)`.
//! - **No persistence**: events are lost if nobody is subscribed.

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for connector events.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a new bus with the given channel capacity (min 1).
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel::<Event>(capacity.max(1));
        Self { tx }
    }

    /// Publishes an event to all active receivers.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Creates a receiver that observes subsequent events.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}
