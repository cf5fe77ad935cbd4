//! # Per-job event bus.
//!
//! Each [`Job`](crate::Job) owns one [`Bus`]: a `tokio::sync::broadcast`
//! sender that admission decisions and task settlements are reported on.
//! Settlements happen on whichever runtime thread the task finished on, so
//! publishing must never block or wait for receivers.
//!
//! ## Rules
//! - `publish_with` builds the event only while someone is subscribed; an
//!   unobserved job pays nothing beyond a receiver count.
//! - One ring buffer of `bus_capacity` events is shared by all receivers; a
//!   receiver that falls behind gets `RecvError::Lagged(n)`.
//! - Nothing is replayed: a receiver only sees events sent after it subscribed.

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast sender for one job's lifecycle events.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a bus buffering up to `capacity` events (at least 1).
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Sends `ev` to current receivers; dropped if there are none.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Builds and sends an event, skipping `make` when nobody listens.
    ///
    /// Events built this way draw their `seq` only when they are sent.
    pub fn publish_with(&self, make: impl FnOnce() -> Event) {
        if self.receiver_count() > 0 {
            self.publish(make());
        }
    }

    /// Receiver for events sent from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }

    /// Number of live receivers.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
