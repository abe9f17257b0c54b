//! Reload subscribers.
//!
//! Anything that wants reload messages (a websocket broadcaster, a test
//! capture, a log line) registers a [`ReloadSink`]. Sinks are called
//! synchronously, in registration order, from the call that produced the
//! message.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use super::message::ReloadMessage;

/// Unique identifier for a subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

impl SubscriberId {
    /// Generate a new unique subscriber ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiver of reload messages.
pub trait ReloadSink: Send + Sync {
    /// Deliver one message. Must not block.
    fn deliver(&self, message: &ReloadMessage);
}

/// A sink backed by a closure.
pub struct ReloadSubscriber {
    notify: Box<dyn Fn(&ReloadMessage) + Send + Sync>,
}

impl ReloadSubscriber {
    pub fn new<F>(notify: F) -> Self
    where
        F: Fn(&ReloadMessage) + Send + Sync + 'static,
    {
        Self {
            notify: Box::new(notify),
        }
    }
}

impl ReloadSink for ReloadSubscriber {
    fn deliver(&self, message: &ReloadMessage) {
        (self.notify)(message);
    }
}

/// Ordered list of registered sinks.
#[derive(Default)]
pub struct SubscriberList {
    sinks: RwLock<Vec<(SubscriberId, Arc<dyn ReloadSink>)>>,
}

impl SubscriberList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, sink: Arc<dyn ReloadSink>) -> SubscriberId {
        let id = SubscriberId::new();
        self.sinks.write().push((id, sink));
        id
    }

    /// Returns whether a sink was registered under `id`.
    pub fn remove(&self, id: SubscriberId) -> bool {
        let mut sinks = self.sinks.write();
        let before = sinks.len();
        sinks.retain(|(sink_id, _)| *sink_id != id);
        sinks.len() != before
    }

    pub fn len(&self) -> usize {
        self.sinks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.read().is_empty()
    }

    /// Deliver `message` to every sink.
    pub fn notify(&self, message: &ReloadMessage) {
        // Release the lock before calling out, so a sink may unsubscribe.
        let sinks: Vec<_> = self.sinks.read().iter().map(|(_, sink)| Arc::clone(sink)).collect();
        for sink in sinks {
            sink.deliver(message);
        }
    }
}

impl std::fmt::Debug for SubscriberList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriberList")
            .field("len", &self.len())
            .finish()
    }
}
