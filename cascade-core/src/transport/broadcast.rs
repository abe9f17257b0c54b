//! Channel-backed reload sink.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::reload::{ReloadMessage, ReloadSink};

/// Fans reload messages out to any number of receivers.
///
/// Receivers that fall more than `capacity` messages behind lose the oldest
/// ones.
#[derive(Debug, Clone)]
pub struct Broadcaster {
    sender: broadcast::Sender<Arc<ReloadMessage>>,
}

impl Broadcaster {
    /// # Panics
    ///
    /// Panics if `capacity` is zero. [`HotReloadConfig::validate`] rejects
    /// that value.
    ///
    /// [`HotReloadConfig::validate`]: crate::config::HotReloadConfig::validate
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Arc<ReloadMessage>> {
        self.sender.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl ReloadSink for Broadcaster {
    fn deliver(&self, message: &ReloadMessage) {
        // No connected client is not an error.
        if self.sender.send(Arc::new(message.clone())).is_err() {
            tracing::trace!(cause = message.cause(), "no client connected");
        }
    }
}
