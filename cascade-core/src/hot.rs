//! Hot Reloader
//!
//! The hot reloader is the coordinator that connects the graph, the message
//! emitter and the subscribers. One instance exists per dev server and is
//! handed to the file watcher and to the request handlers.
//!
//! # How It Works
//!
//! 1. When a resource is served, the request handler parses it and calls
//!    [`HotReloader::cook`]. The graph edges are reconciled and, if some
//!    dependencies were dropped, a prune message is sent.
//!
//! 2. When the file watcher sees a change, it calls
//!    [`HotReloader::on_file_event`]. The change is propagated through the
//!    graph and the resulting message is sent. A removed file also loses its
//!    outgoing edges, and the files it alone referenced are pruned.
//!
//! 3. [`HotReloader::serve`] pushes every message to websocket clients,
//!    using the channel capacity and wire format from the config.
//!
//! Both steps hold the graph lock for the whole computation and release it
//! before notifying subscribers.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use serde::Deserialize;
use tokio::net::TcpListener;

use crate::config::HotReloadConfig;
use crate::cook::{CookSequencer, CookTicket};
use crate::error::{ConfigError, GraphError, TransportError};
use crate::graph::{ResourceGraph, ResourceUpdate, SharedGraph};
use crate::reload::{ReloadEmitter, ReloadMessage, ReloadSink, ReloadSubscriber, SubscriberId, SubscriberList};
use crate::transport::{self, Broadcaster};

/// What happened to a watched file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileEventKind {
    Added,
    Modified,
    Removed,
}

impl FileEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileEventKind::Added => "added",
            FileEventKind::Modified => "modified",
            FileEventKind::Removed => "removed",
        }
    }
}

impl fmt::Display for FileEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Notification from the file watcher.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileEvent {
    pub url: String,

    #[serde(rename = "event")]
    pub kind: FileEventKind,
}

impl FileEvent {
    pub fn new(url: impl Into<String>, kind: FileEventKind) -> Self {
        Self {
            url: url.into(),
            kind,
        }
    }

    pub fn modified(url: impl Into<String>) -> Self {
        Self::new(url, FileEventKind::Modified)
    }
}

/// Coordinates graph updates and reload notifications for one dev server.
#[derive(Debug)]
pub struct HotReloader {
    graph: SharedGraph,
    emitter: ReloadEmitter,
    config: HotReloadConfig,
    subscribers: SubscriberList,
    sequencer: CookSequencer,
}

impl HotReloader {
    /// Create a hot reloader with an empty graph.
    ///
    /// Fails if `config` does not pass [`HotReloadConfig::validate`].
    pub fn new(config: HotReloadConfig) -> Result<Self, ConfigError> {
        Self::with_graph(SharedGraph::new(), config)
    }

    pub fn with_graph(graph: SharedGraph, config: HotReloadConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            graph,
            emitter: ReloadEmitter::new(config.root_url.clone()),
            config,
            subscribers: SubscriberList::new(),
            sequencer: CookSequencer::new(),
        })
    }

    pub fn graph(&self) -> &SharedGraph {
        &self.graph
    }

    pub fn config(&self) -> &HotReloadConfig {
        &self.config
    }

    pub fn emitter(&self) -> &ReloadEmitter {
        &self.emitter
    }

    /// Register a sink for every message this reloader sends.
    pub fn attach(&self, sink: Arc<dyn ReloadSink>) -> SubscriberId {
        self.subscribers.add(sink)
    }

    /// Register a closure for every message this reloader sends.
    pub fn subscribe<F>(&self, notify: F) -> SubscriberId
    where
        F: Fn(&ReloadMessage) + Send + Sync + 'static,
    {
        self.attach(Arc::new(ReloadSubscriber::new(notify)))
    }

    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        self.subscribers.remove(id)
    }

    /// Attach a new channel sized by `channel_capacity` and return it.
    pub fn broadcaster(&self) -> Broadcaster {
        let broadcaster = Broadcaster::new(self.config.channel_capacity);
        self.attach(Arc::new(broadcaster.clone()));
        broadcaster
    }

    /// Accept websocket clients on `listener` and push every message to
    /// them in the configured wire format.
    ///
    /// The channel is attached before this returns, so messages sent while
    /// the server task starts up are not lost.
    pub fn serve(&self, listener: TcpListener) -> impl Future<Output = Result<(), TransportError>> + 'static {
        transport::serve(listener, self.broadcaster(), self.config.wire_format)
    }

    /// Start a re-parse of `url`. Pass the ticket to
    /// [`cook_ticket`](Self::cook_ticket) once the resource is transformed.
    pub fn begin_cook(&self, url: &str) -> CookTicket {
        self.sequencer.begin(url)
    }

    /// Apply a finished re-parse, unless a newer one for the same URL was
    /// already applied.
    pub fn cook_ticket(&self, ticket: &CookTicket, update: ResourceUpdate) -> Option<ReloadMessage> {
        let message = {
            let mut graph = self.graph.write();
            if !self.sequencer.try_apply(ticket) {
                return None;
            }

            let url = ticket.url();
            let pruned = graph.reconcile(url, update);
            if pruned.is_empty() || !self.config.prune_notifications {
                return None;
            }

            match self.emitter.build_prune_message(&graph, url, &pruned) {
                Ok(message) => message,
                Err(err) => {
                    tracing::warn!(%err, "prune notification skipped");
                    None
                }
            }
        };

        message.map(|message| self.emit(message))
    }

    /// Apply a re-parse of `url` right away.
    pub fn cook(&self, url: &str, update: ResourceUpdate) -> Option<ReloadMessage> {
        let ticket = self.begin_cook(url);
        self.cook_ticket(&ticket, update)
    }

    /// Handle a file-watch notification. Unknown URLs are ignored.
    ///
    /// A removed file keeps its node, since pages may still reference it,
    /// but its outgoing edges are cleared. Files only it referenced are
    /// added to the message as prune instructions.
    pub fn on_file_event(&self, event: &FileEvent) -> Option<ReloadMessage> {
        let message = match event.kind {
            FileEventKind::Removed => {
                let mut graph = self.graph.write();
                if !graph.contains(&event.url) {
                    tracing::debug!(url = %event.url, event = %event.kind, "ignoring change of unknown resource");
                    return None;
                }
                let pruned = graph.reconcile(&event.url, ResourceUpdate::new().dependencies(Vec::<String>::new()));
                let message = self.change_message(&graph, event)?;
                if pruned.is_empty() || !self.config.prune_notifications {
                    message
                } else {
                    self.emitter.with_pruned(message, &graph, &event.url, &pruned)
                }
            }
            FileEventKind::Added | FileEventKind::Modified => {
                let graph = self.graph.read();
                self.change_message(&graph, event)?
            }
        };

        Some(self.emit(message))
    }

    /// Drop `url` from the graph along with its re-parse counters.
    ///
    /// Returns the dependencies left unreferenced, which the caller may
    /// remove in turn.
    pub fn remove(&self, url: &str) -> Vec<String> {
        let pruned = self.graph.write().remove(url);
        self.sequencer.forget(url);
        pruned
    }

    fn change_message(&self, graph: &ResourceGraph, event: &FileEvent) -> Option<ReloadMessage> {
        let outcome = match graph.propagate_url(&event.url) {
            Ok(outcome) => outcome,
            Err(GraphError::UnknownResource { url }) => {
                tracing::debug!(%url, event = %event.kind, "ignoring change of unknown resource");
                return None;
            }
        };

        let cause = format!("{} {}", self.emitter.relative_url(&event.url), event.kind);
        Some(self.emitter.build_message(cause, &outcome, graph))
    }

    fn emit(&self, message: ReloadMessage) -> ReloadMessage {
        let updates = match &message {
            ReloadMessage::HotReload { updates, .. } => updates.len(),
            ReloadMessage::FullReload { .. } => 0,
        };
        tracing::info!(kind = message.kind(), cause = message.cause(), updates, "sending reload");
        self.subscribers.notify(&message);
        message
    }
}
