//! Shared Graph Handle
//!
//! File-watch callbacks and request handlers run on different tasks, so the
//! registry sits behind one lock. Reconciliation touches two nodes at once
//! (source and target), which is why the lock covers the whole registry
//! rather than individual nodes.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::propagate::Propagation;
use super::registry::ResourceGraph;
use super::update::ResourceUpdate;
use crate::error::GraphError;

/// Cheaply cloneable handle to a [`ResourceGraph`] shared between tasks.
#[derive(Debug, Clone, Default)]
pub struct SharedGraph {
    inner: Arc<RwLock<ResourceGraph>>,
}

impl SharedGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_graph(graph: ResourceGraph) -> Self {
        Self {
            inner: Arc::new(RwLock::new(graph)),
        }
    }

    /// Lock the graph for reading.
    ///
    /// Do not hold the guard across an `.await`.
    pub fn read(&self) -> RwLockReadGuard<'_, ResourceGraph> {
        self.inner.read()
    }

    /// Lock the graph for writing.
    pub fn write(&self) -> RwLockWriteGuard<'_, ResourceGraph> {
        self.inner.write()
    }

    /// Reconcile under the write lock. See [`ResourceGraph::reconcile`].
    pub fn reconcile(&self, url: &str, update: ResourceUpdate) -> Vec<String> {
        self.inner.write().reconcile(url, update)
    }

    /// Propagate under the read lock. See [`ResourceGraph::propagate_url`].
    pub fn propagate_url(&self, url: &str) -> Result<Propagation, GraphError> {
        self.inner.read().propagate_url(url)
    }
}
