//! Graph Nodes
//!
//! This module defines the resource nodes that live in the dependency graph.

use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexSet;

/// Unique identifier for a node in the dependency graph.
///
/// The URL is the lookup key; the id only exists so that two lookups can be
/// compared for identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u64);

impl NodeId {
    /// Generate a new unique node ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Hot-update capabilities declared by a resource.
///
/// These are derived by the parsing layer from the resource content and
/// consumed by the propagation engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HotCapabilities {
    /// The resource refuses any hot update.
    pub declines_hot_update: bool,

    /// The resource can re-apply itself without involving its dependents.
    pub self_accepts_update: bool,

    /// Dependency URLs whose updates this resource handles itself.
    pub accepted_dependency_urls: IndexSet<String>,
}

impl HotCapabilities {
    /// Whether this resource handles updates of the given dependency.
    pub fn accepts_dependency(&self, url: &str) -> bool {
        self.accepted_dependency_urls.contains(url)
    }
}

/// A served resource in the dependency graph.
#[derive(Debug, Clone)]
pub struct ResourceNode {
    /// Unique identifier for this node.
    id: NodeId,

    /// Canonical absolute URL.
    url: String,

    /// Resource kind (`html`, `css`, `js_module`, ...). Opaque to the graph.
    kind: String,

    /// URLs this resource references, in reference order.
    dependencies: IndexSet<String>,

    /// URLs referencing this resource, in the order the edges were created.
    dependents: IndexSet<String>,

    capabilities: HotCapabilities,
}

impl ResourceNode {
    /// Create an empty node for `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(),
            url: url.into(),
            kind: String::new(),
            dependencies: IndexSet::new(),
            dependents: IndexSet::new(),
            capabilities: HotCapabilities::default(),
        }
    }

    /// Get the node's ID.
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get the resource kind. Empty until the resource is first parsed.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub(crate) fn set_kind(&mut self, kind: String) {
        self.kind = kind;
    }

    pub fn capabilities(&self) -> &HotCapabilities {
        &self.capabilities
    }

    pub(crate) fn capabilities_mut(&mut self) -> &mut HotCapabilities {
        &mut self.capabilities
    }

    pub fn declines_hot_update(&self) -> bool {
        self.capabilities.declines_hot_update
    }

    pub fn self_accepts_update(&self) -> bool {
        self.capabilities.self_accepts_update
    }

    /// Get all dependencies.
    pub fn dependencies(&self) -> &IndexSet<String> {
        &self.dependencies
    }

    /// Get all dependents.
    pub fn dependents(&self) -> &IndexSet<String> {
        &self.dependents
    }

    /// A node nothing references is a candidate for pruning.
    pub fn is_unreferenced(&self) -> bool {
        self.dependents.is_empty()
    }

    pub(crate) fn replace_dependencies(&mut self, dependencies: IndexSet<String>) -> IndexSet<String> {
        std::mem::replace(&mut self.dependencies, dependencies)
    }

    pub(crate) fn remove_dependency(&mut self, url: &str) {
        self.dependencies.shift_remove(url);
    }

    /// Add a dependent. Re-adding an existing dependent keeps its position.
    pub(crate) fn add_dependent(&mut self, url: &str) {
        if !self.dependents.contains(url) {
            self.dependents.insert(url.to_owned());
        }
    }

    /// Remove a dependent, preserving the order of the remaining ones.
    pub(crate) fn remove_dependent(&mut self, url: &str) {
        self.dependents.shift_remove(url);
    }
}
