//! Resource Registry
//!
//! [`ResourceGraph`] owns every known [`ResourceNode`], keyed by canonical URL,
//! and keeps the `dependencies`/`dependents` edge sets mirrored.
//!
//! # Edge reconciliation
//!
//! Each time a resource is parsed, the parser hands over the complete list
//! of URLs it references. [`ResourceGraph::reconcile`] diffs that list
//! against the previous one:
//!
//! 1. For every URL no longer referenced, drop the back-edge from the target.
//!    A target left with no dependents is reported as pruned. It stays in the
//!    registry; dropping it is up to the caller.
//! 2. For every newly referenced URL, get-or-create the target and add the
//!    back-edge.
//!
//! Reconciliation takes `&mut self`, so no reader can observe a half-updated
//! edge set.

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use super::node::ResourceNode;
use super::update::ResourceUpdate;

/// Diagnostic view of one node, as returned by [`ResourceGraph::inspect`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeSnapshot {
    #[serde(rename = "type")]
    pub kind: String,
    pub dependencies: Vec<String>,
    pub dependents: Vec<String>,
}

/// The registry of served resources and their dependency edges.
#[derive(Debug, Default)]
pub struct ResourceGraph {
    /// All nodes in the graph, indexed by URL in creation order.
    nodes: IndexMap<String, ResourceNode>,
}

impl ResourceGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self {
            nodes: IndexMap::new(),
        }
    }

    /// Look up a node without side effects.
    pub fn get(&self, url: &str) -> Option<&ResourceNode> {
        self.nodes.get(url)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.nodes.contains_key(url)
    }

    /// Return the node for `url`, registering an empty one if it is unknown.
    pub fn get_or_create(&mut self, url: &str) -> &mut ResourceNode {
        if !self.nodes.contains_key(url) {
            tracing::trace!(url, "registering resource");
        }
        self.nodes
            .entry(url.to_owned())
            .or_insert_with(|| ResourceNode::new(url))
    }

    /// Apply a parsed resource's new state to the graph.
    ///
    /// Fields left as `None` in `update` are not touched. Returns the URLs
    /// that lost their last dependent because of this call.
    pub fn reconcile(&mut self, url: &str, update: ResourceUpdate) -> Vec<String> {
        let ResourceUpdate {
            kind,
            dependency_urls,
            declines_hot_update,
            self_accepts_update,
            accepted_dependency_urls,
        } = update;

        let node = self.get_or_create(url);
        if let Some(kind) = kind {
            node.set_kind(kind);
        }
        let caps = node.capabilities_mut();
        if let Some(declines) = declines_hot_update {
            caps.declines_hot_update = declines;
        }
        if let Some(self_accepts) = self_accepts_update {
            caps.self_accepts_update = self_accepts;
        }
        if let Some(accepted) = accepted_dependency_urls {
            caps.accepted_dependency_urls = accepted.into_iter().collect();
        }

        match dependency_urls {
            Some(urls) => self.reconcile_edges(url, urls.into_iter().collect()),
            None => Vec::new(),
        }
    }

    fn reconcile_edges(&mut self, url: &str, next: IndexSet<String>) -> Vec<String> {
        let previous = self.get_or_create(url).replace_dependencies(next.clone());

        let mut pruned = Vec::new();
        let mut removed = 0usize;
        for target_url in previous.difference(&next) {
            removed += 1;
            if let Some(target) = self.nodes.get_mut(target_url) {
                target.remove_dependent(url);
                if target.is_unreferenced() {
                    pruned.push(target_url.clone());
                }
            }
        }

        let mut added = 0usize;
        for target_url in next.difference(&previous) {
            added += 1;
            self.get_or_create(target_url).add_dependent(url);
        }

        tracing::trace!(url, added, removed, pruned = pruned.len(), "reconciled edges");
        pruned
    }

    /// Remove a node and detach every edge touching it.
    ///
    /// Returns the former dependencies that are now unreferenced.
    pub fn remove(&mut self, url: &str) -> Vec<String> {
        let Some(node) = self.nodes.shift_remove(url) else {
            return Vec::new();
        };

        let mut pruned = Vec::new();
        for dep_url in node.dependencies() {
            if let Some(dep) = self.nodes.get_mut(dep_url) {
                dep.remove_dependent(url);
                if dep.is_unreferenced() {
                    pruned.push(dep_url.clone());
                }
            }
        }

        for dependent_url in node.dependents() {
            if let Some(dependent) = self.nodes.get_mut(dependent_url) {
                dependent.remove_dependency(url);
            }
        }

        tracing::debug!(url, pruned = pruned.len(), "removed resource");
        pruned
    }

    /// URLs of every node nothing references.
    pub fn unreferenced(&self) -> Vec<String> {
        self.nodes
            .values()
            .filter(|node| node.is_unreferenced())
            .map(|node| node.url().to_owned())
            .collect()
    }

    /// Iterate over all nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = &ResourceNode> {
        self.nodes.values()
    }

    /// Get the total number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Snapshot of the whole graph for debugging endpoints.
    pub fn inspect(&self) -> IndexMap<String, NodeSnapshot> {
        self.nodes
            .iter()
            .map(|(url, node)| {
                let snapshot = NodeSnapshot {
                    kind: node.kind().to_owned(),
                    dependencies: node.dependencies().iter().cloned().collect(),
                    dependents: node.dependents().iter().cloned().collect(),
                };
                (url.clone(), snapshot)
            })
            .collect()
    }

    pub fn inspect_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.inspect())
    }
}
