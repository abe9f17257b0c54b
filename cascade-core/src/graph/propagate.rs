//! Update Propagation
//!
//! Given a modified resource, decide whether connected clients can apply the
//! change in place (hot reload) or must reload the whole page.
//!
//! # Algorithm
//!
//! We walk depth-first from the modified node up through its dependents:
//!
//! 1. A node that self-accepts is a boundary on its own. This check comes
//!    before looking at dependents, at every level.
//! 2. Otherwise, for each dependent in edge-creation order:
//!    a. a declining dependent declines the whole propagation;
//!    b. a dependent accepting this node's URL is a boundary, and the walk
//!       stops there for this path;
//!    c. a dependent already on the current path is a cycle, which declines;
//!    d. anything else is walked recursively with the path extended.
//! 3. A node without dependents declines with "no importer".
//! 4. A node whose dependents produced no boundary declines with "nothing
//!    accepts".
//!
//! A "no importer" or "nothing accepts" decline coming back from a recursive
//! call only means that branch is a dead end, however deep it goes: it is
//! skipped and the siblings still get a chance. "Nothing accepts" is only
//! reported by the modified node itself. Declining dependents and cycles
//! coming back from a branch abort the whole walk.
//!
//! The path is copied on every recursion rather than shared as a visited
//! set, so a node reachable through two disjoint paths is walked twice and
//! its boundaries are reported twice.

use std::fmt;

use smallvec::SmallVec;

use super::node::ResourceNode;
use super::registry::ResourceGraph;
use crate::error::GraphError;

/// URLs on the path from the modified node to the node being visited.
type Trace<'g> = SmallVec<[&'g str; 8]>;

/// A resource at which a propagation path stops successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boundary {
    /// The resource that gets re-applied.
    pub boundary_url: String,

    /// The resource whose update it accepts (itself when self-accepting).
    pub accepted_by_url: String,
}

impl Boundary {
    pub fn new(boundary_url: impl Into<String>, accepted_by_url: impl Into<String>) -> Self {
        Self {
            boundary_url: boundary_url.into(),
            accepted_by_url: accepted_by_url.into(),
        }
    }
}

/// Why a propagation could not be handled with a hot reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclineReason {
    /// The modified resource itself declines hot reload.
    SelfDeclines,

    /// A dependent on the propagation path declines hot reload.
    DependentDeclines,

    /// The walk reached a resource already on its own path.
    CircularDependency,

    /// The walk reached a resource nothing references.
    NoImporter,

    /// Every dependent was walked and none of them accepted the update.
    NothingAccepts,

    /// A resource that is no longer referenced declines hot reload.
    PrunedDeclines,
}

impl DeclineReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclineReason::SelfDeclines => "file declines hot reload",
            DeclineReason::DependentDeclines => "a dependent file declines hot reload",
            DeclineReason::CircularDependency => "circular dependency",
            DeclineReason::NoImporter => "no importer",
            DeclineReason::NothingAccepts => "nothing calls accept() while propagating update",
            DeclineReason::PrunedDeclines => "a pruned file declines hot reload",
        }
    }
}

impl fmt::Display for DeclineReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of propagating an update through the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Propagation {
    /// Clients must do a full reload.
    Declined {
        reason: DeclineReason,
        declined_by: Option<String>,
    },

    /// Clients re-apply each boundary, in order. The same boundary can appear
    /// more than once when several paths reach it.
    Accepted { boundaries: Vec<Boundary> },
}

impl Propagation {
    pub fn declined(reason: DeclineReason, declined_by: impl Into<String>) -> Self {
        Propagation::Declined {
            reason,
            declined_by: Some(declined_by.into()),
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Propagation::Accepted { .. })
    }

    /// The decline reason, if the update was declined.
    pub fn decline_reason(&self) -> Option<DeclineReason> {
        match self {
            Propagation::Declined { reason, .. } => Some(*reason),
            Propagation::Accepted { .. } => None,
        }
    }

    /// The boundaries, or an empty slice when declined.
    pub fn boundaries(&self) -> &[Boundary] {
        match self {
            Propagation::Accepted { boundaries } => boundaries,
            Propagation::Declined { .. } => &[],
        }
    }
}

impl ResourceGraph {
    /// Compute how an update of `node` reaches connected clients.
    ///
    /// This is a pure read of the current graph and always terminates.
    pub fn propagate(&self, node: &ResourceNode) -> Propagation {
        // Declining wins over self-accepting when a resource sets both.
        let outcome = if node.declines_hot_update() {
            Propagation::declined(DeclineReason::SelfDeclines, node.url())
        } else {
            let mut trace = Trace::new();
            trace.push(node.url());
            self.walk(node, trace)
        };

        match &outcome {
            Propagation::Accepted { boundaries } => {
                tracing::debug!(url = node.url(), boundaries = boundaries.len(), "update accepted");
            }
            Propagation::Declined { reason, declined_by } => {
                tracing::debug!(
                    url = node.url(),
                    %reason,
                    declined_by = declined_by.as_deref().unwrap_or(""),
                    "update declined"
                );
            }
        }
        outcome
    }

    /// Like [`propagate`](Self::propagate), looking the node up by URL first.
    pub fn propagate_url(&self, url: &str) -> Result<Propagation, GraphError> {
        let node = self.get(url).ok_or_else(|| GraphError::UnknownResource {
            url: url.to_owned(),
        })?;
        Ok(self.propagate(node))
    }

    fn walk<'g>(&'g self, node: &'g ResourceNode, trace: Trace<'g>) -> Propagation {
        if node.self_accepts_update() {
            return Propagation::Accepted {
                boundaries: vec![Boundary::new(node.url(), node.url())],
            };
        }

        if node.dependents().is_empty() {
            return Propagation::declined(DeclineReason::NoImporter, node.url());
        }

        let mut boundaries = Vec::new();
        for dependent_url in node.dependents() {
            let Some(dependent) = self.get(dependent_url) else {
                tracing::warn!(url = node.url(), dependent = %dependent_url, "dangling dependent edge");
                continue;
            };

            if dependent.declines_hot_update() {
                return Propagation::declined(DeclineReason::DependentDeclines, dependent.url());
            }

            if dependent.capabilities().accepts_dependency(node.url()) {
                boundaries.push(Boundary::new(dependent.url(), node.url()));
                continue;
            }

            if trace.contains(&dependent.url()) {
                return Propagation::declined(DeclineReason::CircularDependency, dependent.url());
            }

            let mut branch = trace.clone();
            branch.push(dependent.url());
            match self.walk(dependent, branch) {
                Propagation::Accepted { boundaries: found } => boundaries.extend(found),
                // A dead-end branch does not sink its siblings.
                Propagation::Declined {
                    reason: DeclineReason::NoImporter | DeclineReason::NothingAccepts,
                    ..
                } => continue,
                declined => return declined,
            }
        }

        if boundaries.is_empty() {
            return Propagation::declined(DeclineReason::NothingAccepts, node.url());
        }
        Propagation::Accepted { boundaries }
    }
}
