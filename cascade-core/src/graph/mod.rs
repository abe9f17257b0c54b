//! Resource Dependency Graph
//!
//! This module implements the graph of every resource the dev server has
//! served, and the propagation of file changes through it.
//!
//! # Overview
//!
//! The graph is a directed graph (cycles are allowed) where:
//!
//! - Nodes are resources, keyed by canonical URL
//! - If A references B, B is in `A.dependencies` and A is in `B.dependents`
//!
//! When a file changes, we walk its dependents upward until every path ends
//! at a resource that accepts the update, or until something forces a full
//! page reload.
//!
//! # Design Decisions
//!
//! 1. Nodes live in a single registry owned by a [`ResourceGraph`] value, not
//!    in process-wide state, so tests and servers can run independent graphs.
//!
//! 2. Both edge directions are stored, and only [`ResourceGraph::reconcile`]
//!    and [`ResourceGraph::remove`] touch them, so they cannot drift apart.
//!
//! 3. Edge sets are insertion ordered; propagation visits dependents in the
//!    order their edges were created.

mod node;
mod propagate;
mod registry;
mod shared;
mod update;

pub use node::{HotCapabilities, NodeId, ResourceNode};
pub use propagate::{Boundary, DeclineReason, Propagation};
pub use registry::{NodeSnapshot, ResourceGraph};
pub use shared::SharedGraph;
pub use update::ResourceUpdate;
