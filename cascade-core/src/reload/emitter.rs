//! Reload Instruction Emitter
//!
//! Turns a [`Propagation`] into the [`ReloadMessage`] clients receive. URLs
//! are rewritten relative to the project root on the way out.

use crate::graph::{Propagation, ResourceGraph};

use super::message::{ReloadMessage, UpdateInstruction};

/// Builds reload messages for one project root.
#[derive(Debug, Clone)]
pub struct ReloadEmitter {
    root_url: String,
}

impl ReloadEmitter {
    pub fn new(root_url: impl Into<String>) -> Self {
        Self {
            root_url: root_url.into(),
        }
    }

    pub fn root_url(&self) -> &str {
        &self.root_url
    }

    /// Express `url` relative to the root. URLs outside the root are kept
    /// as they are.
    pub fn relative_url<'a>(&self, url: &'a str) -> &'a str {
        url.strip_prefix(self.root_url.as_str()).unwrap_or(url)
    }

    /// Build the message announcing `outcome`.
    ///
    /// Boundary kinds are read from `graph`; a boundary missing from the
    /// graph is sent with an empty kind.
    pub fn build_message(
        &self,
        cause: impl Into<String>,
        outcome: &Propagation,
        graph: &ResourceGraph,
    ) -> ReloadMessage {
        let cause = cause.into();
        match outcome {
            Propagation::Declined {
                reason,
                declined_by,
            } => ReloadMessage::FullReload {
                cause,
                reason: reason.to_string(),
                declined_by: declined_by
                    .as_deref()
                    .map(|url| self.relative_url(url).to_owned()),
            },
            Propagation::Accepted { boundaries } => ReloadMessage::HotReload {
                cause,
                updates: boundaries
                    .iter()
                    .map(|boundary| UpdateInstruction {
                        kind: graph
                            .get(&boundary.boundary_url)
                            .map(|node| node.kind().to_owned())
                            .unwrap_or_default(),
                        boundary: self.relative_url(&boundary.boundary_url).to_owned(),
                        accepted_by: self.relative_url(&boundary.accepted_by_url).to_owned(),
                    })
                    .collect(),
            },
        }
    }
}
