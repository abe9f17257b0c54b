//! Prune Notifier
//!
//! When a re-parse drops references, the page using the re-parsed resource
//! has to cope with those files no longer being there. That is the same
//! question as "can this resource be hot updated", so we propagate from the
//! re-parsed resource and, if it is accepted, tell clients to prune each
//! dropped URL.

use crate::error::GraphError;
use crate::graph::{DeclineReason, Propagation, ResourceGraph};

use super::emitter::ReloadEmitter;
use super::message::{ReloadMessage, UpdateInstruction};

/// Instruction kind used for dropped dependencies.
pub const PRUNE_KIND: &str = "prune";

impl ReloadEmitter {
    /// Build the message for `pruned` URLs that `root_url` stopped referencing.
    ///
    /// Returns `Ok(None)` when nothing was pruned.
    pub fn build_prune_message(
        &self,
        graph: &ResourceGraph,
        root_url: &str,
        pruned: &[String],
    ) -> Result<Option<ReloadMessage>, GraphError> {
        if pruned.is_empty() {
            return Ok(None);
        }

        let cause = format!(
            "following files are no longer referenced: {}",
            pruned
                .iter()
                .map(|url| self.relative_url(url))
                .collect::<Vec<_>>()
                .join(", ")
        );

        let outcome = graph.propagate_url(root_url)?;
        if let Propagation::Declined { .. } = outcome {
            return Ok(Some(self.build_message(cause, &outcome, graph)));
        }

        let message = ReloadMessage::HotReload {
            cause,
            updates: Vec::new(),
        };
        Ok(Some(self.with_pruned(message, graph, root_url, pruned)))
    }

    /// Append one prune instruction per `pruned` URL to a hot reload.
    ///
    /// A pruned resource that declines hot reload turns the whole message
    /// into a full reload. Full reloads are returned unchanged.
    pub fn with_pruned(
        &self,
        message: ReloadMessage,
        graph: &ResourceGraph,
        root_url: &str,
        pruned: &[String],
    ) -> ReloadMessage {
        let (cause, mut updates) = match message {
            ReloadMessage::HotReload { cause, updates } => (cause, updates),
            full_reload => return full_reload,
        };

        let declining = pruned.iter().find(|url| {
            graph
                .get(url)
                .map(|node| node.declines_hot_update())
                .unwrap_or(false)
        });
        if let Some(url) = declining {
            let outcome = Propagation::declined(DeclineReason::PrunedDeclines, url.as_str());
            return self.build_message(cause, &outcome, graph);
        }

        let accepted_by = self.relative_url(root_url).to_owned();
        updates.extend(pruned.iter().map(|url| UpdateInstruction {
            kind: PRUNE_KIND.to_string(),
            boundary: self.relative_url(url).to_owned(),
            accepted_by: accepted_by.clone(),
        }));

        ReloadMessage::HotReload { cause, updates }
    }
}
