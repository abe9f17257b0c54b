//! Resource Updates
//!
//! A [`ResourceUpdate`] is what the parsing layer hands to the graph after a
//! resource has been fetched and transformed. Every field is optional: a
//! missing field leaves the node's current value untouched.

use serde::Deserialize;

/// Partial update of a resource node, applied by
/// [`ResourceGraph::reconcile`](super::ResourceGraph::reconcile).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceUpdate {
    /// New resource kind.
    #[serde(rename = "type")]
    pub kind: Option<String>,

    /// Complete list of URLs the resource now references.
    pub dependency_urls: Option<Vec<String>>,

    pub declines_hot_update: Option<bool>,

    pub self_accepts_update: Option<bool>,

    pub accepted_dependency_urls: Option<Vec<String>>,
}

impl ResourceUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn dependencies<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependency_urls = Some(urls.into_iter().map(Into::into).collect());
        self
    }

    pub fn declines_hot_update(mut self, value: bool) -> Self {
        self.declines_hot_update = Some(value);
        self
    }

    pub fn self_accepts_update(mut self, value: bool) -> Self {
        self.self_accepts_update = Some(value);
        self
    }

    pub fn accepts_dependencies<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.accepted_dependency_urls = Some(urls.into_iter().map(Into::into).collect());
        self
    }

    /// Parse an update from the JSON shape emitted by parser plugins.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
