//! Re-parse ordering.
//!
//! Fetching and transforming a resource is async, so two re-parses of the
//! same URL can finish out of order. Each re-parse takes a [`CookTicket`]
//! when it starts; a ticket older than one already applied for the same URL
//! is stale and must not reach the graph.

use dashmap::DashMap;

/// Proof that a re-parse of `url` was started, and when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookTicket {
    url: String,
    generation: u64,
}

impl CookTicket {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Per-URL ticket counters.
#[derive(Debug, Default)]
pub struct CookSequencer {
    issued: DashMap<String, u64>,
    applied: DashMap<String, u64>,
}

impl CookSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a re-parse of `url`.
    pub fn begin(&self, url: &str) -> CookTicket {
        let mut issued = self.issued.entry(url.to_owned()).or_insert(0);
        *issued += 1;
        CookTicket {
            url: url.to_owned(),
            generation: *issued,
        }
    }

    /// Mark `ticket` as applied. Returns `false` if a newer ticket for the
    /// same URL was already applied, in which case the caller drops its
    /// result.
    pub fn try_apply(&self, ticket: &CookTicket) -> bool {
        let mut applied = self.applied.entry(ticket.url.clone()).or_insert(0);
        if ticket.generation <= *applied {
            tracing::warn!(
                url = %ticket.url,
                generation = ticket.generation,
                applied = *applied,
                "discarding stale re-parse"
            );
            return false;
        }
        *applied = ticket.generation;
        true
    }

    /// Drop the counters for `url` once its resource leaves the graph.
    ///
    /// Tickets issued before this call still apply afterwards, since the
    /// URL starts again from a clean slate.
    pub fn forget(&self, url: &str) {
        self.issued.remove(url);
        self.applied.remove(url);
    }

    /// Number of URLs with live counters.
    pub fn tracked(&self) -> usize {
        self.issued.len().max(self.applied.len())
    }
}
