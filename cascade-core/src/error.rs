//! Error types.
//!
//! Graph mutation never fails and a declined propagation is a regular
//! outcome, so the graph only has one error: asking about a URL it has
//! never seen.

use thiserror::Error;

/// Errors raised by graph queries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// The URL has never been registered. Callers treat this as "nothing to
    /// notify".
    #[error("unknown resource: {url}")]
    UnknownResource { url: String },
}

/// Errors raised while loading a [`HotReloadConfig`](crate::config::HotReloadConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("root url must be non-empty and end with '/', got {0:?}")]
    InvalidRootUrl(String),

    #[error("channel capacity must be greater than zero")]
    ZeroCapacity,
}

/// Errors raised by the websocket transport.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("failed to encode message as json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to encode message as msgpack: {0}")]
    MsgPack(#[from] rmp_serde::encode::Error),
}
