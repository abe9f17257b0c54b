//! Reload Messages
//!
//! The wire shape sent to browser clients. Serialized with an inline `type`
//! tag:
//!
//! ```json
//! { "type": "full_reload", "cause": "main.js modified", "reason": "circular dependency", "declinedBy": "main.js" }
//! { "type": "hot_reload", "cause": "main.css modified", "updates": [{ "type": "css", "boundary": "main.css", "acceptedBy": "main.css" }] }
//! ```

use serde::{Deserialize, Serialize};

/// One resource the client re-applies in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateInstruction {
    /// Resource kind of the boundary, or `prune` for a dropped dependency.
    #[serde(rename = "type")]
    pub kind: String,

    pub boundary: String,

    #[serde(rename = "acceptedBy")]
    pub accepted_by: String,
}

/// Instruction broadcast to connected clients after a change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReloadMessage {
    FullReload {
        cause: String,
        reason: String,
        #[serde(rename = "declinedBy", default, skip_serializing_if = "Option::is_none")]
        declined_by: Option<String>,
    },
    HotReload {
        cause: String,
        updates: Vec<UpdateInstruction>,
    },
}

impl ReloadMessage {
    /// The `type` tag as it appears on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            ReloadMessage::FullReload { .. } => "full_reload",
            ReloadMessage::HotReload { .. } => "hot_reload",
        }
    }

    pub fn cause(&self) -> &str {
        match self {
            ReloadMessage::FullReload { cause, .. } | ReloadMessage::HotReload { cause, .. } => cause,
        }
    }

    pub fn is_full_reload(&self) -> bool {
        matches!(self, ReloadMessage::FullReload { .. })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// MessagePack with field names kept, so the tag survives.
    pub fn to_msgpack(&self) -> Result<Vec<u8>, rmp_serde::encode::Error> {
        rmp_serde::to_vec_named(self)
    }
}
