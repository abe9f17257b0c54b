//! Hot Reload Configuration
//!
//! Loaded from the `hotReload` section of the dev server config, in JSON.
//!
//! ```json
//! {
//!     "rootUrl": "http://localhost:3456/",
//!     "wireFormat": "msgpack",
//!     "channelCapacity": 128,
//!     "pruneNotifications": true
//! }
//! ```
//!
//! Every field is optional.

use serde::Deserialize;

use crate::error::ConfigError;

/// Encoding used for messages sent to clients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireFormat {
    /// JSON text frames.
    #[default]
    Json,

    /// MessagePack binary frames.
    MsgPack,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HotReloadConfig {
    /// Outgoing URLs are made relative to this one.
    pub root_url: String,

    pub wire_format: WireFormat,

    /// Messages buffered per client before the oldest are dropped.
    pub channel_capacity: usize,

    /// Whether dependencies dropped by a re-parse produce a reload message.
    pub prune_notifications: bool,
}

impl Default for HotReloadConfig {
    fn default() -> Self {
        Self {
            root_url: "http://localhost/".to_string(),
            wire_format: WireFormat::Json,
            channel_capacity: 64,
            prune_notifications: true,
        }
    }
}

impl HotReloadConfig {
    /// Config with the given root and defaults for everything else.
    pub fn with_root_url(root_url: impl Into<String>) -> Self {
        Self {
            root_url: root_url.into(),
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.root_url.is_empty() || !self.root_url.ends_with('/') {
            return Err(ConfigError::InvalidRootUrl(self.root_url.clone()));
        }
        if self.channel_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = HotReloadConfig::from_json("{}").unwrap();
        assert_eq!(config, HotReloadConfig::default());
    }

    #[test]
    fn parses_all_fields() {
        let config = HotReloadConfig::from_json(
            r#"{
                "rootUrl": "http://localhost:3456/",
                "wireFormat": "msgpack",
                "channelCapacity": 8,
                "pruneNotifications": false
            }"#,
        )
        .unwrap();

        assert_eq!(config.root_url, "http://localhost:3456/");
        assert_eq!(config.wire_format, WireFormat::MsgPack);
        assert_eq!(config.channel_capacity, 8);
        assert!(!config.prune_notifications);
    }

    #[test]
    fn rejects_root_without_trailing_slash() {
        let err = HotReloadConfig::from_json(r#"{ "rootUrl": "http://localhost:3456" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRootUrl(_)));
    }

    #[test]
    fn rejects_zero_capacity() {
        let err = HotReloadConfig::from_json(r#"{ "channelCapacity": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroCapacity));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = HotReloadConfig::from_json("{ rootUrl").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
