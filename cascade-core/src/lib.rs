//! Cascade Core
//!
//! This crate provides the hot-reload core of the Cascade dev server.
//! It implements:
//!
//! - A dependency graph of every served resource
//! - Propagation of file changes to the resources that can absorb them
//! - Reload messages and their delivery to browser clients
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `graph`: Resource registry, edge reconciliation and update propagation
//! - `reload`: Reload messages, the prune notifier and subscribers
//! - `hot`: The coordinator wiring file events and re-parses to the graph
//! - `transport`: Websocket broadcasting of reload messages
//!
//! # Example
//!
//! ```rust
//! use cascade_core::config::HotReloadConfig;
//! use cascade_core::graph::ResourceUpdate;
//! use cascade_core::hot::{FileEvent, HotReloader};
//!
//! # fn main() -> Result<(), cascade_core::ConfigError> {
//! let reloader = HotReloader::new(HotReloadConfig::with_root_url("http://localhost/"))?;
//!
//! // The request handler parsed index.html and app.js.
//! reloader.cook(
//!     "http://localhost/index.html",
//!     ResourceUpdate::new().kind("html").dependencies(["http://localhost/app.js"]),
//! );
//! reloader.cook(
//!     "http://localhost/app.js",
//!     ResourceUpdate::new().kind("js_module").self_accepts_update(true),
//! );
//!
//! // The watcher saw app.js change.
//! let message = reloader
//!     .on_file_event(&FileEvent::modified("http://localhost/app.js"))
//!     .unwrap();
//! assert_eq!(message.kind(), "hot_reload");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod cook;
pub mod error;
pub mod graph;
pub mod hot;
pub mod reload;
pub mod transport;

pub use config::HotReloadConfig;
pub use error::{ConfigError, GraphError, TransportError};
pub use graph::{Propagation, ResourceGraph, ResourceUpdate, SharedGraph};
pub use hot::{FileEvent, FileEventKind, HotReloader};
pub use reload::ReloadMessage;
