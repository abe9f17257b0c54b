//! Reload Notifications
//!
//! This module turns propagation outcomes into messages for browser clients
//! and hands them to whoever is listening.
//!
//! # Flow
//!
//! 1. [`ReloadEmitter`] builds a [`ReloadMessage`] from a propagation
//!    outcome, or from a batch of pruned URLs.
//! 2. [`SubscriberList`] delivers it to every registered [`ReloadSink`].
//!
//! Delivery is at-most-once. A client that misses a message keeps stale
//! code until the next change or a manual refresh, nothing worse.

mod emitter;
mod message;
mod prune;
mod subscriber;

pub use emitter::ReloadEmitter;
pub use message::{ReloadMessage, UpdateInstruction};
pub use prune::PRUNE_KIND;
pub use subscriber::{ReloadSink, ReloadSubscriber, SubscriberId, SubscriberList};
