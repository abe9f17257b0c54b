//! Client Transport
//!
//! Pushes reload messages to browsers over websockets.
//!
//! [`Broadcaster`] is a [`ReloadSink`](crate::reload::ReloadSink) that fans
//! each message out on a bounded `tokio` broadcast channel; [`serve`] accepts
//! websocket clients and forwards the channel to each of them.

mod broadcast;
mod websocket;

pub use broadcast::Broadcaster;
pub use websocket::{encode, serve};
