//! Websocket server for reload messages.
//!
//! Clients only listen. Anything they send is read and dropped, except close
//! frames, which end the connection.

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio_tungstenite::tungstenite::Message;

use super::broadcast::Broadcaster;
use crate::config::WireFormat;
use crate::error::TransportError;
use crate::reload::ReloadMessage;

/// Encode a reload message as a websocket frame.
pub fn encode(message: &ReloadMessage, format: WireFormat) -> Result<Message, TransportError> {
    Ok(match format {
        WireFormat::Json => Message::Text(message.to_json()?),
        WireFormat::MsgPack => Message::Binary(message.to_msgpack()?),
    })
}

/// Accept websocket clients on `listener` until it fails, forwarding every
/// message sent through `broadcaster` to each of them.
pub async fn serve(
    listener: TcpListener,
    broadcaster: Broadcaster,
    format: WireFormat,
) -> Result<(), TransportError> {
    loop {
        let (stream, peer) = listener.accept().await?;
        // Subscribe before the handshake so nothing sent after the client
        // sees the upgrade response is missed.
        let receiver = broadcaster.subscribe();
        tracing::debug!(%peer, "reload client connecting");

        tokio::spawn(async move {
            if let Err(err) = handle_client(stream, receiver, format).await {
                tracing::debug!(%peer, %err, "reload client disconnected with error");
            }
        });
    }
}

async fn handle_client(
    stream: TcpStream,
    mut receiver: broadcast::Receiver<Arc<ReloadMessage>>,
    format: WireFormat,
) -> Result<(), TransportError> {
    let socket = tokio_tungstenite::accept_async(stream).await?;
    let (mut sink, mut incoming) = socket.split();

    loop {
        tokio::select! {
            received = receiver.recv() => match received {
                Ok(message) => sink.send(encode(&message, format)?).await?,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "reload client lagging, messages dropped");
                }
                Err(RecvError::Closed) => break,
            },
            frame = incoming.next() => match frame {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(err)) => return Err(err.into()),
            },
        }
    }

    let _ = sink.close().await;
    Ok(())
}
