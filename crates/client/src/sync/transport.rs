// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The socket underneath the connection manager.
//!
//! Inbound frames are handed up as raw text. Decoding belongs to the
//! dispatcher so that one malformed frame never tears down the connection.

use std::future::Future;
use std::pin::Pin;

use fl_core::ClientMessage;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

/// Error type for transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// An operation needed an open connection and there was none.
    #[error("connection closed")]
    ConnectionClosed,

    #[error("send failed: {0}")]
    SendFailed(String),

    #[error("receive failed: {0}")]
    ReceiveFailed(String),

    /// An outbound message could not be encoded.
    #[error("encode error: {0}")]
    Encode(String),
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Boxed future returned by [`Transport`] methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// One client-side socket to the game server.
///
/// A transport holds at most one connection; calling `connect` while one is
/// open is a caller bug. The connection manager is the only caller.
pub trait Transport: Send + Sync {
    fn connect(&mut self, url: &str) -> BoxFuture<'_, TransportResult<()>>;

    /// Closes the connection, if any.
    fn disconnect(&mut self) -> BoxFuture<'_, TransportResult<()>>;

    fn send(&mut self, msg: ClientMessage) -> BoxFuture<'_, TransportResult<()>>;

    /// Waits for the next text frame.
    ///
    /// Yields `None` once the server closes the connection. Must be cancel
    /// safe: dropping the future may not lose a frame.
    fn recv(&mut self) -> BoxFuture<'_, TransportResult<Option<String>>>;

    fn is_connected(&self) -> bool;
}

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Write and read halves of an open socket.
struct Halves {
    writer: SplitSink<Socket, Message>,
    reader: SplitStream<Socket>,
}

/// [`Transport`] over tokio-tungstenite.
#[derive(Default)]
pub struct WebSocketTransport {
    open: Option<Halves>,
}

impl WebSocketTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets a connection that failed mid-operation.
    fn drop_broken(&mut self) {
        self.open = None;
    }
}

impl Transport for WebSocketTransport {
    fn connect(&mut self, url: &str) -> BoxFuture<'_, TransportResult<()>> {
        let url = url.to_string();
        Box::pin(async move {
            let (socket, _response) = tokio_tungstenite::connect_async(url.as_str())
                .await
                .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;
            let (writer, reader) = socket.split();
            self.open = Some(Halves { writer, reader });
            Ok(())
        })
    }

    fn disconnect(&mut self) -> BoxFuture<'_, TransportResult<()>> {
        Box::pin(async move {
            let Some(mut halves) = self.open.take() else {
                return Ok(());
            };
            halves
                .writer
                .close()
                .await
                .map_err(|e| TransportError::SendFailed(e.to_string()))
        })
    }

    fn send(&mut self, msg: ClientMessage) -> BoxFuture<'_, TransportResult<()>> {
        Box::pin(async move {
            let json = msg.to_json().map_err(|e| TransportError::Encode(e.to_string()))?;
            let halves = self.open.as_mut().ok_or(TransportError::ConnectionClosed)?;

            // `send` flushes, so a dead peer surfaces here rather than on the next frame
            let sent = halves.writer.send(Message::Text(json.into())).await;
            sent.map_err(|e| {
                self.drop_broken();
                TransportError::SendFailed(e.to_string())
            })
        })
    }

    fn recv(&mut self) -> BoxFuture<'_, TransportResult<Option<String>>> {
        Box::pin(async move {
            let halves = self.open.as_mut().ok_or(TransportError::ConnectionClosed)?;
            let outcome = loop {
                match halves.reader.next().await {
                    Some(Ok(Message::Text(text))) => return Ok(Some(text.to_string())),
                    Some(Ok(Message::Close(_))) | None => break Ok(None),
                    // Pings are answered inside tungstenite; binary is not part of the protocol
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => break Err(TransportError::ReceiveFailed(e.to_string())),
                }
            };
            self.drop_broken();
            outcome
        })
    }

    fn is_connected(&self) -> bool {
        self.open.is_some()
    }
}
