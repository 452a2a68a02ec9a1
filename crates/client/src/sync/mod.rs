// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Realtime connection to the game server.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────┐  commands  ┌──────────────┐     ┌──────────┐
//! │ ConnectionManager │───────────►│  Connection  │────►│  Server  │
//! │     (handle)      │◄───────────│     task     │◄────│          │
//! └───────────────────┘   events   └──────┬───────┘     └──────────┘
//!                                         │ decoded messages
//!                                         ▼
//!                                  ┌──────────────┐
//!                                  │  Dispatcher  │──► listeners
//!                                  └──────────────┘
//! ```
//!
//! # Features
//!
//! - At most one live connection, owned by a single task
//! - Fixed-delay reconnect after any close or error
//! - Resume handshake against the stored session on every open
//! - Listener fan-out isolated from listener failures
//! - Injectable transport trait for testing

mod dispatch;
mod manager;
mod transport;

pub use dispatch::{DispatchReport, Dispatcher, ListenerError, ListenerResult, Subscription};
pub use manager::{
    ConnectionConfig, ConnectionEvent, ConnectionManager, ConnectionState, SharedConnectionState,
    DEFAULT_RETRY_DELAY, DEFAULT_WS_URL,
};
pub use transport::{BoxFuture, Transport, TransportError, TransportResult, WebSocketTransport};

#[cfg(test)]
mod dispatch_tests;
