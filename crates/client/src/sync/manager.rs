// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connection lifecycle for the realtime session.
//!
//! A single background task owns the transport. The [`ConnectionManager`]
//! handle talks to it over a command channel, so there is never more than
//! one live connection and nothing outside the task touches the socket.
//!
//! ```text
//!   connecting ──open──► connected ──close/error──► disconnected
//!       ▲                                              │
//!       └──────── reconnecting ◄──── retry delay ──────┘
//! ```
//!
//! After every successful open the task checks the session store and either
//! asks the server to resume the stored match or discards an expired record.

use std::fmt;
use std::sync::atomic::{AtomicU32, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use fl_core::{ClientMessage, ServerMessage, RESUME_WINDOW};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::dispatch::{Dispatcher, ListenerResult, Subscription};
use super::transport::{Transport, TransportResult};
use crate::store::SessionStore;

/// Delay between a lost connection and the next attempt.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Default WebSocket endpoint.
pub const DEFAULT_WS_URL: &str = "ws://localhost:8080/ws";

/// Lifecycle state of the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    Connecting,
    Connected,
    Reconnecting,
    Disconnected,
}

impl ConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Reconnecting => "reconnecting",
            ConnectionState::Disconnected => "disconnected",
        }
    }

    fn to_u8(self) -> u8 {
        match self {
            ConnectionState::Connecting => 0,
            ConnectionState::Connected => 1,
            ConnectionState::Reconnecting => 2,
            ConnectionState::Disconnected => 3,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => ConnectionState::Connecting,
            1 => ConnectionState::Connected,
            2 => ConnectionState::Reconnecting,
            _ => ConnectionState::Disconnected,
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connection state visible to both the background task and the handle.
///
/// Uses atomic fields for lock-free reads.
#[derive(Debug)]
pub struct SharedConnectionState {
    state: AtomicU8,
    /// Failed attempts since the last successful open.
    attempt: AtomicU32,
}

impl SharedConnectionState {
    pub fn new(initial: ConnectionState) -> Self {
        Self {
            state: AtomicU8::new(initial.to_u8()),
            attempt: AtomicU32::new(0),
        }
    }

    pub fn get(&self) -> ConnectionState {
        ConnectionState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Stores `state` and returns the previous one.
    pub fn swap(&self, state: ConnectionState) -> ConnectionState {
        ConnectionState::from_u8(self.state.swap(state.to_u8(), Ordering::AcqRel))
    }

    pub fn attempt(&self) -> u32 {
        self.attempt.load(Ordering::Acquire)
    }

    fn record_failure(&self) -> u32 {
        self.attempt.fetch_add(1, Ordering::AcqRel) + 1
    }

    fn reset_attempts(&self) {
        self.attempt.store(0, Ordering::Release);
    }

    pub fn is_connected(&self) -> bool {
        self.get() == ConnectionState::Connected
    }
}

/// Events sent from the connection task to the owner of the handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// The lifecycle state changed.
    StateChanged(ConnectionState),
    /// A stored session was found inside the resume window and a resume
    /// request was sent.
    ResumeRequested { player_id: String, game_id: String },
    /// A stored session was older than the resume window and was cleared.
    SessionExpired { game_id: String },
    /// The post-open handshake finished. `resuming` is true when a resume
    /// request is outstanding.
    Ready { resuming: bool },
}

/// Configuration for the connection manager.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// URL to connect to.
    pub url: String,
    /// Fixed delay before reconnecting after a lost connection.
    pub retry_delay: Duration,
    /// Maximum age of a stored session that may still be resumed.
    pub resume_window: Duration,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_WS_URL.to_string(),
            retry_delay: DEFAULT_RETRY_DELAY,
            resume_window: RESUME_WINDOW,
        }
    }
}

#[derive(Debug)]
enum Command {
    Connect,
    Send(ClientMessage),
    Disconnect,
}

/// Handle to the background connection task.
///
/// Dropping the handle cancels the task; [`ConnectionManager::shutdown`]
/// additionally waits for the socket to be closed.
pub struct ConnectionManager {
    commands: mpsc::UnboundedSender<Command>,
    shared_state: Arc<SharedConnectionState>,
    dispatcher: Dispatcher,
    cancel_token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl ConnectionManager {
    /// Spawns the connection task and starts connecting immediately.
    ///
    /// Must be called from within a tokio runtime. The returned receiver
    /// yields every [`ConnectionEvent`], starting with the initial
    /// `StateChanged(Connecting)`.
    pub fn start<T>(
        config: ConnectionConfig,
        transport: T,
        sessions: Arc<SessionStore>,
        dispatcher: Dispatcher,
    ) -> (Self, mpsc::UnboundedReceiver<ConnectionEvent>)
    where
        T: Transport + 'static,
    {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let shared_state = Arc::new(SharedConnectionState::new(ConnectionState::Connecting));
        let cancel_token = CancellationToken::new();

        let _ = event_tx.send(ConnectionEvent::StateChanged(ConnectionState::Connecting));

        let worker = Worker {
            config,
            transport,
            sessions,
            dispatcher: dispatcher.clone(),
            shared_state: Arc::clone(&shared_state),
            events: event_tx,
            commands: command_rx,
            cancel_token: cancel_token.clone(),
        };
        let task = tokio::spawn(worker.run());

        let manager = ConnectionManager {
            commands: command_tx,
            shared_state,
            dispatcher,
            cancel_token,
            task: Some(task),
        };
        (manager, event_rx)
    }

    pub fn state(&self) -> ConnectionState {
        self.shared_state.get()
    }

    pub fn is_connected(&self) -> bool {
        self.shared_state.is_connected()
    }

    /// Failed connection attempts since the last successful open.
    pub fn attempt(&self) -> u32 {
        self.shared_state.attempt()
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Registers a listener for decoded server messages.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&ServerMessage) -> ListenerResult + Send + Sync + 'static,
    {
        self.dispatcher.subscribe(listener)
    }

    /// Opens a connection unless one is open or being opened.
    ///
    /// While waiting out a retry delay this skips the remaining delay.
    pub fn connect(&self) {
        self.command(Command::Connect);
    }

    /// Sends `msg` if the connection is open, otherwise logs and drops it.
    pub fn send(&self, msg: ClientMessage) {
        self.command(Command::Send(msg));
    }

    /// Closes the connection and cancels any pending retry. The task stays
    /// idle until the next [`ConnectionManager::connect`].
    pub fn disconnect(&self) {
        self.command(Command::Disconnect);
    }

    /// Stops the task, closing any open connection, and waits for it.
    pub async fn shutdown(mut self) {
        self.cancel_token.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(error = %e, "connection task ended abnormally");
            }
        }
    }

    fn command(&self, cmd: Command) {
        if self.commands.send(cmd).is_err() {
            warn!("connection task has stopped; command ignored");
        }
    }
}

impl Drop for ConnectionManager {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}

impl fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("state", &self.state())
            .field("dispatcher", &self.dispatcher)
            .finish()
    }
}

/// What the task does next.
enum Step {
    Connect,
    Retry,
    Idle,
    Stop,
}

enum Opening {
    Done(TransportResult<()>),
    Abort,
    Stop,
}

struct Worker<T> {
    config: ConnectionConfig,
    transport: T,
    sessions: Arc<SessionStore>,
    dispatcher: Dispatcher,
    shared_state: Arc<SharedConnectionState>,
    events: mpsc::UnboundedSender<ConnectionEvent>,
    commands: mpsc::UnboundedReceiver<Command>,
    cancel_token: CancellationToken,
}

impl<T: Transport> Worker<T> {
    async fn run(mut self) {
        let mut step = Step::Connect;
        loop {
            step = match step {
                Step::Connect => self.open().await,
                Step::Retry => self.wait_for_retry().await,
                Step::Idle => self.idle().await,
                Step::Stop => break,
            };
        }
        self.close_transport().await;
        self.set_state(ConnectionState::Disconnected);
        debug!("connection task stopped");
    }

    async fn open(&mut self) -> Step {
        self.set_state(ConnectionState::Connecting);
        info!(url = %self.config.url, "opening connection");

        let outcome = {
            let mut connecting = self.transport.connect(&self.config.url);
            loop {
                tokio::select! {
                    _ = self.cancel_token.cancelled() => break Opening::Stop,
                    result = &mut connecting => break Opening::Done(result),
                    cmd = self.commands.recv() => match cmd {
                        Some(Command::Connect) => debug!("connect already in progress"),
                        Some(Command::Send(msg)) => drop_unsent(&msg),
                        Some(Command::Disconnect) => break Opening::Abort,
                        None => break Opening::Stop,
                    },
                }
            }
        };

        match outcome {
            Opening::Done(Ok(())) => {
                self.shared_state.reset_attempts();
                self.set_state(ConnectionState::Connected);
                self.resume_session().await;
                self.pump().await
            }
            Opening::Done(Err(e)) => {
                let attempt = self.shared_state.record_failure();
                warn!(attempt, error = %e, "connection attempt failed");
                Step::Retry
            }
            Opening::Abort => {
                info!("connection attempt cancelled");
                self.close_transport().await;
                Step::Idle
            }
            Opening::Stop => Step::Stop,
        }
    }

    /// Resumes or discards the stored session on a fresh connection.
    async fn resume_session(&mut self) {
        let Some(session) = self.sessions.load() else {
            debug!("no stored session");
            self.emit(ConnectionEvent::Ready { resuming: false });
            return;
        };

        let now = self.sessions.now_ms();
        let elapsed_ms = session.elapsed_ms(now);
        if !session.is_resumable(now, self.config.resume_window) {
            info!(game_id = %session.game_id, elapsed_ms, "stored session expired");
            if let Err(e) = self.sessions.clear() {
                warn!(error = %e, "failed to clear expired session");
            }
            self.emit(ConnectionEvent::SessionExpired {
                game_id: session.game_id,
            });
            self.emit(ConnectionEvent::Ready { resuming: false });
            return;
        }

        info!(game_id = %session.game_id, elapsed_ms, "requesting resume of stored session");
        let request = ClientMessage::reconnect(session.player_id.clone());
        if let Err(e) = self.transport.send(request).await {
            // The pump sees the broken connection and schedules a retry
            warn!(error = %e, "failed to send resume request");
            return;
        }
        self.emit(ConnectionEvent::ResumeRequested {
            player_id: session.player_id,
            game_id: session.game_id,
        });
        self.emit(ConnectionEvent::Ready { resuming: true });
    }

    /// Runs the open connection until it closes or is closed.
    async fn pump(&mut self) -> Step {
        loop {
            tokio::select! {
                _ = self.cancel_token.cancelled() => return Step::Stop,
                frame = self.transport.recv() => match frame {
                    Ok(Some(text)) => {
                        if let Some(msg) = Dispatcher::decode(&text) {
                            debug!(kind = msg.kind(), "server message");
                            self.dispatcher.dispatch(&msg);
                        }
                    }
                    Ok(None) => {
                        info!("connection closed by server");
                        return Step::Retry;
                    }
                    Err(e) => {
                        warn!(error = %e, "connection lost");
                        return Step::Retry;
                    }
                },
                cmd = self.commands.recv() => match cmd {
                    Some(Command::Connect) => debug!("already connected"),
                    Some(Command::Send(msg)) => {
                        let kind = msg.kind();
                        match self.transport.send(msg).await {
                            Ok(()) => debug!(kind, "sent"),
                            Err(e) => warn!(kind, error = %e, "send failed; message dropped"),
                        }
                    }
                    Some(Command::Disconnect) => {
                        info!("closing connection");
                        self.close_transport().await;
                        return Step::Idle;
                    }
                    None => return Step::Stop,
                },
            }
        }
    }

    async fn wait_for_retry(&mut self) -> Step {
        self.close_transport().await;
        self.set_state(ConnectionState::Disconnected);

        let delay = self.config.retry_delay;
        debug!(delay_ms = delay.as_millis() as u64, "reconnect scheduled");
        let retry = tokio::time::sleep(delay);
        tokio::pin!(retry);

        loop {
            tokio::select! {
                _ = self.cancel_token.cancelled() => return Step::Stop,
                _ = &mut retry => {
                    self.set_state(ConnectionState::Reconnecting);
                    return Step::Connect;
                }
                cmd = self.commands.recv() => match cmd {
                    Some(Command::Connect) => {
                        debug!("reconnecting early on request");
                        return Step::Connect;
                    }
                    Some(Command::Send(msg)) => drop_unsent(&msg),
                    Some(Command::Disconnect) => {
                        info!("pending reconnect cancelled");
                        return Step::Idle;
                    }
                    None => return Step::Stop,
                },
            }
        }
    }

    async fn idle(&mut self) -> Step {
        self.set_state(ConnectionState::Disconnected);
        loop {
            tokio::select! {
                _ = self.cancel_token.cancelled() => return Step::Stop,
                cmd = self.commands.recv() => match cmd {
                    Some(Command::Connect) => return Step::Connect,
                    Some(Command::Send(msg)) => drop_unsent(&msg),
                    Some(Command::Disconnect) => debug!("already disconnected"),
                    None => return Step::Stop,
                },
            }
        }
    }

    async fn close_transport(&mut self) {
        if self.transport.is_connected() {
            if let Err(e) = self.transport.disconnect().await {
                debug!(error = %e, "error while closing connection");
            }
        }
    }

    fn set_state(&self, state: ConnectionState) {
        let previous = self.shared_state.swap(state);
        if previous != state {
            info!(from = %previous, to = %state, "connection state changed");
            self.emit(ConnectionEvent::StateChanged(state));
        }
    }

    fn emit(&self, event: ConnectionEvent) {
        // The owner may have stopped listening; the task keeps running regardless
        let _ = self.events.send(event);
    }
}

fn drop_unsent(msg: &ClientMessage) {
    warn!(kind = msg.kind(), "not connected; message dropped");
}
