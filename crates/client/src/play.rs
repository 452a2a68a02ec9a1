// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Interactive match loop.
//!
//! Reads commands from stdin, prints the board to stdout after every change
//! and keeps the opponent's reconnect countdown ticking once per second.

use std::fmt::Write as _;
use std::path::Path;
use std::sync::{Arc, MutexGuard};
use std::time::Duration;

use fl_core::{ClientMessage, Column, LastMove, PlayerInfo, PlayerSymbol};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::Result;
use crate::game::{Change, MatchState, Reconciler, SharedReconciler};
use crate::store::SessionStore;
use crate::sync::{
    ConnectionEvent, ConnectionManager, ConnectionState, Dispatcher, WebSocketTransport,
};

pub const HELP: &str =
    "commands: join <name> | 1-7 drop a piece | retry | lobby | cancel | help | quit";

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Join(String),
    Move(Column),
    Retry,
    Lobby,
    Cancel,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

pub fn parse_input(line: &str) -> Input {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    match word.to_ascii_lowercase().as_str() {
        "" => Input::Empty,
        "join" if !rest.is_empty() => Input::Join(rest.to_string()),
        "retry" | "r" => Input::Retry,
        "lobby" => Input::Lobby,
        "cancel" => Input::Cancel,
        "help" | "?" => Input::Help,
        "quit" | "exit" | "q" => Input::Quit,
        other => match other.parse::<u8>() {
            Ok(n @ 1..=7) => Column::try_from(n - 1)
                .map(Input::Move)
                .unwrap_or_else(|_| Input::Unknown(line.to_string())),
            _ => Input::Unknown(line.to_string()),
        },
    }
}

fn marker(symbol: PlayerSymbol) -> char {
    match symbol {
        PlayerSymbol::One => 'X',
        PlayerSymbol::Two => 'O',
    }
}

fn seat(player: &PlayerInfo) -> String {
    format!("{} ({})", player.username, marker(player.symbol))
}

/// Renders the board with turn, presence and result lines.
pub fn render_match(state: &MatchState, last_move: Option<LastMove>, countdown: u32) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} vs {}, move {}", seat(&state.you), seat(&state.opponent), state.move_number);
    let _ = writeln!(out, "{}", state.grid);
    if let Some(last) = last_move {
        let _ = writeln!(out, "last move: {} in column {}", marker(last.player), last.column + 1);
    }
    if !state.opponent.is_online && countdown > 0 {
        let _ = writeln!(out, "{} is offline, {}s left to reconnect", state.opponent.username, countdown);
    }
    match state.outcome() {
        Some(outcome) => {
            let _ = write!(out, "{outcome} Type 'lobby' to play again.");
        }
        None if state.your_turn => {
            let _ = write!(out, "Your turn. Enter a column 1-7.");
        }
        None => {
            let _ = write!(out, "Waiting for {}.", state.opponent.username);
        }
    }
    out
}

enum Flow {
    Continue,
    Quit,
}

struct Console {
    reconciler: SharedReconciler,
    /// Username to queue with once a connection is ready.
    pending_join: Option<String>,
    /// Last state reported by the connection task.
    connection: ConnectionState,
    /// A resume request is out and the server has not answered it yet.
    awaiting_resume: bool,
}

impl Console {
    fn new(reconciler: SharedReconciler, pending_join: Option<String>) -> Self {
        Console {
            reconciler,
            pending_join,
            connection: ConnectionState::Connecting,
            awaiting_resume: false,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Reconciler> {
        self.reconciler.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Handles one connection event and returns a message to send, if any.
    fn on_event(&mut self, event: ConnectionEvent) -> Option<ClientMessage> {
        match event {
            ConnectionEvent::StateChanged(state) => {
                self.on_state(state);
                None
            }
            ConnectionEvent::ResumeRequested { game_id, .. } => {
                println!("Resuming match {game_id}...");
                None
            }
            ConnectionEvent::SessionExpired { .. } => {
                println!("Your previous match can no longer be resumed.");
                None
            }
            ConnectionEvent::Ready { resuming } => {
                self.awaiting_resume = resuming;
                if resuming {
                    None
                } else {
                    self.flush_pending_join()
                }
            }
        }
    }

    fn on_state(&mut self, state: ConnectionState) {
        let previous = std::mem::replace(&mut self.connection, state);
        println!("[{state}]");
        if state != ConnectionState::Disconnected {
            return;
        }
        self.awaiting_resume = false;
        // Failed retries also pass through Disconnected; only the loss of a
        // live connection starts the resume window
        if previous == ConnectionState::Connected {
            if self.lock().mark_disconnected() {
                info!("match interrupted; resume window started");
            }
            println!("Connection lost. Retrying automatically, or type 'retry'.");
        }
    }

    fn on_change(&mut self, change: Change) -> Option<ClientMessage> {
        let reconciler = self.lock();
        match change {
            Change::Ignored => {}
            Change::ErrorShown(text) => {
                println!("error: {text}");
                drop(reconciler);
                if std::mem::take(&mut self.awaiting_resume) {
                    debug!("resume refused; falling back to a pending join");
                    return self.flush_pending_join();
                }
            }
            Change::PresenceChanged => {
                if let Some(state) = reconciler.current() {
                    if state.opponent.is_online {
                        println!("{} is back online.", state.opponent.username);
                    } else {
                        println!(
                            "{} disconnected, {}s left to reconnect.",
                            state.opponent.username,
                            reconciler.opponent_countdown()
                        );
                    }
                }
            }
            Change::MatchStarted
            | Change::BoardUpdated
            | Change::MatchFinished
            | Change::MatchResumed => {
                if let Some(state) = reconciler.current() {
                    println!(
                        "{}",
                        render_match(state, reconciler.last_move(), reconciler.opponent_countdown())
                    );
                }
                drop(reconciler);
                if change == Change::MatchResumed {
                    self.awaiting_resume = false;
                }
            }
        }
        None
    }

    fn on_input(&mut self, input: Input, manager: &ConnectionManager) -> Flow {
        match input {
            Input::Join(name) => {
                if let Some(msg) = self.join(&name) {
                    manager.send(msg);
                }
            }
            Input::Move(column) => {
                let intent = self.lock().move_intent(column);
                match intent {
                    Some(msg) => manager.send(msg),
                    None => println!("You can't move right now."),
                }
            }
            Input::Retry => {
                println!("Reconnecting...");
                manager.connect();
            }
            Input::Lobby => {
                self.lock().return_to_lobby();
                println!("Back in the lobby. Type 'join <name>' to find a match.");
            }
            Input::Cancel => {
                self.lock().cancel_queue();
                println!("Left the queue.");
            }
            Input::Help => println!("{HELP}"),
            Input::Quit => return Flow::Quit,
            Input::Empty => {}
            Input::Unknown(text) => println!("unknown command '{text}'. {HELP}"),
        }
        Flow::Continue
    }

    fn flush_pending_join(&mut self) -> Option<ClientMessage> {
        let name = self.pending_join.take()?;
        self.join(&name)
    }

    /// Builds a queue join, or parks `name` until the connection is up.
    fn join(&mut self, name: &str) -> Option<ClientMessage> {
        if self.connection != ConnectionState::Connected {
            self.pending_join = Some(name.to_string());
            println!("Not connected yet; will join as {name} once connected.");
            return None;
        }
        let request = self.lock().join_queue(name);
        match &request {
            Some(_) => println!("Waiting for an opponent..."),
            None => println!("Username can't be empty."),
        }
        request
    }

    fn on_tick(&self) {
        let mut reconciler = self.lock();
        if reconciler.opponent_countdown() == 0 {
            return;
        }
        let left = reconciler.tick_countdown();
        if left % 10 == 0 {
            println!("Opponent has {left}s left to reconnect.");
        }
    }
}

/// Runs the interactive session until `quit`, end of input or Ctrl-C.
pub async fn run(config: &Config, state_dir: &Path, username: Option<String>) -> Result<()> {
    let sessions = Arc::new(SessionStore::open(state_dir));
    let dispatcher = Dispatcher::new();
    let reconciler = Reconciler::shared(Arc::clone(&sessions));

    let (change_tx, mut changes) = mpsc::unbounded_channel();
    let _match_feed = Reconciler::attach(&reconciler, &dispatcher, move |change| {
        let _ = change_tx.send(change);
    });

    let (manager, mut events) = ConnectionManager::start(
        config.connection_config(),
        WebSocketTransport::new(),
        sessions,
        dispatcher,
    );

    let mut console = Console::new(reconciler, username);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    println!("{HELP}");
    loop {
        tokio::select! {
            // Connection events first: `Ready` is always queued before the
            // reply it announces reaches the reconciler
            biased;
            event = events.recv() => match event {
                Some(event) => {
                    if let Some(msg) = console.on_event(event) {
                        manager.send(msg);
                    }
                }
                None => break,
            },
            Some(change) = changes.recv() => {
                if let Some(msg) = console.on_change(change) {
                    manager.send(msg);
                }
            }
            line = lines.next_line() => match line? {
                Some(line) => {
                    if let Flow::Quit = console.on_input(parse_input(&line), &manager) {
                        break;
                    }
                }
                None => {
                    debug!("stdin closed");
                    break;
                }
            },
            _ = ticker.tick() => console.on_tick(),
            _ = &mut ctrl_c => break,
        }
    }

    manager.shutdown().await;
    Ok(())
}

#[cfg(test)]
#[path = "play_tests.rs"]
mod tests;
