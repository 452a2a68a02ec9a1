// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Folds server messages into the locally held [`MatchState`].
//!
//! The server is authoritative: the board, turn and move count are only
//! ever replaced with server-provided values, never predicted locally.

use std::sync::{Arc, Mutex};

use fl_core::protocol::{GameOver, GameStart, GameUpdate, PlayerStatus, ResumeSnapshot};
use fl_core::{ClientMessage, Column, Grid, LastMove, PlayerInfo, ServerMessage, Session};
use tracing::{debug, info, warn};

use super::state::{MatchState, MatchStatus, View};
use crate::store::SessionStore;
use crate::sync::{Dispatcher, Subscription};

/// Reconciler shared between the dispatcher and the UI loop.
pub type SharedReconciler = Arc<Mutex<Reconciler>>;

/// What a single [`Reconciler::apply`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    MatchStarted,
    BoardUpdated,
    MatchFinished,
    MatchResumed,
    PresenceChanged,
    ErrorShown(String),
    /// The message did not apply to the held state.
    Ignored,
}

/// Returns true for server errors meaning the referenced match is gone.
///
/// The server phrases these as "... not found"; the match is case sensitive.
pub fn is_not_found(message: &str) -> bool {
    message.contains("not found")
}

pub struct Reconciler {
    sessions: Arc<SessionStore>,
    current: Option<MatchState>,
    last_move: Option<LastMove>,
    view: View,
    error: Option<String>,
    show_result: bool,
    /// Seconds the absent opponent has left to come back.
    opponent_countdown: u32,
}

impl Reconciler {
    pub fn new(sessions: Arc<SessionStore>) -> Self {
        Reconciler {
            sessions,
            current: None,
            last_move: None,
            view: View::Lobby,
            error: None,
            show_result: false,
            opponent_countdown: 0,
        }
    }

    pub fn shared(sessions: Arc<SessionStore>) -> SharedReconciler {
        Arc::new(Mutex::new(Self::new(sessions)))
    }

    /// Subscribes `reconciler` to `dispatcher`, reporting each change to
    /// `on_change` after the state lock is released.
    pub fn attach<F>(reconciler: &SharedReconciler, dispatcher: &Dispatcher, on_change: F) -> Subscription
    where
        F: Fn(Change) + Send + Sync + 'static,
    {
        let shared = Arc::clone(reconciler);
        dispatcher.subscribe(move |msg| {
            let change = shared
                .lock()
                .map_err(|_| "match state lock poisoned")?
                .apply(msg);
            on_change(change);
            Ok(())
        })
    }

    pub fn current(&self) -> Option<&MatchState> {
        self.current.as_ref()
    }

    pub fn last_move(&self) -> Option<LastMove> {
        self.last_move
    }

    pub fn view(&self) -> View {
        self.view
    }

    /// Latest server error, until the next queue join.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn show_result(&self) -> bool {
        self.show_result
    }

    pub fn opponent_countdown(&self) -> u32 {
        self.opponent_countdown
    }

    pub fn apply(&mut self, msg: &ServerMessage) -> Change {
        match msg {
            ServerMessage::GameStart(start) => self.start_match(start),
            ServerMessage::GameUpdate(update) => self.update_board(update),
            ServerMessage::GameOver(over) => self.finish_match(over),
            ServerMessage::Reconnect(snapshot) => self.resume_match(snapshot),
            ServerMessage::PlayerStatus(status) => self.update_presence(status),
            ServerMessage::Error(message) => self.show_error(message),
        }
    }

    fn start_match(&mut self, start: &GameStart) -> Change {
        info!(game_id = %start.game_id, opponent = %start.opponent.username, "match started");
        self.persist(&start.you, &start.game_id);

        let current_turn = if start.your_turn {
            start.you.symbol
        } else {
            start.opponent.symbol
        };
        self.current = Some(MatchState::new(
            start.game_id.clone(),
            start.you.clone(),
            start.opponent.clone(),
            Grid::empty(),
            current_turn,
            0,
        ));
        self.enter_match();
        Change::MatchStarted
    }

    fn update_board(&mut self, update: &GameUpdate) -> Change {
        let Some(state) = self.current.as_mut() else {
            debug!("board update without a match; ignored");
            return Change::Ignored;
        };
        if update.move_number < state.move_number {
            warn!(
                held = state.move_number,
                received = update.move_number,
                "stale board update dropped"
            );
            return Change::Ignored;
        }

        state.grid = update.grid;
        state.move_number = update.move_number;
        state.set_turn(update.current_turn);
        debug!(move_number = state.move_number, your_turn = state.your_turn, "board updated");
        self.last_move = update.last_move;
        Change::BoardUpdated
    }

    fn finish_match(&mut self, over: &GameOver) -> Change {
        // Nothing left to resume, even if the match state is already gone
        self.clear_session();

        let Some(state) = self.current.as_mut() else {
            debug!(winner = %over.winner, "game over without a match");
            return Change::Ignored;
        };
        info!(game_id = %state.game_id, winner = %over.winner, "match finished");
        state.status = MatchStatus::Finished;
        state.winner = Some(over.winner.clone());
        self.show_result = true;
        self.opponent_countdown = 0;
        Change::MatchFinished
    }

    fn resume_match(&mut self, snapshot: &ResumeSnapshot) -> Change {
        if let Some(held) = &self.current {
            if held.game_id == snapshot.game_id && snapshot.move_number < held.move_number {
                warn!(
                    held = held.move_number,
                    received = snapshot.move_number,
                    "stale resume snapshot dropped"
                );
                return Change::Ignored;
            }
        }

        let state = MatchState::new(
            snapshot.game_id.clone(),
            snapshot.you.clone(),
            snapshot.opponent.clone(),
            snapshot.grid,
            snapshot.current_turn,
            snapshot.move_number,
        );
        if state.your_turn != snapshot.your_turn {
            warn!(game_id = %snapshot.game_id, "snapshot yourTurn disagrees with currentTurn; using currentTurn");
        }
        info!(game_id = %snapshot.game_id, move_number = snapshot.move_number, "match resumed");

        self.persist(&snapshot.you, &snapshot.game_id);
        self.opponent_countdown = 0;
        self.current = Some(state);
        self.enter_match();
        Change::MatchResumed
    }

    fn update_presence(&mut self, status: &PlayerStatus) -> Change {
        let Some(state) = self.current.as_mut() else {
            return Change::Ignored;
        };
        if status.player_symbol != state.opponent.symbol {
            debug!(symbol = %status.player_symbol, "presence update for own seat ignored");
            return Change::Ignored;
        }

        state.opponent.is_online = status.is_online;
        self.opponent_countdown = if status.is_online { 0 } else { status.time_left };
        info!(online = status.is_online, time_left = self.opponent_countdown, "opponent presence changed");
        Change::PresenceChanged
    }

    fn show_error(&mut self, message: &str) -> Change {
        warn!(text = message, "server reported an error");
        self.error = Some(message.to_string());
        if self.view == View::Queued {
            self.view = View::Lobby;
        }
        if is_not_found(message) {
            info!("server no longer knows the match; dropping stored session");
            self.clear_session();
        }
        Change::ErrorShown(message.to_string())
    }

    /// Join matchmaking. Returns `None` for a blank username.
    pub fn join_queue(&mut self, username: &str) -> Option<ClientMessage> {
        let username = username.trim();
        if username.is_empty() {
            return None;
        }
        self.error = None;
        self.view = View::Queued;
        Some(ClientMessage::join_queue(username))
    }

    pub fn cancel_queue(&mut self) {
        if self.view == View::Queued {
            self.view = View::Lobby;
        }
    }

    /// Builds a move for the held match, or `None` when a move is not
    /// allowed right now.
    pub fn move_intent(&self, column: Column) -> Option<ClientMessage> {
        let state = self.current.as_ref()?;
        if !state.can_move() {
            return None;
        }
        Some(ClientMessage::make_move(state.game_id.clone(), column))
    }

    /// Drops the match and goes back to the lobby.
    pub fn return_to_lobby(&mut self) {
        self.current = None;
        self.last_move = None;
        self.view = View::Lobby;
        self.show_result = false;
        self.opponent_countdown = 0;
    }

    /// Re-stamps the stored session with the current time while a match is
    /// active, so the resume window counts from now. Returns true if a
    /// session was written.
    pub fn mark_disconnected(&self) -> bool {
        let Some(state) = self.current.as_ref().filter(|s| !s.is_finished()) else {
            return false;
        };
        self.persist(&state.you, &state.game_id)
    }

    /// Counts the opponent's reconnect countdown down by one second.
    pub fn tick_countdown(&mut self) -> u32 {
        self.opponent_countdown = self.opponent_countdown.saturating_sub(1);
        self.opponent_countdown
    }

    fn enter_match(&mut self) {
        self.last_move = None;
        self.view = View::InMatch;
        self.show_result = false;
    }

    fn persist(&self, you: &PlayerInfo, game_id: &str) -> bool {
        let Some(player_id) = you.player_id.as_deref() else {
            warn!(game_id, "server sent no playerId; match cannot be resumed");
            return false;
        };
        let saved = Session::new(player_id, you.username.as_str(), game_id)
            .map_err(Into::into)
            .and_then(|session| self.sessions.save(session));
        match saved {
            Ok(_) => true,
            Err(e) => {
                warn!(game_id, error = %e, "failed to persist session");
                false
            }
        }
    }

    fn clear_session(&self) {
        if let Err(e) = self.sessions.clear() {
            warn!(error = %e, "failed to clear session");
        }
    }
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
