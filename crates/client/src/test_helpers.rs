// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for client module tests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use fl_core::protocol::{GameStart, GameUpdate, PlayerStatus, ResumeSnapshot};
use fl_core::{
    ClockSource, Grid, LastMove, PlayerInfo, PlayerSymbol, PlayerType, ServerMessage, Session,
};

use crate::store::{MemoryBackend, SessionStore};

/// Arbitrary fixed instant used as "now" in tests.
pub const NOW: u64 = 1_700_000_000_000;

/// Settable wall clock.
#[derive(Debug)]
pub struct MockClock {
    now: AtomicU64,
}

impl MockClock {
    pub fn new(now: u64) -> Arc<Self> {
        Arc::new(MockClock {
            now: AtomicU64::new(now),
        })
    }

    pub fn advance_ms(&self, delta: u64) {
        self.now.fetch_add(delta, Ordering::SeqCst);
    }
}

impl ClockSource for MockClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// In-memory store driven by the given clock.
pub fn memory_store(clock: &Arc<MockClock>) -> Arc<SessionStore> {
    Arc::new(SessionStore::with_backend(
        MemoryBackend::default(),
        Arc::clone(clock) as Arc<dyn ClockSource>,
    ))
}

/// Session for alice in game g-1.
pub fn alice_session() -> Session {
    Session {
        player_id: "p-1".to_string(),
        username: "alice".to_string(),
        game_id: "g-1".to_string(),
        disconnect_time: None,
    }
}

pub fn player(id: Option<&str>, name: &str, symbol: PlayerSymbol) -> PlayerInfo {
    PlayerInfo {
        player_id: id.map(str::to_string),
        username: name.to_string(),
        symbol,
        player_type: PlayerType::Human,
        is_online: true,
    }
}

/// GAME_START for alice (symbol 1) against bob (symbol 2) in game g-1.
pub fn game_start(your_turn: bool) -> ServerMessage {
    ServerMessage::GameStart(GameStart {
        game_id: "g-1".to_string(),
        you: player(Some("p-1"), "alice", PlayerSymbol::One),
        opponent: player(None, "bob", PlayerSymbol::Two),
        your_turn,
    })
}

pub fn game_update(grid: Grid, current_turn: PlayerSymbol, move_number: u32) -> ServerMessage {
    ServerMessage::GameUpdate(GameUpdate {
        grid,
        current_turn,
        last_move: None,
        move_number,
    })
}

pub fn game_update_with_move(
    grid: Grid,
    current_turn: PlayerSymbol,
    last_move: LastMove,
    move_number: u32,
) -> ServerMessage {
    ServerMessage::GameUpdate(GameUpdate {
        grid,
        current_turn,
        last_move: Some(last_move),
        move_number,
    })
}

/// RECONNECT snapshot for alice in game g-1.
pub fn resume_snapshot(grid: Grid, current_turn: PlayerSymbol, move_number: u32) -> ServerMessage {
    ServerMessage::Reconnect(ResumeSnapshot {
        game_id: "g-1".to_string(),
        you: player(Some("p-1"), "alice", PlayerSymbol::One),
        opponent: player(None, "bob", PlayerSymbol::Two),
        grid,
        current_turn,
        your_turn: current_turn == PlayerSymbol::One,
        move_number,
    })
}

pub fn player_status(symbol: PlayerSymbol, is_online: bool, time_left: u32) -> ServerMessage {
    ServerMessage::PlayerStatus(PlayerStatus {
        player_symbol: symbol,
        is_online,
        time_left,
    })
}
