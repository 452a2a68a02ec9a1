// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket protocol messages for client-server communication.
//!
//! Every frame is a JSON object `{"type": ..., "payload": ...}`:
//! - Client sends queue joins, moves and resume requests
//! - Server pushes match lifecycle, board updates, presence and errors

use serde::{Deserialize, Serialize};

use crate::board::{Column, Grid, LastMove, PlayerInfo, PlayerSymbol};
use crate::error::{Error, Result};

/// Winner sentinel the server sends when the board fills without a line.
pub const DRAW: &str = "draw";

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientMessage {
    /// Enter matchmaking under the given username.
    JoinQueue(String),

    /// Drop a piece into a column of the current match.
    Move(MovePayload),

    /// Ask the server to restore the match held by this player id.
    Reconnect(String),
}

/// Payload of a [`ClientMessage::Move`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MovePayload {
    pub game_id: String,
    pub column: Column,
}

/// Messages pushed from server to client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerMessage {
    /// A match was formed.
    GameStart(GameStart),

    /// The board changed after a confirmed move.
    GameUpdate(GameUpdate),

    /// The match ended.
    GameOver(GameOver),

    /// Full snapshot answering a resume request.
    Reconnect(ResumeSnapshot),

    /// A player's presence changed.
    PlayerStatus(PlayerStatus),

    /// Human-readable error description.
    Error(String),
}

/// Payload of [`ServerMessage::GameStart`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GameStart {
    pub game_id: String,
    pub you: PlayerInfo,
    pub opponent: PlayerInfo,
    pub your_turn: bool,
}

/// Payload of [`ServerMessage::GameUpdate`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GameUpdate {
    pub grid: Grid,
    pub current_turn: PlayerSymbol,
    #[serde(default)]
    pub last_move: Option<LastMove>,
    pub move_number: u32,
}

/// Payload of [`ServerMessage::GameOver`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameOver {
    /// Winner's username, or [`DRAW`].
    pub winner: String,
}

impl GameOver {
    /// Returns true if the match ended without a winner.
    pub fn is_draw(&self) -> bool {
        self.winner == DRAW
    }
}

/// Payload of [`ServerMessage::Reconnect`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResumeSnapshot {
    pub game_id: String,
    pub you: PlayerInfo,
    pub opponent: PlayerInfo,
    pub grid: Grid,
    pub current_turn: PlayerSymbol,
    pub your_turn: bool,
    pub move_number: u32,
}

/// Payload of [`ServerMessage::PlayerStatus`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStatus {
    pub player_symbol: PlayerSymbol,
    pub is_online: bool,
    /// Seconds left before the absent player forfeits (0 when online).
    #[serde(default)]
    pub time_left: u32,
}

impl ClientMessage {
    /// Creates a JoinQueue message.
    pub fn join_queue(username: impl Into<String>) -> Self {
        ClientMessage::JoinQueue(username.into())
    }

    /// Creates a Move message.
    pub fn make_move(game_id: impl Into<String>, column: Column) -> Self {
        ClientMessage::Move(MovePayload { game_id: game_id.into(), column })
    }

    /// Creates a Reconnect request.
    pub fn reconnect(player_id: impl Into<String>) -> Self {
        ClientMessage::Reconnect(player_id.into())
    }

    /// Wire tag of this message, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            ClientMessage::JoinQueue(_) => "JOIN_QUEUE",
            ClientMessage::Move(_) => "MOVE",
            ClientMessage::Reconnect(_) => "RECONNECT",
        }
    }

    /// Serializes the message to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserializes the message from JSON.
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

impl ServerMessage {
    /// Creates an Error message.
    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error(message.into())
    }

    /// Wire tag of this message, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            ServerMessage::GameStart(_) => "GAME_START",
            ServerMessage::GameUpdate(_) => "GAME_UPDATE",
            ServerMessage::GameOver(_) => "GAME_OVER",
            ServerMessage::Reconnect(_) => "RECONNECT",
            ServerMessage::PlayerStatus(_) => "PLAYER_STATUS",
            ServerMessage::Error(_) => "ERROR",
        }
    }

    /// Serializes the message to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserializes the message from JSON without semantic checks.
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Deserializes and validates a frame.
    pub fn parse(s: &str) -> Result<Self> {
        let msg = Self::from_json(s)?;
        msg.validate()?;
        Ok(msg)
    }

    /// Checks invariants serde cannot express.
    pub fn validate(&self) -> Result<()> {
        match self {
            ServerMessage::GameStart(start) => {
                check_seats(&start.game_id, &start.you, &start.opponent)
            }
            ServerMessage::Reconnect(snapshot) => {
                check_seats(&snapshot.game_id, &snapshot.you, &snapshot.opponent)
            }
            ServerMessage::GameUpdate(update) => match update.last_move {
                Some(last) if !last.is_on_board() => Err(Error::InvalidMessage(format!(
                    "last move ({}, {}) is off the board",
                    last.row, last.column
                ))),
                _ => Ok(()),
            },
            ServerMessage::GameOver(_) | ServerMessage::PlayerStatus(_) | ServerMessage::Error(_) => {
                Ok(())
            }
        }
    }
}

fn check_seats(game_id: &str, you: &PlayerInfo, opponent: &PlayerInfo) -> Result<()> {
    if game_id.is_empty() {
        return Err(Error::InvalidMessage("empty gameId".to_string()));
    }
    if you.symbol == opponent.symbol {
        return Err(Error::InvalidMessage(format!(
            "both players hold symbol {}",
            you.symbol
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
