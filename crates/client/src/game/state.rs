// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Client-side view of the current match.

use std::fmt;

use fl_core::protocol::DRAW;
use fl_core::{Grid, PlayerInfo, PlayerSymbol};

/// Which screen the player is on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Lobby,
    Queued,
    InMatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    Active,
    Finished,
}

/// Result of a finished match from this client's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Won,
    Lost,
    Draw,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Outcome::Won => "You won!",
            Outcome::Lost => "You lost.",
            Outcome::Draw => "Draw.",
        })
    }
}

/// Everything the client knows about the match in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchState {
    pub game_id: String,
    pub you: PlayerInfo,
    pub opponent: PlayerInfo,
    pub grid: Grid,
    pub current_turn: PlayerSymbol,
    /// Always equal to `you.symbol == current_turn`.
    pub your_turn: bool,
    pub move_number: u32,
    pub status: MatchStatus,
    /// Winner's username or `"draw"`, once finished.
    pub winner: Option<String>,
}

impl MatchState {
    /// Creates an active match with `your_turn` derived from `current_turn`.
    pub fn new(
        game_id: String,
        you: PlayerInfo,
        opponent: PlayerInfo,
        grid: Grid,
        current_turn: PlayerSymbol,
        move_number: u32,
    ) -> Self {
        let your_turn = you.symbol == current_turn;
        MatchState {
            game_id,
            you,
            opponent,
            grid,
            current_turn,
            your_turn,
            move_number,
            status: MatchStatus::Active,
            winner: None,
        }
    }

    /// Sets the turn and keeps `your_turn` in step with it.
    pub fn set_turn(&mut self, current_turn: PlayerSymbol) {
        self.current_turn = current_turn;
        self.your_turn = self.you.symbol == current_turn;
    }

    /// True when a move from this client would be accepted locally.
    pub fn can_move(&self) -> bool {
        self.your_turn && self.status == MatchStatus::Active
    }

    pub fn is_finished(&self) -> bool {
        self.status == MatchStatus::Finished
    }

    pub fn outcome(&self) -> Option<Outcome> {
        let winner = self.winner.as_deref()?;
        Some(if winner == DRAW {
            Outcome::Draw
        } else if winner == self.you.username {
            Outcome::Won
        } else {
            Outcome::Lost
        })
    }
}
