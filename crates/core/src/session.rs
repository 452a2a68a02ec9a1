// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The persisted session record linking this client to a match.
//!
//! The record carries no schema version; unknown fields are ignored and
//! missing required fields make the record unreadable.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How long after a disconnect a match may still be resumed.
pub const RESUME_WINDOW: Duration = Duration::from_secs(5 * 60);

/// Locally persisted identity for resuming a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub player_id: String,
    pub username: String,
    pub game_id: String,
    /// Milliseconds since Unix epoch when the session was last stamped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disconnect_time: Option<u64>,
}

impl Session {
    /// Creates an unstamped session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSession`] if `player_id` or `game_id` is empty.
    pub fn new(
        player_id: impl Into<String>,
        username: impl Into<String>,
        game_id: impl Into<String>,
    ) -> Result<Self> {
        let session = Session {
            player_id: player_id.into(),
            username: username.into(),
            game_id: game_id.into(),
            disconnect_time: None,
        };
        session.validate()?;
        Ok(session)
    }

    /// Returns a copy stamped with the given disconnect time.
    pub fn stamped(mut self, at_ms: u64) -> Self {
        self.disconnect_time = Some(at_ms);
        self
    }

    /// Checks that the identifying fields are present.
    pub fn validate(&self) -> Result<()> {
        if self.player_id.is_empty() {
            return Err(Error::InvalidSession("empty playerId".to_string()));
        }
        if self.game_id.is_empty() {
            return Err(Error::InvalidSession("empty gameId".to_string()));
        }
        Ok(())
    }

    /// Milliseconds elapsed since the disconnect stamp.
    ///
    /// An unstamped session counts as just disconnected, and a stamp in the
    /// future counts as zero.
    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.disconnect_time.unwrap_or(now_ms))
    }

    /// Returns true if the session is still inside `window`.
    pub fn is_resumable(&self, now_ms: u64, window: Duration) -> bool {
        u128::from(self.elapsed_ms(now_ms)) < window.as_millis()
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
