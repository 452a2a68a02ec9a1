// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `fourline session` subcommands.

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use fl_core::Session;

use crate::cli::SessionCommand;
use crate::config::Config;
use crate::error::Result;
use crate::store::SessionStore;

pub fn session(config: &Config, state_dir: &Path, command: SessionCommand) -> Result<()> {
    let store = SessionStore::open(state_dir);
    match command {
        SessionCommand::Show => {
            let window = config.connection_config().resume_window;
            println!("{}", describe(store.load().as_ref(), store.now_ms(), window));
        }
        SessionCommand::Clear => {
            store.clear()?;
            println!("Stored session cleared.");
        }
    }
    Ok(())
}

fn format_stamp(ms: u64) -> String {
    i64::try_from(ms)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|at| at.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| ms.to_string())
}

/// Human-readable summary of a stored session at `now_ms`.
pub fn describe(session: Option<&Session>, now_ms: u64, window: Duration) -> String {
    let Some(session) = session else {
        return "No stored session.".to_string();
    };

    let elapsed = Duration::from_millis(session.elapsed_ms(now_ms));
    let stamped = match session.disconnect_time {
        Some(ms) => format!("{} ({}s ago)", format_stamp(ms), elapsed.as_secs()),
        None => "never".to_string(),
    };
    let status = if session.is_resumable(now_ms, window) {
        format!("resumable for another {}s", window.saturating_sub(elapsed).as_secs())
    } else {
        "expired".to_string()
    };

    format!(
        "game:    {}\nplayer:  {} ({})\nstamped: {}\nstatus:  {}",
        session.game_id, session.player_id, session.username, stamped, status
    )
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
