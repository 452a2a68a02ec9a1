// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! fourline: realtime session layer for four-in-a-row matches.
//!
//! Keeps one WebSocket connection to the game server alive, resumes an
//! interrupted match after a connection loss, and folds the server's push
//! messages into a local view of the match.

pub mod cli;
pub mod commands;
pub mod config;
pub mod env;
pub mod error;
pub mod game;
pub mod logging;
pub mod play;
pub mod store;
pub mod sync;

#[cfg(test)]
mod test_helpers;

pub use cli::{Cli, Command, SessionCommand};
pub use config::Config;
pub use error::{Error, Result};
pub use game::{Change, MatchState, Reconciler};
pub use store::SessionStore;
pub use sync::{ConnectionEvent, ConnectionManager, ConnectionState, Dispatcher};

use tracing::debug;

/// Resolves configuration, installs logging and runs `cli.command`.
pub async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?
        .with_env(env::lookup)
        .with_overrides(cli.ws_url, cli.state_dir);
    config.validate()?;

    let state_dir = config.state_dir()?;
    logging::init(&state_dir, cli.verbose);
    debug!(state_dir = %state_dir.display(), ws_url = %config.ws_url, "configuration resolved");

    match cli.command {
        Command::Play { username } => play::run(&config, &state_dir, username).await,
        Command::Session(command) => commands::session(&config, &state_dir, command),
    }
}
