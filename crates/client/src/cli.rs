// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "fourline")]
#[command(version)]
#[command(about = "Realtime client for four-in-a-row matches")]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory holding the stored session and the log file
    #[arg(long, global = true, value_name = "DIR")]
    pub state_dir: Option<PathBuf>,

    /// WebSocket endpoint, e.g. ws://localhost:8080/ws
    #[arg(long, global = true, value_name = "URL")]
    pub ws_url: Option<String>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Connect and play interactively
    Play {
        /// Join the matchmaking queue under this name once connected
        #[arg(short, long)]
        username: Option<String>,
    },

    /// Inspect or clear the stored session
    #[command(subcommand)]
    Session(SessionCommand),
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    /// Print the stored session and whether it can still be resumed
    Show,
    /// Forget the stored session
    Clear,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
