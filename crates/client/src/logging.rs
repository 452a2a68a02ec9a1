// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Log setup for the binary.
//!
//! The board is drawn on stdout, so logs go to `<state_dir>/fourline.log`
//! and only fall back to stderr when that file cannot be opened.

use std::fs;
use std::path::Path;

use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "fourline.log";

/// Installs the global subscriber. `RUST_LOG` takes precedence over
/// `verbose`.
pub fn init(state_dir: &Path, verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let file = fs::create_dir_all(state_dir).and_then(|()| {
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(state_dir.join(LOG_FILE_NAME))
    });

    // A subscriber may already be installed when embedded; keep it
    let _ = match file {
        Ok(file) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(file)
            .with_ansi(false)
            .try_init(),
        Err(_) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
    };
}
