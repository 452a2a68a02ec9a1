// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use thiserror::Error;

use crate::store::StoreError;

/// Errors surfaced by the fourline client.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("config file not found: {}\n  hint: omit --config to use the default location", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("failed to parse config {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("config error: {0}")]
    Config(String),

    #[error("no state directory available\n  hint: pass --state-dir or set FOURLINE_STATE_DIR")]
    NoStateDir,

    #[error("session store error: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Core(#[from] fl_core::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
