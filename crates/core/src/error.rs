// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for fl-core operations.

use thiserror::Error;

/// All possible errors that can occur in fl-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid player symbol: {0}\n  hint: symbols are 1 or 2")]
    InvalidSymbol(u8),

    #[error("invalid cell value: {0}\n  hint: cells are 0 (empty), 1 or 2")]
    InvalidCell(u8),

    #[error("invalid column: {0}\n  hint: columns are numbered 0 through 6")]
    InvalidColumn(u8),

    #[error("invalid session: {0}")]
    InvalidSession(String),

    #[error("invalid message: {0}")]
    InvalidMessage(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for fl-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
