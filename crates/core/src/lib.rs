// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! fl-core: Shared library for the fourline client
//!
//! This crate provides the wire protocol, board types, and the persisted
//! session record used by the realtime session layer. It performs no I/O.

pub mod board;
pub mod clock;
pub mod error;
pub mod protocol;
pub mod session;

pub use board::{Cell, Column, Grid, LastMove, PlayerInfo, PlayerSymbol, PlayerType, COLS, ROWS};
pub use clock::{ClockSource, SystemClock};
pub use error::{Error, Result};
pub use protocol::{ClientMessage, ServerMessage};
pub use session::{Session, RESUME_WINDOW};
