// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Local match state derived from the server message stream.

mod reconcile;
mod state;

pub use reconcile::{is_not_found, Change, Reconciler, SharedReconciler};
pub use state::{MatchState, MatchStatus, Outcome, View};
