// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.

use std::path::PathBuf;

/// Environment variable names.
pub mod vars {
    pub const FOURLINE_API_URL: &str = "FOURLINE_API_URL";
    pub const FOURLINE_WS_URL: &str = "FOURLINE_WS_URL";
    pub const FOURLINE_STATE_DIR: &str = "FOURLINE_STATE_DIR";
    pub const XDG_STATE_HOME: &str = "XDG_STATE_HOME";
}

/// Returns the value of `name`, treating an empty value as unset.
pub fn lookup(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Returns the value of `XDG_STATE_HOME` if set.
pub fn xdg_state_home() -> Option<PathBuf> {
    lookup(vars::XDG_STATE_HOME).map(PathBuf::from)
}
