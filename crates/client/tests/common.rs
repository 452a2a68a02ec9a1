// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// `fourline` isolated from the host's config file and environment.
pub fn fourline(home: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("fourline");
    cmd.env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("XDG_STATE_HOME", home.path().join("state"))
        .env_remove("FOURLINE_API_URL")
        .env_remove("FOURLINE_WS_URL")
        .env_remove("FOURLINE_STATE_DIR")
        .env_remove("RUST_LOG");
    cmd
}

/// Writes a raw session record into `state_dir`.
pub fn write_session(state_dir: &Path, json: &str) {
    std::fs::create_dir_all(state_dir).unwrap();
    std::fs::write(state_dir.join("game_session.json"), json).unwrap();
}
