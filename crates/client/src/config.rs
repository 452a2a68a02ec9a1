// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Client configuration.
//!
//! Resolved in layers, later layers winning:
//! 1. built-in defaults pointing at a local development server
//! 2. an optional TOML file (`--config`, else `<config_dir>/fourline/config.toml`)
//! 3. `FOURLINE_API_URL`, `FOURLINE_WS_URL` and `FOURLINE_STATE_DIR`
//! 4. command-line flags

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::env::{self, vars};
use crate::error::{Error, Result};
use crate::sync::{ConnectionConfig, DEFAULT_WS_URL};

pub const DEFAULT_API_URL: &str = "http://localhost:8080";

const APP_DIR_NAME: &str = "fourline";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Client configuration, usually read from `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base address of the request/response API.
    ///
    /// Resolved and validated with the rest of the configuration; the
    /// realtime client itself never calls it.
    pub api_url: String,
    /// Address of the realtime WebSocket endpoint.
    pub ws_url: String,
    /// Where the session record and log file live.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_dir: Option<PathBuf>,
    pub reconnect: ReconnectConfig,
}

/// Reconnect and resume timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconnectConfig {
    /// Delay before each automatic reconnect (default: 2000).
    pub retry_delay_ms: u64,
    /// How long a stored session stays resumable (default: 300).
    pub resume_window_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: DEFAULT_API_URL.to_string(),
            ws_url: DEFAULT_WS_URL.to_string(),
            state_dir: None,
            reconnect: ReconnectConfig::default(),
        }
    }
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        let defaults = ConnectionConfig::default();
        ReconnectConfig {
            retry_delay_ms: defaults.retry_delay.as_millis() as u64,
            resume_window_secs: defaults.resume_window.as_secs(),
        }
    }
}

/// Default location of the config file.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Default state directory: `$XDG_STATE_HOME/fourline`, falling back to the
/// platform state or local data directory.
pub fn default_state_dir() -> Option<PathBuf> {
    env::xdg_state_home()
        .or_else(dirs::state_dir)
        .or_else(dirs::data_local_dir)
        .map(|d| d.join(APP_DIR_NAME))
}

impl Config {
    /// Loads the file layer.
    ///
    /// An explicit path must exist. Without one, a missing default file
    /// yields the built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) if !path.exists() => Err(Error::ConfigNotFound(path.to_path_buf())),
            Some(path) => Self::from_file(path),
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies environment overrides read through `lookup`.
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(vars::FOURLINE_API_URL) {
            self.api_url = url;
        }
        if let Some(url) = lookup(vars::FOURLINE_WS_URL) {
            self.ws_url = url;
        }
        if let Some(dir) = lookup(vars::FOURLINE_STATE_DIR) {
            self.state_dir = Some(PathBuf::from(dir));
        }
        self
    }

    /// Applies command-line overrides.
    pub fn with_overrides(mut self, ws_url: Option<String>, state_dir: Option<PathBuf>) -> Self {
        if let Some(url) = ws_url {
            self.ws_url = url;
        }
        if state_dir.is_some() {
            self.state_dir = state_dir;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.ws_url.starts_with("ws://") || self.ws_url.starts_with("wss://")) {
            return Err(Error::Config(format!(
                "ws_url must start with ws:// or wss://, got '{}'",
                self.ws_url
            )));
        }
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "api_url must start with http:// or https://, got '{}'",
                self.api_url
            )));
        }
        if self.reconnect.retry_delay_ms == 0 {
            return Err(Error::Config("reconnect.retry_delay_ms must be positive".to_string()));
        }
        if self.reconnect.resume_window_secs == 0 {
            return Err(Error::Config(
                "reconnect.resume_window_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn connection_config(&self) -> ConnectionConfig {
        ConnectionConfig {
            url: self.ws_url.clone(),
            retry_delay: Duration::from_millis(self.reconnect.retry_delay_ms),
            resume_window: Duration::from_secs(self.reconnect.resume_window_secs),
        }
    }

    /// The configured state directory, or the platform default.
    pub fn state_dir(&self) -> Result<PathBuf> {
        self.state_dir
            .clone()
            .or_else(default_state_dir)
            .ok_or(Error::NoStateDir)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
