// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Durable storage for the resumable session record.
//!
//! The record lives under a single key (`game_session`). Writes replace the
//! whole record and are fsynced before the rename that publishes them, so a
//! crash leaves either the old record or the new one. A record that cannot
//! be read back is reported as absent rather than as an error.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use fl_core::{ClockSource, Session, SystemClock};
use tracing::{debug, warn};

/// Storage key of the session record.
pub const SESSION_KEY: &str = "game_session";

/// Error type for session store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The record failed validation.
    #[error(transparent)]
    Invalid(#[from] fl_core::Error),
}

/// Result type for session store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Raw key-value slot the store persists into.
pub trait SessionBackend: Send + Sync {
    /// Returns the stored text, or `None` when nothing is stored.
    fn read(&self) -> StoreResult<Option<String>>;

    /// Replaces the stored text.
    fn write(&self, value: &str) -> StoreResult<()>;

    /// Removes the stored text. Removing an empty slot succeeds.
    fn remove(&self) -> StoreResult<()>;
}

/// Backend keeping the record in `<dir>/game_session.json`.
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(dir: &Path) -> Self {
        FileBackend {
            path: dir.join(format!("{SESSION_KEY}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionBackend for FileBackend {
    fn read(&self) -> StoreResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, value: &str) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let staging = self.path.with_extension("json.tmp");
        let mut file = File::create(&staging)?;
        file.write_all(value.as_bytes())?;
        file.sync_all()?;
        fs::rename(&staging, &self.path)?;
        Ok(())
    }

    fn remove(&self) -> StoreResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Backend holding the record in process memory.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    slot: Mutex<Option<String>>,
}

impl MemoryBackend {
    /// Creates a backend pre-filled with raw text.
    pub fn with_contents(text: impl Into<String>) -> Self {
        MemoryBackend {
            slot: Mutex::new(Some(text.into())),
        }
    }
}

impl SessionBackend for MemoryBackend {
    fn read(&self) -> StoreResult<Option<String>> {
        Ok(self.slot.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn write(&self, value: &str) -> StoreResult<()> {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(value.to_string());
        Ok(())
    }

    fn remove(&self) -> StoreResult<()> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner()).take();
        Ok(())
    }
}

/// Persists at most one [`Session`] and stamps it with the wall clock.
pub struct SessionStore {
    backend: Box<dyn SessionBackend>,
    clock: Arc<dyn ClockSource>,
}

impl SessionStore {
    /// Opens the file-backed store under `dir`.
    pub fn open(dir: &Path) -> Self {
        Self::with_backend(FileBackend::new(dir), Arc::new(SystemClock))
    }

    /// Creates a store that forgets everything when dropped.
    pub fn in_memory() -> Self {
        Self::with_backend(MemoryBackend::default(), Arc::new(SystemClock))
    }

    pub fn with_backend(backend: impl SessionBackend + 'static, clock: Arc<dyn ClockSource>) -> Self {
        SessionStore {
            backend: Box::new(backend),
            clock,
        }
    }

    /// Current wall clock time in milliseconds since the Unix epoch.
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Writes the record, replacing any previous one.
    ///
    /// An unstamped session is stamped with the current time first. Returns
    /// the record as written.
    pub fn save(&self, session: Session) -> StoreResult<Session> {
        session.validate()?;
        let session = match session.disconnect_time {
            Some(_) => session,
            None => session.stamped(self.now_ms()),
        };
        let json = serde_json::to_string(&session)?;
        self.backend.write(&json)?;
        debug!(game_id = %session.game_id, "session saved");
        Ok(session)
    }

    /// Reads the stored record.
    ///
    /// Missing, unreadable and malformed records all load as `None`.
    pub fn load(&self) -> Option<Session> {
        let text = match self.backend.read() {
            Ok(Some(text)) => text,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "failed to read stored session");
                return None;
            }
        };
        let session: Session = match serde_json::from_str(&text) {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "stored session is corrupt; ignoring it");
                return None;
            }
        };
        if let Err(e) = session.validate() {
            warn!(error = %e, "stored session is incomplete; ignoring it");
            return None;
        }
        Some(session)
    }

    /// Removes the stored record. Clearing an empty store succeeds.
    pub fn clear(&self) -> StoreResult<()> {
        self.backend.remove()?;
        debug!("session cleared");
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
