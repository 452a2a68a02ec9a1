// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::test_helpers::{alice_session, memory_store, MockClock, NOW};
use tempfile::TempDir;
use yare::parameterized;

fn file_store(dir: &TempDir, clock: &Arc<MockClock>) -> SessionStore {
    SessionStore::with_backend(
        FileBackend::new(dir.path()),
        Arc::clone(clock) as Arc<dyn ClockSource>,
    )
}

#[test]
fn load_from_empty_store_is_none() {
    let store = memory_store(&MockClock::new(NOW));
    assert_eq!(store.load(), None);
}

#[test]
fn save_stamps_unstamped_session() {
    let clock = MockClock::new(NOW);
    let store = memory_store(&clock);

    let saved = store.save(alice_session()).unwrap();
    assert_eq!(saved.disconnect_time, Some(NOW));
    assert_eq!(store.load(), Some(saved));
}

#[test]
fn save_keeps_existing_stamp() {
    let store = memory_store(&MockClock::new(NOW));
    let saved = store.save(alice_session().stamped(NOW - 5_000)).unwrap();
    assert_eq!(saved.disconnect_time, Some(NOW - 5_000));
}

#[test]
fn save_replaces_previous_record() {
    let clock = MockClock::new(NOW);
    let store = memory_store(&clock);
    store.save(alice_session()).unwrap();

    let mut next = alice_session();
    next.game_id = "g-2".to_string();
    clock.advance_ms(1_000);
    store.save(next).unwrap();

    let loaded = store.load().unwrap();
    assert_eq!(loaded.game_id, "g-2");
    assert_eq!(loaded.disconnect_time, Some(NOW + 1_000));
}

#[test]
fn save_rejects_incomplete_session() {
    let store = memory_store(&MockClock::new(NOW));
    let mut session = alice_session();
    session.player_id.clear();

    assert!(matches!(store.save(session), Err(StoreError::Invalid(_))));
    assert_eq!(store.load(), None);
}

#[test]
fn clear_removes_record_and_is_idempotent() {
    let store = memory_store(&MockClock::new(NOW));
    store.save(alice_session()).unwrap();

    store.clear().unwrap();
    assert_eq!(store.load(), None);
    store.clear().unwrap();
}

#[parameterized(
    not_json = { "not json" },
    wrong_shape = { r#"{"gameId":"g-1"}"# },
    empty_player = { r#"{"playerId":"","username":"alice","gameId":"g-1","disconnectTime":1}"# },
    wrong_types = { r#"{"playerId":1,"username":"alice","gameId":"g-1"}"# },
)]
fn corrupt_record_loads_as_none(contents: &str) {
    let store = SessionStore::with_backend(
        MemoryBackend::with_contents(contents),
        MockClock::new(NOW) as Arc<dyn ClockSource>,
    );
    assert_eq!(store.load(), None);
}

#[test]
fn unknown_fields_are_ignored() {
    let store = SessionStore::with_backend(
        MemoryBackend::with_contents(
            r#"{"playerId":"p-1","username":"alice","gameId":"g-1","disconnectTime":5,"theme":"dark"}"#,
        ),
        MockClock::new(NOW) as Arc<dyn ClockSource>,
    );
    assert_eq!(store.load().unwrap().disconnect_time, Some(5));
}

#[test]
fn file_backend_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let clock = MockClock::new(NOW);

    file_store(&dir, &clock).save(alice_session()).unwrap();

    let reopened = file_store(&dir, &clock);
    let loaded = reopened.load().unwrap();
    assert_eq!(loaded.player_id, "p-1");
    assert_eq!(loaded.disconnect_time, Some(NOW));
}

#[test]
fn file_backend_writes_camel_case_record() {
    let dir = TempDir::new().unwrap();
    let backend = FileBackend::new(dir.path());
    let store = file_store(&dir, &MockClock::new(NOW));
    store.save(alice_session()).unwrap();

    assert_eq!(backend.path(), dir.path().join("game_session.json"));
    let text = std::fs::read_to_string(backend.path()).unwrap();
    assert_eq!(
        text,
        r#"{"playerId":"p-1","username":"alice","gameId":"g-1","disconnectTime":1700000000000}"#
    );
    assert!(!dir.path().join("game_session.json.tmp").exists());
}

#[test]
fn file_backend_creates_missing_state_dir() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("state").join("fourline");
    let store = SessionStore::with_backend(
        FileBackend::new(&nested),
        MockClock::new(NOW) as Arc<dyn ClockSource>,
    );

    store.save(alice_session()).unwrap();
    assert!(nested.join("game_session.json").exists());
}

#[test]
fn file_backend_clear_on_missing_file_succeeds() {
    let dir = TempDir::new().unwrap();
    let store = file_store(&dir, &MockClock::new(NOW));
    store.clear().unwrap();
    assert_eq!(store.load(), None);
}

#[test]
fn file_backend_corrupt_file_loads_as_none() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("game_session.json"), "{truncated").unwrap();
    let store = file_store(&dir, &MockClock::new(NOW));
    assert_eq!(store.load(), None);
}
