// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the dispatch module.

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use std::sync::{Arc, Mutex};

use fl_core::{PlayerSymbol, ServerMessage};

use super::dispatch::{DispatchReport, Dispatcher, Subscription};
use crate::test_helpers::{game_start, player_status};

/// Listener that records the wire tag of every message it sees.
fn recorder(dispatcher: &Dispatcher, log: &Arc<Mutex<Vec<String>>>, name: &str) -> Subscription {
    let log = Arc::clone(log);
    let name = name.to_string();
    dispatcher.subscribe(move |msg| {
        log.lock().unwrap().push(format!("{name}:{}", msg.kind()));
        Ok(())
    })
}

#[test]
fn delivers_to_every_listener_in_registration_order() {
    let dispatcher = Dispatcher::new();
    let log = Arc::new(Mutex::new(Vec::new()));
    let _a = recorder(&dispatcher, &log, "a");
    let _b = recorder(&dispatcher, &log, "b");

    let report = dispatcher.dispatch(&game_start(true));

    assert_eq!(report, DispatchReport { delivered: 2, failed: 0 });
    assert_eq!(*log.lock().unwrap(), vec!["a:GAME_START", "b:GAME_START"]);
}

#[test]
fn dispatch_without_listeners_is_a_no_op() {
    let dispatcher = Dispatcher::new();
    assert_eq!(dispatcher.dispatch(&game_start(true)), DispatchReport::default());
}

#[test]
fn failing_listener_does_not_block_others() {
    let dispatcher = Dispatcher::new();
    let log = Arc::new(Mutex::new(Vec::new()));
    let _a = recorder(&dispatcher, &log, "a");
    let _bad = dispatcher.subscribe(|_| Err("listener rejected message".into()));
    let _b = recorder(&dispatcher, &log, "b");

    let report = dispatcher.dispatch(&ServerMessage::error("boom"));

    assert_eq!(report, DispatchReport { delivered: 2, failed: 1 });
    assert_eq!(*log.lock().unwrap(), vec!["a:ERROR", "b:ERROR"]);
}

#[test]
fn panicking_listener_does_not_block_others() {
    let dispatcher = Dispatcher::new();
    let log = Arc::new(Mutex::new(Vec::new()));
    let _bad = dispatcher.subscribe(|_| panic!("listener exploded"));
    let _a = recorder(&dispatcher, &log, "a");

    let report = dispatcher.dispatch(&game_start(false));
    assert_eq!(report, DispatchReport { delivered: 1, failed: 1 });

    // The panicking listener stays registered and the registry stays usable
    let report = dispatcher.dispatch(&game_start(false));
    assert_eq!(report.failed, 1);
    assert_eq!(log.lock().unwrap().len(), 2);
    assert_eq!(dispatcher.listener_count(), 2);
}

#[test]
fn unsubscribe_stops_delivery() {
    let dispatcher = Dispatcher::new();
    let log = Arc::new(Mutex::new(Vec::new()));
    let a = recorder(&dispatcher, &log, "a");
    let _b = recorder(&dispatcher, &log, "b");

    assert!(a.unsubscribe());
    dispatcher.dispatch(&game_start(true));

    assert_eq!(*log.lock().unwrap(), vec!["b:GAME_START"]);
    assert_eq!(dispatcher.listener_count(), 1);
}

#[test]
fn unsubscribe_after_dispatcher_dropped_reports_false() {
    let dispatcher = Dispatcher::new();
    let sub = dispatcher.subscribe(|_| Ok(()));
    drop(dispatcher);
    assert!(!sub.unsubscribe());
}

#[test]
fn listener_can_unsubscribe_itself_during_dispatch() {
    let dispatcher = Dispatcher::new();
    let calls = Arc::new(Mutex::new(0));
    let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));

    let sub = {
        let calls = Arc::clone(&calls);
        let slot = Arc::clone(&slot);
        dispatcher.subscribe(move |_| {
            *calls.lock().unwrap() += 1;
            if let Some(me) = slot.lock().unwrap().take() {
                me.unsubscribe();
            }
            Ok(())
        })
    };
    *slot.lock().unwrap() = Some(sub);

    dispatcher.dispatch(&game_start(true));
    dispatcher.dispatch(&game_start(true));

    assert_eq!(*calls.lock().unwrap(), 1);
    assert_eq!(dispatcher.listener_count(), 0);
}

#[test]
fn listener_removed_mid_dispatch_still_sees_current_message() {
    let dispatcher = Dispatcher::new();
    let log = Arc::new(Mutex::new(Vec::new()));
    let victim_slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));

    let _remover = {
        let victim_slot = Arc::clone(&victim_slot);
        dispatcher.subscribe(move |_| {
            if let Some(victim) = victim_slot.lock().unwrap().take() {
                victim.unsubscribe();
            }
            Ok(())
        })
    };
    let victim = recorder(&dispatcher, &log, "victim");
    *victim_slot.lock().unwrap() = Some(victim);

    dispatcher.dispatch(&game_start(true));
    dispatcher.dispatch(&player_status(PlayerSymbol::Two, false, 60));

    // The snapshot taken for the first message still included the victim
    assert_eq!(*log.lock().unwrap(), vec!["victim:GAME_START"]);
}

#[test]
fn listener_added_mid_dispatch_starts_with_next_message() {
    let dispatcher = Dispatcher::new();
    let log = Arc::new(Mutex::new(Vec::new()));
    let added = Arc::new(Mutex::new(Vec::new()));

    let _adder = {
        let inner = dispatcher.clone();
        let log = Arc::clone(&log);
        let added = Arc::clone(&added);
        dispatcher.subscribe(move |_| {
            let mut added = added.lock().unwrap();
            if added.is_empty() {
                added.push(recorder(&inner, &log, "late"));
            }
            Ok(())
        })
    };

    dispatcher.dispatch(&game_start(true));
    assert!(log.lock().unwrap().is_empty());

    dispatcher.dispatch(&ServerMessage::error("x"));
    assert_eq!(*log.lock().unwrap(), vec!["late:ERROR"]);
}

#[test]
fn decode_accepts_valid_frame() {
    let msg = Dispatcher::decode(r#"{"type":"GAME_OVER","payload":{"winner":"draw"}}"#).unwrap();
    assert_eq!(msg.kind(), "GAME_OVER");
}

#[test]
fn decode_drops_malformed_frames() {
    assert!(Dispatcher::decode("{").is_none());
    assert!(Dispatcher::decode(r#"{"type":"HELLO","payload":{}}"#).is_none());
    // Parses, but both players claim the same symbol
    let shared = r#"{"type":"GAME_START","payload":{"gameId":"g","you":{"username":"a","symbol":1,"type":"human","isOnline":true},"opponent":{"username":"b","symbol":1,"type":"bot","isOnline":true},"yourTurn":true}}"#;
    assert!(Dispatcher::decode(shared).is_none());
}
