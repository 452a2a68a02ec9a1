// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_helpers::{alice_session, NOW};
use fl_core::RESUME_WINDOW;

#[test]
fn describe_without_session() {
    assert_eq!(describe(None, NOW, RESUME_WINDOW), "No stored session.");
}

#[test]
fn describe_resumable_session() {
    let session = alice_session().stamped(NOW - 60_000);
    let text = describe(Some(&session), NOW, RESUME_WINDOW);

    assert_eq!(
        text,
        "game:    g-1\n\
         player:  p-1 (alice)\n\
         stamped: 2023-11-14 22:12:20 UTC (60s ago)\n\
         status:  resumable for another 240s"
    );
}

#[test]
fn describe_expired_session() {
    let session = alice_session().stamped(NOW - 400_000);
    let text = describe(Some(&session), NOW, RESUME_WINDOW);
    assert!(text.ends_with("status:  expired"));
    assert!(text.contains("(400s ago)"));
}
