// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

struct FixedClock(u64);

impl ClockSource for FixedClock {
    fn now_ms(&self) -> u64 {
        self.0
    }
}

#[test]
fn system_clock_is_after_2020() {
    // 2020-01-01T00:00:00Z
    assert!(SystemClock.now_ms() > 1_577_836_800_000);
}

#[test]
fn clock_through_arc_and_ref() {
    let clock = Arc::new(FixedClock(42));
    assert_eq!(clock.now_ms(), 42);

    let dynamic: Arc<dyn ClockSource> = clock;
    assert_eq!(dynamic.now_ms(), 42);
    assert_eq!((&FixedClock(7)).now_ms(), 7);
}
