// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Fan-out of decoded server messages to registered listeners.
//!
//! Listeners are snapshotted before each delivery and invoked outside the
//! registry lock, so a listener may subscribe or unsubscribe (itself or
//! others) while being notified. Such changes take effect from the next
//! message. A listener that fails or panics is logged and skipped; the
//! remaining listeners still see the message.

use std::collections::BTreeMap;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use fl_core::ServerMessage;
use tracing::{error, trace, warn};

/// Error a listener may return.
pub type ListenerError = Box<dyn std::error::Error + Send + Sync>;

/// Return type of a listener.
pub type ListenerResult = Result<(), ListenerError>;

type Listener = Arc<dyn Fn(&ServerMessage) -> ListenerResult + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: BTreeMap<u64, Listener>,
}

/// Cloneable handle to a shared listener registry.
#[derive(Clone, Default)]
pub struct Dispatcher {
    registry: Arc<Mutex<Registry>>,
}

/// Outcome of delivering one message.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchReport {
    /// Listeners that returned `Ok`.
    pub delivered: usize,
    /// Listeners that returned an error or panicked.
    pub failed: usize,
}

/// Registration handle returned by [`Dispatcher::subscribe`].
///
/// Dropping the handle keeps the listener registered; call
/// [`Subscription::unsubscribe`] to remove it.
#[derive(Debug)]
#[must_use = "keep the subscription to be able to unsubscribe"]
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    /// Removes the listener. Returns false if it was already gone.
    pub fn unsubscribe(self) -> bool {
        match self.registry.upgrade() {
            Some(registry) => lock(&registry).listeners.remove(&self.id).is_some(),
            None => false,
        }
    }
}

fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    // Listeners never run under the lock, so a poisoned registry is still consistent
    registry.lock().unwrap_or_else(|e| e.into_inner())
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes one inbound frame.
    ///
    /// Frames that are not valid protocol messages are logged and dropped.
    pub fn decode(raw: &str) -> Option<ServerMessage> {
        match ServerMessage::parse(raw) {
            Ok(msg) => Some(msg),
            Err(e) => {
                warn!(error = %e, len = raw.len(), "dropping malformed server frame");
                None
            }
        }
    }

    /// Registers a listener for every subsequent message.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&ServerMessage) -> ListenerResult + Send + Sync + 'static,
    {
        let mut registry = lock(&self.registry);
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.insert(id, Arc::new(listener));
        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.registry).listeners.len()
    }

    /// Delivers `msg` to every listener registered when the call began,
    /// in registration order.
    pub fn dispatch(&self, msg: &ServerMessage) -> DispatchReport {
        let snapshot: Vec<(u64, Listener)> = lock(&self.registry)
            .listeners
            .iter()
            .map(|(id, listener)| (*id, Arc::clone(listener)))
            .collect();

        let mut report = DispatchReport::default();
        for (id, listener) in snapshot {
            match catch_unwind(AssertUnwindSafe(|| listener(msg))) {
                Ok(Ok(())) => report.delivered += 1,
                Ok(Err(e)) => {
                    warn!(listener = id, kind = msg.kind(), error = %e, "listener failed");
                    report.failed += 1;
                }
                Err(payload) => {
                    error!(
                        listener = id,
                        kind = msg.kind(),
                        panic = panic_message(payload.as_ref()),
                        "listener panicked"
                    );
                    report.failed += 1;
                }
            }
        }
        trace!(kind = msg.kind(), delivered = report.delivered, failed = report.failed, "dispatched");
        report
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "<non-string panic>"
    }
}
