// SPDX-FileCopyrightText: 2026 Plugboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory application store backed by a `watch` channel.
//!
//! Every dispatched action runs through [`StoreSnapshot::reduce`]; only
//! actions that change state wake subscribers.

use std::sync::Arc;

use plugboard_core::store::{Action, StateStore, StoreSnapshot};
use tokio::sync::watch;
use tracing::debug;

/// Shared in-memory store. Clones observe and mutate the same state.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    tx: Arc<watch::Sender<StoreSnapshot>>,
}

impl MemoryStore {
    pub fn new(initial: StoreSnapshot) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Subscribe to state changes. The receiver starts at the current state.
    pub fn subscribe(&self) -> watch::Receiver<StoreSnapshot> {
        self.tx.subscribe()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(StoreSnapshot::default())
    }
}

impl StateStore for MemoryStore {
    fn snapshot(&self) -> StoreSnapshot {
        self.tx.borrow().clone()
    }

    fn dispatch(&self, action: Action) {
        debug!(?action, "dispatch");
        let changed = self.tx.send_if_modified(|state| state.reduce(action));
        if !changed {
            debug!("dispatch left state unchanged");
        }
    }
}
