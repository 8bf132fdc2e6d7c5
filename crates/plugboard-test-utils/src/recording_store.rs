// SPDX-FileCopyrightText: 2026 Plugboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! State store that records what the container dispatches.

use std::cell::{Cell, RefCell};

use plugboard_core::store::{Action, StateStore, StoreSnapshot};
use plugboard_core::types::PluginId;

/// A single-threaded store for tests.
///
/// Actions dispatched through [`StateStore::dispatch`] are recorded;
/// actions applied with [`RecordingStore::apply`] simulate the rest of the
/// application and are not.
#[derive(Default)]
pub struct RecordingStore {
    state: RefCell<StoreSnapshot>,
    dispatched: RefCell<Vec<Action>>,
    version: Cell<u64>,
}

impl RecordingStore {
    pub fn new(initial: StoreSnapshot) -> Self {
        Self {
            state: RefCell::new(initial),
            ..Self::default()
        }
    }

    /// Apply an action on behalf of another part of the application.
    pub fn apply(&self, action: Action) -> bool {
        let changed = self.state.borrow_mut().reduce(action);
        if changed {
            self.version.set(self.version.get() + 1);
        }
        changed
    }

    /// Incremented on every state change, from either side.
    pub fn version(&self) -> u64 {
        self.version.get()
    }

    /// Every action the container dispatched, in order.
    pub fn dispatched(&self) -> Vec<Action> {
        self.dispatched.borrow().clone()
    }

    /// The ids carried by dispatched `ActivePluginChanged` actions.
    pub fn active_changes(&self) -> Vec<PluginId> {
        self.dispatched
            .borrow()
            .iter()
            .filter_map(|a| match a {
                Action::ActivePluginChanged(id) => Some(id.clone()),
                _ => None,
            })
            .collect()
    }
}

impl StateStore for RecordingStore {
    fn snapshot(&self) -> StoreSnapshot {
        self.state.borrow().clone()
    }

    fn dispatch(&self, action: Action) {
        self.dispatched.borrow_mut().push(action.clone());
        self.apply(action);
    }
}
