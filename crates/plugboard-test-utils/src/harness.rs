// SPDX-FileCopyrightText: 2026 Plugboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for container integration testing.
//!
//! `TestHarness` wires a registry, a [`RecordingStore`], a [`MockHost`],
//! and a [`PluginsContainer`] together, and plays the part of the store
//! subscription: every state change is delivered to the container until
//! the store settles.

use std::rc::Rc;
use std::sync::Arc;

use plugboard_container::PluginsContainer;
use plugboard_core::store::{Action, ActivationState, StateStore, StoreSnapshot};
use plugboard_core::types::{ContainerHandle, FeatureFlags, PluginId, Settings};
use plugboard_core::PlugboardError;
use plugboard_plugin::descriptor::PluginDescriptor;
use plugboard_plugin::registry::PluginRegistry;

use crate::mock_host::{MockBehavior, MockHost};
use crate::recording_store::RecordingStore;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    plugins: Vec<PluginDescriptor>,
    known: Option<Vec<PluginId>>,
    flags: FeatureFlags,
    settings: Settings,
    selection: Option<PluginId>,
    host: MockHost,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            plugins: Vec::new(),
            known: None,
            flags: FeatureFlags::default(),
            settings: Settings::default(),
            selection: None,
            host: MockHost::new(),
        }
    }

    /// Register a descriptor (registration order is call order).
    pub fn with_plugin(mut self, descriptor: PluginDescriptor) -> Self {
        self.plugins.push(descriptor);
        self
    }

    /// Register always-enabled plugins with the given ids.
    pub fn with_plugins(mut self, ids: &[&str]) -> Self {
        for id in ids {
            self.plugins.push(PluginDescriptor::new(*id, id.to_uppercase()));
        }
        self
    }

    /// Ids the backend lists as available. Defaults to every registered id.
    pub fn with_known(mut self, ids: &[&str]) -> Self {
        self.known = Some(ids.iter().map(|id| PluginId::from(*id)).collect());
        self
    }

    pub fn with_flags(mut self, flags: FeatureFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// The persisted selection from a previous session.
    pub fn with_selection(mut self, id: &str) -> Self {
        self.selection = Some(id.into());
        self
    }

    pub fn with_behavior(self, id: &str, behavior: MockBehavior) -> Self {
        self.host.set_behavior(id, behavior);
        self
    }

    /// Build the harness. The container has not seen any state yet; call
    /// [`TestHarness::start`].
    pub fn build(self) -> Result<TestHarness, PlugboardError> {
        let mut registry = PluginRegistry::new();
        for descriptor in self.plugins {
            registry.register(descriptor)?;
        }

        let known = self.known.unwrap_or_else(|| registry.list());
        let store = Rc::new(RecordingStore::new(StoreSnapshot {
            activation: ActivationState {
                known_plugin_ids: known,
                active_plugin_id: None,
                last_user_selection: self.selection,
            },
            flags: self.flags,
            settings: self.settings,
        }));

        let container = PluginsContainer::new(
            Arc::new(registry),
            self.host.clone(),
            Rc::clone(&store),
            ContainerHandle::new("test"),
        );

        Ok(TestHarness {
            host: self.host,
            store,
            container,
            delivered: None,
        })
    }
}

/// A container wired to mock collaborators.
pub struct TestHarness {
    pub host: MockHost,
    pub store: Rc<RecordingStore>,
    pub container: PluginsContainer<MockHost, Rc<RecordingStore>>,
    delivered: Option<u64>,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Deliver the initial state.
    pub fn start(&mut self) {
        self.notify();
    }

    /// Apply an action from elsewhere in the application and deliver the
    /// resulting state changes.
    pub fn apply(&mut self, action: Action) {
        self.store.apply(action);
        self.notify();
    }

    /// Deliver store state to the container until it stops changing,
    /// including the echo of the container's own dispatches.
    pub fn notify(&mut self) {
        while self.delivered != Some(self.store.version()) {
            self.delivered = Some(self.store.version());
            let snapshot = self.store.snapshot();
            self.container.on_state_change(&snapshot);
        }
    }

    /// Await the next in-flight mount and deliver any state it changed.
    pub async fn settle_next(&mut self) -> bool {
        let settled = self.container.settle_next().await;
        self.notify();
        settled
    }

    /// Have the mounted plugin `id` request its own deactivation and let
    /// the container handle it.
    pub fn deactivate(&mut self, id: &str) -> bool {
        let sent = self.host.deactivate(id);
        self.container.process_deactivations();
        self.notify();
        sent
    }

    /// The plugin confirmed as mounted, if any.
    pub fn mounted_id(&self) -> Option<PluginId> {
        self.container.mounted().map(|m| m.plugin_id().clone())
    }
}
