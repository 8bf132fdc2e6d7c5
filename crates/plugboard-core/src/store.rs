// SPDX-FileCopyrightText: 2026 Plugboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The slices of application state the plugin container observes, and the
//! actions that mutate them.
//!
//! The store itself belongs to the host application. The container only
//! reads [`StoreSnapshot`]s and dispatches [`Action::ActivePluginChanged`].

use serde::{Deserialize, Serialize};

use crate::types::{FeatureFlags, PluginId, Settings};

/// Which plugins exist for this session and which one is showing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationState {
    /// Plugins the backend reports as available, in listing order.
    pub known_plugin_ids: Vec<PluginId>,
    /// The plugin currently mounted, as confirmed by the container.
    pub active_plugin_id: Option<PluginId>,
    /// The last plugin the user chose. Persisted across reloads.
    pub last_user_selection: Option<PluginId>,
}

/// Everything the container needs to decide what to mount.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub activation: ActivationState,
    pub flags: FeatureFlags,
    pub settings: Settings,
}

/// State transitions understood by the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The container mounted a plugin. Becomes both the active plugin and
    /// the persisted selection.
    ActivePluginChanged(PluginId),
    /// The user explicitly picked a plugin.
    PluginSelected(PluginId),
    /// The backend listing of available plugins arrived.
    PluginsListed(Vec<PluginId>),
    FlagsChanged(FeatureFlags),
    SettingsChanged(Settings),
}

impl StoreSnapshot {
    /// Apply `action`, returning whether anything changed.
    pub fn reduce(&mut self, action: Action) -> bool {
        match action {
            Action::ActivePluginChanged(id) => {
                let changed = self.activation.active_plugin_id.as_ref() != Some(&id)
                    || self.activation.last_user_selection.as_ref() != Some(&id);
                self.activation.last_user_selection = Some(id.clone());
                self.activation.active_plugin_id = Some(id);
                changed
            }
            Action::PluginSelected(id) => {
                replace_if_changed(&mut self.activation.last_user_selection, Some(id))
            }
            Action::PluginsListed(ids) => {
                replace_if_changed(&mut self.activation.known_plugin_ids, ids)
            }
            Action::FlagsChanged(flags) => replace_if_changed(&mut self.flags, flags),
            Action::SettingsChanged(settings) => replace_if_changed(&mut self.settings, settings),
        }
    }
}

fn replace_if_changed<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

/// Narrow view of the application store consumed by the container.
pub trait StateStore {
    /// Current values of the observed slices.
    fn snapshot(&self) -> StoreSnapshot;

    /// Dispatch an action. The container only ever dispatches
    /// [`Action::ActivePluginChanged`].
    fn dispatch(&self, action: Action);
}

impl<S: StateStore + ?Sized> StateStore for std::rc::Rc<S> {
    fn snapshot(&self) -> StoreSnapshot {
        (**self).snapshot()
    }

    fn dispatch(&self, action: Action) {
        (**self).dispatch(action)
    }
}

impl<S: StateStore + ?Sized> StateStore for std::sync::Arc<S> {
    fn snapshot(&self) -> StoreSnapshot {
        (**self).snapshot()
    }

    fn dispatch(&self, action: Action) {
        (**self).dispatch(action)
    }
}
