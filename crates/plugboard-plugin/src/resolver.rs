// SPDX-FileCopyrightText: 2026 Plugboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Activation resolver: which plugin should be showing right now.
//!
//! Pure functions over the registry and the observed store slices. The
//! eligible set is every available id that is registered and enabled,
//! taken in registration order. An eligible last selection wins; otherwise
//! the first eligible id does; otherwise nothing is mounted.

use std::collections::HashSet;

use plugboard_core::store::StoreSnapshot;
use plugboard_core::types::{FeatureFlags, PluginId, Settings};

use crate::registry::PluginRegistry;

/// Available ids that are registered and enabled, in registration order.
pub fn eligible_ids(
    registry: &PluginRegistry,
    available_ids: &[PluginId],
    flags: &FeatureFlags,
    settings: &Settings,
) -> Vec<PluginId> {
    let available: HashSet<&PluginId> = available_ids.iter().collect();
    registry
        .descriptors()
        .filter(|d| available.contains(d.id()) && d.is_enabled(flags, settings))
        .map(|d| d.id().clone())
        .collect()
}

/// Compute the plugin that should be active.
pub fn resolve_active(
    registry: &PluginRegistry,
    available_ids: &[PluginId],
    flags: &FeatureFlags,
    settings: &Settings,
    last_selection: Option<&PluginId>,
) -> Option<PluginId> {
    let eligible = eligible_ids(registry, available_ids, flags, settings);

    if let Some(selected) = last_selection {
        if eligible.contains(selected) {
            return Some(selected.clone());
        }
    }

    eligible.into_iter().next()
}

/// [`resolve_active`] over the slices of a store snapshot.
pub fn resolve_for_snapshot(registry: &PluginRegistry, snapshot: &StoreSnapshot) -> Option<PluginId> {
    resolve_active(
        registry,
        &snapshot.activation.known_plugin_ids,
        &snapshot.flags,
        &snapshot.settings,
        snapshot.activation.last_user_selection.as_ref(),
    )
}
