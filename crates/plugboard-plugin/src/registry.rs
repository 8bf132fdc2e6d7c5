// SPDX-FileCopyrightText: 2026 Plugboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin registry mapping plugin ids to their descriptors.
//!
//! The `PluginRegistry` keeps descriptors in registration order. That order
//! is significant: the activation resolver uses it to pick a deterministic
//! default when the user has no eligible selection.

use std::collections::HashMap;

use plugboard_core::PlugboardError;
use plugboard_core::types::PluginId;

use crate::descriptor::PluginDescriptor;

/// Catalog of registered plugin descriptors.
///
/// Additive only: a registered id cannot be replaced or removed, except by
/// [`PluginRegistry::reset`] in test builds.
#[derive(Debug, Clone, Default)]
pub struct PluginRegistry {
    order: Vec<PluginId>,
    entries: HashMap<PluginId, PluginDescriptor>,
}

impl PluginRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor.
    ///
    /// Fails with [`PlugboardError::DuplicateId`] if the id is taken; the
    /// earlier registration is kept untouched.
    pub fn register(&mut self, descriptor: PluginDescriptor) -> Result<(), PlugboardError> {
        if self.entries.contains_key(descriptor.id()) {
            return Err(PlugboardError::DuplicateId {
                id: descriptor.id().clone(),
            });
        }
        let id = descriptor.id().clone();
        self.order.push(id.clone());
        self.entries.insert(id, descriptor);
        Ok(())
    }

    /// Look up a descriptor. Unknown ids are an ordinary outcome: a plugin
    /// may be compiled into one build and not another.
    pub fn get(&self, id: &str) -> Option<&PluginDescriptor> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// All registered ids, in registration order.
    pub fn list(&self) -> Vec<PluginId> {
        self.order.clone()
    }

    /// All descriptors, in registration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &PluginDescriptor> + '_ {
        self.order.iter().filter_map(|id| self.entries.get(id))
    }

    /// Returns the number of registered plugins.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if no plugins are registered.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Forget every registration.
    #[cfg(any(test, feature = "test-support"))]
    pub fn reset(&mut self) {
        self.order.clear();
        self.entries.clear();
    }
}
