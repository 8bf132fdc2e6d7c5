// SPDX-FileCopyrightText: 2026 Plugboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-wide plugin registry.
//!
//! Plugin modules call [`register`] once while the application starts.
//! The table is created lazily on first use and published copy-on-write:
//! readers take an [`Arc`] snapshot and never block writers or each other.

use std::sync::{Arc, LazyLock};

use arc_swap::ArcSwap;
use plugboard_core::PlugboardError;
use plugboard_core::types::PluginId;
use tracing::{debug, warn};

use crate::descriptor::PluginDescriptor;
use crate::registry::PluginRegistry;

static REGISTRY: LazyLock<ArcSwap<PluginRegistry>> =
    LazyLock::new(|| ArcSwap::from_pointee(PluginRegistry::new()));

/// Register a descriptor in the process-wide table.
///
/// Same contract as [`PluginRegistry::register`]: a duplicate id fails with
/// [`PlugboardError::DuplicateId`] and leaves the first registration in place.
pub fn register(descriptor: PluginDescriptor) -> Result<(), PlugboardError> {
    let id = descriptor.id().clone();
    let mut outcome = Ok(());
    REGISTRY.rcu(|current| {
        let mut next = PluginRegistry::clone(current);
        match next.register(descriptor.clone()) {
            Ok(()) => {
                outcome = Ok(());
                Arc::new(next)
            }
            Err(e) => {
                outcome = Err(e);
                Arc::clone(current)
            }
        }
    });

    match &outcome {
        Ok(()) => debug!(plugin_id = %id, "plugin registered"),
        Err(e) => warn!(plugin_id = %id, error = %e, "plugin registration rejected"),
    }
    outcome
}

/// Current contents of the table. Later registrations do not show up in
/// a snapshot already taken.
pub fn snapshot() -> Arc<PluginRegistry> {
    REGISTRY.load_full()
}

pub fn get(id: &str) -> Option<PluginDescriptor> {
    REGISTRY.load().get(id).cloned()
}

/// Registered ids, in registration order.
pub fn list() -> Vec<PluginId> {
    REGISTRY.load().list()
}

/// Clear the process-wide table.
#[cfg(any(test, feature = "test-support"))]
pub fn reset() {
    REGISTRY.store(Arc::new(PluginRegistry::new()));
}
