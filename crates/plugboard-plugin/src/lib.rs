// SPDX-FileCopyrightText: 2026 Plugboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin registry, activation resolver, manifest parser, and built-in catalog.
//!
//! Plugins become known by registering a [`PluginDescriptor`], either into a
//! [`PluginRegistry`] the caller owns or into the process-wide table in
//! [`global`]. The [`resolver`] turns a registry plus the observed store
//! slices into the id that should be mounted.

pub mod catalog;
pub mod descriptor;
pub mod global;
pub mod manifest;
pub mod registry;
pub mod resolver;

pub use catalog::{builtin_catalog, register_builtins};
pub use descriptor::{EnablePredicate, PluginDescriptor};
pub use manifest::{load_plugin_manifest, parse_plugin_manifest, PluginManifest};
pub use registry::PluginRegistry;
pub use resolver::{eligible_ids, resolve_active, resolve_for_snapshot};
