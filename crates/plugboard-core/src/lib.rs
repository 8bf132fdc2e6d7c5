// SPDX-FileCopyrightText: 2026 Plugboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Plugboard dashboard plugin host.
//!
//! This crate provides the error taxonomy, identifier and state types, and
//! the trait seams (host adapter, mounted instance, state store) shared by
//! the registry, the activation resolver, and the plugins container.

pub mod error;
pub mod store;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{PlugboardError, PluginMountError};
pub use store::{Action, ActivationState, StateStore, StoreSnapshot};
pub use traits::{
    DeactivationHandle, DeactivationRequest, MountContext, MountRequest, MountResult,
    MountedInstance, PluginHostAdapter,
};
pub use types::{ContainerHandle, FeatureFlags, MountKind, MountPoint, PluginId, Settings};
