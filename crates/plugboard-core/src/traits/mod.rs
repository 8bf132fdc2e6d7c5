// SPDX-FileCopyrightText: 2026 Plugboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams between the plugin container and its rendering environment.

pub mod host;

pub use host::{
    DeactivationHandle, DeactivationRequest, MountContext, MountRequest, MountResult,
    MountedInstance, PluginHostAdapter,
};
