// SPDX-FileCopyrightText: 2026 Plugboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Plugboard plugin host.

use thiserror::Error;

use crate::types::PluginId;

/// The primary error type used across registration, manifests, and mounting.
#[derive(Debug, Error)]
pub enum PlugboardError {
    /// A plugin id was registered twice. Fatal to the registering call only.
    #[error("plugin `{id}` is already registered")]
    DuplicateId { id: PluginId },

    /// A plugin's rendering unit failed to mount.
    #[error(transparent)]
    Mount(#[from] PluginMountError),

    /// A `plugin.toml` manifest was malformed or incompatible.
    #[error("invalid plugin manifest: {0}")]
    Manifest(String),

    /// Configuration errors (invalid TOML, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

/// A plugin's rendering unit could not be attached to its container.
///
/// Recoverable: the container logs it and falls back to an empty region.
#[derive(Debug, Error)]
#[error("failed to mount plugin `{plugin_id}`: {message}")]
pub struct PluginMountError {
    pub plugin_id: PluginId,
    pub message: String,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl PluginMountError {
    pub fn new(plugin_id: PluginId, message: impl Into<String>) -> Self {
        Self {
            plugin_id,
            message: message.into(),
            source: None,
        }
    }

    /// Attach the underlying cause reported by the rendering environment.
    pub fn with_source(mut self, source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        self.source = Some(source.into());
        self
    }
}
