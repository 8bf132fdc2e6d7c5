// SPDX-FileCopyrightText: 2026 Plugboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Plugboard dashboard host.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::collections::BTreeMap;

use plugboard_core::store::{ActivationState, StoreSnapshot};
use plugboard_core::types::{FeatureFlags, PluginId, Settings};
use serde::{Deserialize, Serialize};

/// Top-level Plugboard configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PlugboardConfig {
    /// Dashboard identity and logging.
    #[serde(default)]
    pub dashboard: DashboardConfig,

    /// Feature flags seeding the store.
    #[serde(default)]
    pub flags: FlagsConfig,

    /// Arbitrary user settings seeding the store.
    #[serde(default)]
    pub settings: BTreeMap<String, serde_json::Value>,

    /// Initial activation state.
    #[serde(default)]
    pub activation: ActivationConfig,

    /// Externally packaged plugins.
    #[serde(default)]
    pub plugins: PluginsConfig,
}

impl PlugboardConfig {
    pub fn feature_flags(&self) -> FeatureFlags {
        FeatureFlags {
            flags: self.flags.values.clone(),
            enabled_experimental_plugins: self
                .flags
                .enabled_experimental_plugins
                .iter()
                .map(|id| PluginId::new(id.as_str()))
                .collect(),
        }
    }

    pub fn settings(&self) -> Settings {
        Settings::from(self.settings.clone())
    }

    /// The store state the dashboard starts from.
    ///
    /// `registered` is used as the known plugin list when the config does
    /// not name one.
    pub fn initial_snapshot(&self, registered: Vec<PluginId>) -> StoreSnapshot {
        let known_plugin_ids = if self.activation.known_plugins.is_empty() {
            registered
        } else {
            self.activation
                .known_plugins
                .iter()
                .map(|id| PluginId::new(id.as_str()))
                .collect()
        };

        StoreSnapshot {
            activation: ActivationState {
                known_plugin_ids,
                active_plugin_id: None,
                last_user_selection: self.activation.last_selection.as_deref().map(PluginId::from),
            },
            flags: self.feature_flags(),
            settings: self.settings(),
        }
    }
}

/// Dashboard identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DashboardConfig {
    /// Display name of the dashboard.
    #[serde(default = "default_dashboard_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Name of the container element plugins mount into.
    #[serde(default = "default_container")]
    pub container: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            name: default_dashboard_name(),
            log_level: default_log_level(),
            container: default_container(),
        }
    }
}

fn default_dashboard_name() -> String {
    "plugboard".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_container() -> String {
    "plugins-container".to_string()
}

/// Feature flag configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FlagsConfig {
    /// Experimental plugins the user opted into.
    #[serde(default)]
    pub enabled_experimental_plugins: Vec<String>,

    /// Named boolean flags.
    #[serde(default)]
    pub values: BTreeMap<String, bool>,
}

/// Initial activation state.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ActivationConfig {
    /// The plugin the user last selected, restored on startup.
    #[serde(default)]
    pub last_selection: Option<String>,

    /// Plugin ids the backend reports as available. Empty means every
    /// registered plugin.
    #[serde(default)]
    pub known_plugins: Vec<String>,
}

/// Plugin manifest configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PluginsConfig {
    /// Paths to additional `plugin.toml` manifests.
    #[serde(default)]
    pub manifests: Vec<String>,
}
