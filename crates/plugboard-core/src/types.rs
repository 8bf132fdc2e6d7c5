// SPDX-FileCopyrightText: 2026 Plugboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the registry, resolver, and container.

use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Stable identifier of a plugin. Persisted in settings, so it must not
/// change between releases of the plugin that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PluginId(String);

impl PluginId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PluginId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PluginId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for PluginId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for PluginId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// How a plugin's rendering unit is attached to its container.
#[derive(Debug, Clone, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MountPoint {
    /// A UI-framework component registered under `element_name`.
    #[strum(serialize = "element")]
    Element { element_name: String },
    /// An embedded frame loading the plugin's entry module.
    #[strum(serialize = "iframe")]
    Iframe { module_path: String },
    /// A bundle fetched lazily from `url` before rendering.
    #[strum(serialize = "bundle")]
    Bundle { url: String },
    /// The plugin renders nothing of its own; selecting it leaves the
    /// region empty.
    #[strum(serialize = "none")]
    None,
}

impl MountPoint {
    pub fn kind(&self) -> MountKind {
        match self {
            MountPoint::Element { .. } => MountKind::Element,
            MountPoint::Iframe { .. } => MountKind::Iframe,
            MountPoint::Bundle { .. } => MountKind::Bundle,
            MountPoint::None => MountKind::None,
        }
    }
}

/// The discriminant of [`MountPoint`], as written in manifests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum MountKind {
    Element,
    Iframe,
    Bundle,
    None,
}

/// Read-only snapshot of the feature flags in effect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFlags {
    /// Named boolean flags. Missing names read as unset.
    #[serde(default)]
    pub flags: BTreeMap<String, bool>,
    /// Experimental plugins the user opted into.
    #[serde(default)]
    pub enabled_experimental_plugins: BTreeSet<PluginId>,
}

impl FeatureFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    pub fn is_experimental_enabled(&self, id: &PluginId) -> bool {
        self.enabled_experimental_plugins.contains(id)
    }

    pub fn with_flag(mut self, name: impl Into<String>, value: bool) -> Self {
        self.flags.insert(name.into(), value);
        self
    }

    pub fn with_experimental(mut self, id: impl Into<PluginId>) -> Self {
        self.enabled_experimental_plugins.insert(id.into());
        self
    }
}

/// User settings visible to enablement predicates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings(BTreeMap<String, serde_json::Value>);

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    /// Boolean view of a setting; anything other than `true` reads as false.
    pub fn get_bool(&self, key: &str) -> bool {
        matches!(self.0.get(key), Some(serde_json::Value::Bool(true)))
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<String, serde_json::Value>> for Settings {
    fn from(values: BTreeMap<String, serde_json::Value>) -> Self {
        Self(values)
    }
}

/// Handle to the dashboard region a plugin renders into.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerHandle {
    name: String,
}

impl ContainerHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn plugin_id_serializes_as_plain_string() {
        let id = PluginId::from("scalars");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"scalars\"");
        let back: PluginId = serde_json::from_str("\"scalars\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn mount_kind_parses_case_insensitively() {
        assert_eq!(MountKind::from_str("iframe").unwrap(), MountKind::Iframe);
        assert_eq!(MountKind::from_str("Element").unwrap(), MountKind::Element);
        assert!(MountKind::from_str("portal").is_err());
    }

    #[test]
    fn mount_point_reports_kind_and_display() {
        let mp = MountPoint::Iframe {
            module_path: "/data/plugin/projector/index.js".into(),
        };
        assert_eq!(mp.kind(), MountKind::Iframe);
        assert_eq!(mp.to_string(), "iframe");
        assert_eq!(MountPoint::None.to_string(), "none");
    }

    #[test]
    fn unset_flags_read_false() {
        let flags = FeatureFlags::new().with_flag("in_colab", true);
        assert!(flags.is_set("in_colab"));
        assert!(!flags.is_set("dark_mode"));
        assert!(!flags.with_flag("dark_mode", false).is_set("dark_mode"));
    }

    #[test]
    fn settings_bool_view_is_strict() {
        let settings = Settings::new()
            .with("show_beta", true)
            .with("theme", "dark")
            .with("pinned", 1);
        assert!(settings.get_bool("show_beta"));
        assert!(!settings.get_bool("theme"));
        assert!(!settings.get_bool("pinned"));
        assert!(!settings.get_bool("missing"));
    }
}
