// SPDX-FileCopyrightText: 2026 Plugboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin manifest parsing from `plugin.toml` files.
//!
//! Manifests let plugins packaged outside the binary (embedded frames,
//! lazily fetched bundles) register without compiled-in code. A manifest
//! becomes a [`PluginDescriptor`] whose enablement predicate is built from
//! its gating fields.

use std::path::Path;
use std::str::FromStr;

use plugboard_core::PlugboardError;
use plugboard_core::types::{MountKind, MountPoint, PluginId};
use serde::{Deserialize, Serialize};

use crate::descriptor::{EnablePredicate, PluginDescriptor};

/// Parsed plugin manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginManifest {
    /// Unique plugin id (e.g., "projector").
    pub id: PluginId,
    /// Tab label shown in the dashboard.
    pub display_name: String,
    /// Where and how the rendering unit attaches.
    pub mount_point: MountPoint,
    /// Feature flag that must be set for the plugin to be enabled.
    pub requires_flag: Option<String>,
    /// Boolean setting that must be true for the plugin to be enabled.
    pub requires_setting: Option<String>,
    /// Experimental plugins are off until the user opts in by id.
    pub experimental: bool,
    /// Host versions this plugin supports (e.g., ">=0.1, <0.3").
    pub min_host_version: Option<String>,
}

/// Intermediate TOML deserialization struct for `plugin.toml`.
#[derive(Debug, Deserialize)]
struct PluginManifestFile {
    plugin: PluginSection,
}

/// The `[plugin]` section of a `plugin.toml` file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PluginSection {
    id: String,
    #[serde(default)]
    display_name: Option<String>,
    mount: String,
    element_name: Option<String>,
    module_path: Option<String>,
    url: Option<String>,
    requires_flag: Option<String>,
    requires_setting: Option<String>,
    #[serde(default)]
    experimental: bool,
    min_host_version: Option<String>,
}

/// Parse a plugin manifest from TOML content.
///
/// Validates that the id is non-empty, the mount kind is known, the field
/// that kind needs is present, and the host version requirement (if any)
/// accepts this build.
pub fn parse_plugin_manifest(toml_content: &str) -> Result<PluginManifest, PlugboardError> {
    let file: PluginManifestFile =
        toml::from_str(toml_content).map_err(|e| PlugboardError::Manifest(e.to_string()))?;

    let section = file.plugin;

    if section.id.trim().is_empty() {
        return Err(PlugboardError::Manifest("id must not be empty".to_string()));
    }

    let kind = MountKind::from_str(&section.mount).map_err(|_| {
        PlugboardError::Manifest(format!(
            "invalid mount '{}'. Expected one of: element, iframe, bundle, none",
            section.mount
        ))
    })?;

    let mount_point = match kind {
        MountKind::Element => MountPoint::Element {
            element_name: required(section.element_name, "element_name", kind)?,
        },
        MountKind::Iframe => MountPoint::Iframe {
            module_path: required(section.module_path, "module_path", kind)?,
        },
        MountKind::Bundle => MountPoint::Bundle {
            url: required(section.url, "url", kind)?,
        },
        MountKind::None => MountPoint::None,
    };

    if let Some(req) = &section.min_host_version {
        check_host_version(req)?;
    }

    let display_name = section
        .display_name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| section.id.clone());

    Ok(PluginManifest {
        id: PluginId::new(section.id),
        display_name,
        mount_point,
        requires_flag: section.requires_flag,
        requires_setting: section.requires_setting,
        experimental: section.experimental,
        min_host_version: section.min_host_version,
    })
}

/// Read and parse a `plugin.toml` from disk.
pub fn load_plugin_manifest(path: &Path) -> Result<PluginManifest, PlugboardError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        PlugboardError::Manifest(format!("cannot read {}: {e}", path.display()))
    })?;
    parse_plugin_manifest(&content)
}

fn required(value: Option<String>, field: &str, kind: MountKind) -> Result<String, PlugboardError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(PlugboardError::Manifest(format!(
            "mount '{kind}' requires a non-empty `{field}`"
        ))),
    }
}

fn check_host_version(requirement: &str) -> Result<(), PlugboardError> {
    let req = semver::VersionReq::parse(requirement).map_err(|e| {
        PlugboardError::Manifest(format!("invalid min_host_version '{requirement}': {e}"))
    })?;
    let host = semver::Version::parse(env!("CARGO_PKG_VERSION"))
        .map_err(|e| PlugboardError::Internal(format!("host version: {e}")))?;
    if !req.matches(&host) {
        return Err(PlugboardError::Manifest(format!(
            "plugin requires host {requirement}, this is {host}"
        )));
    }
    Ok(())
}

impl PluginManifest {
    /// Build the descriptor this manifest declares.
    pub fn to_descriptor(&self) -> PluginDescriptor {
        let mut predicate = EnablePredicate::always();
        if let Some(flag) = &self.requires_flag {
            predicate = predicate.and(EnablePredicate::flag(flag.clone()));
        }
        if let Some(key) = &self.requires_setting {
            predicate = predicate.and(EnablePredicate::setting(key.clone()));
        }
        if self.experimental {
            predicate = predicate.and(EnablePredicate::experimental(self.id.clone()));
        }

        PluginDescriptor::new(self.id.clone(), self.display_name.clone())
            .with_mount_point(self.mount_point.clone())
            .with_predicate(predicate)
    }
}
