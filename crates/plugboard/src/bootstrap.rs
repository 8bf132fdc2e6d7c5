// SPDX-FileCopyrightText: 2026 Plugboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Startup registration: built-ins first, then manifests.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use plugboard_config::PlugboardConfig;
use plugboard_core::PlugboardError;
use plugboard_plugin::{global, load_plugin_manifest, register_builtins, PluginRegistry};
use tracing::info;

/// Register the built-in catalog and every configured or extra manifest in
/// the process-wide registry, and return a snapshot of it.
///
/// Manifests register after the built-ins, so a built-in is the default
/// whenever one is eligible.
pub fn build_registry(
    config: &PlugboardConfig,
    extra_manifests: &[PathBuf],
) -> Result<Arc<PluginRegistry>, PlugboardError> {
    register_builtins()?;

    let configured = config.plugins.manifests.iter().map(Path::new);
    let extra = extra_manifests.iter().map(PathBuf::as_path);
    for path in configured.chain(extra) {
        let manifest = load_plugin_manifest(path)?;
        info!(plugin_id = %manifest.id, path = %path.display(), "plugin manifest loaded");
        global::register(manifest.to_descriptor())?;
    }

    Ok(global::snapshot())
}
