// SPDX-FileCopyrightText: 2026 Plugboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in plugin catalog.
//!
//! Descriptors for the dashboards compiled into the Plugboard binary. The
//! catalog order is the registration order, so `scalars` is the default
//! whenever it is available.

use plugboard_core::PlugboardError;
use plugboard_core::types::MountPoint;
use tracing::info;

use crate::descriptor::{EnablePredicate, PluginDescriptor};
use crate::global;

fn element(id: &str, display_name: &str, element_name: &str) -> PluginDescriptor {
    PluginDescriptor::new(id, display_name).with_mount_point(MountPoint::Element {
        element_name: element_name.to_string(),
    })
}

/// Returns descriptors for all built-in dashboards, in registration order.
///
/// - scalars, images, audio, graphs, histograms, text (components)
/// - projector (embedded frame, hidden in notebook environments)
/// - hparams (lazily fetched bundle)
/// - custom_scalars (experimental, opt-in)
/// - debugger-v2 (behind the `enable_debugger` flag)
pub fn builtin_catalog() -> Vec<PluginDescriptor> {
    vec![
        element("scalars", "Scalars", "tf-scalar-dashboard"),
        element("images", "Images", "tf-image-dashboard"),
        element("audio", "Audio", "tf-audio-dashboard"),
        element("graphs", "Graphs", "tf-graph-dashboard"),
        element("histograms", "Histograms", "tf-histogram-dashboard"),
        element("text", "Text", "tf-text-dashboard"),
        PluginDescriptor::new("projector", "Projector")
            .with_mount_point(MountPoint::Iframe {
                module_path: "/data/plugin/projector/index.js".to_string(),
            })
            .with_predicate(EnablePredicate::flag("in_colab").not()),
        PluginDescriptor::new("hparams", "HParams").with_mount_point(MountPoint::Bundle {
            url: "/data/plugin/hparams/bundle.js".to_string(),
        }),
        element("custom_scalars", "Custom Scalars", "tf-custom-scalar-dashboard")
            .with_predicate(EnablePredicate::experimental("custom_scalars")),
        element("debugger-v2", "Debugger V2", "tf-debugger-v2")
            .with_predicate(EnablePredicate::flag("enable_debugger")),
    ]
}

/// Register every built-in descriptor in the process-wide registry.
///
/// Returns the number registered. A duplicate id aborts the remaining
/// registrations, like a plugin module failing to load.
pub fn register_builtins() -> Result<usize, PlugboardError> {
    let catalog = builtin_catalog();
    let count = catalog.len();
    for descriptor in catalog {
        global::register(descriptor)?;
    }
    info!(count, "built-in plugins registered");
    Ok(count)
}
