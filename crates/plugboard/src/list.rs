// SPDX-FileCopyrightText: 2026 Plugboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `plugboard list` command implementation.

use std::io::IsTerminal;

use plugboard_config::PlugboardConfig;
use plugboard_core::PlugboardError;
use plugboard_plugin::PluginRegistry;
use serde::Serialize;

/// One row of `plugboard list` output.
#[derive(Debug, Serialize)]
pub struct PluginListing {
    pub id: String,
    pub display_name: String,
    pub mount: String,
    pub enabled: bool,
    pub known: bool,
    pub predicate: String,
}

/// Describe every registered plugin, in registration order, under the
/// configured flags and settings.
pub fn listings(config: &PlugboardConfig, registry: &PluginRegistry) -> Vec<PluginListing> {
    let flags = config.feature_flags();
    let settings = config.settings();
    let known = config.initial_snapshot(registry.list()).activation.known_plugin_ids;

    registry
        .descriptors()
        .map(|d| PluginListing {
            id: d.id().to_string(),
            display_name: d.display_name().to_string(),
            mount: d.mount_point().to_string(),
            enabled: d.is_enabled(&flags, &settings),
            known: known.contains(d.id()),
            predicate: d.predicate().label().to_string(),
        })
        .collect()
}

/// Run the `plugboard list` command.
pub fn run_list(
    config: &PlugboardConfig,
    registry: &PluginRegistry,
    json: bool,
    plain: bool,
) -> Result<(), PlugboardError> {
    let rows = listings(config, registry);

    if json {
        let out = serde_json::to_string_pretty(&rows)
            .map_err(|e| PlugboardError::Internal(format!("failed to serialize listing: {e}")))?;
        println!("{out}");
        return Ok(());
    }

    let use_color = !plain && std::io::stdout().is_terminal();
    println!();
    println!("  {} plugins", config.dashboard.name);
    println!("  {}", "-".repeat(50));
    for row in &rows {
        print_row(row, use_color);
    }
    println!();
    Ok(())
}

fn print_row(row: &PluginListing, use_color: bool) {
    let available = row.enabled && row.known;
    let note = if !row.known {
        " (not available)".to_string()
    } else if !row.enabled {
        format!(" (disabled: {})", row.predicate)
    } else {
        String::new()
    };

    if use_color {
        use colored::Colorize;
        let mark = if available { "✓".green() } else { "✗".red() };
        println!(
            "    {mark} {:<16} {:<18} {}{}",
            row.id,
            row.display_name,
            row.mount.dimmed(),
            note.dimmed()
        );
    } else {
        let mark = if available { "[ON] " } else { "[OFF]" };
        println!("    {mark} {:<16} {:<18} {}{}", row.id, row.display_name, row.mount, note);
    }
}
