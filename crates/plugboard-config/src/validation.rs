// SPDX-FileCopyrightText: 2026 Plugboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::PlugboardConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns every validation error found, not just the first.
pub fn validate_config(config: &PlugboardConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let level = config.dashboard.log_level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "dashboard.log_level `{}` is not one of {}",
                config.dashboard.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.dashboard.container.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "dashboard.container must not be empty".to_string(),
        });
    }

    if config.flags.values.keys().any(|name| name.trim().is_empty()) {
        errors.push(ConfigError::Validation {
            message: "flags.values must not contain an empty flag name".to_string(),
        });
    }

    if config
        .flags
        .enabled_experimental_plugins
        .iter()
        .any(|id| id.trim().is_empty())
    {
        errors.push(ConfigError::Validation {
            message: "flags.enabled_experimental_plugins must not contain empty ids".to_string(),
        });
    }

    if let Some(selection) = &config.activation.last_selection
        && selection.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "activation.last_selection must not be empty when set".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for id in &config.activation.known_plugins {
        if id.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: "activation.known_plugins must not contain empty ids".to_string(),
            });
        } else if !seen.insert(id.as_str()) {
            errors.push(ConfigError::Validation {
                message: format!("activation.known_plugins lists `{id}` more than once"),
            });
        }
    }

    if config.plugins.manifests.iter().any(|p| p.trim().is_empty()) {
        errors.push(ConfigError::Validation {
            message: "plugins.manifests must not contain empty paths".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
