// SPDX-FileCopyrightText: 2026 Plugboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./plugboard.toml` > `~/.config/plugboard/plugboard.toml`
//! > `/etc/plugboard/plugboard.toml`, with environment variable overrides via
//! the `PLUGBOARD_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::PlugboardConfig;

pub(crate) const SYSTEM_CONFIG: &str = "/etc/plugboard/plugboard.toml";
pub(crate) const LOCAL_CONFIG: &str = "plugboard.toml";

/// `~/.config/plugboard/plugboard.toml`, if the platform has a config dir.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("plugboard/plugboard.toml"))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/plugboard/plugboard.toml`
/// 3. `~/.config/plugboard/plugboard.toml`
/// 4. `./plugboard.toml`
/// 5. `PLUGBOARD_*` environment variables
pub fn load_config() -> Result<PlugboardConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<PlugboardConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PlugboardConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<PlugboardConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PlugboardConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// The Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(PlugboardConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG))
        .merge(env_provider())
}

/// Environment provider mapping `PLUGBOARD_SECTION_KEY` to `section.key`.
///
/// Uses `Env::map()` rather than `Env::split("_")`: keys such as
/// `log_level` and `last_selection` contain underscores themselves.
fn env_provider() -> Env {
    Env::prefixed("PLUGBOARD_").map(|key| env_key(key.as_str()).into())
}

/// Section prefixes, longest first so `flags_values_` wins over `flags_`.
const ENV_SECTIONS: &[(&str, &str)] = &[
    ("flags_values_", "flags.values."),
    ("dashboard_", "dashboard."),
    ("activation_", "activation."),
    ("plugins_", "plugins."),
    ("flags_", "flags."),
];

/// Map a prefix-stripped variable name to a config key path. Figment
/// passes the name in its original case.
pub(crate) fn env_key(raw: &str) -> String {
    let key = raw.to_ascii_lowercase();
    for (prefix, section) in ENV_SECTIONS {
        if let Some(rest) = key.strip_prefix(prefix) {
            return format!("{section}{rest}");
        }
    }
    key
}
