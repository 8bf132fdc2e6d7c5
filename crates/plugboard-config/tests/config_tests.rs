// SPDX-FileCopyrightText: 2026 Plugboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Plugboard configuration system.

use std::io::Write;

use plugboard_config::diagnostic::ConfigError;
use plugboard_config::model::PlugboardConfig;
use plugboard_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};
use plugboard_core::types::PluginId;

#[test]
fn valid_toml_deserializes_into_config() {
    let toml = r#"
[dashboard]
name = "training"
log_level = "debug"
container = "main-region"

[flags]
enabled_experimental_plugins = ["custom_scalars"]

[flags.values]
enable_debugger = true

[settings]
in_colab = false
theme = "dark"

[activation]
last_selection = "images"
known_plugins = ["scalars", "images"]

[plugins]
manifests = ["/opt/plugins/pr_curves/plugin.toml"]
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.dashboard.name, "training");
    assert_eq!(config.dashboard.container, "main-region");
    assert_eq!(config.flags.enabled_experimental_plugins, vec!["custom_scalars"]);
    assert_eq!(config.flags.values.get("enable_debugger"), Some(&true));
    assert_eq!(config.activation.last_selection.as_deref(), Some("images"));
    assert_eq!(config.plugins.manifests.len(), 1);

    let flags = config.feature_flags();
    assert!(flags.is_set("enable_debugger"));
    assert!(flags.is_experimental_enabled(&PluginId::from("custom_scalars")));

    let settings = config.settings();
    assert!(!settings.get_bool("in_colab"));
    assert_eq!(settings.get("theme"), Some(&serde_json::json!("dark")));
}

#[test]
fn empty_config_uses_defaults() {
    let config = load_and_validate_str("").expect("defaults are valid");
    assert_eq!(config.dashboard.name, "plugboard");
    assert_eq!(config.dashboard.log_level, "info");
    assert_eq!(config.dashboard.container, "plugins-container");
    assert!(config.activation.known_plugins.is_empty());
}

#[test]
fn unknown_key_suggests_correction() {
    let toml = "[dashboard]\ncontaner = \"x\"\n";
    let errors = load_and_validate_str(toml).unwrap_err();
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        ConfigError::UnknownKey {
            key,
            suggestion,
            valid_keys,
            ..
        } => {
            assert_eq!(key, "contaner");
            assert_eq!(suggestion.as_deref(), Some("container"));
            assert!(valid_keys.contains("log_level"));
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

#[test]
fn unknown_section_is_rejected() {
    let errors = load_and_validate_str("[renderer]\nmode = \"gl\"\n").unwrap_err();
    assert!(matches!(&errors[0], ConfigError::UnknownKey { key, .. } if key == "renderer"));
}

#[test]
fn wrong_type_is_reported() {
    let errors = load_and_validate_str("[flags.values]\nenable_debugger = \"yes\"\n").unwrap_err();
    assert!(matches!(&errors[0], ConfigError::InvalidType { .. }));
}

#[test]
fn validation_errors_are_collected() {
    let toml = r#"
[dashboard]
log_level = "chatty"
container = ""

[activation]
known_plugins = ["scalars", "scalars"]
"#;
    let errors = load_and_validate_str(toml).unwrap_err();
    assert_eq!(errors.len(), 3);
    assert!(errors.iter().all(|e| matches!(e, ConfigError::Validation { .. })));
}

#[test]
fn initial_snapshot_falls_back_to_registered_ids() {
    let config = PlugboardConfig::default();
    let snapshot = config.initial_snapshot(vec!["scalars".into(), "images".into()]);
    assert_eq!(
        snapshot.activation.known_plugin_ids,
        vec![PluginId::from("scalars"), PluginId::from("images")]
    );
    assert_eq!(snapshot.activation.last_user_selection, None);
}

#[test]
fn initial_snapshot_uses_configured_state() {
    let toml = "[activation]\nlast_selection = \"images\"\nknown_plugins = [\"images\"]\n";
    let config = load_and_validate_str(toml).unwrap();
    let snapshot = config.initial_snapshot(vec!["scalars".into(), "images".into()]);
    assert_eq!(snapshot.activation.known_plugin_ids, vec![PluginId::from("images")]);
    assert_eq!(snapshot.activation.last_user_selection, Some("images".into()));
    assert_eq!(snapshot.activation.active_plugin_id, None);
}

#[test]
#[serial_test::serial]
fn loads_explicit_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[dashboard]\nname = \"from-file\"").unwrap();

    let config = load_and_validate_path(file.path()).unwrap();
    assert_eq!(config.dashboard.name, "from-file");
}

#[test]
#[serial_test::serial]
fn explicit_path_errors_suggest_keys() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[activation]\nlast_selecton = \"images\"").unwrap();

    let errors = load_and_validate_path(file.path()).unwrap_err();
    match &errors[0] {
        ConfigError::UnknownKey { suggestion, .. } => {
            assert_eq!(suggestion.as_deref(), Some("last_selection"));
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}
