// SPDX-FileCopyrightText: 2026 Plugboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the `plugboard` binary.
//!
//! Each test writes its own config file and passes it with `--config`, so
//! no user or system configuration is read.

use std::io::Write;
use std::process::{Command, Output};

use tempfile::{NamedTempFile, TempDir};

fn config_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn plugboard(config: &NamedTempFile, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_plugboard"))
        .arg("--config")
        .arg(config.path())
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn resolve_mounts_default_plugin() {
    let config = config_file("");
    let output = plugboard(&config, &["resolve", "--json"]);
    assert!(output.status.success());

    let outcome: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(outcome["plugin_id"], "scalars");
    assert_eq!(outcome["mount"], "element");
}

#[test]
fn resolve_restores_configured_selection() {
    let config = config_file("[activation]\nlast_selection = \"images\"\n");
    let output = plugboard(&config, &["resolve"]);
    assert!(output.status.success());
    assert!(stdout(&output).starts_with("images\t"));
}

#[test]
fn resolve_applies_selection_and_flags() {
    let config = config_file("");
    let output = plugboard(
        &config,
        &["resolve", "--flag", "enable_debugger=true", "--select", "debugger-v2", "--json"],
    );
    assert!(output.status.success());

    let outcome: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(outcome["plugin_id"], "debugger-v2");
}

#[test]
fn resolve_with_nothing_available_prints_placeholder() {
    let config = config_file("[activation]\nknown_plugins = [\"debugger-v2\"]\n");
    let output = plugboard(&config, &["resolve"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "(no active plugin)");
}

#[test]
fn list_json_reports_enablement() {
    let config = config_file("[flags.values]\nin_colab = true\n");
    let output = plugboard(&config, &["list", "--json"]);
    assert!(output.status.success());

    let rows: Vec<serde_json::Value> = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(rows[0]["id"], "scalars");
    let projector = rows.iter().find(|r| r["id"] == "projector").unwrap();
    assert_eq!(projector["enabled"], false);
    let debugger = rows.iter().find(|r| r["id"] == "debugger-v2").unwrap();
    assert_eq!(debugger["enabled"], false);
}

#[test]
fn manifest_plugin_is_listed_after_builtins() {
    let dir = TempDir::new().unwrap();
    let manifest = dir.path().join("plugin.toml");
    std::fs::write(
        &manifest,
        "[plugin]\nid = \"pr_curves\"\ndisplay_name = \"PR Curves\"\nmount = \"element\"\nelement_name = \"tf-pr-curve-dashboard\"\n",
    )
    .unwrap();

    let config = config_file("");
    let output = plugboard(&config, &["list", "--json", "--manifest", manifest.to_str().unwrap()]);
    assert!(output.status.success());

    let rows: Vec<serde_json::Value> = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(rows.last().unwrap()["id"], "pr_curves");
}

#[test]
fn invalid_config_exits_with_error() {
    let config = config_file("[dashboard]\nlog_levl = \"debug\"\n");
    let output = plugboard(&config, &["list"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("log_level"));
}

#[test]
fn config_command_prints_effective_config() {
    let config = config_file("[dashboard]\nname = \"lab\"\n");
    let output = plugboard(&config, &["config"]);
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("name = \"lab\""));
    assert!(out.contains("container = \"plugins-container\""));
}

#[test]
fn env_overrides_are_applied() {
    let config = config_file("");
    let output = Command::new(env!("CARGO_BIN_EXE_plugboard"))
        .arg("--config")
        .arg(config.path())
        .args(["resolve", "--json"])
        .env_remove("RUST_LOG")
        .env("PLUGBOARD_DASHBOARD_LOG_LEVEL", "debug")
        .env("PLUGBOARD_ACTIVATION_LAST_SELECTION", "images")
        .output()
        .unwrap();
    assert!(output.status.success());

    let outcome: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(outcome["plugin_id"], "images");
}
