// SPDX-FileCopyrightText: 2026 Plugboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `plugboard resolve` command implementation.
//!
//! Runs the activation pipeline once against a headless host: seed an
//! in-memory store from configuration, let the container mount whatever
//! resolves, optionally apply a user selection, and report the outcome.

use std::sync::Arc;

use plugboard_config::PlugboardConfig;
use plugboard_container::{HeadlessHost, MemoryStore, PluginsContainer};
use plugboard_core::store::{Action, StateStore};
use plugboard_core::types::{ContainerHandle, FeatureFlags};
use plugboard_core::PlugboardError;
use plugboard_plugin::PluginRegistry;
use serde::Serialize;
use tracing::debug;

/// Command-line inputs for `plugboard resolve`.
#[derive(Debug, Default)]
pub struct ResolveOptions {
    pub select: Option<String>,
    pub flags: Vec<String>,
    pub json: bool,
}

/// What the container ended up showing.
#[derive(Debug, Serialize, PartialEq)]
pub struct ResolveOutcome {
    pub plugin_id: Option<String>,
    pub display_name: Option<String>,
    pub mount: Option<String>,
    pub generation: u64,
    pub error: Option<String>,
}

/// Parse `NAME` or `NAME=BOOL`.
pub fn parse_flag(raw: &str) -> Result<(String, bool), PlugboardError> {
    let (name, value) = match raw.split_once('=') {
        Some((name, value)) => {
            let value = value.trim().parse::<bool>().map_err(|_| {
                PlugboardError::Config(format!("flag `{name}` expects true or false, got `{value}`"))
            })?;
            (name.trim(), value)
        }
        None => (raw.trim(), true),
    };
    if name.is_empty() {
        return Err(PlugboardError::Config(format!("flag `{raw}` has no name")));
    }
    Ok((name.to_string(), value))
}

fn apply_flag_overrides(mut flags: FeatureFlags, overrides: &[String]) -> Result<FeatureFlags, PlugboardError> {
    for raw in overrides {
        let (name, value) = parse_flag(raw)?;
        flags = flags.with_flag(name, value);
    }
    Ok(flags)
}

/// Deliver store state until the container has nothing left in flight.
async fn drive(container: &mut PluginsContainer<HeadlessHost, MemoryStore>, store: &MemoryStore) {
    loop {
        container.on_state_change(&store.snapshot());
        if !container.settle_next().await {
            break;
        }
    }
}

/// Run the pipeline once and tear it down.
pub async fn run_resolve(
    config: &PlugboardConfig,
    registry: Arc<PluginRegistry>,
    options: ResolveOptions,
) -> Result<ResolveOutcome, PlugboardError> {
    let mut snapshot = config.initial_snapshot(registry.list());
    snapshot.flags = apply_flag_overrides(snapshot.flags, &options.flags)?;

    if let Some(id) = &options.select
        && !registry.contains(id)
    {
        return Err(PlugboardError::Config(format!("unknown plugin `{id}`")));
    }

    let store = MemoryStore::new(snapshot);
    let mut container = PluginsContainer::new(
        Arc::clone(&registry),
        HeadlessHost::new(),
        store.clone(),
        ContainerHandle::new(config.dashboard.container.clone()),
    );

    drive(&mut container, &store).await;
    if let Some(id) = options.select {
        debug!(plugin_id = %id, "applying selection");
        store.dispatch(Action::PluginSelected(id.into()));
        drive(&mut container, &store).await;
    }

    let mounted = container.state().plugin_id().cloned();
    let descriptor = mounted.as_ref().and_then(|id| registry.get(id.as_str()));
    let outcome = ResolveOutcome {
        plugin_id: mounted.as_ref().map(ToString::to_string),
        display_name: descriptor.map(|d| d.display_name().to_string()),
        mount: descriptor.map(|d| d.mount_point().to_string()),
        generation: container.generation(),
        error: container.last_error().map(ToString::to_string),
    };

    container.teardown();
    Ok(outcome)
}

pub fn print_outcome(outcome: &ResolveOutcome, json: bool) {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(outcome).unwrap_or_else(|_| "{}".to_string())
        );
        return;
    }

    match (&outcome.plugin_id, &outcome.display_name, &outcome.mount) {
        (Some(id), Some(name), Some(mount)) => {
            println!("{id}\t{name}\t{mount}");
        }
        _ => match &outcome.error {
            Some(error) => println!("(empty) {error}"),
            None => println!("(no active plugin)"),
        },
    }
}
