// SPDX-FileCopyrightText: 2026 Plugboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugboard - dashboard plugin host.
//!
//! This is the binary entry point.

mod bootstrap;
mod list;
mod resolve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use plugboard_config::PlugboardConfig;
use plugboard_core::PlugboardError;

/// Plugboard - dashboard plugin host.
#[derive(Parser, Debug)]
#[command(name = "plugboard", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the XDG hierarchy.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// List registered plugins and whether they are enabled.
    List {
        /// Output JSON for scripting.
        #[arg(long)]
        json: bool,
        /// Disable colors.
        #[arg(long)]
        plain: bool,
        /// Additional plugin.toml manifests to register.
        #[arg(long = "manifest")]
        manifests: Vec<PathBuf>,
    },
    /// Resolve and mount the active plugin once, headless.
    Resolve {
        /// Select this plugin, as if the user had clicked its tab.
        #[arg(long)]
        select: Option<String>,
        /// Override a feature flag: NAME or NAME=BOOL.
        #[arg(long = "flag", value_name = "NAME[=BOOL]")]
        flags: Vec<String>,
        /// Additional plugin.toml manifests to register.
        #[arg(long = "manifest")]
        manifests: Vec<PathBuf>,
        /// Output JSON for scripting.
        #[arg(long)]
        json: bool,
    },
    /// Validate and print the effective configuration.
    Config,
}

fn load_config(path: Option<&PathBuf>) -> PlugboardConfig {
    let loaded = match path {
        Some(path) => plugboard_config::load_and_validate_path(path),
        None => plugboard_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => config,
        Err(errors) => {
            plugboard_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref());
    init_tracing(&config.dashboard.log_level);

    let result = match cli.command {
        Some(Commands::List {
            json,
            plain,
            manifests,
        }) => run_list(&config, &manifests, json, plain),
        Some(Commands::Resolve {
            select,
            flags,
            manifests,
            json,
        }) => {
            let options = resolve::ResolveOptions {
                select,
                flags,
                json,
            };
            run_resolve(&config, &manifests, options).await
        }
        Some(Commands::Config) => print_config(&config),
        None => {
            println!("plugboard: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run_list(
    config: &PlugboardConfig,
    manifests: &[PathBuf],
    json: bool,
    plain: bool,
) -> Result<(), PlugboardError> {
    let registry = bootstrap::build_registry(config, manifests)?;
    list::run_list(config, &registry, json, plain)
}

async fn run_resolve(
    config: &PlugboardConfig,
    manifests: &[PathBuf],
    options: resolve::ResolveOptions,
) -> Result<(), PlugboardError> {
    let registry = bootstrap::build_registry(config, manifests)?;
    let json = options.json;
    let outcome = resolve::run_resolve(config, registry, options).await?;
    resolve::print_outcome(&outcome, json);
    Ok(())
}

fn print_config(config: &PlugboardConfig) -> Result<(), PlugboardError> {
    let rendered = toml::to_string_pretty(config)
        .map_err(|e| PlugboardError::Config(format!("cannot render configuration: {e}")))?;
    print!("{rendered}");
    Ok(())
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "plugboard={level},plugboard_plugin={level},plugboard_container={level},warn",
            level = log_level.to_ascii_lowercase()
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
