// crates/rpc-expose-cli/src/main.rs
//
// CLI entrypoint for the rpc-expose developer tools.
//
// Loads a resource manifest, builds the domain and router, and answers
// questions about exposure, procedures and dispatch plans.

mod commands;
mod config;
mod output;

use clap::{Parser, Subcommand};

use commands::route::RouteCmd;
use config::{expand_tilde, CliConfig, DEFAULT_CONFIG_PATH};
use output::OutputFormat;
use rpc_expose_core::Manifest;
use rpc_expose_router::{Domain, Router};

/// rpc-expose CLI: inspect RPC exposure metadata for resources.
#[derive(Parser, Debug)]
#[command(
    name = "rpc-expose",
    version,
    about = "Inspect which resource actions are exposed as RPC procedures"
)]
struct Cli {
    /// Path to the CLI config file.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Path to the resource manifest (overrides the config file).
    #[arg(long, global = true)]
    manifest: Option<String>,

    /// Output format (overrides the config file).
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
enum Commands {
    /// List resources and their exposure settings.
    Resources,

    /// List the procedures declared on a resource.
    Procedures {
        /// Resource name or external alias.
        resource: String,
    },

    /// Report how one action of a resource is treated.
    Check {
        /// Resource name or external alias.
        resource: String,
        /// Action name.
        action: String,
    },

    /// Show the dispatch plan for a procedure call.
    Route(RouteCmd),
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // A missing config file is normal; fall back to defaults.
    let (cli_config, config_error) = match CliConfig::load(&cli.config) {
        Ok(cfg) => (cfg, None),
        Err(e) => (CliConfig::default(), Some(e.to_string())),
    };

    // Initialize tracing subscriber for structured logging.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli_config.log_level)),
        )
        .init();

    match config_error {
        None => tracing::debug!("Loaded configuration from {}", cli.config),
        Some(e) => tracing::debug!(
            "Could not load config from {}: {}. Using defaults.",
            cli.config,
            e
        ),
    }

    let manifest_path = expand_tilde(cli.manifest.as_deref().unwrap_or(&cli_config.manifest));
    let format = cli.format.unwrap_or(cli_config.format);

    let manifest = Manifest::load(&manifest_path)?;
    let router = Router::new(Domain::from_manifest(manifest)?);

    match &cli.command {
        Commands::Resources => commands::resources::run(&router, format)?,
        Commands::Procedures { resource } => commands::procedures::run(&router, resource, format)?,
        Commands::Check { resource, action } => {
            commands::check::run(&router, resource, action, format)?
        }
        Commands::Route(cmd) => commands::route::run(&router, cmd, format)?,
    }

    Ok(())
}
