//! VinLens command-line entry point.
//!
//! Logs go to stderr so stdout carries only the JSON report.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use vinlens_core::AppConfig;
use vinlens_lookup::{LookupError, LookupOrchestrator};
use vinlens_provider::{ProviderError, ProviderLoader, ProviderRegistry};

/// Exit status for a rejected VIN or an unknown provider name.
const EXIT_USAGE: u8 = 2;

#[derive(Debug, Parser)]
#[command(
    name = "vinlens",
    about = "Look up a vehicle by VIN across third-party decoder sites",
    version
)]
struct Cli {
    /// Configuration file (defaults to the platform config directory).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory of provider definitions (overrides configuration).
    #[arg(long, global = true)]
    definitions: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Query providers for a VIN and print the JSON report.
    Lookup {
        /// 17-character Vehicle Identification Number.
        vin: String,

        /// Only query this provider (repeatable).
        #[arg(short, long = "provider", value_name = "NAME")]
        providers: Vec<String>,

        /// Print the report on a single line.
        #[arg(long)]
        compact: bool,
    },

    /// List the provider catalog.
    Providers,
}

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,vinlens=debug"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    AppConfig::load_with_env(path).context("failed to load config")
}

fn load_registry(definitions_dir: Option<&Path>) -> Result<ProviderRegistry> {
    match definitions_dir {
        Some(dir) => {
            let loader = ProviderLoader::new(dir)
                .with_context(|| format!("cannot open definitions in {}", dir.display()))?;
            ProviderRegistry::load_from(&loader).context("failed to load provider definitions")
        }
        None => ProviderRegistry::builtin().context("failed to load built-in providers"),
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let definitions_dir = cli
        .definitions
        .as_deref()
        .or(config.providers.definitions_dir.as_deref());
    let registry = load_registry(definitions_dir)?;

    match cli.command {
        Commands::Providers => {
            for provider in registry.list_providers() {
                println!(
                    "{}\t{}\t{} {}",
                    provider.name(),
                    provider.display_name(),
                    provider.method(),
                    provider.endpoint()
                );
            }
        }
        Commands::Lookup {
            vin,
            providers,
            compact,
        } => {
            // Command-line selection wins over the configured one
            let selection = if providers.is_empty() {
                config.providers.enabled.clone()
            } else {
                providers
            };

            let orchestrator = LookupOrchestrator::from_config(Arc::new(registry), &config.lookup)?;
            let report = orchestrator.lookup_selected(&vin, &selection).await?;

            let json = if compact {
                serde_json::to_string(&report)?
            } else {
                serde_json::to_string_pretty(&report)?
            };
            println!("{json}");
        }
    }

    Ok(())
}

/// Map a failure to the process exit status.
fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<LookupError>() {
        Some(LookupError::InvalidVin(_) | LookupError::Provider(ProviderError::NotFound { .. })) => {
            EXIT_USAGE
        }
        _ => 1,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    info!("Starting VinLens v{}", env!("CARGO_PKG_VERSION"));

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            eprintln!("error: {err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}
