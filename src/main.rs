//! Binary entry point for itemstore.
//!
//! This binary provides the CLI for running and checking the item service.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use itemstore::config::{ItemstoreConfig, StorageBackendKind, parse_bind};
use itemstore::observability::{self, ObservabilityConfig};
use itemstore::services::ItemService;
use itemstore::storage::build_store;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

/// Itemstore - HTTP CRUD service over a composite-key table.
#[derive(Parser)]
#[command(name = "itemstore")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true, env = "ITEMSTORE_CONFIG_PATH")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server.
    Serve {
        /// Listen address, e.g. 0.0.0.0:8080.
        #[arg(short, long)]
        bind: Option<String>,

        /// Storage backend: dynamodb or memory.
        #[arg(long)]
        backend: Option<String>,
    },

    /// Verify that the configured table is reachable.
    Check,

    /// Show the effective configuration.
    Config,
}

fn main() -> ExitCode {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config.with_env_overrides(),
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to start runtime: {e}");
            return ExitCode::FAILURE;
        },
    };

    match runtime.block_on(run_command(cli, config)) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command.
async fn run_command(
    cli: Cli,
    config: ItemstoreConfig,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Serve { bind, backend } => {
            let config = apply_serve_flags(config, bind.as_deref(), backend.as_deref())?;
            observability::init(&ObservabilityConfig::from_config(&config, cli.verbose))?;
            cmd_serve(config).await
        },
        Commands::Check => {
            observability::init(&ObservabilityConfig::from_config(&config, cli.verbose))?;
            cmd_check(&config).await
        },
        Commands::Config => Ok(cmd_config(&config)),
    }
}

/// Loads configuration.
fn load_config(path: Option<&str>) -> itemstore::Result<ItemstoreConfig> {
    match path.filter(|p| !p.trim().is_empty()) {
        Some(path) => ItemstoreConfig::load_from_file(Path::new(path)),
        None => ItemstoreConfig::load_default(),
    }
}

/// Applies `serve` command-line overrides.
fn apply_serve_flags(
    mut config: ItemstoreConfig,
    bind: Option<&str>,
    backend: Option<&str>,
) -> itemstore::Result<ItemstoreConfig> {
    if let Some(bind) = bind {
        config = config.with_bind(parse_bind(bind)?);
    }
    if let Some(backend) = backend {
        config = config.with_backend(StorageBackendKind::parse(backend)?);
    }
    Ok(config)
}

/// Serve command.
async fn cmd_serve(config: ItemstoreConfig) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let store = build_store(&config.storage).await;
    let service = Arc::new(ItemService::connect(store).await);

    itemstore::http::serve(service, config.server.bind).await?;
    Ok(ExitCode::SUCCESS)
}

/// Check command.
async fn cmd_check(config: &ItemstoreConfig) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let store = build_store(&config.storage).await;
    let service = ItemService::connect(store).await;

    if let Some(cause) = service.unavailable_cause() {
        println!(
            "Table '{}' is unavailable: {cause}",
            config.storage.table_name
        );
        return Ok(ExitCode::FAILURE);
    }

    println!(
        "Table '{}' is reachable ({} backend)",
        config.storage.table_name,
        config.storage.backend.as_str()
    );
    Ok(ExitCode::SUCCESS)
}

/// Config command.
fn cmd_config(config: &ItemstoreConfig) -> ExitCode {
    let storage = &config.storage;
    println!("[server]");
    println!("bind = \"{}\"", config.server.bind);
    println!();
    println!("[storage]");
    println!("backend = \"{}\"", storage.backend.as_str());
    println!(
        "endpoint_url = \"{}\"",
        storage.endpoint_url.as_deref().unwrap_or("")
    );
    println!("region = \"{}\"", storage.region);
    println!(
        "access_key_id = \"{}\"",
        storage.access_key_id.as_deref().unwrap_or("")
    );
    println!(
        "secret_access_key = \"{}\"",
        if storage.secret_access_key.is_some() {
            "***REDACTED***"
        } else {
            ""
        }
    );
    println!("table_name = \"{}\"", storage.table_name);
    println!();
    println!("[logging]");
    println!(
        "format = \"{}\"",
        config.logging.format.as_deref().unwrap_or("pretty")
    );
    println!(
        "level = \"{}\"",
        config.logging.level.as_deref().unwrap_or("info")
    );
    println!();
    println!("[metrics]");
    println!("enabled = {}", config.metrics.enabled);
    println!("port = {}", config.metrics.port);
    ExitCode::SUCCESS
}
