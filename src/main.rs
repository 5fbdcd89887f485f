use std::sync::Arc;

use adapter::{CrateAdapter, HttpSqlStore, HttpState, create_metrics_registry};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use common::cli::{CommonArgs, CommonCommands, utils};
use tokio::net::TcpListener;
use tracing::{error, info};
use translator::Translator;

#[derive(Parser)]
#[command(name = "cratedb-adapter")]
#[command(about = "Prometheus remote read/write adapter for CrateDB")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    #[command(subcommand)]
    command: Option<AdapterCommands>,

    #[arg(
        long = "web.listen-address",
        help = "Address to listen on for web endpoints"
    )]
    listen_address: Option<String>,

    #[arg(long = "crate.url", help = "URL of the CrateDB SQL HTTP endpoint")]
    crate_url: Option<String>,
}

#[derive(Subcommand)]
enum AdapterCommands {
    #[command(flatten)]
    Common(CommonCommands),
}

impl Default for AdapterCommands {
    fn default() -> Self {
        Self::Common(CommonCommands::Start)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on CLI arguments
    utils::init_logging(&cli.common);

    // Load application configuration, then apply flag overrides
    let mut config = utils::load_config(cli.common.config.as_ref())?;
    let listen_address = cli
        .listen_address
        .unwrap_or_else(|| config.server.listen_address.clone());
    config.server.listen_address = utils::normalize_listen_address(&listen_address);
    if let Some(url) = cli.crate_url {
        config.store.url = url;
    }

    // Handle common commands that don't require starting the adapter
    let command = cli.command.unwrap_or_default();
    let AdapterCommands::Common(ref common_cmd) = command;
    if utils::handle_common_command(common_cmd, &config)? {
        return Ok(());
    }

    utils::validate_config(&config)?;

    info!(
        url = %config.store.url,
        table = %config.store.table,
        "Starting CrateDB adapter"
    );

    let (registry, metrics) =
        create_metrics_registry().context("Failed to create metrics registry")?;
    let store = HttpSqlStore::new(&config.store.url, config.store.timeout)
        .context("Failed to create CrateDB client")?;
    let translator = Translator::new(config.store.table.clone(), metrics.clone());
    let adapter = Arc::new(CrateAdapter::new(Arc::new(store), translator));
    let state = HttpState::new(adapter, metrics, registry);

    let listener = TcpListener::bind(&config.server.listen_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.listen_address))?;

    match adapter::serve(listener, state, shutdown_signal()).await {
        Ok(()) => {
            info!("CrateDB adapter stopped");
            Ok(())
        }
        Err(e) => {
            error!("CrateDB adapter failed: {}", e);
            Err(e.into())
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, stopping HTTP server");
}
