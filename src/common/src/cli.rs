use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Common CLI arguments shared by the adapter binaries
#[derive(Parser, Debug, Clone)]
pub struct CommonArgs {
    #[arg(long, help = "Configuration file path")]
    pub config: Option<PathBuf>,

    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, help = "Enable quiet mode (minimal output)")]
    pub quiet: bool,
}

/// Common subcommands
#[derive(Subcommand, Debug, Clone, Default)]
pub enum CommonCommands {
    /// Start the adapter (default behavior)
    #[default]
    Start,
    /// Show current configuration and exit
    Config {
        #[arg(long, help = "Show configuration in JSON format")]
        json: bool,
    },
    /// Validate configuration and exit
    Validate,
    /// Show version information and exit
    Version,
}

/// Utility functions for CLI operations
pub mod utils {
    use super::*;
    use crate::config::Configuration;
    use anyhow::{Context, Result};
    use tracing_subscriber::EnvFilter;

    /// Initialize logging based on CLI arguments
    ///
    /// `RUST_LOG` wins over the level derived from the flags when it is set.
    pub fn init_logging(args: &CommonArgs) {
        let level = if args.quiet {
            "warn"
        } else if args.verbose {
            "debug"
        } else {
            "info"
        };

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    /// Load configuration with optional override from CLI
    pub fn load_config(config_path: Option<&PathBuf>) -> Result<Configuration> {
        match config_path {
            Some(path) => {
                tracing::info!("Loading configuration from: {}", path.display());
                Configuration::load_from_path(path).context("Failed to load configuration")
            }
            None => Configuration::load().context("Failed to load configuration"),
        }
    }

    /// Display configuration in human-readable or JSON format
    pub fn display_config(config: &Configuration, json: bool) -> Result<()> {
        if json {
            let json = serde_json::to_string_pretty(config)
                .context("Failed to serialize configuration to JSON")?;
            println!("{json}");
        } else {
            println!("CrateDB Adapter Configuration:");
            println!("==============================");
            println!("Listen address: {}", config.server.listen_address);
            println!("Store URL: {}", config.store.url);
            println!("Store table: {}", config.store.table);
            println!("Store timeout: {:?}", config.store.timeout);
        }
        Ok(())
    }

    /// Accept Go-style `:port` listen addresses by binding all interfaces
    pub fn normalize_listen_address(address: &str) -> String {
        if address.starts_with(':') {
            format!("0.0.0.0{address}")
        } else {
            address.to_string()
        }
    }

    /// Whether `address` has the `host:port` form a listener can bind to
    ///
    /// The host is not resolved here, name lookup happens when binding.
    pub fn is_valid_listen_address(address: &str) -> bool {
        match address.rsplit_once(':') {
            Some((host, port)) => !host.is_empty() && port.parse::<u16>().is_ok(),
            None => false,
        }
    }

    /// Whether `table` can be used unquoted as a (schema-qualified) table name
    pub fn is_valid_table_name(table: &str) -> bool {
        let parts: Vec<&str> = table.split('.').collect();
        if parts.len() > 2 {
            return false;
        }
        parts.iter().all(|part| {
            let mut chars = part.chars();
            matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
    }

    /// Validate configuration and report any issues
    pub fn validate_config(config: &Configuration) -> Result<()> {
        tracing::info!("Validating configuration...");

        if !is_valid_listen_address(&config.server.listen_address) {
            anyhow::bail!(
                "Listen address {:?} is not a host:port address",
                config.server.listen_address
            );
        }

        let url = url::Url::parse(&config.store.url)
            .with_context(|| format!("Store URL {:?} is not a valid URL", config.store.url))?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("Store URL must use http or https, got {}", url.scheme());
        }

        if !is_valid_table_name(&config.store.table) {
            anyhow::bail!(
                "Store table {:?} is not a plain SQL identifier",
                config.store.table
            );
        }

        if config.store.timeout.is_zero() {
            anyhow::bail!("Store timeout cannot be zero");
        }

        tracing::info!("Configuration validation passed");
        Ok(())
    }

    /// Handle common CLI commands that don't require starting the adapter
    pub fn handle_common_command(command: &CommonCommands, config: &Configuration) -> Result<bool> {
        match command {
            CommonCommands::Config { json } => {
                display_config(config, *json)?;
                Ok(true)
            }
            CommonCommands::Validate => {
                validate_config(config)?;
                Ok(true)
            }
            CommonCommands::Version => {
                println!("{}", version_info());
                Ok(true)
            }
            CommonCommands::Start => Ok(false),
        }
    }

    /// Standard version information
    pub fn version_info() -> String {
        format!(
            "{} {} ({})",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            env!("CARGO_PKG_RUST_VERSION")
        )
    }
}
