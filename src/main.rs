//! Socratic server
//!
//! Loads `.env` and the configuration file, installs logging, then either
//! serves the review API or writes a default configuration file.

mod cli;
mod logging;

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info};

use socratic_api::{ApiConfig, ApiServer};
use socratic_core::config::ConfigFormat;
use socratic_core::{create_provider, AppConfig, ConfigManager, ConversationRelay};

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv = dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command() {
        Command::Serve { host, port } => {
            let mut manager = open_config(cli.config.as_ref())?;
            manager.apply_logging_env_overrides();
            let _guards = logging::init_logging(&manager.get_config().logging)?;

            if let Some(path) = dotenv {
                debug!("Loaded environment from {:?}", path);
            }
            if manager.config_exists() {
                info!("Loaded configuration from {:?}", manager.get_config_path());
            } else {
                info!(
                    "No configuration file at {:?}, using defaults",
                    manager.get_config_path()
                );
            }

            // Rejected overrides are only visible once the subscriber exists
            manager.apply_env_overrides();
            apply_cli_overrides(manager.get_config_mut(), host, port);
            manager
                .validate_config()
                .context("Invalid configuration")?;

            serve(manager.into_config()).await
        }
        Command::InitConfig { format, force } => init_config(cli.config, &format, force),
    }
}

fn open_config(path: Option<&PathBuf>) -> Result<ConfigManager> {
    match path {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new(),
    }
}

fn apply_cli_overrides(config: &mut AppConfig, host: Option<String>, port: Option<u16>) {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
}

async fn serve(config: AppConfig) -> Result<()> {
    let provider = create_provider(&config.provider)?;
    info!(
        "Using {} provider, model {}",
        provider.provider_name(),
        config.provider.model
    );

    let relay = ConversationRelay::new(provider, config.provider.max_tokens);
    let server = ApiServer::new(ApiConfig::from(&config.server), relay);
    server.start().await
}

fn init_config(path: Option<PathBuf>, format: &str, force: bool) -> Result<()> {
    let path = match path {
        Some(path) => path,
        None => ConfigManager::default_config_path(format.parse::<ConfigFormat>()?)?,
    };

    if path.exists() && !force {
        bail!("{:?} already exists (use --force to overwrite)", path);
    }

    ConfigManager::defaults_at(&path)?.save_config()?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}
