// SPDX-FileCopyrightText: 2026 Bhojan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bhojan - conversational food ordering over WhatsApp.
//!
//! This is the binary entry point for the bhojan service.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use bhojan_config::BhojanConfig;
use bhojan_engine::{Engine, EngineConfig};
use bhojan_gateway::{GatewayState, ServerConfig};
use bhojan_storage::SqliteStore;
use bhojan_whatsapp::WhatsAppChannel;

/// Bhojan - conversational food ordering over WhatsApp.
#[derive(Parser, Debug)]
#[command(name = "bhojan", version, about, long_about = None)]
struct Cli {
    /// Path to an explicit config file (defaults to the XDG hierarchy).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the webhook gateway and ordering engine.
    Serve,
    /// Load the configuration, validate it, and print a summary.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            bhojan_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config);

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(error) = serve(config).await {
                tracing::error!(%error, "service failed");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => {
            println!(
                "bhojan: config ok (service.name={}, storage.database_path={}, gateway={}:{})",
                config.service.name,
                config.storage.database_path,
                config.gateway.host,
                config.gateway.port
            );
        }
        None => {
            println!("bhojan: use --help for available commands");
        }
    }
}

fn load_config(
    path: Option<&std::path::Path>,
) -> Result<BhojanConfig, Vec<bhojan_config::ConfigError>> {
    match path {
        Some(path) => bhojan_config::load_and_validate_path(path),
        None => bhojan_config::load_and_validate(),
    }
}

fn init_tracing(config: &BhojanConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.service.log_level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn serve(config: BhojanConfig) -> Result<(), bhojan_core::BhojanError> {
    let store = Arc::new(
        SqliteStore::open(&config.storage.database_path, config.storage.wal_mode).await?,
    );

    if config.messaging.account_sid.is_none() {
        tracing::warn!("messaging credentials not set; outbound sends will fail");
    }
    let channel = WhatsAppChannel::new(
        config.messaging.account_sid.clone(),
        config.messaging.auth_token.clone(),
        config.messaging.sender.clone(),
    )?;

    let engine_config = EngineConfig {
        search_radius_km: config.engine.search_radius_km,
        location_cache_minutes: config.engine.location_cache_minutes,
        qr_window_secs: config.engine.qr_window_secs,
        frontend_base: config.engine.frontend_base.clone(),
        maps_base: config.engine.maps_base.clone(),
    };
    let engine = Engine::new(
        engine_config,
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        Arc::new(channel),
    );

    let state = GatewayState {
        engine: Arc::new(engine),
        restaurants: store,
        bot_number: bhojan_gateway::server::bot_number_from_sender(&config.messaging.sender),
    };
    let server_config = ServerConfig {
        host: config.gateway.host.clone(),
        port: config.gateway.port,
    };
    bhojan_gateway::start_server(&server_config, state).await
}

#[cfg(test)]
mod tests {
    #[test]
    fn binary_loads_config_defaults() {
        // Verify config loads with defaults (no config file needed)
        let config = bhojan_config::load_and_validate()
            .expect("default config should be valid");
        assert_eq!(config.service.name, "bhojan");
    }
}
