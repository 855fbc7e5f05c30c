//! # Document Search Engine Main Driver
//!
//! ## Purpose
//! Main entry point for the document search server. Orchestrates component
//! initialization and starts the HTTP command surface.
//!
//! ## Architecture Flow
//! 1. Parse command line arguments and load configuration
//! 2. Initialize logging and tracing
//! 3. Open storage and replay the persisted corpus into the index
//! 4. Start the API server
//! 5. Handle shutdown signals gracefully

use clap::{Arg, Command};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use trie_doc_search::{
    api::ApiServer,
    config::Config,
    engine::SearchEngine,
    errors::{EngineError, Result},
    storage::StorageManager,
    AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("doc-search-server")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Trie-structured document search engine with frequency-ranked queries")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("config.toml"),
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .help("Server port")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("check-health")
                .long("check-health")
                .help("Run health checks and exit")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let config_path = matches.get_one::<String>("config").unwrap();
    let mut config = Config::from_file(config_path)?;

    if let Some(port) = matches.get_one::<u16>("port") {
        config.server.port = *port;
    }

    let config = Arc::new(config);

    init_logging(&config)?;

    info!("Starting document search engine v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration loaded from: {}", config_path);

    let app_state = initialize_components(config.clone()).await?;

    if matches.get_flag("check-health") {
        app_state.engine.health_check().await?;
        info!("All health checks passed");
        return Ok(());
    }

    let server = ApiServer::new(app_state.clone()).await?;
    let server_handle = tokio::spawn(async move {
        if let Err(e) = server.run().await {
            error!("Server error: {}", e);
        }
    });

    info!(
        "Document search engine started on {}:{}",
        config.server.host, config.server.port
    );

    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Received SIGINT, shutting down gracefully...");
        }
        _ = server_handle => {
            warn!("Server stopped unexpectedly");
        }
    }

    app_state.storage.flush().await?;
    info!("Document search engine shut down");

    Ok(())
}

/// Initialize logging and tracing
fn init_logging(config: &Config) -> Result<()> {
    let log_level: tracing::Level =
        config.logging.level.parse().map_err(|_| EngineError::Config {
            message: format!("Invalid log level: {}", config.logging.level),
        })?;
    let filter = tracing_subscriber::filter::LevelFilter::from_level(log_level);

    if config.logging.json_format {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .json()
                    .with_filter(filter),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_filter(filter),
            )
            .init();
    }

    info!("Logging initialized with level: {}", config.logging.level);
    Ok(())
}

/// Initialize all application components
async fn initialize_components(config: Arc<Config>) -> Result<AppState> {
    info!("Initializing storage manager...");
    let storage = Arc::new(StorageManager::new(config.storage.clone()).await?);

    info!("Initializing search engine...");
    let engine = Arc::new(SearchEngine::new(config.clone(), storage.clone()).await?);

    engine.health_check().await?;
    info!("All components initialized successfully");

    Ok(AppState {
        config,
        engine,
        storage,
    })
}
