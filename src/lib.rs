pub mod api;
pub mod config;
pub mod models;
pub mod risk;
pub mod source;

use std::sync::Arc;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::api::{start_risk_api_server_on, ApiContext};
use crate::config::{AppConfig, ConfigError};
use crate::risk::DefaultRiskEngine;
use crate::source::JsonDirectorySource;

/// Startup failures. Once serving, request-level errors are `ApiError`s.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Cannot start risk API server: {0}")]
    Server(#[from] std::io::Error),
}

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}

/// Load config, serve the risk API, and block until Ctrl-C has drained it.
pub async fn run() -> Result<(), AppError> {
    init_tracing();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = AppConfig::load()?;
    tracing::info!(
        data_dir = %config.data_dir.display(),
        bind_addr = %config.bind_addr,
        "Configuration loaded"
    );

    let source = Arc::new(JsonDirectorySource::new(&config.data_dir));
    let ctx = ApiContext::new(source, DefaultRiskEngine::new(config.engine));
    let server = start_risk_api_server_on(ctx, config.bind_addr).await?;

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Cannot listen for Ctrl-C: {e}");
    }
    server.stopped().await;
    tracing::info!("{} exited", config::APP_NAME);

    Ok(())
}
