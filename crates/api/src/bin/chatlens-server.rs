//! ChatLens API server entry point.
//!
//! Reads the configuration from `CHATLENS_CONFIG` or the platform config
//! directory and serves the API until interrupted.

use std::path::PathBuf;

use tracing::info;
use tracing_subscriber::fmt;

use chatlens_api::{start_server, ApiConfig, AppState};
use chatlens_core::config::{LogFormat, LoggingConfig};
use chatlens_core::ChatlensConfig;

fn init_logging(logging: &LoggingConfig) {
    let builder = fmt()
        .with_max_level(logging.level.as_tracing_level())
        .with_target(false);
    match logging.format {
        LogFormat::Text => builder.init(),
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Pretty => builder.pretty().init(),
    }
}

/// Main entry point.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config_path = match std::env::var_os("CHATLENS_CONFIG") {
        Some(path) => Some(PathBuf::from(path)),
        None => ChatlensConfig::default_path().ok().filter(|p| p.exists()),
    };
    let mut core = match &config_path {
        Some(path) => ChatlensConfig::load(path)?,
        None => ChatlensConfig::default(),
    };

    // Initialize logging
    init_logging(&core.logging);

    info!("Starting ChatLens API server...");
    if let Some(path) = &config_path {
        info!("Loaded configuration from {}", path.display());
    }

    if let Some(path) = std::env::var_os("CHATLENS_CLASSIFIER") {
        core.models.classifier_path = Some(PathBuf::from(path));
    }
    if let Some(path) = std::env::var_os("CHATLENS_RECOMMENDER") {
        core.models.recommender_path = Some(PathBuf::from(path));
    }

    let api_config = ApiConfig::from_core_config(&core);
    let state = AppState::new(api_config.analysis.clone()).load_models(&core.models);

    start_server(api_config, state).await?;

    Ok(())
}
