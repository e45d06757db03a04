//! Configuration for the ChatLens HTTP API server.

use chatlens_analysis::AnalysisConfig;
use chatlens_core::constants::{
    DEFAULT_API_BASE_PATH, DEFAULT_HTTP_PORT, DEFAULT_REQUEST_TIMEOUT, MAX_UPLOAD_SIZE,
};
use chatlens_core::ChatlensConfig;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tracing::warn;

/// API server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Socket address to bind to.
    pub bind_addr: SocketAddr,

    /// API base path (e.g., "/api").
    pub api_base_path: String,

    /// Enable CORS.
    pub enable_cors: bool,

    /// Allowed CORS origins. Empty allows any origin.
    pub cors_allowed_origins: Vec<String>,

    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,

    /// Enable request logging.
    pub enable_request_logging: bool,

    /// Maximum request body size in bytes.
    pub max_body_size: usize,

    /// Feature flags.
    pub features: ApiFeatures,

    /// Settings passed to every chat analysis.
    pub analysis: AnalysisConfig,
}

/// API feature flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiFeatures {
    /// Enable chat export analysis.
    pub enable_chat: bool,

    /// Enable spam classification.
    pub enable_spam: bool,

    /// Enable movie recommendations.
    pub enable_recommendations: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), DEFAULT_HTTP_PORT),
            api_base_path: DEFAULT_API_BASE_PATH.to_string(),
            enable_cors: true,
            cors_allowed_origins: vec![
                "http://localhost:5173".to_string(),
                "http://127.0.0.1:5173".to_string(),
            ],
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT,
            enable_request_logging: true,
            max_body_size: MAX_UPLOAD_SIZE,
            features: ApiFeatures::default(),
            analysis: AnalysisConfig::default(),
        }
    }
}

impl Default for ApiFeatures {
    fn default() -> Self {
        Self {
            enable_chat: true,
            enable_spam: true,
            enable_recommendations: true,
        }
    }
}

impl ApiConfig {
    /// Create API configuration from core ChatLens configuration.
    pub fn from_core_config(core_config: &ChatlensConfig) -> Self {
        let mut config = Self::default();

        let addr = format!("{}:{}", core_config.http.host, core_config.http.port);
        match addr.parse() {
            Ok(bind_addr) => config.bind_addr = bind_addr,
            Err(_) => warn!("Invalid bind address {}, using {}", addr, config.bind_addr),
        }

        config.api_base_path = core_config.http.api_base_path.clone();
        config.enable_cors = core_config.http.enable_cors;
        config.cors_allowed_origins = core_config.http.cors_allowed_origins.clone();
        config.request_timeout_seconds = core_config.http.request_timeout;
        config.enable_request_logging = core_config.http.enable_request_logging;
        config.max_body_size = core_config.http.max_body_size;
        config.analysis = AnalysisConfig::from_core_config(core_config);

        config
    }
}
