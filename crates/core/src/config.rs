use crate::constants::{
    DEFAULT_API_BASE_PATH, DEFAULT_HTTP_PORT, DEFAULT_RECOMMENDATION_LIMIT,
    DEFAULT_REQUEST_TIMEOUT, DEFAULT_TOP_EMOJI_LIMIT, DELETED_MESSAGE_BODY, MAX_UPLOAD_SIZE,
    MEDIA_OMITTED_BODY, SYSTEM_SENDER,
};
use crate::error::IntoCoreError;
use crate::Error;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Main configuration for ChatLens.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ChatlensConfig {
    /// Path to configuration directory.
    pub config_dir: PathBuf,

    /// Path to data directory (model artifacts live here by default).
    pub data_dir: PathBuf,

    /// HTTP server configuration.
    pub http: HttpConfig,

    /// Chat analysis configuration.
    pub analysis: AnalysisSettings,

    /// Offline model artifact locations.
    pub models: ModelConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Host to bind to.
    pub host: String,

    /// Port to bind to.
    pub port: u16,

    /// API base path.
    pub api_base_path: String,

    /// Enable CORS.
    pub enable_cors: bool,

    /// Allowed CORS origins. Empty means any origin.
    pub cors_allowed_origins: Vec<String>,

    /// Request timeout in seconds.
    pub request_timeout: u64,

    /// Enable request logging.
    pub enable_request_logging: bool,

    /// Maximum request body size in bytes.
    pub max_body_size: usize,
}

/// Chat export analysis settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Number of emoji kept in the report ranking.
    pub top_emoji_limit: usize,

    /// Bodies that stand in for media or deleted content.
    pub placeholder_bodies: Vec<String>,

    /// Sender bucket for header lines without an author.
    pub system_sender: String,

    /// Number of titles returned by a recommendation lookup.
    pub recommendation_limit: usize,
}

/// Locations of artifacts produced by the offline training pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ModelConfig {
    /// Spam classifier weights (JSON).
    pub classifier_path: Option<PathBuf>,

    /// Title list and similarity matrix (JSON).
    pub recommender_path: Option<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level.
    pub level: LogLevel,

    /// Log format.
    pub format: LogFormat,
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Error level.
    Error,

    /// Warning level.
    Warn,

    /// Info level.
    Info,

    /// Debug level.
    Debug,

    /// Trace level.
    Trace,
}

impl LogLevel {
    /// Matching `tracing` level.
    pub fn as_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

/// Log format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Full text format.
    Text,

    /// Single-line compact format.
    Compact,

    /// Multi-line pretty format.
    Pretty,
}

impl ChatlensConfig {
    /// Create configuration rooted in the platform's config and data directories.
    pub fn from_system_dirs() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("Cannot find config directory".to_string()))?
            .join("chatlens");

        let data_dir = dirs::data_dir()
            .ok_or_else(|| Error::Config("Cannot find data directory".to_string()))?
            .join("chatlens");

        Ok(Self {
            config_dir,
            data_dir,
            ..Self::default()
        })
    }

    /// Default location of the configuration file.
    pub fn default_path() -> Result<PathBuf> {
        Ok(Self::from_system_dirs()?.config_dir.join("config.toml"))
    }

    /// Load configuration from file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::FileSystem(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::Parse(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Save configuration to file, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).with_context("Failed to serialize config")?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    Error::FileSystem(format!("Failed to create config directory: {}", e))
                })?;
            }
        }

        std::fs::write(path, content)
            .map_err(|e| Error::FileSystem(format!("Failed to write config file: {}", e)))
    }

    /// Reject values the rest of the system cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.http.port == 0 {
            return Err(Error::validation("http.port must be non-zero"));
        }
        if !self.http.api_base_path.is_empty() && !self.http.api_base_path.starts_with('/') {
            return Err(Error::validation("http.api_base_path must start with '/'"));
        }
        if self.analysis.top_emoji_limit > DEFAULT_TOP_EMOJI_LIMIT {
            return Err(Error::validation(format!(
                "analysis.top_emoji_limit must be at most {}",
                DEFAULT_TOP_EMOJI_LIMIT
            )));
        }
        if self.analysis.system_sender.trim().is_empty() {
            return Err(Error::validation("analysis.system_sender must not be empty"));
        }
        Ok(())
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_HTTP_PORT,
            api_base_path: DEFAULT_API_BASE_PATH.to_string(),
            enable_cors: true,
            cors_allowed_origins: vec![
                "http://localhost:5173".to_string(),
                "http://127.0.0.1:5173".to_string(),
            ],
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            enable_request_logging: true,
            max_body_size: MAX_UPLOAD_SIZE,
        }
    }
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            top_emoji_limit: DEFAULT_TOP_EMOJI_LIMIT,
            placeholder_bodies: vec![
                MEDIA_OMITTED_BODY.to_string(),
                DELETED_MESSAGE_BODY.to_string(),
            ],
            system_sender: SYSTEM_SENDER.to_string(),
            recommendation_limit: DEFAULT_RECOMMENDATION_LIMIT,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Text,
        }
    }
}
