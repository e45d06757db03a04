//! Error types for CLI operations.

use chatlens_analysis::AnalysisError;
use chatlens_api::ApiError;
use thiserror::Error;

/// Main error type for CLI operations.
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// API server error.
    #[error("API server error: {0}")]
    Api(#[from] ApiError),

    /// Analysis error.
    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    /// Core ChatLens error.
    #[error("{0}")]
    Core(#[from] chatlens_core::Error),

    /// Command execution error.
    #[error("Command execution error: {0}")]
    Command(String),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;
