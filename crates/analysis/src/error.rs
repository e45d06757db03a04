use thiserror::Error;

/// Errors that can occur during analysis operations.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Input bytes are not valid UTF-8 text.
    #[error("Decode error: {0}")]
    Decode(String),
    /// Model artifact could not be loaded or is malformed.
    #[error("Model loading error: {0}")]
    ModelLoading(String),
    /// I/O operation error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Invalid input data.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// Resource not found.
    #[error("Resource not found: {0}")]
    NotFound(String),
}

/// Result type alias for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;
