//! Error types for the ChatLens HTTP API server.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chatlens_analysis::AnalysisError;
use thiserror::Error;

/// Main error type for API operations.
#[derive(Error, Debug)]
pub enum ApiError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP server error.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Invalid request parameters.
    #[error("{0}")]
    InvalidRequest(String),

    /// Request body is not the expected JSON document.
    #[error("{}", .0.body_text())]
    Json(#[from] JsonRejection),

    /// Upload exceeds the configured body size.
    #[error("{0}")]
    PayloadTooLarge(String),

    /// A model artifact was not loaded at startup.
    #[error("{0}")]
    ModelUnavailable(String),

    /// Internal server error.
    #[error("Internal server error: {0}")]
    Internal(String),

    /// Analysis or model error.
    #[error("{0}")]
    Analysis(#[from] AnalysisError),
}

/// Result alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Classify a failure to read an upload by the status axum assigned it.
    pub fn upload(status: StatusCode, message: impl Into<String>) -> Self {
        let message = message.into();
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(message)
        } else {
            ApiError::InvalidRequest(format!("Malformed upload: {}", message))
        }
    }

    /// Convert to HTTP status code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Http(_) => StatusCode::BAD_GATEWAY,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Json(rejection) => rejection.status(),
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::ModelUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Analysis(inner) => match inner {
                AnalysisError::Decode(_) | AnalysisError::InvalidInput(_) => {
                    StatusCode::BAD_REQUEST
                }
                AnalysisError::NotFound(_) => StatusCode::NOT_FOUND,
                AnalysisError::ModelLoading(_) | AnalysisError::Io(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }
}

impl From<ApiError> for axum::response::Response {
    fn from(error: ApiError) -> Self {
        let status = error.status_code();
        let body = serde_json::json!({
            "success": false,
            "error": error.to_string(),
            "code": status.as_u16(),
        });
        (status, axum::Json(body)).into_response()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        self.into()
    }
}
