//! Spam classification endpoint.

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use chatlens_core::SpamLabel;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::state::AppState;
use crate::ApiError;

/// Spam check request body.
#[derive(Debug, Deserialize)]
pub struct SpamCheckRequest {
    /// Text to classify.
    #[serde(default)]
    pub text: String,
}

/// Spam check response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct SpamCheckResponse {
    /// Predicted label.
    pub classification: SpamLabel,
    /// Always true.
    pub success: bool,
}

/// Spam classification router.
pub fn router() -> Router<AppState> {
    Router::new().route("/check_spam", post(check_spam))
}

#[instrument(skip_all)]
async fn check_spam(
    State(state): State<AppState>,
    payload: Result<Json<SpamCheckRequest>, JsonRejection>,
) -> Result<Json<SpamCheckResponse>, ApiError> {
    let Json(req) = payload?;
    let classifier = state.classifier.as_ref().ok_or_else(|| {
        ApiError::ModelUnavailable("Spam classifier failed to load on server.".to_string())
    })?;

    if req.text.trim().is_empty() {
        return Err(ApiError::InvalidRequest("No text provided".to_string()));
    }

    let classification = classifier.classify(&req.text)?;
    debug!("Classified {} chars as {}", req.text.len(), classification);

    Ok(Json(SpamCheckResponse {
        classification,
        success: true,
    }))
}
