//! Chat export analysis endpoints.
//!
//! Accepts a WhatsApp `.txt` export either as a multipart upload or as the
//! raw request body and answers with the analysis report.

use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request, State},
    http::header::CONTENT_TYPE,
    routing::post,
    Json, Router,
};
use chatlens_analysis::{analyze_bytes, AnalysisResponse};
use tracing::{debug, info, instrument};

use crate::state::AppState;
use crate::ApiError;

/// Multipart field that carries the export.
pub const CHAT_FILE_FIELD: &str = "chat_file";

/// Chat analysis router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/analyze_chat", post(analyze_chat))
        .route("/analyze", post(analyze_chat))
}

#[instrument(skip_all)]
async fn analyze_chat(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let upload = if is_multipart(&request) {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| ApiError::upload(e.status(), e.body_text()))?;
        read_multipart_upload(multipart).await?
    } else {
        Some(
            Bytes::from_request(request, &state)
                .await
                .map_err(|e| ApiError::upload(e.status(), e.body_text()))?,
        )
    };

    let bytes = match upload {
        Some(bytes) if !bytes.is_empty() => bytes,
        Some(_) => return Err(ApiError::InvalidRequest("Uploaded file is empty".to_string())),
        None => return Err(ApiError::InvalidRequest("No file uploaded".to_string())),
    };
    debug!("Received chat export of {} bytes", bytes.len());

    let config = state.analysis.clone();
    let report = tokio::task::spawn_blocking(move || analyze_bytes(&bytes, &config))
        .await
        .map_err(|e| ApiError::Internal(format!("Analysis task failed: {}", e)))??;

    info!(
        "Analyzed chat export: {} messages from {} senders",
        report.total_messages,
        report.per_sender_counts.len()
    );

    Ok(Json(report.to_response()))
}

fn is_multipart(request: &Request) -> bool {
    request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("multipart/form-data"))
        .unwrap_or(false)
}

/// Pick the `chat_file` field, or the first file field when it is absent.
async fn read_multipart_upload(mut multipart: Multipart) -> Result<Option<Bytes>, ApiError> {
    let mut fallback = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::upload(e.status(), e.body_text()))?
    {
        let is_chat_file = field.name() == Some(CHAT_FILE_FIELD);
        let is_file = field.file_name().is_some();
        if !is_chat_file && (!is_file || fallback.is_some()) {
            continue;
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::upload(e.status(), e.body_text()))?;
        if is_chat_file {
            return Ok(Some(data));
        }
        fallback = Some(data);
    }

    Ok(fallback)
}
