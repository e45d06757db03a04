//! Movie recommendation endpoint.

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use chatlens_core::Recommendation;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::state::AppState;
use crate::ApiError;

/// Upper bound on the number of recommendations per request.
const MAX_RECOMMENDATIONS: usize = 100;

/// Recommendation request body.
#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    /// Title to find neighbours for.
    #[serde(default)]
    pub title: String,
    /// Number of titles to return.
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Recommendation response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendResponse {
    /// Always true.
    pub success: bool,
    /// Most similar titles, best first.
    pub recommendations: Vec<Recommendation>,
}

/// Recommendation router.
pub fn router() -> Router<AppState> {
    Router::new().route("/recommend_movies", post(recommend_movies))
}

#[instrument(skip_all)]
async fn recommend_movies(
    State(state): State<AppState>,
    payload: Result<Json<RecommendRequest>, JsonRejection>,
) -> Result<Json<RecommendResponse>, ApiError> {
    let Json(req) = payload?;
    let recommender = state.recommender.as_ref().ok_or_else(|| {
        ApiError::ModelUnavailable("Recommendation model failed to load on server.".to_string())
    })?;

    let limit = req
        .limit
        .unwrap_or(state.analysis.recommendation_limit)
        .min(MAX_RECOMMENDATIONS);
    let recommendations = recommender.recommend(&req.title, limit)?;
    debug!(
        "Returning {} recommendations for {}",
        recommendations.len(),
        req.title
    );

    Ok(Json(RecommendResponse {
        success: true,
        recommendations,
    }))
}
