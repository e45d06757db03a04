//! Axum router configuration for the ChatLens HTTP API.

use crate::config::ApiConfig;
use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;

/// Build the main API router with all enabled modules.
pub fn build_router(config: &ApiConfig, state: AppState) -> Router {
    let mut api: Router<AppState> = Router::new();

    // Add API modules based on feature flags
    if config.features.enable_chat {
        api = api.merge(crate::chat::router());
    }

    if config.features.enable_spam {
        api = api.merge(crate::spam::router());
    }

    if config.features.enable_recommendations {
        api = api.merge(crate::movies::router());
    }

    let api = api.with_state(state);

    let mut router = Router::new()
        .route("/", get(index))
        .route("/health", get(health_check));

    let base_path = config.api_base_path.trim_end_matches('/');
    router = if base_path.is_empty() {
        router.merge(api)
    } else {
        router.nest(base_path, api)
    };

    // Uploads may exceed the extractor default of 2 MiB
    router = router.layer(DefaultBodyLimit::max(config.max_body_size));

    if config.enable_cors {
        router = router.layer(create_cors_layer(config));
    }

    router
}

/// Service banner.
async fn index() -> &'static str {
    "ChatLens API is running"
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

/// Create CORS layer based on configuration.
fn create_cors_layer(config: &ApiConfig) -> CorsLayer {
    let mut cors = CorsLayer::new();

    if config.cors_allowed_origins.is_empty() {
        cors = cors.allow_origin(tower_http::cors::Any);
    } else {
        let origins: Vec<_> = config
            .cors_allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        cors = cors.allow_origin(origins).allow_credentials(true);
    }

    cors.allow_methods([
        axum::http::Method::GET,
        axum::http::Method::POST,
        axum::http::Method::OPTIONS,
    ])
    .allow_headers([
        axum::http::header::CONTENT_TYPE,
        axum::http::header::AUTHORIZATION,
        axum::http::header::ACCEPT,
    ])
}
