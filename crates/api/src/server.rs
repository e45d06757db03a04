//! HTTP server implementation for the ChatLens API.

use crate::{config::ApiConfig, router::build_router, state::AppState, ApiError};
use axum::Router;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{info, warn};

/// HTTP server for the ChatLens API.
pub struct ApiServer {
    config: ApiConfig,
    router: Router,
}

impl ApiServer {
    /// Create a new API server with the given configuration and state.
    pub fn new(config: ApiConfig, state: AppState) -> Self {
        let router = build_router(&config, state);

        Self { config, router }
    }

    /// Run the server until shutdown signal.
    pub async fn run(self) -> Result<(), ApiError> {
        let addr = self.config.bind_addr;

        info!("Starting ChatLens API server on {}", addr);
        info!("API base path: {}", self.config.api_base_path);
        info!("CORS enabled: {}", self.config.enable_cors);

        // Build the final router with middleware
        let router = self.build_router_with_middleware();

        let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
            ApiError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to bind {}: {}", addr, e),
            ))
        })?;

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ApiError::Http(e.to_string()))?;

        info!("Server shutdown complete");
        Ok(())
    }

    /// Build router with all middleware layers.
    fn build_router_with_middleware(&self) -> Router {
        let mut router = self.router.clone();

        // Add request timeout
        if self.config.request_timeout_seconds > 0 {
            router = router.layer(tower_http::timeout::TimeoutLayer::new(
                std::time::Duration::from_secs(self.config.request_timeout_seconds),
            ));
        }

        // Add request logging
        if self.config.enable_request_logging {
            router = router.layer(tower_http::trace::TraceLayer::new_for_http());
        }

        // Add body size limit
        router = router.layer(tower_http::limit::RequestBodyLimitLayer::new(
            self.config.max_body_size,
        ));

        router
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.config.bind_addr
    }

    /// Get the API configuration.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }
}

/// Create a shutdown signal for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C signal, shutting down..."),
            Err(e) => {
                warn!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received SIGTERM signal, shutting down...");
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Utility function to start server from configuration.
pub async fn start_server(config: ApiConfig, state: AppState) -> Result<(), ApiError> {
    let server = ApiServer::new(config, state);
    server.run().await
}
