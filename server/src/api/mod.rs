//! API Router and Application State
//!
//! Central routing configuration and shared state.

use axum::{
    extract::DefaultBodyLimit,
    routing::{any, get},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::{config::Config, relay};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Relay configuration
    pub config: Arc<Config>,
    /// HTTP client for Slack deliveries (pooled, carries the delivery timeout)
    pub http: reqwest::Client,
}

impl AppState {
    /// Create new application state.
    pub fn new(config: Config) -> reqwest::Result<Self> {
        let http = relay::delivery::build_client(config.delivery_timeout())?;
        Ok(Self {
            config: Arc::new(config),
            http,
        })
    }
}

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    let max_body_size = state.config.max_body_size;

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Every method reaches the handler so non-POST gets the JSON 405 body
        .route("/webhook", any(relay::handlers::receive_webhook))
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(max_body_size)),
        )
        // State
        .with_state(state)
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    /// Service status
    status: &'static str,
    /// Crate version
    version: &'static str,
}

/// Health check endpoint.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
