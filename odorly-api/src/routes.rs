//! Route configuration for the Odor.ly API

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::openapi::openapi_handler;
use crate::state::AppState;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Comment proxy
        .route("/odor", get(handlers::odor_handler))

        // Telemetry endpoints
        .route("/api/telemetry", get(handlers::telemetry_handler))
        .route("/api/log", get(handlers::log_handler))
        .route("/api/export", get(handlers::export_handler))
        .route("/api/spritz", post(handlers::spritz_handler))
        .route("/api/probability", post(handlers::probability_handler))

        // Geiger control endpoints
        .route("/api/geiger", get(handlers::geiger_status_handler))
        .route("/api/geiger/start", post(handlers::geiger_start_handler))
        .route("/api/geiger/stop", post(handlers::geiger_stop_handler))

        // Health check and API docs
        .route("/health", get(handlers::health_handler))
        .route("/api-docs/openapi.json", get(openapi_handler))
        .with_state(state)
}
