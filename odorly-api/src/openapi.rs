//! OpenAPI documentation configuration

use axum::Json;
use utoipa::OpenApi;

use crate::handlers;
use crate::models::*;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Odor.ly API",
        version = "0.1.0",
        description = "REST API for the Odor.ly body odor dashboard - simulated telemetry, geiger click control, and AI-generated odor commentary",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html"),
        contact(name = "Odorly Contributors")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    tags(
        (name = "comment", description = "AI-generated odor commentary"),
        (name = "telemetry", description = "Simulated sensor state, log, and export"),
        (name = "geiger", description = "Geiger click scheduler control"),
        (name = "health", description = "Health check endpoints")
    ),
    paths(
        handlers::odor_handler,
        handlers::telemetry_handler,
        handlers::log_handler,
        handlers::export_handler,
        handlers::spritz_handler,
        handlers::probability_handler,
        handlers::geiger_status_handler,
        handlers::geiger_start_handler,
        handlers::geiger_stop_handler,
        handlers::health_handler,
    ),
    components(
        schemas(
            CommentReply,
            ErrorReply,
            TelemetrySnapshot,
            LogRow,
            LogReply,
            ProbabilityRequest,
            SpritzReply,
            GeigerReply,
            HealthCheck,
        )
    )
)]
pub struct ApiDoc;

/// Serves the OpenAPI document as JSON
pub async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
