//! Request handlers for API endpoints

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

use crate::gemini::comment_prompt;
use crate::models::*;
use crate::state::AppState;

/// Default number of log entries returned by `GET /api/log`.
const DEFAULT_LOG_LIMIT: usize = 10;

type ApiResult<T> = Result<T, (StatusCode, Json<ErrorReply>)>;

fn error(status: StatusCode, message: &str) -> (StatusCode, Json<ErrorReply>) {
    (status, Json(ErrorReply::new(message)))
}

/// Parses the `bo` query parameter with JavaScript `Number()` semantics:
/// a missing or blank value coerces to 0, garbage and NaN are rejected.
/// Infinity passes, as `Number("Infinity")` does.
fn parse_bo(raw: Option<&str>) -> Option<f64> {
    let Some(raw) = raw else {
        return Some(0.0);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|v| !v.is_nan())
}

#[utoipa::path(
    get,
    path = "/odor",
    tag = "comment",
    params(OdorQuery),
    responses(
        (status = 200, description = "Generated comment", body = CommentReply),
        (status = 400, description = "Invalid bo parameter", body = ErrorReply),
        (status = 500, description = "Missing API key or upstream failure", body = ErrorReply),
    )
)]
pub async fn odor_handler(
    State(state): State<AppState>,
    Query(params): Query<OdorQuery>,
) -> ApiResult<Json<CommentReply>> {
    // Key check comes before parameter validation, as in the original proxy.
    let Some(backend) = state.backend.clone() else {
        return Err(error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Missing GEMINI_API_KEY",
        ));
    };

    let Some(bo) = parse_bo(params.bo.as_deref()) else {
        return Err(error(StatusCode::BAD_REQUEST, "Invalid bo"));
    };

    let prompt = comment_prompt(bo);
    match backend.generate(&prompt).await {
        Ok(comment) => Ok(Json(CommentReply { comment })),
        Err(err) => {
            tracing::error!("ODOR API error: {err:#}");
            Err(error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to generate comment",
            ))
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/telemetry",
    tag = "telemetry",
    responses(
        (status = 200, description = "Current sensor state", body = TelemetrySnapshot),
    )
)]
pub async fn telemetry_handler(State(state): State<AppState>) -> Json<TelemetrySnapshot> {
    Json(state.telemetry.snapshot().await)
}

#[utoipa::path(
    get,
    path = "/api/log",
    tag = "telemetry",
    params(LogQuery),
    responses(
        (status = 200, description = "Recent log entries, oldest first", body = LogReply),
    )
)]
pub async fn log_handler(
    State(state): State<AppState>,
    Query(params): Query<LogQuery>,
) -> Json<LogReply> {
    let limit = params.limit.unwrap_or(DEFAULT_LOG_LIMIT);
    let (entries, retained, capacity) = state.telemetry.recent(limit).await;
    Json(LogReply {
        entries,
        retained,
        capacity,
    })
}

#[utoipa::path(
    get,
    path = "/api/export",
    tag = "telemetry",
    responses(
        (status = 200, description = "Full log as CSV", body = String, content_type = "text/csv"),
    )
)]
pub async fn export_handler(State(state): State<AppState>) -> impl IntoResponse {
    let csv = state.telemetry.export_csv().await;
    (
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"bo-ometer-log.csv\"",
            ),
        ],
        csv,
    )
}

#[utoipa::path(
    post,
    path = "/api/spritz",
    tag = "telemetry",
    responses(
        (status = 200, description = "Odor cloud deployed", body = SpritzReply),
    )
)]
pub async fn spritz_handler(State(state): State<AppState>) -> Json<SpritzReply> {
    let snapshot = state.telemetry.spritz().await;
    Json(SpritzReply {
        message: "SPRITZ TEST: Odor cloud deployed 💨".to_string(),
        snapshot,
    })
}

#[utoipa::path(
    post,
    path = "/api/probability",
    tag = "telemetry",
    request_body = ProbabilityRequest,
    responses(
        (status = 200, description = "Adjusted sensor state", body = TelemetrySnapshot),
        (status = 400, description = "Non-finite delta", body = ErrorReply),
    )
)]
pub async fn probability_handler(
    State(state): State<AppState>,
    Json(req): Json<ProbabilityRequest>,
) -> ApiResult<Json<TelemetrySnapshot>> {
    if !req.delta.is_finite() {
        return Err(error(StatusCode::BAD_REQUEST, "Invalid delta"));
    }
    Ok(Json(state.telemetry.adjust(req.delta).await))
}

#[utoipa::path(
    get,
    path = "/api/geiger",
    tag = "geiger",
    responses(
        (status = 200, description = "Scheduler state and click statistics", body = GeigerReply),
    )
)]
pub async fn geiger_status_handler(State(state): State<AppState>) -> Json<GeigerReply> {
    let geiger = state.geiger.lock().await;
    let counter = geiger.counter();
    Json(GeigerReply {
        running: geiger.is_running(),
        nominal_rate: geiger.nominal_rate(),
        cps: counter.cps(),
        cpm: counter.cpm(),
        total_clicks: counter.total(),
    })
}

#[utoipa::path(
    post,
    path = "/api/geiger/start",
    tag = "geiger",
    responses(
        (status = 200, description = "Scheduler started", body = GeigerReply),
    )
)]
pub async fn geiger_start_handler(State(state): State<AppState>) -> Json<GeigerReply> {
    let mut geiger = state.geiger.lock().await;
    geiger.start();
    let counter = geiger.counter();
    Json(GeigerReply {
        running: geiger.is_running(),
        nominal_rate: geiger.nominal_rate(),
        cps: counter.cps(),
        cpm: counter.cpm(),
        total_clicks: counter.total(),
    })
}

#[utoipa::path(
    post,
    path = "/api/geiger/stop",
    tag = "geiger",
    responses(
        (status = 200, description = "Scheduler stopped", body = GeigerReply),
    )
)]
pub async fn geiger_stop_handler(State(state): State<AppState>) -> Json<GeigerReply> {
    let mut geiger = state.geiger.lock().await;
    geiger.stop();
    let counter = geiger.counter();
    Json(GeigerReply {
        running: geiger.is_running(),
        nominal_rate: geiger.nominal_rate(),
        cps: counter.cps(),
        cpm: counter.cpm(),
        total_clicks: counter.total(),
    })
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthCheck),
    )
)]
pub async fn health_handler() -> Json<HealthCheck> {
    Json(HealthCheck {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
