//! Shared application state.

use std::sync::Arc;

use odorly_geiger::GeigerScheduler;
use tokio::sync::Mutex;

use crate::gemini::CommentBackend;
use crate::telemetry::TelemetryHandle;

/// State handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Simulator handle shared with the sampling task.
    pub telemetry: TelemetryHandle,
    /// Geiger click scheduler, fed by the telemetry probability channel.
    pub geiger: Arc<Mutex<GeigerScheduler>>,
    /// Comment backend; `None` when no API key is configured.
    pub backend: Option<Arc<dyn CommentBackend>>,
}

impl AppState {
    pub fn new(
        telemetry: TelemetryHandle,
        geiger: GeigerScheduler,
        backend: Option<Arc<dyn CommentBackend>>,
    ) -> Self {
        Self {
            telemetry,
            geiger: Arc::new(Mutex::new(geiger)),
            backend,
        }
    }
}
