//! Request and response models for the Odor.ly REST API.

use chrono::{DateTime, Utc};
use odorly_core::{LogEntry, OdorStatus, SensorFrame, SmellStrength};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Query parameters for `GET /odor`.
#[derive(Debug, Deserialize, IntoParams)]
pub struct OdorQuery {
    /// Body odor percentage (0-100). Missing is treated as 0.
    pub bo: Option<String>,
}

/// Query parameters for `GET /api/log`.
#[derive(Debug, Deserialize, IntoParams)]
pub struct LogQuery {
    /// Maximum number of entries to return, newest first (default 10).
    pub limit: Option<usize>,
}

/// Successful comment from the generative backend.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CommentReply {
    pub comment: String,
}

/// Flat error body, mirrored across every endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorReply {
    pub error: String,
}

impl ErrorReply {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Point-in-time view of the simulated sensor.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TelemetrySnapshot {
    /// Index of Air Quality, 0-200.
    pub iaq: f64,
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub gas_ohm: f64,
    /// Sensor calibration accuracy, 0-3.
    pub accuracy: u8,
    /// Smoothed body odor probability as a percentage.
    pub p_bo_pct: f64,
    /// Odor status label derived from the probability.
    pub status: String,
    /// Smell strength label derived from the IAQ.
    pub strength: String,
    /// Total number of samples taken since boot.
    pub sample_count: u64,
    /// Timestamp of the most recent log entry, if any.
    pub last_update: Option<DateTime<Utc>>,
}

impl TelemetrySnapshot {
    pub fn from_frame(frame: &SensorFrame, sample_count: u64, last_update: Option<DateTime<Utc>>) -> Self {
        let pct = frame.p_bo_pct();
        Self {
            iaq: frame.iaq,
            temperature_c: frame.temperature_c,
            humidity_pct: frame.humidity_pct,
            gas_ohm: frame.gas_ohm,
            accuracy: frame.accuracy,
            p_bo_pct: pct,
            status: OdorStatus::from_percent(pct).label().to_string(),
            strength: SmellStrength::from_iaq(frame.iaq).label().to_string(),
            sample_count,
            last_update,
        }
    }
}

/// One historical sample, field names matching the CSV export columns.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LogRow {
    pub timestamp: DateTime<Utc>,
    pub iaq: f64,
    pub temp: f64,
    pub humidity: f64,
    pub gas_ohm: f64,
    pub acc: u8,
    pub p_bo: f64,
}

impl From<&LogEntry> for LogRow {
    fn from(entry: &LogEntry) -> Self {
        Self {
            timestamp: entry.timestamp,
            iaq: entry.iaq,
            temp: entry.temperature_c,
            humidity: entry.humidity_pct,
            gas_ohm: entry.gas_ohm,
            acc: entry.accuracy,
            p_bo: entry.p_bo_pct,
        }
    }
}

/// Response for `GET /api/log`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LogReply {
    pub entries: Vec<LogRow>,
    /// Entries currently retained in the ring buffer.
    pub retained: usize,
    pub capacity: usize,
}

/// Body for `POST /api/probability`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProbabilityRequest {
    /// Probability delta in the 0-1 scale (e.g. 0.1 adds ten percentage points).
    pub delta: f64,
}

/// Response for `POST /api/spritz`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SpritzReply {
    pub message: String,
    pub snapshot: TelemetrySnapshot,
}

/// Current geiger scheduler state and click statistics.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GeigerReply {
    pub running: bool,
    /// Expected click rate in clicks per second at the current probability.
    pub nominal_rate: f64,
    /// Observed clicks per second over the last ten seconds.
    pub cps: f64,
    /// Observed clicks over the last minute.
    pub cpm: u64,
    pub total_clicks: u64,
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthCheck {
    pub status: String,
    pub version: String,
}
