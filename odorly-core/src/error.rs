//! Erros do núcleo de telemetria

use thiserror::Error;

pub type TelemetryResult<T> = Result<T, TelemetryError>;

#[derive(Debug, Error, Clone)]
pub enum TelemetryError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Value out of range: {0}")]
    OutOfRange(String),

    #[error("Log export failed: {0}")]
    ExportFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TelemetryError::InvalidConfig("bad alpha".into());
        assert!(err.to_string().contains("Invalid configuration"));
    }
}
