//! Erros do agendador de cliques

use thiserror::Error;

pub type GeigerResult<T> = Result<T, GeigerError>;

#[derive(Debug, Error, Clone)]
pub enum GeigerError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Scheduler task is not running")]
    NotRunning,
}
