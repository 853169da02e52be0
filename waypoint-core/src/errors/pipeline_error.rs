//! Pipeline errors aggregating subsystem errors via `From` conversions.

use super::error_code::{self, WaypointErrorCode};
use super::{ConfigError, RunnerError, SessionError, StoreError};

/// Errors that can cross the outer pipeline boundary.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Runner error: {0}")]
    Runner(#[from] RunnerError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Pipeline cancelled")]
    Cancelled,
}

impl WaypointErrorCode for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Store(e) => e.error_code(),
            Self::Runner(e) => e.error_code(),
            Self::Session(e) => e.error_code(),
            Self::Cancelled => error_code::CANCELLED,
        }
    }
}
