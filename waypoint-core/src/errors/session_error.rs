//! Healing session errors.

use super::error_code::{self, WaypointErrorCode};

/// Errors that can occur while running or persisting a healing session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Failed to write session log {path}: {message}")]
    LogWriteFailed { path: String, message: String },

    #[error("Failed to serialize session: {0}")]
    SerializeFailed(String),

    #[error("Fix application failed: {0}")]
    FixFailed(String),
}

impl WaypointErrorCode for SessionError {
    fn error_code(&self) -> &'static str {
        error_code::SESSION_ERROR
    }
}
