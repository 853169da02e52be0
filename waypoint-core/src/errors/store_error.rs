//! Learned pattern store errors.
//!
//! A corrupt or missing store file is recovered locally by the store itself
//! (empty store + warning) and never appears here.

use super::error_code::{self, WaypointErrorCode};

/// Errors that can occur while persisting or mutating the learned store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to write store file {path}: {message}")]
    WriteFailed { path: String, message: String },

    #[error("Failed to serialize store: {0}")]
    SerializeFailed(String),

    #[error("No such learned pattern: {id}")]
    PatternNotFound { id: String },
}

impl WaypointErrorCode for StoreError {
    fn error_code(&self) -> &'static str {
        error_code::STORE_ERROR
    }
}
