//! Test runner invocation errors.

use super::error_code::{self, WaypointErrorCode};

/// Errors that can occur while invoking the external test runner.
///
/// A test run that completes with failing tests is NOT a `RunnerError`;
/// it is a successful invocation with `success: false`.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("Failed to spawn runner `{command}`: {message}")]
    SpawnFailed { command: String, message: String },

    #[error("Runner timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Failed to read runner output: {0}")]
    OutputUnreadable(String),
}

impl WaypointErrorCode for RunnerError {
    fn error_code(&self) -> &'static str {
        error_code::RUNNER_ERROR
    }
}
