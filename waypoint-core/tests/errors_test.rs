//! Error taxonomy tests: stable codes and aggregation conversions.

use waypoint_core::errors::{
    ConfigError, PipelineError, RunnerError, SessionError, StoreError, WaypointErrorCode,
};

#[test]
fn test_error_codes_are_stable() {
    let config = ConfigError::ValidationFailed {
        field: "healing.max_attempts".into(),
        message: "must be at least 1".into(),
    };
    assert_eq!(config.error_code(), "WP_CONFIG");

    let store = StoreError::PatternNotFound { id: "lp-1".into() };
    assert_eq!(store.error_code(), "WP_STORE");

    let runner = RunnerError::Timeout { timeout_ms: 90_000 };
    assert_eq!(runner.error_code(), "WP_RUNNER");

    let session = SessionError::SerializeFailed("bad".into());
    assert_eq!(session.error_code(), "WP_SESSION");
}

#[test]
fn test_pipeline_error_wraps_subsystems() {
    let wrapped: PipelineError = RunnerError::Timeout { timeout_ms: 1 }.into();
    assert_eq!(wrapped.error_code(), "WP_RUNNER");
    assert!(wrapped.to_string().contains("Runner error"));

    assert_eq!(PipelineError::Cancelled.error_code(), "WP_CANCELLED");
}

#[test]
fn test_error_display_messages() {
    let error = RunnerError::SpawnFailed {
        command: "npx playwright test".into(),
        message: "No such file".into(),
    };
    assert!(error.to_string().contains("npx playwright test"));

    let error = StoreError::WriteFailed {
        path: "/tmp/llkb.json".into(),
        message: "read-only".into(),
    };
    assert!(error.to_string().contains("/tmp/llkb.json"));
}
