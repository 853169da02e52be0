//! Stable error codes for machine-readable reporting.

pub const CONFIG_ERROR: &str = "WP_CONFIG";
pub const STORE_ERROR: &str = "WP_STORE";
pub const RUNNER_ERROR: &str = "WP_RUNNER";
pub const SESSION_ERROR: &str = "WP_SESSION";
pub const CANCELLED: &str = "WP_CANCELLED";

/// Maps every Waypoint error to a stable, machine-readable code.
pub trait WaypointErrorCode {
    fn error_code(&self) -> &'static str;
}
