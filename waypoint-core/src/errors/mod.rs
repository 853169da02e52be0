//! Error handling for Waypoint.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.
//!
//! Mapping misses, hint inconsistencies, classification misses, forbidden-fix
//! requests, and store corruption are NOT errors: they surface as blocked
//! primitives, warnings, `Unknown` classifications, candidate exclusion, and
//! empty-store recovery respectively.

pub mod config_error;
pub mod error_code;
pub mod pipeline_error;
pub mod runner_error;
pub mod session_error;
pub mod store_error;

pub use config_error::ConfigError;
pub use error_code::WaypointErrorCode;
pub use pipeline_error::PipelineError;
pub use runner_error::RunnerError;
pub use session_error::SessionError;
pub use store_error::StoreError;
