//! External test runner interface.
//!
//! The runner itself is an external collaborator; this module defines the
//! invocation contract the healing controller consumes, plus a
//! subprocess-backed default implementation.

pub mod process;
pub mod types;

pub use process::ProcessRunner;
pub use types::{RunOutcome, RunRequest, TestErrorRecord, TestResultRecord, TestStatus};

use waypoint_core::errors::RunnerError;

/// Invokes the external browser-test runner.
///
/// A completed run with failing tests returns `Ok` with `success: false`;
/// `Err` is reserved for invocation-level problems (spawn failure, timeout).
pub trait TestRunner {
    fn run(&self, request: &RunRequest) -> Result<RunOutcome, RunnerError>;
}
