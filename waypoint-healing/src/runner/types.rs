//! Runner invocation and result-ingestion types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use waypoint_core::config::{HealingConfig, RunnerConfig};

/// What to run and how.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub test_file: String,
    pub grep: Option<String>,
    pub workers: u32,
    pub retries: u32,
    /// Per-test timeout passed through to the runner.
    pub timeout_ms: u64,
    /// Deadline for the whole invocation, scaled up from the per-test timeout.
    pub run_timeout_ms: u64,
    pub reporter: String,
}

impl RunRequest {
    pub fn from_config(
        test_file: impl Into<String>,
        runner: &RunnerConfig,
        healing: &HealingConfig,
    ) -> Self {
        Self {
            test_file: test_file.into(),
            grep: None,
            workers: runner.effective_workers(),
            retries: runner.effective_retries(),
            timeout_ms: healing.effective_test_timeout_ms(),
            run_timeout_ms: healing.effective_run_timeout_ms(),
            reporter: runner.effective_reporter().to_string(),
        }
    }

    pub fn with_grep(mut self, grep: impl Into<String>) -> Self {
        self.grep = Some(grep.into());
        self
    }
}

/// What the runner reported back. A failing test is a successful invocation
/// with `success: false`.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub report_path: Option<PathBuf>,
    pub duration_ms: u64,
}

impl RunOutcome {
    /// The text handed to the failure classifier: stderr when present,
    /// stdout otherwise.
    pub fn failure_text(&self) -> &str {
        if self.stderr.trim().is_empty() {
            &self.stdout
        } else {
            &self.stderr
        }
    }
}

/// Status of one test in a runner report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Passed,
    Failed,
}

/// One error from a failed test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestErrorRecord {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

/// One per-test result ingested from the runner's report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResultRecord {
    pub status: TestStatus,
    pub title_path: Vec<String>,
    #[serde(default)]
    pub errors: Vec<TestErrorRecord>,
}

impl TestResultRecord {
    /// Classification-map key.
    pub fn key(&self) -> String {
        self.title_path.join(" > ")
    }
}
