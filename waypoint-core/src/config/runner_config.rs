//! External test runner configuration.

use serde::{Deserialize, Serialize};

/// Configuration for invoking the external browser-test runner.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RunnerConfig {
    /// Runner command and base arguments. Default: ["npx", "playwright", "test"].
    #[serde(default)]
    pub command: Vec<String>,
    /// Parallel workers. Default: 1 (healing re-runs are sequential).
    pub workers: Option<u32>,
    /// Runner-level retries. Default: 0.
    pub retries: Option<u32>,
    /// Reporter name. Default: "json".
    pub reporter: Option<String>,
}

impl RunnerConfig {
    pub fn effective_command(&self) -> Vec<String> {
        if self.command.is_empty() {
            vec!["npx".into(), "playwright".into(), "test".into()]
        } else {
            self.command.clone()
        }
    }

    pub fn effective_workers(&self) -> u32 {
        self.workers.unwrap_or(1)
    }

    pub fn effective_retries(&self) -> u32 {
        self.retries.unwrap_or(0)
    }

    pub fn effective_reporter(&self) -> &str {
        self.reporter.as_deref().unwrap_or("json")
    }
}
