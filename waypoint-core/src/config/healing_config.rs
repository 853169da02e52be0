//! Healing configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the self-healing subsystem.
///
/// `allowed_fixes` is an allow list by fix name; the hard-coded forbidden
/// list in the rule engine is checked independently and wins over this list.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HealingConfig {
    /// Globally enable or disable healing. Default: true.
    pub enabled: Option<bool>,
    /// Maximum repair attempts per session. Default: 3.
    pub max_attempts: Option<u32>,
    /// Fix types the project allows, by name. Default: all non-forbidden fixes.
    #[serde(default)]
    pub allowed_fixes: Vec<String>,
    /// Per-test timeout passed to the runner, in milliseconds. Default: 30000.
    pub test_timeout_ms: Option<u64>,
    /// Whole-run timeout = per-test timeout x this factor. Default: 3.
    pub run_timeout_scale: Option<u32>,
    /// Directory for per-journey healing session logs. Default: ".waypoint/healing".
    pub log_root: Option<String>,
}

impl HealingConfig {
    pub fn effective_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    pub fn effective_max_attempts(&self) -> u32 {
        self.max_attempts.unwrap_or(3)
    }

    pub fn effective_test_timeout_ms(&self) -> u64 {
        self.test_timeout_ms.unwrap_or(30_000)
    }

    pub fn effective_run_timeout_scale(&self) -> u32 {
        self.run_timeout_scale.unwrap_or(3)
    }

    /// Whole-run timeout in milliseconds.
    pub fn effective_run_timeout_ms(&self) -> u64 {
        self.effective_test_timeout_ms() * u64::from(self.effective_run_timeout_scale())
    }

    pub fn effective_log_root(&self) -> &str {
        self.log_root.as_deref().unwrap_or(".waypoint/healing")
    }
}
