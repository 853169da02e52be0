//! Step mapping configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the step mapper and locator selection.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MappingConfig {
    /// Enable learned-pattern lookup as the third resolution tier. Default: true.
    pub use_llkb: Option<bool>,
    /// Minimum confidence for a learned pattern to be used. Default: 0.7.
    pub llkb_min_confidence: Option<f64>,
    /// Locator strategy priority, best first.
    /// Default: ["role", "label", "placeholder", "text", "testid", "css"].
    #[serde(default)]
    pub locator_priority: Vec<String>,
    /// Regexes over raw selector values that disqualify a candidate locator.
    #[serde(default)]
    pub forbidden_selectors: Vec<String>,
}

impl MappingConfig {
    /// Returns whether learned-pattern lookup is enabled, defaulting to true.
    pub fn effective_use_llkb(&self) -> bool {
        self.use_llkb.unwrap_or(true)
    }

    /// Returns the effective learned-pattern confidence threshold, defaulting to 0.7.
    pub fn effective_llkb_min_confidence(&self) -> f64 {
        self.llkb_min_confidence.unwrap_or(0.7)
    }
}
