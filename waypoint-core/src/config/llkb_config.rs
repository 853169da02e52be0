//! Learned pattern store (LLKB) configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the learned pattern store.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LlkbConfig {
    /// Directory holding the store file. Default: ".waypoint".
    pub store_root: Option<String>,
    /// Pruning: minimum confidence to survive once warm. Default: 0.3.
    pub prune_min_confidence: Option<f64>,
    /// Pruning: applications (successes + failures) before an entry is
    /// eligible for pruning. Default: 5.
    pub prune_min_applications: Option<u32>,
    /// Minimum confidence for an entry to appear in the read-only export.
    /// Default: 0.6.
    pub publish_threshold: Option<f64>,
    /// Number of entries in the read-only export. Default: 20.
    pub export_size: Option<usize>,
}

impl LlkbConfig {
    pub fn effective_store_root(&self) -> &str {
        self.store_root.as_deref().unwrap_or(".waypoint")
    }

    pub fn effective_prune_min_confidence(&self) -> f64 {
        self.prune_min_confidence.unwrap_or(0.3)
    }

    pub fn effective_prune_min_applications(&self) -> u32 {
        self.prune_min_applications.unwrap_or(5)
    }

    pub fn effective_publish_threshold(&self) -> f64 {
        self.publish_threshold.unwrap_or(0.6)
    }

    pub fn effective_export_size(&self) -> usize {
        self.export_size.unwrap_or(20)
    }
}
