//! Learned pattern types and tunable constants.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::ir::Primitive;

/// Confidence floor: repeated failures never push an entry below this.
pub const CONFIDENCE_FLOOR: f64 = 0.10;
/// Confidence cap: repeated successes never push an entry above this.
pub const CONFIDENCE_CAP: f64 = 0.95;
/// Confidence added on a recorded success.
pub const SUCCESS_DELTA: f64 = 0.05;
/// Confidence removed on a recorded failure.
pub const FAILURE_DELTA: f64 = 0.10;
/// Confidence assigned when a pattern is first learned.
pub const INITIAL_CONFIDENCE: f64 = 0.50;

/// Store document schema version.
pub const STORE_VERSION: u32 = 1;
/// Store file name inside the store root.
pub const STORE_FILE: &str = "llkb.json";

/// One persisted, confidence-scored mapping from normalized step text to a
/// primitive. `normalized_text` is the unique key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnedPattern {
    pub id: String,
    pub normalized_text: String,
    pub primitive: Primitive,
    pub confidence: f64,
    pub success_count: u64,
    pub fail_count: u64,
    /// Journey ids that contributed a recorded success (set semantics).
    #[serde(default)]
    pub source_journeys: BTreeSet<String>,
    pub created_at: u64,
    pub last_used_at: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_success_at: Option<u64>,
}

impl LearnedPattern {
    /// Total recorded applications, successes plus failures.
    pub fn applications(&self) -> u64 {
        self.success_count + self.fail_count
    }
}

/// The on-disk store document: one JSON file per store root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreDocument {
    pub version: u32,
    pub patterns: Vec<LearnedPattern>,
}

/// Summary statistics over the store.
#[derive(Debug, Clone)]
pub struct LlkbDiagnostics {
    pub total_patterns: usize,
    pub avg_confidence: f64,
    pub publishable: usize,
}

impl LlkbDiagnostics {
    pub fn from_patterns(patterns: &[LearnedPattern], publish_threshold: f64) -> Self {
        let total = patterns.len();
        let avg_confidence = if total == 0 {
            0.0
        } else {
            patterns.iter().map(|p| p.confidence).sum::<f64>() / total as f64
        };
        let publishable = patterns
            .iter()
            .filter(|p| p.confidence >= publish_threshold)
            .count();
        Self {
            total_patterns: total,
            avg_confidence,
            publishable,
        }
    }
}
