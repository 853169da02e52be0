//! Failure classification types.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Why a test failed, as far as keyword matching can tell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureCategory {
    Selector,
    Timing,
    Navigation,
    Data,
    Auth,
    Env,
    Script,
    Unknown,
}

impl FailureCategory {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Selector => "selector",
            Self::Timing => "timing",
            Self::Navigation => "navigation",
            Self::Data => "data",
            Self::Auth => "auth",
            Self::Env => "env",
            Self::Script => "script",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The classifier's verdict for one error text. Exactly one category per
/// classified error; `Unknown` with confidence 0 when nothing matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureClassification {
    pub category: FailureCategory,
    pub confidence: f64,
    pub explanation: String,
    pub suggestion: String,
    pub is_test_issue: bool,
    pub matched_keywords: Vec<String>,
}

impl FailureClassification {
    /// The no-match verdict.
    pub fn unknown() -> Self {
        Self {
            category: FailureCategory::Unknown,
            confidence: 0.0,
            explanation: "No known failure signature matched".to_string(),
            suggestion: "Review the failure manually".to_string(),
            is_test_issue: false,
            matched_keywords: Vec::new(),
        }
    }
}

/// Per-category counts over a batch of classifications.
#[derive(Debug, Clone, Default)]
pub struct FailureStats {
    pub per_category: HashMap<FailureCategory, usize>,
    pub total: usize,
}

impl FailureStats {
    /// Category exclusivity makes the per-category counts sum to `total`.
    pub fn from_classifications(classifications: &[FailureClassification]) -> Self {
        let mut per_category: HashMap<FailureCategory, usize> = HashMap::new();
        for classification in classifications {
            *per_category.entry(classification.category).or_insert(0) += 1;
        }
        Self {
            per_category,
            total: classifications.len(),
        }
    }
}
