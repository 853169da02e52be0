//! Failure classifier: maps raw runner error text to a failure category with
//! confidence and actionability.

mod categories;
pub mod types;

use rustc_hash::FxHashMap;

use crate::runner::types::{TestResultRecord, TestStatus};

use categories::{category_table, CategoryRule};
pub use types::{FailureCategory, FailureClassification, FailureStats};

/// Maximum detector matches that count toward confidence: confidence is
/// `min(matches / 3, 1)`. Tunable constant, preserved for behavioral parity.
const CONFIDENCE_MATCH_CEILING: f64 = 3.0;

/// Keyword-table failure classifier.
pub struct FailureClassifier {
    table: Vec<CategoryRule>,
}

impl FailureClassifier {
    pub fn new() -> Self {
        Self {
            table: category_table(),
        }
    }

    /// Classify one error. The message and optional stack are concatenated;
    /// every category's detectors run and the strictly greatest match count
    /// wins, earlier table position winning ties. Zero matches anywhere
    /// degrades to `Unknown` with confidence 0 rather than an error: an
    /// unrecognized failure is still a valid outcome to report.
    pub fn classify_error(&self, message: &str, stack: Option<&str>) -> FailureClassification {
        let text = match stack {
            Some(stack) => format!("{message}\n{stack}"),
            None => message.to_string(),
        };

        let mut best: Option<(&CategoryRule, usize, Vec<String>)> = None;
        for rule in &self.table {
            let mut matched = Vec::new();
            for detector in &rule.detectors {
                if let Some(found) = detector.find(&text) {
                    matched.push(found.as_str().to_string());
                }
            }
            let count = matched.len();
            let strictly_better = best
                .as_ref()
                .map_or(true, |(_, best_count, _)| count > *best_count);
            if count > 0 && strictly_better {
                best = Some((rule, count, matched));
            }
        }

        match best {
            None => FailureClassification::unknown(),
            Some((rule, count, matched_keywords)) => FailureClassification {
                category: rule.category,
                confidence: (count as f64 / CONFIDENCE_MATCH_CEILING).min(1.0),
                explanation: rule.explanation.to_string(),
                suggestion: rule.suggestion.to_string(),
                is_test_issue: rule.is_test_issue,
                matched_keywords,
            },
        }
    }

    /// Classify every failed record in a runner report, keyed by the joined
    /// title path. All of a record's error messages and stacks contribute.
    pub fn classify_results(
        &self,
        records: &[TestResultRecord],
    ) -> FxHashMap<String, FailureClassification> {
        let mut classified = FxHashMap::default();
        for record in records {
            if record.status != TestStatus::Failed {
                continue;
            }
            let message = record
                .errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("\n");
            let stack = record
                .errors
                .iter()
                .filter_map(|e| e.stack.as_deref())
                .collect::<Vec<_>>()
                .join("\n");
            let stack = (!stack.is_empty()).then_some(stack);
            classified.insert(
                record.key(),
                self.classify_error(&message, stack.as_deref()),
            );
        }
        classified
    }

    /// Only selector and timing failures are candidates for automatic repair.
    /// Other categories most often reflect real application or environment
    /// problems rather than brittle test authoring.
    pub fn is_healable(classification: &FailureClassification) -> bool {
        matches!(
            classification.category,
            FailureCategory::Selector | FailureCategory::Timing
        )
    }

    /// Aggregate counts over a batch of classifications.
    pub fn failure_stats(classifications: &[FailureClassification]) -> FailureStats {
        FailureStats::from_classifications(classifications)
    }
}

impl Default for FailureClassifier {
    fn default() -> Self {
        Self::new()
    }
}
