//! Failure classifier tests: category selection, tie-breaks, confidence,
//! healability, and batch classification.

use waypoint_healing::classify::{FailureCategory, FailureClassifier};
use waypoint_healing::runner::{TestErrorRecord, TestResultRecord, TestStatus};

fn classifier() -> FailureClassifier {
    FailureClassifier::new()
}

/// `Timeout 30000ms exceeded` is a timing failure and healable.
#[test]
fn test_timeout_is_timing() {
    let classification = classifier().classify_error("Timeout 30000ms exceeded", None);
    assert_eq!(classification.category, FailureCategory::Timing);
    assert!(FailureClassifier::is_healable(&classification));
    assert!((classification.confidence - 1.0 / 3.0).abs() < 1e-9);
    assert_eq!(classification.matched_keywords.len(), 1);
}

/// `401 Unauthorized` is an auth failure and never healable.
#[test]
fn test_unauthorized_is_auth() {
    let classification = classifier().classify_error("401 Unauthorized", None);
    assert_eq!(classification.category, FailureCategory::Auth);
    assert!(!FailureClassifier::is_healable(&classification));
    // Two detectors match: the status code and the word itself.
    assert!((classification.confidence - 2.0 / 3.0).abs() < 1e-9);
    assert!(!classification.is_test_issue);
}

/// Unrecognized text degrades to unknown with confidence 0, never an error.
#[test]
fn test_unrecognized_is_unknown() {
    let classification = classifier().classify_error("something completely different", None);
    assert_eq!(classification.category, FailureCategory::Unknown);
    assert_eq!(classification.confidence, 0.0);
    assert!(classification.matched_keywords.is_empty());
    assert!(!FailureClassifier::is_healable(&classification));
}

/// On equal match counts the earlier table entry wins: selector sits above
/// timing, so one selector keyword plus one timing keyword picks selector.
#[test]
fn test_tie_break_keeps_earlier_category() {
    let classification =
        classifier().classify_error("waiting for locator('#x'); operation timed out", None);
    assert_eq!(classification.category, FailureCategory::Selector);
}

/// The stack trace contributes to detection.
#[test]
fn test_stack_contributes() {
    let classification = classifier().classify_error(
        "expect failed",
        Some("  at ...\n  strict mode violation: locator resolved to 3 elements"),
    );
    assert_eq!(classification.category, FailureCategory::Selector);
}

/// Confidence caps at 1.0 with three or more matching detectors.
#[test]
fn test_confidence_caps_at_one() {
    let classification = classifier().classify_error(
        "waiting for locator('#a'): strict mode violation, resolved to 3 elements, \
         failed to find element",
        None,
    );
    assert_eq!(classification.category, FailureCategory::Selector);
    assert_eq!(classification.confidence, 1.0);
    assert!(classification.matched_keywords.len() >= 3);
}

/// Script errors are recognized and excluded from healing.
#[test]
fn test_script_error() {
    let classification =
        classifier().classify_error("TypeError: undefined is not a function", None);
    assert_eq!(classification.category, FailureCategory::Script);
    assert!(!FailureClassifier::is_healable(&classification));
}

/// Batch classification keys by the joined title path and skips passed tests.
#[test]
fn test_classify_results() {
    let records = vec![
        TestResultRecord {
            status: TestStatus::Passed,
            title_path: vec!["checkout".into(), "happy path".into()],
            errors: vec![],
        },
        TestResultRecord {
            status: TestStatus::Failed,
            title_path: vec!["checkout".into(), "applies coupon".into()],
            errors: vec![TestErrorRecord {
                message: "Timeout 15000ms exceeded".into(),
                stack: None,
            }],
        },
    ];

    let classified = classifier().classify_results(&records);
    assert_eq!(classified.len(), 1);
    let classification = classified.get("checkout > applies coupon").unwrap();
    assert_eq!(classification.category, FailureCategory::Timing);
}

/// Category exclusivity: stats over N classifications sum to N.
#[test]
fn test_failure_stats_sum_to_total() {
    let classifier = classifier();
    let classifications: Vec<_> = [
        "Timeout 30000ms exceeded",
        "401 Unauthorized",
        "waiting for locator('#x')",
        "nothing recognizable",
        "ECONNREFUSED 127.0.0.1:3000",
    ]
    .iter()
    .map(|text| classifier.classify_error(text, None))
    .collect();

    let stats = FailureClassifier::failure_stats(&classifications);
    assert_eq!(stats.total, 5);
    assert_eq!(stats.per_category.values().sum::<usize>(), stats.total);
    assert_eq!(stats.per_category[&FailureCategory::Env], 1);
    assert_eq!(stats.per_category[&FailureCategory::Unknown], 1);
}
