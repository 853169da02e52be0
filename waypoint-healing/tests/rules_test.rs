//! Healing rule engine tests: allow/forbid policy, priority ordering, and
//! fix exhaustion.

use waypoint_core::config::HealingConfig;
use waypoint_healing::classify::{FailureClassifier, FailureClassification};
use waypoint_healing::rules::{
    is_fix_forbidden, FixType, HealingRuleEngine, FORBIDDEN_FIXES,
};

fn classify(text: &str) -> FailureClassification {
    FailureClassifier::new().classify_error(text, None)
}

fn selector_classification() -> FailureClassification {
    classify("waiting for locator('#submit')")
}

fn timing_classification() -> FailureClassification {
    classify("Timeout 30000ms exceeded")
}

#[test]
fn test_selector_fixes_in_priority_order() {
    let engine = HealingRuleEngine::new();
    let evaluation = engine.evaluate(&selector_classification(), &HealingConfig::default());
    assert!(evaluation.can_heal);
    assert_eq!(
        evaluation.applicable_fixes,
        vec![
            FixType::RederiveLocator,
            FixType::UseTestId,
            FixType::LlkbSubstitution
        ]
    );
}

#[test]
fn test_disabled_healing_rejects_with_reason() {
    let engine = HealingRuleEngine::new();
    let config = HealingConfig {
        enabled: Some(false),
        ..Default::default()
    };
    let evaluation = engine.evaluate(&selector_classification(), &config);
    assert!(!evaluation.can_heal);
    assert!(evaluation.applicable_fixes.is_empty());
    assert!(evaluation.reason.unwrap().contains("disabled"));
}

#[test]
fn test_unhealable_category_rejects() {
    let engine = HealingRuleEngine::new();
    let evaluation = engine.evaluate(&classify("401 Unauthorized"), &HealingConfig::default());
    assert!(!evaluation.can_heal);
    assert!(evaluation.reason.unwrap().contains("auth"));
}

/// The allow list narrows candidates without reordering them.
#[test]
fn test_allow_list_filters() {
    let engine = HealingRuleEngine::new();
    let config = HealingConfig {
        allowed_fixes: vec!["use_testid".into()],
        ..Default::default()
    };
    let evaluation = engine.evaluate(&selector_classification(), &config);
    assert!(evaluation.can_heal);
    assert_eq!(evaluation.applicable_fixes, vec![FixType::UseTestId]);
}

/// A forbidden fix is never offered even when the allow list names it.
#[test]
fn test_forbidden_fixes_never_offered() {
    let engine = HealingRuleEngine::new();
    let mut allowed: Vec<String> =
        FORBIDDEN_FIXES.iter().map(|f| f.name().to_string()).collect();
    allowed.push("rederive_locator".into());
    let config = HealingConfig {
        allowed_fixes: allowed,
        ..Default::default()
    };

    for classification in [selector_classification(), timing_classification()] {
        let evaluation = engine.evaluate(&classification, &config);
        for fix in &evaluation.applicable_fixes {
            assert!(
                !is_fix_forbidden(*fix),
                "forbidden fix {fix} offered for {}",
                classification.category
            );
        }
    }
}

#[test]
fn test_next_fix_never_repeats() {
    let engine = HealingRuleEngine::new();
    let config = HealingConfig::default();
    let classification = selector_classification();

    let mut attempted = Vec::new();
    while let Some(fix) = engine.next_fix(&classification, &attempted, &config) {
        assert!(!attempted.contains(&fix), "fix {fix} repeated");
        attempted.push(fix);
    }
    assert_eq!(attempted.len(), 3, "all selector fixes offered exactly once");
}

#[test]
fn test_next_fix_exhausts_to_none() {
    let engine = HealingRuleEngine::new();
    let config = HealingConfig::default();
    let attempted = vec![FixType::WaitForSignal, FixType::IncreaseTimeout];
    assert_eq!(
        engine.next_fix(&timing_classification(), &attempted, &config),
        None
    );
}

#[test]
fn test_fix_type_name_round_trip() {
    for fix in [
        FixType::RederiveLocator,
        FixType::UseTestId,
        FixType::LlkbSubstitution,
        FixType::WaitForSignal,
        FixType::IncreaseTimeout,
        FixType::InsertSleep,
        FixType::WeakenAssertion,
        FixType::RemoveAssertion,
        FixType::ForceClick,
        FixType::BypassAuth,
    ] {
        assert_eq!(FixType::parse(fix.name()), Some(fix));
    }
    assert_eq!(FixType::parse("nonsense"), None);
}
