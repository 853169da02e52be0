//! Step mapper resolution-order tests: hints beat fixed patterns, fixed
//! patterns beat learned patterns, and misses degrade to blocked output.

use waypoint_mapping::ir::{LocatorStrategy, MatchSource, Primitive};
use waypoint_mapping::llkb::LlkbStore;
use waypoint_mapping::mapper::{MapOptions, MappingStats, StepMapper};

fn mapper() -> StepMapper {
    StepMapper::new()
}

fn options() -> MapOptions {
    MapOptions::default()
}

/// `User clicks "Submit" button` maps to a click with a role=button locator
/// named "Submit".
#[test]
fn test_click_submit_button_scenario() {
    let store = LlkbStore::in_memory();
    let result = mapper().map_step_text(r#"User clicks "Submit" button"#, &store, &options());

    assert_eq!(result.match_source, MatchSource::Pattern);
    match result.primitive.expect("mapped") {
        Primitive::Click { locator } => {
            assert_eq!(locator.strategy, LocatorStrategy::Role);
            assert_eq!(locator.value, "button");
            assert_eq!(locator.options.name.as_deref(), Some("Submit"));
        }
        other => panic!("expected click, got {other:?}"),
    }
}

/// A hint block wins even when a learned pattern exists for the clean text
/// at maximum confidence.
#[test]
fn test_hint_beats_learned_pattern() {
    let mapper = mapper();
    let mut store = LlkbStore::in_memory();

    // Plant a high-confidence learned pattern for the clean text.
    let id = store.learn(
        "welcome",
        Primitive::Press { key: "Enter".into() },
        "journey-a",
    );
    for _ in 0..10 {
        store.record_success(&id, "journey-a").unwrap();
    }

    let result = mapper.map_step_text("(role=heading, level=2)Welcome", &store, &options());

    assert_eq!(result.match_source, MatchSource::Hints);
    match result.primitive.expect("mapped") {
        Primitive::ExpectVisible { locator } => {
            assert_eq!(locator.strategy, LocatorStrategy::Role);
            assert_eq!(locator.value, "heading");
            assert_eq!(locator.options.level, Some(2));
            assert_eq!(locator.options.name.as_deref(), Some("Welcome"));
        }
        other => panic!("expected visibility assertion, got {other:?}"),
    }
}

/// A fixed library rule wins over a learned entry for the same text, even at
/// higher learned confidence. This is an ordering rule, not a confidence
/// comparison.
#[test]
fn test_fixed_pattern_beats_learned_pattern() {
    let mapper = mapper();
    let mut store = LlkbStore::in_memory();

    let normalized = r#"user click "Save" button"#;
    let id = store.learn(
        normalized,
        Primitive::Press { key: "Escape".into() },
        "journey-a",
    );
    for _ in 0..10 {
        store.record_success(&id, "journey-a").unwrap();
    }
    assert!(store.match_pattern(normalized, 0.9).is_some());

    let result = mapper.map_step_text(r#"User clicks "Save" button"#, &store, &options());
    assert_eq!(result.match_source, MatchSource::Pattern);
    assert!(matches!(result.primitive, Some(Primitive::Click { .. })));
}

/// The learned tier resolves only at or above the caller's threshold, and
/// only when enabled.
#[test]
fn test_llkb_threshold_and_toggle() {
    let mapper = mapper();
    let mut store = LlkbStore::in_memory();
    store.learn(
        "user wibble the widget",
        Primitive::Press { key: "Tab".into() },
        "journey-a",
    );

    // Initial confidence 0.5 sits below the default 0.7 threshold.
    let result = mapper.map_step_text("user wibble the widget", &store, &options());
    assert_eq!(result.match_source, MatchSource::None);

    let mut relaxed = options();
    relaxed.min_confidence = 0.4;
    let result = mapper.map_step_text("user wibble the widget", &store, &relaxed);
    assert_eq!(result.match_source, MatchSource::Llkb);
    assert_eq!(result.confidence, Some(0.5));
    assert!(result.matched_pattern_id.is_some());

    let mut disabled = relaxed.clone();
    disabled.use_llkb = false;
    let result = mapper.map_step_text("user wibble the widget", &store, &disabled);
    assert_eq!(result.match_source, MatchSource::None);
}

/// A miss returns no primitive, source none, and a diagnostic; converting to
/// a primitive yields `blocked`.
#[test]
fn test_unmatched_step_is_blocked_not_thrown() {
    let store = LlkbStore::in_memory();
    let result = mapper().map_step_text("User contemplates the void", &store, &options());

    assert!(result.primitive.is_none());
    assert_eq!(result.match_source, MatchSource::None);
    assert!(result.diagnostic.is_some());
    assert!(result.into_primitive().is_blocked());
}

/// Mapping is a pure function of text and store state: repeated calls
/// without recording produce identical results.
#[test]
fn test_mapping_is_deterministic() {
    let mapper = mapper();
    let mut store = LlkbStore::in_memory();
    store.learn(
        "user twiddle the knob",
        Primitive::Press { key: "ArrowUp".into() },
        "journey-a",
    );

    for text in [
        r#"User clicks "Submit" button"#,
        "(role=heading)Dashboard",
        "user twiddle the knob",
        "completely unmappable text",
    ] {
        let first = mapper.map_step_text(text, &store, &options());
        let second = mapper.map_step_text(text, &store, &options());
        assert_eq!(first, second, "non-deterministic mapping for {text}");
    }
}

/// Glossary phrase-to-module mappings resolve as fixed rules.
#[test]
fn test_phrase_module_mapping() {
    let store = LlkbStore::in_memory();
    let result = mapper().map_step_text("User logs in", &store, &options());
    assert_eq!(result.match_source, MatchSource::Pattern);
    assert_eq!(
        result.primitive,
        Some(Primitive::CallModule {
            module: "auth".into(),
            method: "login".into()
        })
    );
}

/// A valid module hint short-circuits everything else.
#[test]
fn test_module_hint_builds_call_module() {
    let store = LlkbStore::in_memory();
    let result = mapper().map_step_text("(module=cart.addItem)", &store, &options());
    assert_eq!(result.match_source, MatchSource::Hints);
    assert_eq!(
        result.primitive,
        Some(Primitive::CallModule {
            module: "cart".into(),
            method: "addItem".into()
        })
    );
}

/// A hint locator overrides the locator a fixed rule would have derived,
/// while keeping the rule's action.
#[test]
fn test_hint_locator_overrides_pattern_locator() {
    let store = LlkbStore::in_memory();
    let result = mapper().map_step_text(
        r#"(testid=submit-btn) User clicks "Submit" button"#,
        &store,
        &options(),
    );
    assert_eq!(result.match_source, MatchSource::Hints);
    match result.primitive.expect("mapped") {
        Primitive::Click { locator } => {
            assert_eq!(locator.strategy, LocatorStrategy::TestId);
            assert_eq!(locator.value, "submit-btn");
        }
        other => panic!("expected click, got {other:?}"),
    }
}

/// Batch mapping aggregates per-source counts that sum to the total.
#[test]
fn test_map_steps_stats() {
    let mapper = mapper();
    let store = LlkbStore::in_memory();
    let steps: Vec<String> = vec![
        r#"User clicks "Submit" button"#.into(),
        "(role=heading)Dashboard".into(),
        "gibberish beyond mapping".into(),
        r#"User navigates to "/checkout""#.into(),
    ];

    let (results, stats) = mapper.map_steps(&steps, &store, &options());
    assert_eq!(results.len(), 4);
    assert_eq!(stats.total, 4);
    assert_eq!(stats.by_pattern, 2);
    assert_eq!(stats.by_hints, 1);
    assert_eq!(stats.unmatched, 1);
    assert_eq!(
        stats.by_hints + stats.by_pattern + stats.by_llkb + stats.unmatched,
        stats.total
    );

    let mut merged = MappingStats::default();
    merged.merge(&stats);
    merged.merge(&stats);
    assert_eq!(merged.total, 8);
}

/// Label aliases from the glossary canonicalize pattern-derived label
/// locators.
#[test]
fn test_label_alias_applied_to_pattern_locator() {
    let store = LlkbStore::in_memory();
    let result = mapper().map_step_text(r#"User fills "e-mail" with "a@b.c""#, &store, &options());
    match result.primitive.expect("mapped") {
        Primitive::Fill { locator, .. } => {
            assert_eq!(locator.strategy, LocatorStrategy::Label);
            assert_eq!(locator.value, "Email");
        }
        other => panic!("expected fill, got {other:?}"),
    }
}

/// Mapping options derive from the mapping config section.
#[test]
fn test_options_from_config() {
    let config = waypoint_core::config::MappingConfig {
        use_llkb: Some(false),
        llkb_min_confidence: Some(0.9),
        ..Default::default()
    };
    let from_config = MapOptions::from_config(&config);
    assert!(!from_config.use_llkb);
    assert_eq!(from_config.min_confidence, 0.9);
    assert_eq!(MapOptions::default().min_confidence, 0.7);
}

/// Success recording is deferred: it happens through `confirm_success` after
/// the downstream run, and only for learned-tier results.
#[test]
fn test_confirm_success_only_for_llkb_results() {
    let mapper = mapper();
    let mut store = LlkbStore::in_memory();
    let id = store.learn(
        "user wibble the widget",
        Primitive::Press { key: "Tab".into() },
        "journey-a",
    );

    let mut relaxed = options();
    relaxed.min_confidence = 0.4;
    let llkb_result = mapper.map_step_text("user wibble the widget", &store, &relaxed);
    assert_eq!(llkb_result.match_source, MatchSource::Llkb);

    StepMapper::confirm_success(&mut store, &llkb_result, "journey-b").unwrap();
    let pattern = store.get(&id).unwrap();
    assert_eq!(pattern.success_count, 2);
    assert!((pattern.confidence - 0.55).abs() < 1e-9);
    assert!(pattern.source_journeys.contains("journey-b"));

    // Pattern-tier results leave the store untouched.
    let pattern_result =
        mapper.map_step_text(r#"User clicks "Go" button"#, &store, &options());
    StepMapper::confirm_success(&mut store, &pattern_result, "journey-b").unwrap();
    assert_eq!(store.get(&id).unwrap().success_count, 2);
}
