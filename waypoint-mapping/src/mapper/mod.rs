//! The step mapper: orchestrates hints, the fixed pattern library, and the
//! learned pattern store into one resolution pipeline.
//!
//! The order is strict and must not be reordered: hints always win because
//! they are authored intent, and fixed patterns always beat learned patterns
//! regardless of learned confidence, so pattern drift can never silently
//! override a vetted rule. This is an ordering rule, not a confidence
//! comparison.

use std::sync::{Arc, OnceLock};

use regex::Regex;

use waypoint_core::config::MappingConfig;
use waypoint_core::errors::StoreError;
use waypoint_core::events::{EventDispatcher, StepBlockedEvent};

use crate::glossary::Glossary;
use crate::hints::{extract_hints, module_hint_is_valid, parse_hints, validate_hints, ExtractedHints};
use crate::ir::{LocatorSpec, LocatorStrategy, MatchSource, Primitive, StepMappingResult, ValueSpec};
use crate::llkb::LlkbStore;
use crate::patterns::PatternLibrary;

/// Default confidence threshold for learned-pattern lookup.
pub const DEFAULT_LLKB_THRESHOLD: f64 = 0.7;

/// Per-call mapping options.
#[derive(Debug, Clone)]
pub struct MapOptions {
    /// Journey identity, required for later success recording.
    pub journey_id: Option<String>,
    /// Enable the learned-pattern tier.
    pub use_llkb: bool,
    /// Minimum learned confidence to accept.
    pub min_confidence: f64,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            journey_id: None,
            use_llkb: true,
            min_confidence: DEFAULT_LLKB_THRESHOLD,
        }
    }
}

impl MapOptions {
    pub fn from_config(config: &MappingConfig) -> Self {
        Self {
            journey_id: None,
            use_llkb: config.effective_use_llkb(),
            min_confidence: config.effective_llkb_min_confidence(),
        }
    }

    pub fn for_journey(mut self, journey_id: impl Into<String>) -> Self {
        self.journey_id = Some(journey_id.into());
        self
    }
}

/// Aggregated counts over a batch of mapped steps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MappingStats {
    pub total: usize,
    pub by_hints: usize,
    pub by_pattern: usize,
    pub by_llkb: usize,
    pub unmatched: usize,
}

impl MappingStats {
    pub fn record(&mut self, result: &StepMappingResult) {
        self.total += 1;
        match result.match_source {
            MatchSource::Hints => self.by_hints += 1,
            MatchSource::Pattern => self.by_pattern += 1,
            MatchSource::Llkb => self.by_llkb += 1,
            MatchSource::None => self.unmatched += 1,
        }
    }

    pub fn merge(&mut self, other: &MappingStats) {
        self.total += other.total;
        self.by_hints += other.by_hints;
        self.by_pattern += other.by_pattern;
        self.by_llkb += other.by_llkb;
        self.unmatched += other.unmatched;
    }
}

/// Maps step text to primitives.
pub struct StepMapper {
    glossary: Glossary,
    library: PatternLibrary,
    events: Option<Arc<EventDispatcher>>,
}

impl StepMapper {
    pub fn new() -> Self {
        Self {
            glossary: Glossary::builtin(),
            library: PatternLibrary::builtin(),
            events: None,
        }
    }

    pub fn with_glossary(mut self, glossary: Glossary) -> Self {
        self.glossary = glossary;
        self
    }

    pub fn with_events(mut self, events: Arc<EventDispatcher>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn glossary(&self) -> &Glossary {
        &self.glossary
    }

    pub fn glossary_mut(&mut self) -> &mut Glossary {
        &mut self.glossary
    }

    /// Map one step line. Pure with respect to `store`: mapping never writes
    /// to the learned store; success recording is deferred until the
    /// generated test passes downstream (see `confirm_success`).
    pub fn map_step_text(
        &self,
        text: &str,
        store: &LlkbStore,
        options: &MapOptions,
    ) -> StepMappingResult {
        // Tier 1: explicit hints.
        let parsed = parse_hints(text);
        let (extracted, extract_warnings) = extract_hints(&parsed);
        for warning in parsed.warnings.iter().chain(extract_warnings.iter()) {
            tracing::warn!(step = text, warning = %warning, "hint warning");
        }
        if extracted.has_any() {
            for inconsistency in validate_hints(&extracted) {
                tracing::warn!(
                    step = text,
                    message = %inconsistency.message,
                    "hint inconsistency"
                );
            }
            if let Some(primitive) = self.primitive_from_hints(&extracted, &parsed.clean_text) {
                tracing::debug!(step = text, kind = primitive.kind(), "mapped via hints");
                return StepMappingResult::mapped(primitive, text, MatchSource::Hints);
            }
        }

        let normalized = self.glossary.normalize_step_text(&parsed.clean_text);

        // Tier 2: fixed rules, including glossary phrase-to-module mappings.
        if let Some(module_path) = self.glossary.module_for_phrase(&normalized) {
            if let Some((module, method)) = module_path.split_once('.') {
                let mut result = StepMappingResult::mapped(
                    Primitive::CallModule {
                        module: module.to_string(),
                        method: method.to_string(),
                    },
                    text,
                    MatchSource::Pattern,
                );
                result.matched_pattern_id = Some("glossary-module".to_string());
                return result;
            }
        }
        if let Some(found) = self.library.match_text(&normalized) {
            tracing::debug!(step = text, rule = found.rule_id, "mapped via pattern library");
            let primitive = self.apply_label_alias(found.primitive);
            let mut result = StepMappingResult::mapped(primitive, text, MatchSource::Pattern);
            result.matched_pattern_id = Some(found.rule_id.to_string());
            return result;
        }

        // Tier 3: learned patterns, at or above the caller's threshold.
        if options.use_llkb {
            if let Some(learned) = store.match_pattern(&normalized, options.min_confidence) {
                tracing::debug!(
                    step = text,
                    pattern = %learned.id,
                    confidence = learned.confidence,
                    "mapped via learned pattern"
                );
                let mut result = StepMappingResult::mapped(
                    learned.primitive.clone(),
                    text,
                    MatchSource::Llkb,
                );
                result.confidence = Some(learned.confidence);
                result.matched_pattern_id = Some(learned.id.clone());
                return result;
            }
        }

        // Miss: blocked, never thrown, so a whole Journey still produces
        // partial output.
        let diagnostic =
            format!("no hint, fixed pattern, or learned pattern matched `{normalized}`");
        if let Some(events) = &self.events {
            events.emit_step_blocked(&StepBlockedEvent {
                source_text: text.to_string(),
                reason: diagnostic.clone(),
            });
        }
        StepMappingResult::unmatched(text, diagnostic)
    }

    /// Map a batch of steps, aggregating statistics.
    pub fn map_steps(
        &self,
        steps: &[String],
        store: &LlkbStore,
        options: &MapOptions,
    ) -> (Vec<StepMappingResult>, MappingStats) {
        let mut stats = MappingStats::default();
        let results = steps
            .iter()
            .map(|step| {
                let result = self.map_step_text(step, store, options);
                stats.record(&result);
                result
            })
            .collect();
        (results, stats)
    }

    /// Confirm a learned-pattern mapping after its generated test passed
    /// downstream. No-op for results from other tiers.
    pub fn confirm_success(
        store: &mut LlkbStore,
        result: &StepMappingResult,
        journey_id: &str,
    ) -> Result<(), StoreError> {
        if result.match_source == MatchSource::Llkb {
            if let Some(id) = &result.matched_pattern_id {
                return store.record_success(id, journey_id);
            }
        }
        Ok(())
    }

    /// Attribute a downstream failure to a learned-pattern mapping.
    /// No-op for results from other tiers.
    pub fn confirm_failure(
        store: &mut LlkbStore,
        result: &StepMappingResult,
    ) -> Result<(), StoreError> {
        if result.match_source == MatchSource::Llkb {
            if let Some(id) = &result.matched_pattern_id {
                return store.record_failure(id);
            }
        }
        Ok(())
    }

    /// Build a primitive directly from hints.
    ///
    /// Behavior hints resolve first (module, signal), then locator hints.
    /// When the clean text also matches a fixed rule, the hint locator
    /// replaces the rule's locator; otherwise a lightweight verb check picks
    /// the action, defaulting to a visibility assertion.
    fn primitive_from_hints(
        &self,
        extracted: &ExtractedHints,
        clean_text: &str,
    ) -> Option<Primitive> {
        if module_hint_is_valid(extracted) {
            let module_path = extracted.behavior.module.as_deref().expect("validated above");
            let (module, method) = module_path.split_once('.').expect("validated above");
            return Some(Primitive::CallModule {
                module: module.to_string(),
                method: method.to_string(),
            });
        }

        if extracted.behavior.signal.as_deref() == Some("toast") {
            let message = extracted
                .locator
                .text
                .clone()
                .unwrap_or_else(|| clean_text.to_string());
            if !message.is_empty() {
                return Some(Primitive::ExpectToast { message });
            }
        }

        let fallback_name = strip_quotes(clean_text);
        let locator = extracted
            .locator
            .to_locator(Some(fallback_name.as_str()).filter(|n| !n.is_empty()))?;
        let normalized = self.glossary.normalize_step_text(clean_text);
        Some(self.hint_action(&normalized, locator))
    }

    /// Swap a pattern-derived label for its canonical glossary alias.
    /// Hint-derived locators are authored intent and are left alone.
    fn apply_label_alias(&self, primitive: Primitive) -> Primitive {
        if let Some(locator) = primitive.locator() {
            if locator.strategy == LocatorStrategy::Label {
                if let Some(alias) = self.glossary.label_alias(&locator.value) {
                    let mut aliased = locator.clone();
                    aliased.value = alias.to_string();
                    return primitive.clone().with_locator(aliased);
                }
            }
        }
        primitive
    }

    fn hint_action(&self, normalized: &str, locator: LocatorSpec) -> Primitive {
        if let Some(found) = self.library.match_text(normalized) {
            if found.primitive.locator().is_some() {
                return found.primitive.with_locator(locator);
            }
            return found.primitive;
        }
        if normalized.contains("uncheck") {
            return Primitive::Uncheck { locator };
        }
        if normalized.contains("check") {
            return Primitive::Check { locator };
        }
        if let Some(value) = trailing_value(normalized) {
            if normalized.contains("fill") {
                return Primitive::Fill {
                    locator,
                    value: ValueSpec::from_raw(&value),
                };
            }
            if normalized.contains("select") {
                return Primitive::Select {
                    locator,
                    value: ValueSpec::literal(value),
                };
            }
        }
        if normalized.contains("click") {
            return Primitive::Click { locator };
        }
        Primitive::ExpectVisible { locator }
    }
}

impl Default for StepMapper {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract a trailing `with "value"` from normalized text.
fn trailing_value(normalized: &str) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r#"with ["']([^"']*)["']$"#).expect("trailing value regex")
    });
    re.captures(normalized).map(|c| c[1].to_string())
}

/// Remove surrounding quotes from a single quoted span, if the whole text is
/// one; otherwise return the text trimmed.
fn strip_quotes(text: &str) -> String {
    let trimmed = text.trim();
    let stripped = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| {
            trimmed
                .strip_prefix('\'')
                .and_then(|s| s.strip_suffix('\''))
        });
    stripped.unwrap_or(trimmed).to_string()
}
