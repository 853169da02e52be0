//! Locator candidate scoring and selection.

use regex::Regex;

use crate::ir::{LocatorSpec, LocatorStrategy};

/// Default strategy priority, best first.
pub const DEFAULT_LOCATOR_PRIORITY: [LocatorStrategy; 6] = [
    LocatorStrategy::Role,
    LocatorStrategy::Label,
    LocatorStrategy::Placeholder,
    LocatorStrategy::Text,
    LocatorStrategy::TestId,
    LocatorStrategy::Css,
];

/// Score a locator against a priority list: the index of its strategy,
/// lower is better. A strategy absent from the list scores worst.
pub fn score_locator(spec: &LocatorSpec, priority: &[LocatorStrategy]) -> usize {
    priority
        .iter()
        .position(|s| *s == spec.strategy)
        .unwrap_or(priority.len())
}

/// The outcome of selecting among candidate locators.
#[derive(Debug, Clone)]
pub struct LocatorSelection {
    pub spec: LocatorSpec,
    /// True when every candidate matched a forbidden pattern and the first
    /// original candidate was returned as a last resort; the caller is
    /// responsible for surfacing a warning.
    pub all_forbidden: bool,
}

/// Filters forbidden candidates, then picks the best-scoring survivor.
pub struct LocatorSelector {
    priority: Vec<LocatorStrategy>,
    forbidden: Vec<Regex>,
}

impl LocatorSelector {
    /// Build from configured strategy names and forbidden-value regexes.
    /// Unknown strategy names are skipped with a warning; an invalid
    /// forbidden regex is a configuration defect and is returned as an error.
    pub fn from_config(
        priority_names: &[String],
        forbidden_patterns: &[String],
    ) -> Result<Self, regex::Error> {
        let priority = if priority_names.is_empty() {
            DEFAULT_LOCATOR_PRIORITY.to_vec()
        } else {
            priority_names
                .iter()
                .filter_map(|name| {
                    let parsed = LocatorStrategy::parse(name);
                    if parsed.is_none() {
                        tracing::warn!(strategy = %name, "unknown locator strategy in priority list");
                    }
                    parsed
                })
                .collect()
        };
        let forbidden = forbidden_patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { priority, forbidden })
    }

    /// Pick the best candidate.
    ///
    /// Candidates whose raw value matches any forbidden pattern are filtered
    /// out before scoring. If that removes everything, the first original
    /// candidate comes back with `all_forbidden: true`.
    pub fn select(&self, candidates: &[LocatorSpec]) -> Option<LocatorSelection> {
        let first = candidates.first()?;

        let allowed: Vec<&LocatorSpec> = candidates
            .iter()
            .filter(|c| !self.is_forbidden(c))
            .collect();

        if allowed.is_empty() {
            return Some(LocatorSelection {
                spec: first.clone(),
                all_forbidden: true,
            });
        }

        let best = allowed
            .iter()
            .min_by_key(|c| score_locator(c, &self.priority))
            .expect("allowed is non-empty");
        Some(LocatorSelection {
            spec: (*best).clone(),
            all_forbidden: false,
        })
    }

    fn is_forbidden(&self, spec: &LocatorSpec) -> bool {
        self.forbidden.iter().any(|re| re.is_match(&spec.value))
    }
}

impl Default for LocatorSelector {
    fn default() -> Self {
        Self {
            priority: DEFAULT_LOCATOR_PRIORITY.to_vec(),
            forbidden: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_follows_priority_order() {
        let role = LocatorSpec::role("button", "Save");
        let css = LocatorSpec::css(".btn-save");
        assert!(
            score_locator(&role, &DEFAULT_LOCATOR_PRIORITY)
                < score_locator(&css, &DEFAULT_LOCATOR_PRIORITY)
        );
    }

    #[test]
    fn test_absent_strategy_scores_worst() {
        let priority = [LocatorStrategy::Role, LocatorStrategy::Label];
        let css = LocatorSpec::css("#x");
        assert_eq!(score_locator(&css, &priority), 2);
    }

    #[test]
    fn test_select_prefers_best_strategy() {
        let selector = LocatorSelector::default();
        let candidates = vec![
            LocatorSpec::css("#submit"),
            LocatorSpec::role("button", "Submit"),
            LocatorSpec::text("Submit"),
        ];
        let selection = selector.select(&candidates).unwrap();
        assert_eq!(selection.spec.strategy, LocatorStrategy::Role);
        assert!(!selection.all_forbidden);
    }

    #[test]
    fn test_forbidden_candidates_are_filtered() {
        let selector =
            LocatorSelector::from_config(&[], &[r"^#generated-".to_string()]).unwrap();
        let candidates = vec![
            LocatorSpec::css("#generated-abc123"),
            LocatorSpec::text("Submit"),
        ];
        let selection = selector.select(&candidates).unwrap();
        assert_eq!(selection.spec.strategy, LocatorStrategy::Text);
    }

    #[test]
    fn test_all_forbidden_falls_back_to_first() {
        let selector = LocatorSelector::from_config(&[], &[r".*".to_string()]).unwrap();
        let candidates = vec![
            LocatorSpec::css("#generated-abc123"),
            LocatorSpec::text("Submit"),
        ];
        let selection = selector.select(&candidates).unwrap();
        assert_eq!(selection.spec, candidates[0]);
        assert!(selection.all_forbidden);
    }

    #[test]
    fn test_empty_candidates() {
        let selector = LocatorSelector::default();
        assert!(selector.select(&[]).is_none());
    }
}
