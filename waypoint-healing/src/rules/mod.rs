//! Healing rule engine: selects candidate repair strategies for a
//! classification, subject to allow/forbid policy.
//!
//! The forbidden list is hard-coded and non-configurable. It is checked
//! independently of the project's allow list, so a forbidden fix is never
//! offered even if mistakenly allow-listed.

use std::fmt;

use serde::{Deserialize, Serialize};

use waypoint_core::config::HealingConfig;

use crate::classify::{FailureCategory, FailureClassification, FailureClassifier};

/// A repair strategy. The enum names both the fixes the engine may offer and
/// the fixes the safety policy exists to reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixType {
    /// Re-derive the locator from the current page structure.
    RederiveLocator,
    /// Switch the locator to a stable test id.
    UseTestId,
    /// Substitute a learned-pattern mapping for the failing step.
    LlkbSubstitution,
    /// Replace a fixed deadline with an explicit wait-for signal.
    WaitForSignal,
    /// Raise the step timeout within the configured ceiling.
    IncreaseTimeout,
    // Never offered; see FORBIDDEN_FIXES.
    InsertSleep,
    WeakenAssertion,
    RemoveAssertion,
    ForceClick,
    BypassAuth,
}

impl FixType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::RederiveLocator => "rederive_locator",
            Self::UseTestId => "use_testid",
            Self::LlkbSubstitution => "llkb_substitution",
            Self::WaitForSignal => "wait_for_signal",
            Self::IncreaseTimeout => "increase_timeout",
            Self::InsertSleep => "insert_sleep",
            Self::WeakenAssertion => "weaken_assertion",
            Self::RemoveAssertion => "remove_assertion",
            Self::ForceClick => "force_click",
            Self::BypassAuth => "bypass_auth",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "rederive_locator" => Some(Self::RederiveLocator),
            "use_testid" => Some(Self::UseTestId),
            "llkb_substitution" => Some(Self::LlkbSubstitution),
            "wait_for_signal" => Some(Self::WaitForSignal),
            "increase_timeout" => Some(Self::IncreaseTimeout),
            "insert_sleep" => Some(Self::InsertSleep),
            "weaken_assertion" => Some(Self::WeakenAssertion),
            "remove_assertion" => Some(Self::RemoveAssertion),
            "force_click" => Some(Self::ForceClick),
            "bypass_auth" => Some(Self::BypassAuth),
            _ => None,
        }
    }
}

impl fmt::Display for FixType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fixes that repair symptoms by destroying test value: sleeping, weakening
/// or removing assertions, forcing interactions, or bypassing auth.
pub const FORBIDDEN_FIXES: [FixType; 5] = [
    FixType::InsertSleep,
    FixType::WeakenAssertion,
    FixType::RemoveAssertion,
    FixType::ForceClick,
    FixType::BypassAuth,
];

/// Hard, non-configurable safety check.
pub fn is_fix_forbidden(fix: FixType) -> bool {
    FORBIDDEN_FIXES.contains(&fix)
}

/// One configured repair rule.
#[derive(Debug, Clone)]
pub struct HealingRule {
    pub fix_type: FixType,
    pub applies_to: Vec<FailureCategory>,
    /// Ascending priority: lower is tried first.
    pub priority: u8,
    pub enabled_by_default: bool,
}

/// The built-in rule set, ordered by priority within each category.
pub fn default_rules() -> Vec<HealingRule> {
    vec![
        HealingRule {
            fix_type: FixType::RederiveLocator,
            applies_to: vec![FailureCategory::Selector],
            priority: 10,
            enabled_by_default: true,
        },
        HealingRule {
            fix_type: FixType::UseTestId,
            applies_to: vec![FailureCategory::Selector],
            priority: 20,
            enabled_by_default: true,
        },
        HealingRule {
            fix_type: FixType::LlkbSubstitution,
            applies_to: vec![FailureCategory::Selector],
            priority: 30,
            enabled_by_default: true,
        },
        HealingRule {
            fix_type: FixType::WaitForSignal,
            applies_to: vec![FailureCategory::Timing],
            priority: 10,
            enabled_by_default: true,
        },
        HealingRule {
            fix_type: FixType::IncreaseTimeout,
            applies_to: vec![FailureCategory::Timing],
            priority: 20,
            enabled_by_default: true,
        },
    ]
}

/// The outcome of evaluating a classification against the policy.
#[derive(Debug, Clone)]
pub struct HealingEvaluation {
    pub can_heal: bool,
    /// Applicable fixes sorted ascending by priority.
    pub applicable_fixes: Vec<FixType>,
    pub reason: Option<String>,
}

impl HealingEvaluation {
    fn rejected(reason: impl Into<String>) -> Self {
        Self {
            can_heal: false,
            applicable_fixes: Vec::new(),
            reason: Some(reason.into()),
        }
    }
}

/// Selects candidate fixes for a classification.
pub struct HealingRuleEngine {
    rules: Vec<HealingRule>,
}

impl HealingRuleEngine {
    pub fn new() -> Self {
        Self {
            rules: default_rules(),
        }
    }

    pub fn with_rules(rules: Vec<HealingRule>) -> Self {
        Self { rules }
    }

    /// Evaluate the policy for a classification.
    ///
    /// Returns `can_heal: false` with a reason when healing is globally
    /// disabled, the category is outside the healable set, or no configured
    /// rule applies. Otherwise returns the rules whose `applies_to` includes
    /// the category and whose fix is allowed, sorted ascending by priority.
    pub fn evaluate(
        &self,
        classification: &FailureClassification,
        config: &HealingConfig,
    ) -> HealingEvaluation {
        if !config.effective_enabled() {
            return HealingEvaluation::rejected("healing is disabled");
        }
        if !FailureClassifier::is_healable(classification) {
            return HealingEvaluation::rejected(format!(
                "category `{}` is not healable",
                classification.category
            ));
        }

        let mut applicable: Vec<&HealingRule> = self
            .rules
            .iter()
            .filter(|rule| rule.applies_to.contains(&classification.category))
            .filter(|rule| self.is_allowed(rule, config))
            .collect();
        applicable.sort_by_key(|rule| rule.priority);

        if applicable.is_empty() {
            return HealingEvaluation::rejected(format!(
                "no configured fix applies to category `{}`",
                classification.category
            ));
        }

        HealingEvaluation {
            can_heal: true,
            applicable_fixes: applicable.iter().map(|rule| rule.fix_type).collect(),
            reason: None,
        }
    }

    /// The first applicable fix not yet attempted, or `None` when exhausted.
    /// Guarantees a fix is never repeated within one session.
    pub fn next_fix(
        &self,
        classification: &FailureClassification,
        attempted: &[FixType],
        config: &HealingConfig,
    ) -> Option<FixType> {
        self.evaluate(classification, config)
            .applicable_fixes
            .into_iter()
            .find(|fix| !attempted.contains(fix))
    }

    /// A fix is allowed when it is not forbidden and either the allow list is
    /// empty (rule defaults apply) or the list names it.
    fn is_allowed(&self, rule: &HealingRule, config: &HealingConfig) -> bool {
        if is_fix_forbidden(rule.fix_type) {
            tracing::warn!(fix = %rule.fix_type, "forbidden fix excluded from candidates");
            return false;
        }
        if config.allowed_fixes.is_empty() {
            return rule.enabled_by_default;
        }
        config
            .allowed_fixes
            .iter()
            .any(|name| name == rule.fix_type.name())
    }
}

impl Default for HealingRuleEngine {
    fn default() -> Self {
        Self::new()
    }
}
