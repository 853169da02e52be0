//! Hint types: recognized keys, parsed and grouped forms.

use crate::ir::{LocatorSpec, LocatorStrategy};

/// Keys recognized inside a hint block. Unknown keys never become hints;
/// they are reported as warnings during parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintKey {
    Role,
    TestId,
    Label,
    Text,
    Exact,
    Level,
    Signal,
    Module,
    Wait,
    Timeout,
}

impl HintKey {
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "role" => Some(Self::Role),
            "testid" => Some(Self::TestId),
            "label" => Some(Self::Label),
            "text" => Some(Self::Text),
            "exact" => Some(Self::Exact),
            "level" => Some(Self::Level),
            "signal" => Some(Self::Signal),
            "module" => Some(Self::Module),
            "wait" => Some(Self::Wait),
            "timeout" => Some(Self::Timeout),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Role => "role",
            Self::TestId => "testid",
            Self::Label => "label",
            Self::Text => "text",
            Self::Exact => "exact",
            Self::Level => "level",
            Self::Signal => "signal",
            Self::Module => "module",
            Self::Wait => "wait",
            Self::Timeout => "timeout",
        }
    }
}

/// A single recognized `key=value` directive.
#[derive(Debug, Clone, PartialEq)]
pub struct Hint {
    pub key: HintKey,
    pub value: String,
}

/// Raw parse result: recognized hints, the step text with the hint block
/// removed, and any warnings produced along the way.
#[derive(Debug, Clone, Default)]
pub struct ParsedHints {
    pub hints: Vec<Hint>,
    pub clean_text: String,
    pub warnings: Vec<String>,
}

impl ParsedHints {
    pub fn has_hints(&self) -> bool {
        !self.hints.is_empty()
    }
}

/// Locator-relevant hint fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocatorHints {
    pub role: Option<String>,
    pub testid: Option<String>,
    pub label: Option<String>,
    pub text: Option<String>,
    pub exact: Option<bool>,
    pub level: Option<u8>,
}

impl LocatorHints {
    /// Number of locator-style hints present (testid, role, label, text).
    pub fn locator_hint_count(&self) -> usize {
        [
            self.testid.is_some(),
            self.role.is_some(),
            self.label.is_some(),
            self.text.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count()
    }

    /// Build a locator from the hints, applying the fixed priority:
    /// testid > role(+label/exact/level) > label > text.
    ///
    /// `fallback_name` supplies the accessible name for a role locator when
    /// neither `label` nor `text` is hinted (typically the clean step text).
    pub fn to_locator(&self, fallback_name: Option<&str>) -> Option<LocatorSpec> {
        if let Some(testid) = &self.testid {
            return Some(LocatorSpec::testid(testid.clone()));
        }
        if let Some(role) = &self.role {
            let mut spec = LocatorSpec::new(LocatorStrategy::Role, role.clone());
            spec.options.name = self
                .label
                .clone()
                .or_else(|| self.text.clone())
                .or_else(|| fallback_name.map(str::to_string))
                .filter(|name| !name.is_empty());
            spec.options.exact = self.exact;
            spec.options.level = self.level;
            return Some(spec);
        }
        if let Some(label) = &self.label {
            let mut spec = LocatorSpec::label(label.clone());
            spec.options.exact = self.exact;
            return Some(spec);
        }
        if let Some(text) = &self.text {
            let mut spec = LocatorSpec::text(text.clone());
            spec.options.exact = self.exact;
            return Some(spec);
        }
        None
    }
}

/// Behavior-relevant hint fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BehaviorHints {
    pub signal: Option<String>,
    pub module: Option<String>,
    pub wait_ms: Option<u64>,
    pub timeout_ms: Option<u64>,
}

/// Hints grouped into locator-relevant and behavior-relevant fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedHints {
    pub locator: LocatorHints,
    pub behavior: BehaviorHints,
}

impl ExtractedHints {
    pub fn has_any(&self) -> bool {
        self.locator != LocatorHints::default() || self.behavior != BehaviorHints::default()
    }
}

/// Severity of a hint inconsistency. Inconsistencies are reported,
/// never silently corrected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InconsistencySeverity {
    Error,
    Warning,
}

/// One reported hint inconsistency.
#[derive(Debug, Clone)]
pub struct HintInconsistency {
    pub severity: InconsistencySeverity,
    pub message: String,
}
