//! Intermediate representation: locators, primitives, mapping results.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Strategy used to locate an element on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocatorStrategy {
    Role,
    Label,
    Placeholder,
    Text,
    #[serde(rename = "testid")]
    TestId,
    Css,
}

impl LocatorStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Role => "role",
            Self::Label => "label",
            Self::Placeholder => "placeholder",
            Self::Text => "text",
            Self::TestId => "testid",
            Self::Css => "css",
        }
    }

    /// Parse a strategy name; unknown names return `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "role" => Some(Self::Role),
            "label" => Some(Self::Label),
            "placeholder" => Some(Self::Placeholder),
            "text" => Some(Self::Text),
            "testid" => Some(Self::TestId),
            "css" => Some(Self::Css),
            _ => None,
        }
    }
}

impl fmt::Display for LocatorStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Options refining a locator. Which options are meaningful depends on the
/// strategy: `name`/`exact`/`level` apply to `role`, `exact` to `label` and
/// `text`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exact: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
}

impl LocatorOptions {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.exact.is_none() && self.level.is_none()
    }
}

/// A concrete way to find one element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocatorSpec {
    pub strategy: LocatorStrategy,
    pub value: String,
    #[serde(default, skip_serializing_if = "LocatorOptions::is_empty")]
    pub options: LocatorOptions,
}

impl LocatorSpec {
    /// Create a locator. An empty value is a programmer error: every caller
    /// constructs locators from already-validated match groups or hints.
    pub fn new(strategy: LocatorStrategy, value: impl Into<String>) -> Self {
        let value = value.into();
        assert!(!value.is_empty(), "locator value must be non-empty");
        Self {
            strategy,
            value,
            options: LocatorOptions::default(),
        }
    }

    /// Role locator with an accessible name, e.g. role=button name="Submit".
    pub fn role(role: impl Into<String>, name: impl Into<String>) -> Self {
        let mut spec = Self::new(LocatorStrategy::Role, role);
        spec.options.name = Some(name.into());
        spec
    }

    pub fn label(value: impl Into<String>) -> Self {
        Self::new(LocatorStrategy::Label, value)
    }

    pub fn placeholder(value: impl Into<String>) -> Self {
        Self::new(LocatorStrategy::Placeholder, value)
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::new(LocatorStrategy::Text, value)
    }

    pub fn testid(value: impl Into<String>) -> Self {
        Self::new(LocatorStrategy::TestId, value)
    }

    pub fn css(value: impl Into<String>) -> Self {
        Self::new(LocatorStrategy::Css, value)
    }

    pub fn with_exact(mut self, exact: bool) -> Self {
        self.options.exact = Some(exact);
        self
    }

    pub fn with_level(mut self, level: u8) -> Self {
        self.options.level = Some(level);
        self
    }
}

/// A value to type or select, either a literal or a reference into
/// journey-scoped test data (`{{data.path}}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ValueSpec {
    Literal { value: String },
    DataRef { path: String },
}

impl ValueSpec {
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
        }
    }

    /// Interpret `{{path}}` as a data reference, anything else as a literal.
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Some(inner) = trimmed
            .strip_prefix("{{")
            .and_then(|s| s.strip_suffix("}}"))
        {
            Self::DataRef {
                path: inner.trim().to_string(),
            }
        } else {
            Self::Literal {
                value: raw.to_string(),
            }
        }
    }
}

/// One canonical, executable test action or assertion.
///
/// `Blocked` is the only non-executable variant: it records a step that
/// could not be mapped, so a whole Journey can still produce partial output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    Goto {
        url: String,
    },
    Click {
        locator: LocatorSpec,
    },
    Fill {
        locator: LocatorSpec,
        value: ValueSpec,
    },
    Select {
        locator: LocatorSpec,
        value: ValueSpec,
    },
    Check {
        locator: LocatorSpec,
    },
    Uncheck {
        locator: LocatorSpec,
    },
    Press {
        key: String,
    },
    ExpectVisible {
        locator: LocatorSpec,
    },
    ExpectText {
        locator: LocatorSpec,
        text: String,
    },
    ExpectUrl {
        pattern: String,
    },
    ExpectToast {
        message: String,
    },
    CallModule {
        module: String,
        method: String,
    },
    Blocked {
        reason: String,
        source_text: String,
    },
}

impl Primitive {
    /// Short name of the variant, matching the serialized `kind` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Goto { .. } => "goto",
            Self::Click { .. } => "click",
            Self::Fill { .. } => "fill",
            Self::Select { .. } => "select",
            Self::Check { .. } => "check",
            Self::Uncheck { .. } => "uncheck",
            Self::Press { .. } => "press",
            Self::ExpectVisible { .. } => "expect_visible",
            Self::ExpectText { .. } => "expect_text",
            Self::ExpectUrl { .. } => "expect_url",
            Self::ExpectToast { .. } => "expect_toast",
            Self::CallModule { .. } => "call_module",
            Self::Blocked { .. } => "blocked",
        }
    }

    pub fn is_assertion(&self) -> bool {
        matches!(
            self,
            Self::ExpectVisible { .. }
                | Self::ExpectText { .. }
                | Self::ExpectUrl { .. }
                | Self::ExpectToast { .. }
        )
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked { .. })
    }

    /// The primary locator of this primitive, if it has one.
    pub fn locator(&self) -> Option<&LocatorSpec> {
        match self {
            Self::Click { locator }
            | Self::Fill { locator, .. }
            | Self::Select { locator, .. }
            | Self::Check { locator }
            | Self::Uncheck { locator }
            | Self::ExpectVisible { locator }
            | Self::ExpectText { locator, .. } => Some(locator),
            _ => None,
        }
    }

    /// Replace the primary locator, if this primitive carries one.
    /// Used when an explicit hint overrides a pattern-derived locator.
    pub fn with_locator(mut self, new: LocatorSpec) -> Self {
        match &mut self {
            Self::Click { locator }
            | Self::Fill { locator, .. }
            | Self::Select { locator, .. }
            | Self::Check { locator }
            | Self::Uncheck { locator }
            | Self::ExpectVisible { locator }
            | Self::ExpectText { locator, .. } => *locator = new,
            _ => {}
        }
        self
    }
}

/// Which resolution tier produced a mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchSource {
    Hints,
    Pattern,
    Llkb,
    None,
}

impl MatchSource {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Hints => "hints",
            Self::Pattern => "pattern",
            Self::Llkb => "llkb",
            Self::None => "none",
        }
    }
}

/// The outcome of mapping one step line.
///
/// Invariant: `primitive.is_none()` exactly when `match_source == None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepMappingResult {
    pub primitive: Option<Primitive>,
    pub source_text: String,
    pub is_assertion: bool,
    pub match_source: MatchSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_pattern_id: Option<String>,
    /// Human-readable explanation when the step could not be mapped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
}

impl StepMappingResult {
    /// A successful mapping from the given tier.
    pub fn mapped(
        primitive: Primitive,
        source_text: impl Into<String>,
        match_source: MatchSource,
    ) -> Self {
        assert!(
            match_source != MatchSource::None,
            "mapped result requires a real match source"
        );
        let is_assertion = primitive.is_assertion();
        Self {
            primitive: Some(primitive),
            source_text: source_text.into(),
            is_assertion,
            match_source,
            confidence: None,
            matched_pattern_id: None,
            diagnostic: None,
        }
    }

    /// A mapping miss with a diagnostic.
    pub fn unmatched(source_text: impl Into<String>, diagnostic: impl Into<String>) -> Self {
        Self {
            primitive: None,
            source_text: source_text.into(),
            is_assertion: false,
            match_source: MatchSource::None,
            confidence: None,
            matched_pattern_id: None,
            diagnostic: Some(diagnostic.into()),
        }
    }

    pub fn is_mapped(&self) -> bool {
        self.primitive.is_some()
    }

    /// Convert into an always-executable-or-blocked primitive: misses become
    /// `Blocked` so a whole Journey still emits partial output.
    pub fn into_primitive(self) -> Primitive {
        match self.primitive {
            Some(p) => p,
            None => Primitive::Blocked {
                reason: self
                    .diagnostic
                    .unwrap_or_else(|| "no mapping rule matched".to_string()),
                source_text: self.source_text,
            },
        }
    }
}
