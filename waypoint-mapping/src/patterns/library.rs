//! Fixed text-to-primitive rules.
//!
//! An ordered list of (regex, extractor) pairs evaluated top-to-bottom; the
//! first matching rule wins, so order encodes precedence (navigation rules
//! sit above the generic click rule). All regexes run against normalized
//! step text: lowercase canonical verbs with quoted spans kept verbatim.

use regex::{Captures, Regex};

use crate::ir::{LocatorSpec, Primitive, ValueSpec};

type Extractor = fn(&Captures<'_>) -> Primitive;

/// One fixed mapping rule.
pub struct PatternRule {
    pub id: &'static str,
    regex: Regex,
    extractor: Extractor,
}

impl PatternRule {
    fn new(id: &'static str, pattern: &str, extractor: Extractor) -> Self {
        Self {
            id,
            regex: Regex::new(pattern).expect("builtin pattern regex"),
            extractor,
        }
    }
}

/// A successful library match.
#[derive(Debug, Clone)]
pub struct PatternMatch {
    pub rule_id: &'static str,
    pub primitive: Primitive,
}

/// The ordered fixed rule set.
pub struct PatternLibrary {
    rules: Vec<PatternRule>,
}

impl PatternLibrary {
    /// The built-in rule set.
    pub fn builtin() -> Self {
        let rules = vec![
            // Navigation before anything generic.
            PatternRule::new(
                "goto-url",
                r#"^(?:the )?user navigate to ["']([^"']+)["']$"#,
                |c| Primitive::Goto {
                    url: c[1].to_string(),
                },
            ),
            PatternRule::new(
                "goto-page",
                r"^(?:the )?user navigate to (?:the )?([a-z0-9][a-z0-9 -]*?)(?: page)?$",
                |c| Primitive::Goto {
                    url: page_path(&c[1]),
                },
            ),
            PatternRule::new(
                "click-button",
                r#"^user click (?:on )?(?:the )?["']([^"']+)["'] button$"#,
                |c| Primitive::Click {
                    locator: LocatorSpec::role("button", &c[1]),
                },
            ),
            PatternRule::new(
                "click-link",
                r#"^user click (?:on )?(?:the )?["']([^"']+)["'] link$"#,
                |c| Primitive::Click {
                    locator: LocatorSpec::role("link", &c[1]),
                },
            ),
            PatternRule::new(
                "click-generic",
                r#"^user click (?:on )?(?:the )?["']([^"']+)["']$"#,
                |c| Primitive::Click {
                    locator: LocatorSpec::text(&c[1]),
                },
            ),
            PatternRule::new(
                "fill-quoted",
                r#"^user fill (?:in )?["']([^"']+)["'] with ["']([^"']*)["']$"#,
                |c| Primitive::Fill {
                    locator: LocatorSpec::label(&c[1]),
                    value: ValueSpec::from_raw(&c[2]),
                },
            ),
            PatternRule::new(
                "fill-field",
                r#"^user fill (?:in )?(?:the )?([a-z0-9][a-z0-9 -]*?) field with ["']([^"']*)["']$"#,
                |c| Primitive::Fill {
                    locator: LocatorSpec::label(&c[1]),
                    value: ValueSpec::from_raw(&c[2]),
                },
            ),
            PatternRule::new(
                "select-quoted",
                r#"^user select ["']([^"']+)["'] from (?:the )?["']([^"']+)["']$"#,
                |c| Primitive::Select {
                    locator: LocatorSpec::label(&c[2]),
                    value: ValueSpec::literal(&c[1]),
                },
            ),
            PatternRule::new(
                "select-dropdown",
                r#"^user select ["']([^"']+)["'] from (?:the )?([a-z0-9][a-z0-9 -]*?) dropdown$"#,
                |c| Primitive::Select {
                    locator: LocatorSpec::label(&c[2]),
                    value: ValueSpec::literal(&c[1]),
                },
            ),
            PatternRule::new(
                "check",
                r#"^user check (?:the )?["']([^"']+)["'](?: checkbox)?$"#,
                |c| Primitive::Check {
                    locator: LocatorSpec::label(&c[1]),
                },
            ),
            PatternRule::new(
                "uncheck",
                r#"^user uncheck (?:the )?["']([^"']+)["'](?: checkbox)?$"#,
                |c| Primitive::Uncheck {
                    locator: LocatorSpec::label(&c[1]),
                },
            ),
            PatternRule::new(
                "press-key",
                r#"^user press (?:the )?["']?([A-Za-z0-9+]+)["']? key$"#,
                |c| Primitive::Press {
                    key: c[1].to_string(),
                },
            ),
            // Assertions.
            PatternRule::new(
                "expect-url",
                r#"^(?:the )?url (?:is|contains) ["']([^"']+)["']$"#,
                |c| Primitive::ExpectUrl {
                    pattern: c[1].to_string(),
                },
            ),
            PatternRule::new(
                "expect-page",
                r"^user is on (?:the )?([a-z0-9][a-z0-9 -]*?) page$",
                |c| url_pattern_from_page(&c[1]),
            ),
            PatternRule::new(
                "expect-toast",
                r#"^(?:a |the )?toast display ["']([^"']+)["']$"#,
                |c| Primitive::ExpectToast {
                    message: c[1].to_string(),
                },
            ),
            PatternRule::new(
                "expect-text",
                r#"^(?:the )?([a-z0-9][a-z0-9 -]*?) display ["']([^"']+)["']$"#,
                |c| Primitive::ExpectText {
                    locator: LocatorSpec::label(&c[1]),
                    text: c[2].to_string(),
                },
            ),
            PatternRule::new(
                "expect-visible",
                r#"^user see ["']([^"']+)["']$"#,
                |c| Primitive::ExpectVisible {
                    locator: LocatorSpec::text(&c[1]),
                },
            ),
            PatternRule::new(
                "expect-visible-passive",
                r#"^["']([^"']+)["'] is visible$"#,
                |c| Primitive::ExpectVisible {
                    locator: LocatorSpec::text(&c[1]),
                },
            ),
        ];
        Self { rules }
    }

    /// Evaluate rules top-to-bottom; the first match wins.
    pub fn match_text(&self, normalized: &str) -> Option<PatternMatch> {
        for rule in &self.rules {
            if let Some(captures) = rule.regex.captures(normalized) {
                return Some(PatternMatch {
                    rule_id: rule.id,
                    primitive: (rule.extractor)(&captures),
                });
            }
        }
        None
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

impl Default for PatternLibrary {
    fn default() -> Self {
        Self::builtin()
    }
}

/// "order history" -> "/order-history".
fn page_path(page_name: &str) -> String {
    let slug = page_name.trim().replace(' ', "-");
    format!("/{slug}")
}

fn url_pattern_from_page(page_name: &str) -> Primitive {
    Primitive::ExpectUrl {
        pattern: page_path(page_name),
    }
}
