//! Hint consistency validation. Inconsistencies are reported to the caller,
//! never silently corrected; generation proceeds with best-effort resolution.

use std::sync::OnceLock;

use regex::Regex;

use super::types::{ExtractedHints, HintInconsistency, InconsistencySeverity};

fn module_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*\.[A-Za-z_][A-Za-z0-9_]*$").expect("module regex")
    })
}

/// Check grouped hints for internal consistency.
pub fn validate_hints(extracted: &ExtractedHints) -> Vec<HintInconsistency> {
    let mut inconsistencies = Vec::new();

    let locator_count = extracted.locator.locator_hint_count();
    if locator_count > 1 {
        let mut present = Vec::new();
        if extracted.locator.testid.is_some() {
            present.push("testid");
        }
        if extracted.locator.role.is_some() {
            present.push("role");
        }
        if extracted.locator.label.is_some() {
            present.push("label");
        }
        if extracted.locator.text.is_some() {
            present.push("text");
        }
        inconsistencies.push(HintInconsistency {
            severity: InconsistencySeverity::Error,
            message: format!(
                "multiple locator hints present ({}); resolution uses testid > role > label > text",
                present.join(", ")
            ),
        });
    }

    if extracted.locator.level.is_some() && extracted.locator.role.as_deref() != Some("heading") {
        inconsistencies.push(HintInconsistency {
            severity: InconsistencySeverity::Warning,
            message: "level hint is only meaningful with role=heading".to_string(),
        });
    }

    if let Some(module) = &extracted.behavior.module {
        if !module_regex().is_match(module) {
            inconsistencies.push(HintInconsistency {
                severity: InconsistencySeverity::Warning,
                message: format!("module hint `{module}` is not of the form module.method"),
            });
        }
    }

    inconsistencies
}

/// True when the module hint is present and well-formed.
pub fn module_hint_is_valid(extracted: &ExtractedHints) -> bool {
    extracted
        .behavior
        .module
        .as_deref()
        .is_some_and(|m| module_regex().is_match(m))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hints::parser::{extract_hints, parse_hints};

    fn extracted(text: &str) -> ExtractedHints {
        let parsed = parse_hints(text);
        extract_hints(&parsed).0
    }

    #[test]
    fn test_multiple_locator_hints_is_error() {
        let e = extracted("(testid=save, label=Save)Go");
        let found = validate_hints(&e);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].severity, InconsistencySeverity::Error);
    }

    #[test]
    fn test_level_without_heading_role() {
        let e = extracted("(role=button, level=2)Go");
        let found = validate_hints(&e);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].severity, InconsistencySeverity::Warning);
    }

    #[test]
    fn test_malformed_module_hint() {
        let e = extracted("(module=loginFlow)Go");
        let found = validate_hints(&e);
        assert_eq!(found.len(), 1);
        assert!(found[0].message.contains("module.method"));
        assert!(!module_hint_is_valid(&e));
    }

    #[test]
    fn test_well_formed_module_hint() {
        let e = extracted("(module=auth.login)Go");
        assert!(validate_hints(&e).is_empty());
        assert!(module_hint_is_valid(&e));
    }
}
