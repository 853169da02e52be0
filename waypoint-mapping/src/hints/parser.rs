//! Hint block parsing.
//!
//! A hint block is a parenthesized group of `key=value` directives embedded
//! anywhere in a step line, e.g. `(role=heading, level=2)Welcome`. Values may
//! be bare or quoted. A parenthetical with no `key=value` pair is ordinary
//! prose and is left alone.

use std::sync::OnceLock;

use regex::Regex;

use super::types::{BehaviorHints, ExtractedHints, Hint, HintKey, LocatorHints, ParsedHints};

/// The fixed ARIA role vocabulary accepted by `role=` hints.
const ARIA_ROLES: &[&str] = &[
    "alert",
    "alertdialog",
    "banner",
    "button",
    "cell",
    "checkbox",
    "combobox",
    "dialog",
    "form",
    "heading",
    "img",
    "link",
    "list",
    "listbox",
    "listitem",
    "main",
    "menu",
    "menuitem",
    "navigation",
    "option",
    "progressbar",
    "radio",
    "row",
    "searchbox",
    "slider",
    "spinbutton",
    "status",
    "switch",
    "tab",
    "table",
    "tabpanel",
    "textbox",
    "toolbar",
    "tooltip",
];

fn block_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\(([^)]*)\)").expect("hint block regex"))
}

fn pair_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"([A-Za-z_][A-Za-z0-9_]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^,\s]+))"#)
            .expect("hint pair regex")
    })
}

/// Parse the first hint block out of a step line.
///
/// Unknown keys and invalid enumerated values produce warnings but never
/// abort parsing; the offending directive is simply dropped.
pub fn parse_hints(text: &str) -> ParsedHints {
    let mut parsed = ParsedHints {
        clean_text: text.to_string(),
        ..Default::default()
    };

    for block in block_regex().captures_iter(text) {
        let content = &block[1];
        let pairs: Vec<_> = pair_regex().captures_iter(content).collect();
        if pairs.is_empty() {
            // Ordinary parenthetical, not a hint block.
            continue;
        }

        for pair in &pairs {
            let key_raw = &pair[1];
            let value = pair
                .get(2)
                .or_else(|| pair.get(3))
                .or_else(|| pair.get(4))
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();

            if value.is_empty() {
                parsed
                    .warnings
                    .push(format!("hint `{key_raw}` has an empty value and was ignored"));
                continue;
            }

            let Some(key) = HintKey::parse(&key_raw.to_lowercase()) else {
                parsed
                    .warnings
                    .push(format!("unknown hint key `{key_raw}` ignored"));
                continue;
            };

            if key == HintKey::Role && !ARIA_ROLES.contains(&value.to_lowercase().as_str()) {
                parsed.warnings.push(format!(
                    "`{value}` is not a recognized ARIA role; role hint ignored"
                ));
                continue;
            }

            parsed.hints.push(Hint { key, value });
        }

        // Remove the block from the clean text and stop at the first real one.
        let full = block.get(0).expect("capture 0 always present").as_str();
        parsed.clean_text = text.replacen(full, "", 1);
        break;
    }

    parsed.clean_text = normalize_spaces(&parsed.clean_text);
    parsed
}

/// Group recognized hints into locator-relevant and behavior-relevant fields.
///
/// Numeric hints that fail to parse are reported in `warnings` and dropped.
pub fn extract_hints(parsed: &ParsedHints) -> (ExtractedHints, Vec<String>) {
    let mut locator = LocatorHints::default();
    let mut behavior = BehaviorHints::default();
    let mut warnings = Vec::new();

    for hint in &parsed.hints {
        match hint.key {
            HintKey::Role => locator.role = Some(hint.value.to_lowercase()),
            HintKey::TestId => locator.testid = Some(hint.value.clone()),
            HintKey::Label => locator.label = Some(hint.value.clone()),
            HintKey::Text => locator.text = Some(hint.value.clone()),
            HintKey::Exact => match hint.value.parse::<bool>() {
                Ok(v) => locator.exact = Some(v),
                Err(_) => warnings.push(format!(
                    "exact hint expects true or false, got `{}`",
                    hint.value
                )),
            },
            HintKey::Level => match hint.value.parse::<u8>() {
                Ok(v) if (1..=6).contains(&v) => locator.level = Some(v),
                _ => warnings.push(format!(
                    "level hint expects a heading level 1-6, got `{}`",
                    hint.value
                )),
            },
            HintKey::Signal => behavior.signal = Some(hint.value.to_lowercase()),
            HintKey::Module => behavior.module = Some(hint.value.clone()),
            HintKey::Wait => match hint.value.parse::<u64>() {
                Ok(v) => behavior.wait_ms = Some(v),
                Err(_) => warnings.push(format!(
                    "wait hint expects milliseconds, got `{}`",
                    hint.value
                )),
            },
            HintKey::Timeout => match hint.value.parse::<u64>() {
                Ok(v) => behavior.timeout_ms = Some(v),
                Err(_) => warnings.push(format!(
                    "timeout hint expects milliseconds, got `{}`",
                    hint.value
                )),
            },
        }
    }

    (ExtractedHints { locator, behavior }, warnings)
}

fn normalize_spaces(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_block() {
        let parsed = parse_hints(r#"(role=heading, level=2)Welcome"#);
        assert_eq!(parsed.hints.len(), 2);
        assert_eq!(parsed.clean_text, "Welcome");
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn test_quoted_value_with_comma() {
        let parsed = parse_hints(r#"User clicks (label="Save, please") the button"#);
        assert_eq!(parsed.hints.len(), 1);
        assert_eq!(parsed.hints[0].value, "Save, please");
        assert_eq!(parsed.clean_text, "User clicks the button");
    }

    #[test]
    fn test_unknown_key_warns_but_continues() {
        let parsed = parse_hints("(colour=red, testid=save-btn)Save");
        assert_eq!(parsed.hints.len(), 1);
        assert_eq!(parsed.hints[0].key, HintKey::TestId);
        assert_eq!(parsed.warnings.len(), 1);
        assert!(parsed.warnings[0].contains("colour"));
    }

    #[test]
    fn test_invalid_role_warns() {
        let parsed = parse_hints("(role=bigbutton)Save");
        assert!(parsed.hints.is_empty());
        assert_eq!(parsed.warnings.len(), 1);
    }

    #[test]
    fn test_plain_parenthetical_is_not_a_block() {
        let parsed = parse_hints("User clicks Save (if logged in)");
        assert!(!parsed.has_hints());
        assert_eq!(parsed.clean_text, "User clicks Save (if logged in)");
    }

    #[test]
    fn test_extract_groups_fields() {
        let parsed = parse_hints("(role=button, label=Save, exact=true, timeout=5000)");
        let (extracted, warnings) = extract_hints(&parsed);
        assert!(warnings.is_empty());
        assert_eq!(extracted.locator.role.as_deref(), Some("button"));
        assert_eq!(extracted.locator.label.as_deref(), Some("Save"));
        assert_eq!(extracted.locator.exact, Some(true));
        assert_eq!(extracted.behavior.timeout_ms, Some(5000));
    }

    #[test]
    fn test_empty_value_is_dropped() {
        let parsed = parse_hints(r#"(label="", testid=save)Go"#);
        assert_eq!(parsed.hints.len(), 1);
        assert_eq!(parsed.hints[0].key, HintKey::TestId);
        assert!(parsed.warnings[0].contains("empty value"));
    }

    #[test]
    fn test_bad_level_value_warns() {
        let parsed = parse_hints("(role=heading, level=nine)Title");
        let (extracted, warnings) = extract_hints(&parsed);
        assert_eq!(extracted.locator.level, None);
        assert_eq!(warnings.len(), 1);
    }
}
