//! The ordered category table.
//!
//! Table order is load-bearing: when two categories tie on detector match
//! count, the earlier entry wins. Do not reorder.

use regex::Regex;

use super::types::FailureCategory;

/// One category's detectors and messaging.
pub(crate) struct CategoryRule {
    pub category: FailureCategory,
    pub detectors: Vec<Regex>,
    pub explanation: &'static str,
    pub suggestion: &'static str,
    pub is_test_issue: bool,
}

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(&format!("(?i){p}")).expect("builtin detector regex"))
        .collect()
}

/// Build the fixed category table.
pub(crate) fn category_table() -> Vec<CategoryRule> {
    vec![
        CategoryRule {
            category: FailureCategory::Selector,
            detectors: compile(&[
                r"waiting for (?:locator|selector)",
                r"strict mode violation",
                r"resolved to \d+ elements",
                r"(?:element|locator) (?:is )?not (?:found|visible|attached)",
                r"no (?:node|element) found for selector",
                r"failed to find element",
                r"getBy(?:Role|Label|Text|TestId|Placeholder|Title|AltText)",
            ]),
            explanation: "The target element could not be located, which usually means a brittle or outdated selector",
            suggestion: "Re-derive the locator from the current page, preferring role or label strategies",
            is_test_issue: true,
        },
        CategoryRule {
            category: FailureCategory::Timing,
            detectors: compile(&[
                r"timeout \d+ms exceeded",
                r"timed out",
                r"exceeded while waiting",
                r"waiting for event",
                r"still (?:loading|pending)",
                r"deadline exceeded",
            ]),
            explanation: "The page did not reach the expected state within the allotted time",
            suggestion: "Wait for an explicit signal instead of a fixed deadline, or raise the step timeout",
            is_test_issue: true,
        },
        CategoryRule {
            category: FailureCategory::Navigation,
            detectors: compile(&[
                r"net::ERR_",
                r"navigation (?:failed|timeout|aborted)",
                r"page\.goto",
                r"unexpected (?:url|redirect)",
                r"expected url",
                r"page crashed",
            ]),
            explanation: "The browser failed to reach or stay on the expected page",
            suggestion: "Verify the route, redirects, and base URL configuration",
            is_test_issue: false,
        },
        CategoryRule {
            category: FailureCategory::Data,
            detectors: compile(&[
                r"expected .+ (?:but )?(?:got|received)",
                r"received (?:string|value|object|array)",
                r"to(?:Be|Equal|Contain|HaveText|HaveValue)\(",
                r"validation (?:error|failed)",
                r"missing (?:required )?(?:field|value)",
            ]),
            explanation: "The page content did not match the expected value",
            suggestion: "Check test data and fixtures against what the application actually renders",
            is_test_issue: false,
        },
        CategoryRule {
            category: FailureCategory::Auth,
            detectors: compile(&[
                r"\b401\b",
                r"unauthori[sz]ed",
                r"\b403\b",
                r"forbidden",
                r"(?:login|sign.?in) required",
                r"session (?:expired|invalid)",
                r"invalid (?:credentials|token)",
                r"csrf",
            ]),
            explanation: "The test was rejected by authentication or authorization",
            suggestion: "Check credentials and session setup in the test fixtures",
            is_test_issue: false,
        },
        CategoryRule {
            category: FailureCategory::Env,
            detectors: compile(&[
                r"econnrefused",
                r"econnreset",
                r"enotfound",
                r"address already in use",
                r"connect(?:ion)? refused",
                r"executable doesn't exist",
                r"browser (?:is )?not installed",
                r"out of memory",
                r"no space left",
            ]),
            explanation: "The test environment itself failed, independent of the application",
            suggestion: "Check that the application and browser are running and reachable",
            is_test_issue: false,
        },
        CategoryRule {
            category: FailureCategory::Script,
            detectors: compile(&[
                r"referenceerror",
                r"typeerror",
                r"syntaxerror",
                r"is not a function",
                r"cannot read propert",
                r"undefined is not",
                r"null is not an object",
                r"unhandled (?:promise )?rejection",
            ]),
            explanation: "A script error occurred in the page or the test code",
            suggestion: "Inspect the stack trace; this is usually an application or codegen defect",
            is_test_issue: false,
        },
    ]
}
