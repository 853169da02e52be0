//! Built-in glossary tables.
//!
//! Order matters: `resolve_canonical` walks entries top-to-bottom and the
//! first entry claiming a synonym wins, so broad verbs sit above nouns.

/// (canonical, synonyms). Synonyms are single tokens; replacement happens
/// token-by-token during normalization.
pub(crate) const ENTRIES: &[(&str, &[&str])] = &[
    ("navigate", &["navigates", "go", "goes", "visit", "visits", "open", "opens"]),
    ("click", &["clicks", "tap", "taps"]),
    ("fill", &["fills", "enter", "enters", "type", "types", "input", "inputs"]),
    ("select", &["selects", "choose", "chooses", "pick", "picks"]),
    ("check", &["checks", "tick", "ticks"]),
    ("uncheck", &["unchecks", "untick", "unticks"]),
    ("press", &["presses", "hit", "hits"]),
    ("see", &["sees", "observe", "observes"]),
    ("display", &["displays", "show", "shows", "shown", "appear", "appears"]),
    ("log", &["logs"]),
    ("sign", &["signs"]),
    ("user", &["visitor", "customer", "shopper"]),
    ("button", &["btn"]),
    ("link", &["hyperlink", "anchor"]),
    ("field", &["textbox"]),
    ("dropdown", &["combobox", "picklist"]),
    ("page", &["screen"]),
    ("toast", &["snackbar", "notification"]),
];

/// Label-text aliases, keyed case-insensitively.
pub(crate) const LABEL_ALIASES: &[(&str, &str)] = &[
    ("e-mail", "Email"),
    ("sign-in", "Sign in"),
    ("zip", "ZIP code"),
];

/// Whole-phrase to `module.method` mappings, keyed by normalized step text.
pub(crate) const PHRASE_MODULES: &[(&str, &str)] = &[
    ("user log in", "auth.login"),
    ("user log out", "auth.logout"),
    ("user sign up", "auth.register"),
];
