//! Glossary and step-text normalizer: canonical-term resolution, the leaf
//! dependency of the step mapper.

mod builtin;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// One canonical term and the synonyms that resolve to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlossaryEntry {
    pub canonical: String,
    #[serde(default)]
    pub synonyms: Vec<String>,
}

/// Synonym table plus label-alias and phrase-to-module maps.
///
/// Entries are ordered; the first entry claiming a term wins. User-supplied
/// glossaries are merged over the built-in defaults, never replacing them.
#[derive(Debug, Clone)]
pub struct Glossary {
    entries: Vec<GlossaryEntry>,
    /// Lowercased term (canonical or synonym) -> canonical form.
    index: FxHashMap<String, String>,
    /// Lowercased label variant -> canonical label text.
    label_aliases: FxHashMap<String, String>,
    /// Lowercased normalized phrase -> "module.method".
    phrase_modules: FxHashMap<String, String>,
}

impl Glossary {
    /// The built-in glossary shipped with the engine.
    pub fn builtin() -> Self {
        let entries = builtin::ENTRIES
            .iter()
            .map(|(canonical, synonyms)| GlossaryEntry {
                canonical: (*canonical).to_string(),
                synonyms: synonyms.iter().map(|s| (*s).to_string()).collect(),
            })
            .collect();
        let label_aliases = builtin::LABEL_ALIASES
            .iter()
            .map(|(k, v)| (k.to_lowercase(), (*v).to_string()))
            .collect();
        let phrase_modules = builtin::PHRASE_MODULES
            .iter()
            .map(|(k, v)| (k.to_lowercase(), (*v).to_string()))
            .collect();
        let mut glossary = Self {
            entries,
            index: FxHashMap::default(),
            label_aliases,
            phrase_modules,
        };
        glossary.rebuild_index();
        glossary
    }

    /// An empty glossary (terms pass through unchanged). Useful as a base for
    /// fully user-defined vocabularies and in tests.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            index: FxHashMap::default(),
            label_aliases: FxHashMap::default(),
            phrase_modules: FxHashMap::default(),
        }
    }

    /// Merge a user glossary over this one.
    ///
    /// Matching canonical entries (case-insensitive) union their synonym
    /// sets; non-matching entries are appended. Label aliases and phrase
    /// modules merge by case-insensitive key with the user's version winning.
    pub fn merge_user(
        &mut self,
        entries: Vec<GlossaryEntry>,
        label_aliases: Vec<(String, String)>,
        phrase_modules: Vec<(String, String)>,
    ) {
        for user_entry in entries {
            match self
                .entries
                .iter_mut()
                .find(|e| e.canonical.eq_ignore_ascii_case(&user_entry.canonical))
            {
                Some(existing) => {
                    for synonym in user_entry.synonyms {
                        if !existing
                            .synonyms
                            .iter()
                            .any(|s| s.eq_ignore_ascii_case(&synonym))
                        {
                            existing.synonyms.push(synonym);
                        }
                    }
                }
                None => self.entries.push(user_entry),
            }
        }
        for (key, value) in label_aliases {
            self.label_aliases.insert(key.to_lowercase(), value);
        }
        for (key, value) in phrase_modules {
            self.phrase_modules.insert(key.to_lowercase(), value);
        }
        self.rebuild_index();
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        for entry in &self.entries {
            let canonical = entry.canonical.to_lowercase();
            self.index
                .entry(canonical.clone())
                .or_insert_with(|| entry.canonical.clone());
            for synonym in &entry.synonyms {
                // First entry claiming a synonym wins.
                self.index
                    .entry(synonym.to_lowercase())
                    .or_insert_with(|| entry.canonical.clone());
            }
        }
    }

    /// Resolve a lowercase term to its canonical form.
    /// Unknown terms pass through unchanged.
    pub fn resolve_canonical(&self, term: &str) -> String {
        match self.index.get(term) {
            Some(canonical) => canonical.clone(),
            None => term.to_string(),
        }
    }

    /// Canonical label text for a label variant, if an alias exists.
    pub fn label_alias(&self, label: &str) -> Option<&str> {
        self.label_aliases.get(&label.to_lowercase()).map(String::as_str)
    }

    /// `module.method` mapped from a whole normalized phrase, if any.
    pub fn module_for_phrase(&self, normalized: &str) -> Option<&str> {
        self.phrase_modules.get(normalized).map(String::as_str)
    }

    /// Normalize a step line: whitespace tokenization, lowercasing, and
    /// canonical-term replacement. Quoted spans (single or double) are
    /// preserved verbatim, including their quotes.
    pub fn normalize_step_text(&self, text: &str) -> String {
        let mut tokens: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut quote: Option<char> = None;

        for c in text.chars() {
            match quote {
                Some(q) => {
                    current.push(c);
                    if c == q {
                        tokens.push(std::mem::take(&mut current));
                        quote = None;
                    }
                }
                None => {
                    if c == '"' || (c == '\'' && current.is_empty()) {
                        if !current.is_empty() {
                            self.push_canonical(&mut tokens, &current);
                            current.clear();
                        }
                        current.push(c);
                        quote = Some(c);
                    } else if c.is_whitespace() {
                        if !current.is_empty() {
                            self.push_canonical(&mut tokens, &current);
                            current.clear();
                        }
                    } else {
                        current.push(c);
                    }
                }
            }
        }
        if !current.is_empty() {
            if quote.is_some() {
                // Unterminated quote: keep the span verbatim.
                tokens.push(current);
            } else {
                self.push_canonical(&mut tokens, &current);
            }
        }

        tokens.join(" ")
    }

    fn push_canonical(&self, tokens: &mut Vec<String>, raw: &str) {
        let trimmed = raw.trim_matches(|c: char| matches!(c, '.' | ',' | '!' | '?' | ':' | ';'));
        if trimmed.is_empty() {
            return;
        }
        tokens.push(self.resolve_canonical(&trimmed.to_lowercase()));
    }
}

impl Default for Glossary {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_canonical_synonym() {
        let glossary = Glossary::builtin();
        assert_eq!(glossary.resolve_canonical("taps"), "click");
        assert_eq!(glossary.resolve_canonical("navigates"), "navigate");
        // Unknown terms pass through unchanged.
        assert_eq!(glossary.resolve_canonical("frobnicate"), "frobnicate");
    }

    #[test]
    fn test_normalize_preserves_quoted_spans() {
        let glossary = Glossary::builtin();
        let normalized = glossary.normalize_step_text(r#"User Clicks "Submit Order" button."#);
        assert_eq!(normalized, r#"user click "Submit Order" button"#);
    }

    #[test]
    fn test_normalize_lowercases_unquoted_tokens() {
        let glossary = Glossary::builtin();
        assert_eq!(
            glossary.normalize_step_text("The Visitor NAVIGATES to the Checkout Page"),
            "the user navigate to the checkout page"
        );
    }

    #[test]
    fn test_merge_unions_synonyms_and_appends() {
        let mut glossary = Glossary::builtin();
        glossary.merge_user(
            vec![
                GlossaryEntry {
                    canonical: "click".into(),
                    synonyms: vec!["smash".into(), "taps".into()],
                },
                GlossaryEntry {
                    canonical: "drag".into(),
                    synonyms: vec!["drags".into()],
                },
            ],
            vec![("e-mail".into(), "Email address".into())],
            vec![("user reset password".into(), "auth.resetPassword".into())],
        );

        assert_eq!(glossary.resolve_canonical("smash"), "click");
        assert_eq!(glossary.resolve_canonical("drags"), "drag");
        // User alias wins over the built-in on key conflict.
        assert_eq!(glossary.label_alias("E-Mail"), Some("Email address"));
        assert_eq!(
            glossary.module_for_phrase("user reset password"),
            Some("auth.resetPassword")
        );
    }

    #[test]
    fn test_first_entry_wins_for_shared_synonym() {
        let mut glossary = Glossary::empty();
        glossary.merge_user(
            vec![
                GlossaryEntry {
                    canonical: "see".into(),
                    synonyms: vec!["views".into()],
                },
                GlossaryEntry {
                    canonical: "page".into(),
                    synonyms: vec!["views".into()],
                },
            ],
            vec![],
            vec![],
        );
        assert_eq!(glossary.resolve_canonical("views"), "see");
    }
}
