//! Recognized-text acceptance gate.
//!
//! Tokenizes a candidate string on whitespace and hyphens, checks every
//! token against the exception set and the lexicon, and either accepts or
//! rejects the string according to the configured mode.

use crate::config::{ValidationMode, ValidationSettings};
use crate::lexicon::Lexicon;
use regex::Regex;
use std::collections::HashSet;
use std::sync::Arc;

pub struct Validator {
    mode: ValidationMode,
    exceptions: HashSet<String>,
    lexicon: Arc<dyn Lexicon>,
    splitter: Regex,
}

impl Validator {
    pub fn new(settings: &ValidationSettings, lexicon: Arc<dyn Lexicon>) -> Self {
        Self {
            mode: settings.mode,
            exceptions: settings.exceptions.iter().cloned().collect(),
            lexicon,
            splitter: Regex::new(r"[\s-]+").expect("static pattern"),
        }
    }

    /// Returns the accepted text, or `None` when the candidate fails.
    ///
    /// `StrictAll` accepts the original string only when every token
    /// passes; `FilterValid` keeps the passing tokens and accepts any
    /// non-empty remainder.
    pub fn validate(&self, text: &str) -> Option<String> {
        let tokens: Vec<&str> = self
            .splitter
            .split(text)
            .filter(|token| !token.is_empty())
            .collect();
        if tokens.is_empty() {
            return None;
        }
        match self.mode {
            ValidationMode::StrictAll => tokens
                .iter()
                .all(|token| self.token_is_valid(token))
                .then(|| text.to_string()),
            ValidationMode::FilterValid => {
                let kept: Vec<&str> = tokens
                    .into_iter()
                    .filter(|token| self.token_is_valid(token))
                    .collect();
                (!kept.is_empty()).then(|| kept.join(" "))
            }
        }
    }

    fn token_is_valid(&self, token: &str) -> bool {
        if self.exceptions.contains(token) {
            return true;
        }
        if token.chars().all(|c| c.is_ascii_digit()) {
            return false;
        }
        let cleaned = token.trim_matches(|c| c == '-' || c == '\'');
        if cleaned.is_empty() {
            return false;
        }
        if !cleaned.chars().all(|c| c.is_alphabetic() || c == '\'') {
            return false;
        }
        self.lexicon.contains(cleaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::WordListLexicon;

    fn validator(mode: ValidationMode, words: &[&str]) -> Validator {
        let settings = ValidationSettings { mode, ..ValidationSettings::default() };
        Validator::new(&settings, Arc::new(WordListLexicon::from_words(words)))
    }

    #[test]
    fn excepted_symbols_pass_between_valid_words() {
        let v = validator(ValidationMode::StrictAll, &["cat", "dog"]);
        assert_eq!(v.validate("cat & dog"), Some("cat & dog".to_string()));
    }

    #[test]
    fn numeric_token_rejects_the_string() {
        let v = validator(ValidationMode::StrictAll, &["cat"]);
        assert_eq!(v.validate("cat 123"), None);
    }

    #[test]
    fn filter_mode_keeps_only_valid_tokens() {
        let v = validator(ValidationMode::FilterValid, &["cat"]);
        assert_eq!(v.validate("cat 123 qzx"), Some("cat".to_string()));
        assert_eq!(v.validate("123 qzx"), None);
    }

    #[test]
    fn hyphenated_compounds_split_into_tokens() {
        let v = validator(ValidationMode::StrictAll, &["well", "known"]);
        assert_eq!(v.validate("well-known"), Some("well-known".to_string()));
    }

    #[test]
    fn apostrophes_survive_the_lexicon_check() {
        let v = validator(ValidationMode::StrictAll, &["don't"]);
        assert_eq!(v.validate("don't"), Some("don't".to_string()));
        // boundary apostrophes are stripped before lookup
        let v = validator(ValidationMode::StrictAll, &["cat"]);
        assert_eq!(v.validate("'cat'"), Some("'cat'".to_string()));
    }

    #[test]
    fn disallowed_characters_reject_the_token() {
        let v = validator(ValidationMode::StrictAll, &["cat"]);
        assert_eq!(v.validate("ca#t"), None);
        assert_eq!(v.validate("cat!"), None);
    }

    #[test]
    fn unknown_word_fails_strict_mode() {
        let v = validator(ValidationMode::StrictAll, &["cat"]);
        assert_eq!(v.validate("qzxv"), None);
    }

    #[test]
    fn empty_and_blank_strings_fail() {
        let v = validator(ValidationMode::StrictAll, &["cat"]);
        assert_eq!(v.validate(""), None);
        assert_eq!(v.validate("   "), None);
    }

    #[test]
    fn lexicon_match_is_case_insensitive() {
        let v = validator(ValidationMode::StrictAll, &["cat"]);
        assert_eq!(v.validate("Cat"), Some("Cat".to_string()));
    }
}
