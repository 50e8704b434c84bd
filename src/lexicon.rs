//! Word-membership predicate backing the text validator.
//!
//! Loaded once at startup and handed to the validator at construction;
//! nothing mutates it during a run.

use anyhow::{bail, Context, Result};
use std::collections::HashSet;
use std::path::Path;

/// A read-only word membership check.
pub trait Lexicon: Send + Sync {
    fn contains(&self, word: &str) -> bool;
}

/// Newline-delimited word list held in memory, matched case-insensitively.
pub struct WordListLexicon {
    words: HashSet<String>,
}

impl WordListLexicon {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading word list {}", path.display()))?;
        let words = contents
            .lines()
            .map(|line| line.trim().to_lowercase())
            .filter(|line| !line.is_empty())
            .collect();
        Ok(Self { words })
    }

    /// Probe the usual system word-list locations.
    pub fn system() -> Result<Self> {
        const CANDIDATES: [&str; 3] = [
            "/usr/share/dict/words",
            "/usr/share/dict/american-english",
            "/usr/dict/words",
        ];
        for candidate in CANDIDATES {
            let path = Path::new(candidate);
            if path.exists() {
                return Self::load(path);
            }
        }
        bail!("no system word list found; set validation.wordlist in the config")
    }

    #[cfg(test)]
    pub(crate) fn from_words(words: &[&str]) -> Self {
        Self { words: words.iter().map(|w| w.to_lowercase()).collect() }
    }
}

impl Lexicon for WordListLexicon {
    fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn membership_is_case_insensitive() {
        let lexicon = WordListLexicon::from_words(&["cat", "Dog"]);
        assert!(lexicon.contains("cat"));
        assert!(lexicon.contains("CAT"));
        assert!(lexicon.contains("dog"));
        assert!(!lexicon.contains("fish"));
    }

    #[test]
    fn loads_from_file_skipping_blank_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "cat\n\n  dog  \n").unwrap();
        let lexicon = WordListLexicon::load(file.path()).unwrap();
        assert!(lexicon.contains("cat"));
        assert!(lexicon.contains("dog"));
        assert!(!lexicon.contains(""));
    }
}
