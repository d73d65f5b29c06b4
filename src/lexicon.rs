// In: src/lexicon.rs

//! The static lexicon of known null-equivalent phrases ("n/a", "unknown",
//! "-"). Loaded once at startup from a plain-text word list, one phrase per
//! line, and read-only for the remainder of the run.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::SieveError;

/// An ordered, fixed-capacity set of null-equivalent phrases.
#[derive(Debug)]
pub struct NullLexicon {
    phrases: Vec<String>,
}

impl NullLexicon {
    /// Loads phrases from `path`, newline-delimited. Blank lines are skipped
    /// (the word list may hold stray empty lines between entries). Fails if
    /// the file holds more phrases than `capacity`.
    pub fn load(path: &Path, capacity: usize) -> Result<Self, SieveError> {
        let reader = BufReader::new(File::open(path)?);
        let mut phrases = Vec::with_capacity(capacity);

        for line in reader.lines() {
            let line = line?;
            let phrase = line.trim_end_matches('\r');
            if phrase.is_empty() {
                continue;
            }
            if phrases.len() == capacity {
                return Err(SieveError::LexiconOverflow {
                    capacity,
                    rejected: phrase.to_string(),
                });
            }
            phrases.push(phrase.to_string());
        }

        log::debug!("null lexicon loaded: {} phrase(s)", phrases.len());
        Ok(Self { phrases })
    }

    /// Builds a lexicon directly from in-memory phrases. Test and embedding
    /// convenience; no capacity check since the caller owns the list.
    pub fn from_phrases(phrases: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            phrases: phrases.into_iter().map(Into::into).collect(),
        }
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_word_list(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_skips_blank_lines() {
        let file = write_word_list("n/a\n\nunknown\n\n\n-\n");
        let lexicon = NullLexicon::load(file.path(), 16).unwrap();
        assert_eq!(lexicon.phrases(), &["n/a", "unknown", "-"]);
    }

    #[test]
    fn test_load_preserves_file_order() {
        let file = write_word_list("none\nnil\nmissing\n");
        let lexicon = NullLexicon::load(file.path(), 16).unwrap();
        assert_eq!(lexicon.phrases(), &["none", "nil", "missing"]);
    }

    #[test]
    fn test_load_rejects_overflow() {
        let file = write_word_list("a\nb\nc\n");
        let err = NullLexicon::load(file.path(), 2).unwrap_err();
        match err {
            SieveError::LexiconOverflow { capacity, rejected } => {
                assert_eq!(capacity, 2);
                assert_eq!(rejected, "c");
            }
            other => panic!("expected LexiconOverflow, got {other}"),
        }
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = NullLexicon::load(Path::new("/nonexistent/null_words.txt"), 16).unwrap_err();
        assert!(matches!(err, SieveError::Io(_)));
    }

    #[test]
    fn test_load_handles_crlf() {
        let file = write_word_list("n/a\r\nunknown\r\n");
        let lexicon = NullLexicon::load(file.path(), 16).unwrap();
        assert_eq!(lexicon.phrases(), &["n/a", "unknown"]);
    }
}
