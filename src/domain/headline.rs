//! Headline value object

use thiserror::Error;

/// Maximum number of words a headline may contain
pub const MAX_HEADLINE_WORDS: usize = 5;

/// Error when a generated headline cannot be used as a directory name
#[derive(Debug, Clone, Error)]
pub enum HeadlineError {
    #[error("headline is empty")]
    Empty,

    #[error("headline has {0} words, the maximum is {max}", max = MAX_HEADLINE_WORDS)]
    TooManyWords(usize),
}

/// A short headline usable as a directory-name component.
///
/// Parsing rejects empty or over-long headlines and sanitizes the rest:
/// path separators and control characters are dropped, whitespace runs
/// collapse to a single underscore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Headline(String);

impl Headline {
    pub fn parse(raw: &str) -> Result<Self, HeadlineError> {
        let words: Vec<&str> = raw.split_whitespace().collect();
        if words.is_empty() {
            return Err(HeadlineError::Empty);
        }
        if words.len() > MAX_HEADLINE_WORDS {
            return Err(HeadlineError::TooManyWords(words.len()));
        }

        let sanitized = words
            .iter()
            .map(|w| Self::sanitize_word(w))
            .filter(|w| !w.is_empty())
            .collect::<Vec<_>>()
            .join("_");

        if sanitized.is_empty() {
            return Err(HeadlineError::Empty);
        }

        Ok(Self(sanitized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn sanitize_word(word: &str) -> String {
        word.chars()
            .filter(|c| !matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|') && !c.is_control())
            .collect()
    }
}

impl std::fmt::Display for Headline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
