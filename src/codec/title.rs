//! Bookmark title sanitization.
//!
//! Outline files are edited by hand in plain text editors, which love to
//! substitute curly quotes, dashes, and ellipsis characters. The
//! sanitizer folds those typographic variants back into a canonical form
//! so a save/update cycle stays deterministic.

use std::sync::OnceLock;

use regex::Regex;

use crate::codec::SHIFT;
use crate::error::{Error, Result};

/// Title normalization pipeline with pre-compiled patterns.
pub struct TitleSanitizer {
    single_quotes: Regex,
    double_quotes: Regex,
    dash_between_words: Regex,
    whitespace_runs: Regex,
}

impl TitleSanitizer {
    pub fn new() -> Self {
        Self {
            single_quotes: Regex::new("[`‘’]").unwrap(),
            double_quotes: Regex::new("[“”]|''").unwrap(),
            dash_between_words: Regex::new(r"(\S)–(\S)").unwrap(),
            whitespace_runs: Regex::new(r"\s{2,}").unwrap(),
        }
    }

    /// Normalize a raw title.
    ///
    /// Fails with [`Error::EmptyTitle`] when nothing is left after
    /// normalization (e.g. whitespace-only input). Idempotent for every
    /// input it accepts.
    pub fn sanitize(&self, raw: &str) -> Result<String> {
        let text = raw.trim();
        let text = self.single_quotes.replace_all(text, "'");
        let text = self.double_quotes.replace_all(&text, "\"");

        let text = text.replace(" - ", " – ");
        // No lookaround in the regex crate: "a–b–c" needs a second pass
        // once the first match has consumed the middle word.
        let mut text = text;
        loop {
            let spaced = self
                .dash_between_words
                .replace_all(&text, "${1} – ${2}")
                .into_owned();
            if spaced == text {
                break;
            }
            text = spaced;
        }

        let text = text.replace('…', "...").replace(". . .", "...");
        let text = text.replace('\t', SHIFT);
        let text = self.whitespace_runs.replace_all(&text, " ");
        let text = text.replace(" ,", ",").replace(" .", ".");

        if text.is_empty() {
            return Err(Error::EmptyTitle);
        }
        Ok(text)
    }
}

impl Default for TitleSanitizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Sanitize a title through a shared, lazily-built [`TitleSanitizer`].
pub fn sanitize(raw: &str) -> Result<String> {
    static SANITIZER: OnceLock<TitleSanitizer> = OnceLock::new();
    SANITIZER.get_or_init(TitleSanitizer::new).sanitize(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(sanitize("  Chapter 1 \r\n").unwrap(), "Chapter 1");
    }

    #[test]
    fn test_whitespace_only_fails() {
        for input in ["", " ", "\t", "\r\n", " \t \r \n "] {
            assert!(
                matches!(sanitize(input), Err(Error::EmptyTitle)),
                "input {:?} should be rejected",
                input
            );
        }
    }

    #[test]
    fn test_quote_normalization() {
        assert_eq!(sanitize("it`s").unwrap(), "it's");
        assert_eq!(sanitize("it‘s and it’s").unwrap(), "it's and it's");
        assert_eq!(sanitize("“quoted”").unwrap(), "\"quoted\"");
        assert_eq!(sanitize("''quoted''").unwrap(), "\"quoted\"");
    }

    #[test]
    fn test_dash_normalization() {
        assert_eq!(sanitize("one - two").unwrap(), "one – two");
        assert_eq!(sanitize("one–two").unwrap(), "one – two");
        // already-spaced en-dash is left alone
        assert_eq!(sanitize("one – two").unwrap(), "one – two");
    }

    #[test]
    fn test_dash_chain() {
        assert_eq!(sanitize("a–b–c").unwrap(), "a – b – c");
    }

    #[test]
    fn test_ellipsis_normalization() {
        assert_eq!(sanitize("wait…").unwrap(), "wait...");
        // the stray space left in front of the dots is punctuation
        // cleanup's to remove
        assert_eq!(sanitize("wait . . .").unwrap(), "wait...");
        assert_eq!(sanitize(". . . and so on").unwrap(), "... and so on");
    }

    #[test]
    fn test_space_before_punctuation() {
        assert_eq!(sanitize("a , b .").unwrap(), "a, b.");
    }

    #[test]
    fn test_tab_and_run_collapse() {
        assert_eq!(sanitize("a\tb").unwrap(), "a b");
        assert_eq!(sanitize("a    b   c").unwrap(), "a b c");
    }

    #[test]
    fn test_idempotence() {
        let inputs = [
            "  Chapter   1  ",
            "it`s “done” . . .",
            "a–b–c",
            "tab\there , and . there",
            "one - two – three",
        ];
        for input in inputs {
            let once = sanitize(input).unwrap();
            let twice = sanitize(&once).unwrap();
            assert_eq!(once, twice, "not idempotent for {:?}", input);
        }
    }

    #[test]
    fn test_separator_is_preserved() {
        // The sanitizer never strips the separator character; suffix
        // handling is the line grammar's job.
        assert_eq!(sanitize("Title|12").unwrap(), "Title|12");
    }
}
