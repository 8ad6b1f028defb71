//! Line grammar shared by the outline codec.
//!
//! A line is `<indent><title>` or `<indent><title>|<page>`: the leading
//! whitespace run encodes tree depth, the rest is free text, and an
//! optional positive integer after the last `|` is a page reference.

use regex::Regex;

use crate::codec::SEPARATOR;
use crate::error::{Error, Result};

/// A structurally valid outline line, split but not yet sanitized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    /// Length of the leading whitespace run, in characters.
    pub depth: usize,
    /// Everything from the first non-whitespace character to end of line.
    pub title: String,
}

/// Compiled patterns for splitting outline lines.
pub struct LineGrammar {
    line: Regex,
    page_number: Regex,
}

impl LineGrammar {
    pub fn new() -> Self {
        Self {
            line: Regex::new(r"^(\s*)(\S.*)$").unwrap(),
            // positive, no leading zero
            page_number: Regex::new(r"^[1-9][0-9]*$").unwrap(),
        }
    }

    /// Split a line into depth and raw title.
    ///
    /// Empty and whitespace-only lines fail with
    /// [`Error::MalformedLine`]; the caller decides whether that aborts
    /// or merely skips the line.
    pub fn parse(&self, line: &str) -> Result<ParsedLine> {
        let caps = self
            .line
            .captures(line)
            .ok_or_else(|| Error::MalformedLine(line.to_string()))?;
        Ok(ParsedLine {
            depth: caps[1].chars().count(),
            title: caps[2].to_string(),
        })
    }

    /// Split an optional page-number suffix off a raw title.
    ///
    /// Only the **last** separator is considered, and only when the text
    /// after it is a positive integer without a leading zero. Anything
    /// else leaves the whole string, separator included, as the literal
    /// title — a silent fallback, never an error.
    pub fn split_page_suffix<'a>(&self, title: &'a str) -> (&'a str, Option<u32>) {
        if let Some(idx) = title.rfind(SEPARATOR) {
            let suffix = &title[idx + SEPARATOR.len_utf8()..];
            if self.page_number.is_match(suffix) {
                if let Ok(page) = suffix.parse::<u32>() {
                    return (&title[..idx], Some(page));
                }
            }
        }
        (title, None)
    }
}

impl Default for LineGrammar {
    fn default() -> Self {
        Self::new()
    }
}
