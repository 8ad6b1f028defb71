//! Metadata map ⇄ `key|value` text lines.

use std::collections::BTreeMap;

use regex::Regex;

use crate::codec::SEPARATOR;
use crate::error::{Error, Result};

/// Converter between a flat metadata map and text lines.
///
/// Serialization is deterministic: entries are emitted in lexicographic
/// key order regardless of how the map was populated.
pub struct MetadataCodec {
    line: Regex,
}

impl MetadataCodec {
    pub fn new() -> Self {
        Self {
            // greedy key: the split lands on the LAST separator
            line: Regex::new(r"^(.+)\|(.*)$").unwrap(),
        }
    }

    /// Serialize metadata entries as `key|value` lines, sorted by key.
    pub fn to_lines(&self, entries: &BTreeMap<String, String>) -> Vec<String> {
        entries
            .iter()
            .map(|(key, value)| format!("{}{}{}", key, SEPARATOR, value))
            .collect()
    }

    /// Parse `key|value` lines into a metadata map.
    ///
    /// Unlike the outline reader there is no structure to preserve
    /// across a skip, so the first malformed line aborts the whole read
    /// with [`Error::MalformedMetadataLine`]. Duplicate keys keep the
    /// last value.
    pub fn parse<S: AsRef<str>>(&self, lines: &[S]) -> Result<BTreeMap<String, String>> {
        let mut entries = BTreeMap::new();
        for line in lines {
            let line = line.as_ref();
            let caps = self
                .line
                .captures(line)
                .ok_or_else(|| Error::MalformedMetadataLine(line.to_string()))?;
            entries.insert(caps[1].to_string(), caps[2].to_string());
        }
        Ok(entries)
    }
}

impl Default for MetadataCodec {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_to_lines_sorted() {
        let codec = MetadataCodec::new();
        // insertion order b, a, c — output must still be sorted
        let mut entries = BTreeMap::new();
        entries.insert("b".to_string(), "2".to_string());
        entries.insert("a".to_string(), "1".to_string());
        entries.insert("c".to_string(), "3".to_string());
        assert_eq!(codec.to_lines(&entries), ["a|1", "b|2", "c|3"]);
    }

    #[test]
    fn test_parse_simple() {
        let codec = MetadataCodec::new();
        let parsed = codec.parse(&["Title|My Book", "Author|Jane"]).unwrap();
        assert_eq!(
            parsed,
            map(&[("Title", "My Book"), ("Author", "Jane")])
        );
    }

    #[test]
    fn test_parse_empty_value() {
        let codec = MetadataCodec::new();
        let parsed = codec.parse(&["Keywords|"]).unwrap();
        assert_eq!(parsed, map(&[("Keywords", "")]));
    }

    #[test]
    fn test_parse_splits_at_last_separator() {
        let codec = MetadataCodec::new();
        let parsed = codec.parse(&["a|b|c"]).unwrap();
        assert_eq!(parsed, map(&[("a|b", "c")]));
    }

    #[test]
    fn test_parse_rejects_missing_separator() {
        let codec = MetadataCodec::new();
        let err = codec.parse(&["Title|ok", "no separator"]).unwrap_err();
        assert!(matches!(err, Error::MalformedMetadataLine(line) if line == "no separator"));
    }

    #[test]
    fn test_parse_rejects_empty_key() {
        let codec = MetadataCodec::new();
        assert!(codec.parse(&["|value"]).is_err());
    }

    #[test]
    fn test_duplicate_key_last_wins() {
        let codec = MetadataCodec::new();
        let parsed = codec.parse(&["k|first", "k|second"]).unwrap();
        assert_eq!(parsed, map(&[("k", "second")]));
    }

    #[test]
    fn test_round_trip() {
        let codec = MetadataCodec::new();
        let entries = map(&[("Author", "Jane"), ("Subject", ""), ("Title", "My Book")]);
        let lines = codec.to_lines(&entries);
        assert_eq!(codec.parse(&lines).unwrap(), entries);
    }
}
