//! Bidirectional codecs between document structures and text lines.
//!
//! Two structurally similar codecs live here: [`OutlineCodec`] converts
//! an outline (bookmark) tree to and from indented text lines, and
//! [`MetadataCodec`] converts a flat key/value map to and from
//! `key|value` lines. Both share the separator character and the
//! 4-space indentation unit.

pub mod line;
pub mod metadata;
pub mod outline;
pub mod title;

pub use line::{LineGrammar, ParsedLine};
pub use metadata::MetadataCodec;
pub use outline::{
    destination_page, NamedDestinations, OutlineCodec, PageResolver, TokenResolver,
};
pub use title::{sanitize, TitleSanitizer};

/// Separator between a title and its page-number suffix, and between a
/// metadata key and its value.
pub const SEPARATOR: char = '|';

/// One indentation unit: four spaces. A tab counts as one unit.
pub const SHIFT: &str = "    ";
