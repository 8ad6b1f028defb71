//! Error types for the pdfmeta library.

use std::io;
use thiserror::Error;

/// Result type alias for pdfmeta operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while converting between PDF structures
/// and their text representation.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A bookmark title is empty after sanitization.
    #[error("bookmark title is empty")]
    EmptyTitle,

    /// An outline line does not match the `<indent><title>` grammar.
    #[error("outline line has a wrong format: {0:?}")]
    MalformedLine(String),

    /// A metadata line does not match the `key|value` grammar.
    #[error("metadata line has a wrong format: {0:?}")]
    MalformedMetadataLine(String),

    /// Page numbers are 1-based; zero is never a valid target.
    #[error("page number must be 1 or greater, got {0}")]
    InvalidPageNumber(u32),

    /// A bookmark destination that cannot be resolved to a page number.
    #[error("unsupported bookmark destination: {0}")]
    UnsupportedDestination(String),

    /// A named destination referenced by a bookmark does not exist.
    #[error("named destination not found: {0:?}")]
    NamedDestinationNotFound(String),

    /// A destination points past the end of the page tree.
    #[error("page {0} not found in document")]
    PageNotFound(u32),

    /// The document is encrypted; no partial work is attempted.
    #[error("document is encrypted")]
    Encrypted,

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// Error extracting or embedding an attached file.
    #[error("attachment error: {0}")]
    Attachment(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}
