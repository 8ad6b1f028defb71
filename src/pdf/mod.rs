//! PDF document access backed by lopdf.
//!
//! Everything that touches PDF binary structure lives here; the codec
//! core only ever sees [`OutlineNode`] trees, metadata maps, and string
//! destination tokens.
//!
//! [`OutlineNode`]: crate::model::OutlineNode

mod attachments;
mod info;
mod outline;

pub use attachments::Attachment;
pub use outline::DocumentResolver;

use std::path::Path;

use lopdf::Document;

use crate::error::{Error, Result};
use crate::io;

/// An open, non-encrypted PDF document.
pub struct PdfFile {
    doc: Document,
}

impl PdfFile {
    /// Open a PDF file.
    ///
    /// Encrypted documents fail immediately with [`Error::Encrypted`];
    /// no partial work is attempted on them.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let doc = Document::load(path).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::from(e),
        })?;
        Self::from_document(doc)
    }

    /// Open a PDF from an in-memory byte slice.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let doc = Document::load_mem(data).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::from(e),
        })?;
        Self::from_document(doc)
    }

    /// Wrap an already-loaded `lopdf::Document`.
    pub fn from_document(doc: Document) -> Result<Self> {
        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }
        Ok(Self { doc })
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// PDF version string.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    /// Save the document, atomically replacing `path`.
    ///
    /// The document is written to a temporary file in the target's
    /// directory and renamed over it only after a full successful write,
    /// so the original file is never left half-written.
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let doc = &mut self.doc;
        io::replace_file(path.as_ref(), |file| {
            doc.save_to(file)?;
            Ok(())
        })
    }

    /// Direct access to the underlying `lopdf::Document`.
    ///
    /// Escape hatch for operations not covered by this wrapper.
    pub fn raw_doc(&self) -> &Document {
        &self.doc
    }

    /// Follow reference chains to the pointed-at object.
    pub(crate) fn deref<'a>(&'a self, obj: &'a lopdf::Object) -> &'a lopdf::Object {
        let mut obj = obj;
        // reference chains longer than this are broken files
        let mut remaining = 16;
        while let lopdf::Object::Reference(id) = obj {
            if remaining == 0 {
                break;
            }
            remaining -= 1;
            match self.doc.get_object(*id) {
                Ok(inner) => obj = inner,
                Err(_) => break,
            }
        }
        obj
    }

    /// Dereference and view as a dictionary.
    pub(crate) fn deref_dict<'a>(&'a self, obj: &'a lopdf::Object) -> Option<&'a lopdf::Dictionary> {
        self.deref(obj).as_dict().ok()
    }
}
