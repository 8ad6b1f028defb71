//! # pdfmeta
//!
//! Edit PDF outlines (bookmarks), document metadata, and attachments
//! through plain text files.
//!
//! Bookmarks are represented one per line, nesting encoded by 4-space
//! indentation and the target page by a `|<page>` suffix:
//!
//! ```text
//! Bookmarks
//!     Title 1|1
//!         Title 1.1|2
//!     Title 2|5
//! ```
//!
//! Metadata uses one `key|value` line per entry, sorted by key. Both
//! formats are designed to be edited by hand and written back:
//!
//! ```no_run
//! fn main() -> pdfmeta::Result<()> {
//!     // Dump bookmarks to a text file, tweak them, write them back.
//!     pdfmeta::save_outlines("book.pdf", "book-outlines.txt")?;
//!     pdfmeta::update_outlines("book.pdf", "book-outlines.txt")?;
//!     Ok(())
//! }
//! ```
//!
//! The line codecs in [`codec`] are pure and library-agnostic; all PDF
//! container work is delegated to [`pdf::PdfFile`] (backed by lopdf).

pub mod codec;
pub mod error;
pub mod io;
pub mod model;
pub mod pdf;

pub use codec::{MetadataCodec, OutlineCodec, PageResolver, TokenResolver};
pub use error::{Error, Result};
pub use model::{Destination, OutlineNode};
pub use pdf::{Attachment, PdfFile};

use std::path::Path;

/// Save a PDF's outline (bookmarks) to a text file.
pub fn save_outlines<P, Q>(pdf: P, outlines_file: Q) -> Result<()>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let file = PdfFile::open(pdf)?;
    let codec = OutlineCodec::new();
    let lines = codec.to_lines(&file.outline(), &file.resolver(), &file.named_destinations());
    io::write_lines(outlines_file, &lines)
}

/// Replace a PDF's outline with the one described by a text file.
///
/// The PDF is rewritten atomically; on any failure the original file is
/// left untouched.
pub fn update_outlines<P, Q>(pdf: P, outlines_file: Q) -> Result<()>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let lines = io::read_lines(outlines_file)?;
    let mut file = PdfFile::open(&pdf)?;
    let roots = OutlineCodec::new().parse(&lines);
    file.set_outline(&roots)?;
    file.save(pdf)
}

/// Save a PDF's metadata (Info dictionary) to a text file.
pub fn save_metadata<P, Q>(pdf: P, metadata_file: Q) -> Result<()>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let file = PdfFile::open(pdf)?;
    let lines = MetadataCodec::new().to_lines(&file.metadata());
    io::write_lines(metadata_file, &lines)
}

/// Replace a PDF's metadata with the entries from a text file.
pub fn update_metadata<P, Q>(pdf: P, metadata_file: Q) -> Result<()>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let lines = io::read_lines(metadata_file)?;
    let entries = MetadataCodec::new().parse(&lines)?;
    let mut file = PdfFile::open(&pdf)?;
    file.set_metadata(&entries)?;
    file.save(pdf)
}

/// Extract every embedded (attached) file into a directory.
pub fn save_attachments<P, Q>(pdf: P, output_dir: Q) -> Result<()>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let file = PdfFile::open(pdf)?;
    let output_dir = output_dir.as_ref();
    std::fs::create_dir_all(output_dir)?;
    for attachment in file.attachments() {
        std::fs::write(output_dir.join(&attachment.name), &attachment.data)?;
    }
    Ok(())
}

/// Attach files to a PDF, replacing its embedded file tree.
pub fn add_attachments<P, Q>(pdf: P, attachment_files: &[Q]) -> Result<()>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let attachments = attachment_files
        .iter()
        .map(Attachment::from_path)
        .collect::<Result<Vec<_>>>()?;
    let mut file = PdfFile::open(&pdf)?;
    file.add_attachments(&attachments)?;
    file.save(pdf)
}

/// Remove every embedded (attached) file from a PDF.
pub fn remove_attachments<P: AsRef<Path>>(pdf: P) -> Result<()> {
    let mut file = PdfFile::open(&pdf)?;
    file.remove_attachments()?;
    file.save(pdf)
}
