//! Model types for the document structures pdfmeta edits.
//!
//! The model is PDF-library agnostic: an outline is a plain tree of
//! titled nodes, metadata is a sorted key/value map. The `pdf` module
//! populates these types from a live document and attaches them back.

mod outline;

pub use outline::{Destination, OutlineNode};
