//! Outline (bookmark) tree types.

use serde::{Deserialize, Serialize};

use crate::codec::title::sanitize;
use crate::error::{Error, Result};

/// Template for a page destination carried in text form.
///
/// The leading number is the 1-based page index; the rest mirrors an
/// explicit `/XYZ` destination so the token stays self-describing.
pub(crate) const PAGE_DEST_TEMPLATE: &str = "XYZ -1 10000 0";

/// Where a bookmark points.
///
/// Destinations are carried as opaque string tokens so the outline tree
/// never references live PDF objects. A [`PageResolver`] turns a token
/// back into a page number at conversion time.
///
/// [`PageResolver`]: crate::codec::PageResolver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Destination {
    /// A page destination token, e.g. `"12 XYZ -1 10000 0"` for a text
    /// token or `"34 0 R"` for a page object reference.
    Page(String),

    /// A named destination, resolved through the document's name map.
    Named(String),

    /// A destination or action type that cannot be mapped to a page.
    /// Carries a short description for diagnostics; emitting a line for
    /// such a node always fails.
    Unsupported(String),
}

/// A single outline (bookmark) entry.
///
/// Titles are sanitized on construction and therefore never empty.
/// Children are exclusively owned; sibling order is significant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineNode {
    title: String,
    destination: Option<Destination>,
    children: Vec<OutlineNode>,
}

impl OutlineNode {
    /// Create a bookmark without a destination.
    ///
    /// Fails with [`Error::EmptyTitle`] if the title sanitizes to an
    /// empty string.
    pub fn new(title: &str) -> Result<Self> {
        Ok(Self {
            title: sanitize(title)?,
            destination: None,
            children: Vec::new(),
        })
    }

    /// Create a bookmark pointing at a page.
    ///
    /// The page number is 1-based; zero fails with
    /// [`Error::InvalidPageNumber`].
    pub fn with_page(title: &str, page: u32) -> Result<Self> {
        if page == 0 {
            return Err(Error::InvalidPageNumber(page));
        }
        Self::with_destination(
            title,
            Destination::Page(format!("{} {}", page, PAGE_DEST_TEMPLATE)),
        )
    }

    /// Create a bookmark with an explicit destination.
    pub fn with_destination(title: &str, destination: Destination) -> Result<Self> {
        Ok(Self {
            title: sanitize(title)?,
            destination: Some(destination),
            children: Vec::new(),
        })
    }

    /// The sanitized title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The destination, if the bookmark points anywhere.
    pub fn destination(&self) -> Option<&Destination> {
        self.destination.as_ref()
    }

    /// Child bookmarks in order.
    pub fn children(&self) -> &[OutlineNode] {
        &self.children
    }

    /// Child bookmarks in order, mutable.
    pub fn children_mut(&mut self) -> &mut Vec<OutlineNode> {
        &mut self.children
    }

    /// Append a child bookmark.
    pub fn add_child(&mut self, child: OutlineNode) {
        self.children.push(child);
    }

    /// Total number of nodes in this subtree, the node itself included.
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(OutlineNode::subtree_len)
            .sum::<usize>()
    }
}
