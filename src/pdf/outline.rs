//! Document outline (bookmark) reading and writing.

use std::collections::{BTreeMap, HashMap};

use lopdf::{Dictionary, Object, ObjectId};
use regex::Regex;

use super::info::decode_text_string;
use super::PdfFile;
use crate::codec::{destination_page, NamedDestinations, PageResolver};
use crate::error::{Error, Result};
use crate::model::{Destination, OutlineNode};

/// [`PageResolver`] backed by a document's page tree.
///
/// Accepts page object reference tokens (`"<obj> <gen> R"`) produced
/// when reading an outline from a document, and plain text tokens
/// (`"<page> XYZ ..."`) produced when parsing an outline file.
pub struct DocumentResolver {
    pages_by_id: HashMap<ObjectId, u32>,
    page_count: u32,
    reference: Regex,
    text: Regex,
}

impl DocumentResolver {
    fn new(pages: &BTreeMap<u32, ObjectId>) -> Self {
        Self {
            pages_by_id: pages.iter().map(|(num, id)| (*id, *num)).collect(),
            page_count: pages.len() as u32,
            reference: Regex::new(r"^([0-9]+) ([0-9]+) R$").unwrap(),
            text: Regex::new(r"^([1-9][0-9]*) (.+)$").unwrap(),
        }
    }
}

impl PageResolver for DocumentResolver {
    fn resolve(&self, token: &str) -> Result<u32> {
        if let Some(caps) = self.reference.captures(token) {
            let id: ObjectId = match (caps[1].parse(), caps[2].parse()) {
                (Ok(num), Ok(gen)) => (num, gen),
                _ => return Err(Error::UnsupportedDestination(token.to_string())),
            };
            return self
                .pages_by_id
                .get(&id)
                .copied()
                .ok_or_else(|| Error::UnsupportedDestination(token.to_string()));
        }

        if let Some(caps) = self.text.captures(token) {
            if let Ok(page) = caps[1].parse::<u32>() {
                if page <= self.page_count {
                    return Ok(page);
                }
                return Err(Error::PageNotFound(page));
            }
        }

        Err(Error::UnsupportedDestination(token.to_string()))
    }
}

/// Render a page object reference as a destination token.
fn reference_token(id: ObjectId) -> String {
    format!("{} {} R", id.0, id.1)
}

impl PdfFile {
    /// A [`PageResolver`] for this document's page tree.
    pub fn resolver(&self) -> DocumentResolver {
        DocumentResolver::new(&self.doc.get_pages())
    }

    /// Read the document outline as a bookmark tree.
    ///
    /// Items whose title sanitizes to nothing are dropped with a
    /// diagnostic; items with destination or action types that cannot
    /// point at a page are kept, flagged unsupported, and reported when
    /// the tree is serialized.
    pub fn outline(&self) -> Vec<OutlineNode> {
        let mut roots = Vec::new();

        let first = self
            .doc
            .catalog()
            .ok()
            .and_then(|catalog| catalog.get(b"Outlines").ok())
            .and_then(|outlines| self.deref_dict(outlines))
            .and_then(|outlines| outlines.get(b"First").ok())
            .and_then(|first| first.as_reference().ok());

        if let Some(first) = first {
            self.collect_outline_items(first, &mut roots);
        }

        roots
    }

    /// Walk an outline level via `First`/`Next` links.
    fn collect_outline_items(&self, item_id: ObjectId, items: &mut Vec<OutlineNode>) {
        let mut next = Some(item_id);
        // guards against cyclic Next chains in broken files
        let mut remaining = self.doc.objects.len() + 1;

        while let (Some(id), true) = (next, remaining > 0) {
            remaining -= 1;
            let dict = match self.doc.get_dictionary(id) {
                Ok(dict) => dict,
                Err(e) => {
                    log::warn!("skipping unreadable outline item {:?}: {}", id, e);
                    break;
                }
            };

            let title = dict
                .get(b"Title")
                .ok()
                .map(|obj| self.deref(obj))
                .and_then(|obj| obj.as_str().ok())
                .map(decode_text_string)
                .unwrap_or_default();

            let node = match self.item_destination(dict) {
                Some(dest) => OutlineNode::with_destination(&title, dest),
                None => OutlineNode::new(&title),
            };

            match node {
                Ok(mut node) => {
                    if let Some(first) = dict
                        .get(b"First")
                        .ok()
                        .and_then(|obj| obj.as_reference().ok())
                    {
                        self.collect_outline_items(first, node.children_mut());
                    }
                    items.push(node);
                }
                Err(e) => {
                    log::warn!("skipping outline item {:?} and its children: {}", title, e);
                }
            }

            next = dict
                .get(b"Next")
                .ok()
                .and_then(|obj| obj.as_reference().ok());
        }
    }

    /// Map an outline item's `Dest` or GoTo action to a destination.
    fn item_destination(&self, dict: &Dictionary) -> Option<Destination> {
        if let Ok(dest) = dict.get(b"Dest") {
            return Some(self.decode_destination(dest));
        }

        if let Ok(action) = dict.get(b"A") {
            let action = self.deref_dict(action)?;
            let kind = action
                .get(b"S")
                .ok()
                .and_then(|s| s.as_name_str().ok())
                .unwrap_or("");
            if kind != "GoTo" {
                return Some(Destination::Unsupported(format!("{} action", kind)));
            }
            if let Ok(dest) = action.get(b"D") {
                return Some(self.decode_destination(dest));
            }
            return Some(Destination::Unsupported("GoTo action without D".into()));
        }

        None
    }

    /// Decode a destination object: explicit array, name, or string.
    fn decode_destination(&self, dest: &Object) -> Destination {
        match self.deref(dest) {
            Object::Array(array) => match array.first().and_then(|o| o.as_reference().ok()) {
                Some(page_id) => Destination::Page(reference_token(page_id)),
                None => Destination::Unsupported("destination array without page".into()),
            },
            Object::Name(name) => Destination::Named(String::from_utf8_lossy(name).into_owned()),
            Object::String(bytes, _) => Destination::Named(decode_text_string(bytes)),
            other => Destination::Unsupported(format!("{:?} destination", other.type_name())),
        }
    }

    /// The document's named destinations as name → token.
    ///
    /// Covers both the PDF 1.1 `Dests` dictionary in the catalog and
    /// the `Names` → `Dests` name tree.
    pub fn named_destinations(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();

        let catalog = match self.doc.catalog() {
            Ok(catalog) => catalog,
            Err(_) => return map,
        };

        if let Some(dests) = catalog.get(b"Dests").ok().and_then(|d| self.deref_dict(d)) {
            for (name, value) in dests.iter() {
                if let Some(token) = self.destination_token(value) {
                    map.insert(String::from_utf8_lossy(name).into_owned(), token);
                }
            }
        }

        if let Some(tree) = catalog
            .get(b"Names")
            .ok()
            .and_then(|names| self.deref_dict(names))
            .and_then(|names| names.get(b"Dests").ok())
            .and_then(|dests| self.deref_dict(dests))
        {
            self.collect_name_tree(tree, &mut map);
        }

        map
    }

    /// Recursively collect `Names` pairs from a name tree node.
    fn collect_name_tree(&self, node: &Dictionary, map: &mut HashMap<String, String>) {
        if let Some(kids) = node.get(b"Kids").ok().and_then(|k| k.as_array().ok()) {
            for kid in kids {
                if let Some(kid) = self.deref_dict(kid) {
                    self.collect_name_tree(kid, map);
                }
            }
        }

        if let Some(names) = node.get(b"Names").ok().and_then(|n| n.as_array().ok()) {
            for pair in names.chunks(2) {
                let [name, value] = pair else { continue };
                let Ok(name) = name.as_str() else { continue };
                if let Some(token) = self.destination_token(value) {
                    map.insert(decode_text_string(name), token);
                }
            }
        }
    }

    /// Token for a named-destination value: a destination array or a
    /// dictionary wrapping one under `D`.
    fn destination_token(&self, value: &Object) -> Option<String> {
        let value = self.deref(value);
        let array = match value {
            Object::Array(array) => array,
            Object::Dictionary(dict) => match dict.get(b"D").map(|d| self.deref(d)) {
                Ok(Object::Array(array)) => array,
                _ => return None,
            },
            _ => return None,
        };
        array
            .first()
            .and_then(|o| o.as_reference().ok())
            .map(reference_token)
    }

    /// Replace the document outline with the given bookmark tree.
    ///
    /// Every destination must resolve to an existing page; a page past
    /// the end of the page tree aborts with [`Error::PageNotFound`] and
    /// leaves the document untouched only at the file level (callers
    /// save through [`PdfFile::save`], which is atomic).
    pub fn set_outline(&mut self, roots: &[OutlineNode]) -> Result<()> {
        let pages = self.doc.get_pages();
        let resolver = DocumentResolver::new(&pages);
        let named = self.named_destinations();

        let outlines_id = self.doc.new_object_id();
        let level = write_level(
            &mut self.doc,
            roots,
            outlines_id,
            &pages,
            &resolver,
            &named,
        )?;

        let mut outlines = Dictionary::new();
        outlines.set("Type", Object::Name(b"Outlines".to_vec()));
        if let Some((first, last)) = level.links {
            outlines.set("First", Object::Reference(first));
            outlines.set("Last", Object::Reference(last));
        }
        outlines.set("Count", Object::Integer(roots.len() as i64));
        self.doc
            .objects
            .insert(outlines_id, Object::Dictionary(outlines));

        let root_id = self.doc.trailer.get(b"Root")?.as_reference()?;
        let catalog = self.doc.get_object_mut(root_id)?.as_dict_mut()?;
        catalog.set("Outlines", Object::Reference(outlines_id));
        Ok(())
    }
}

/// First/last object ids of a written outline level.
struct WrittenLevel {
    links: Option<(ObjectId, ObjectId)>,
}

fn write_level(
    doc: &mut lopdf::Document,
    nodes: &[OutlineNode],
    parent: ObjectId,
    pages: &BTreeMap<u32, ObjectId>,
    resolver: &DocumentResolver,
    named: &HashMap<String, String>,
) -> Result<WrittenLevel> {
    if nodes.is_empty() {
        return Ok(WrittenLevel { links: None });
    }

    let ids: Vec<ObjectId> = nodes.iter().map(|_| doc.new_object_id()).collect();

    for (idx, node) in nodes.iter().enumerate() {
        let id = ids[idx];
        let mut dict = Dictionary::new();
        dict.set("Title", super::info::encode_text_string(node.title()));
        dict.set("Parent", Object::Reference(parent));
        if idx > 0 {
            dict.set("Prev", Object::Reference(ids[idx - 1]));
        }
        if idx + 1 < ids.len() {
            dict.set("Next", Object::Reference(ids[idx + 1]));
        }

        if let Some(dest) = node.destination() {
            let page = destination_page(dest, resolver, named)?;
            let page_id = pages.get(&page).ok_or(Error::PageNotFound(page))?;
            dict.set(
                "Dest",
                Object::Array(vec![
                    Object::Reference(*page_id),
                    Object::Name(b"XYZ".to_vec()),
                    Object::Null,
                    Object::Null,
                    Object::Null,
                ]),
            );
        }

        let children = write_level(doc, node.children(), id, pages, resolver, named)?;
        if let Some((first, last)) = children.links {
            dict.set("First", Object::Reference(first));
            dict.set("Last", Object::Reference(last));
            // negative count: children start collapsed
            dict.set("Count", Object::Integer(-(node.children().len() as i64)));
        }

        doc.objects.insert(id, Object::Dictionary(dict));
    }

    Ok(WrittenLevel {
        links: Some((ids[0], ids[ids.len() - 1])),
    })
}
