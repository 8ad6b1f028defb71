//! Outline (bookmark) tree ⇄ indented text lines.
//!
//! The write path walks the tree in pre-order and emits one line per
//! node. The read path reconstructs ancestry purely from relative
//! indentation: a node's parent is the nearest preceding line whose
//! depth is strictly smaller, no matter how large the indentation jump.

use std::collections::HashMap;
use std::fmt::Write as _;

use regex::Regex;

use crate::codec::line::LineGrammar;
use crate::codec::{SEPARATOR, SHIFT};
use crate::error::{Error, Result};
use crate::model::{Destination, OutlineNode};

/// Resolves a page-destination token to a 1-based page index.
pub trait PageResolver {
    fn resolve(&self, token: &str) -> Result<u32>;
}

/// Read-only view of a document's named destinations (name → token).
pub trait NamedDestinations {
    fn get(&self, name: &str) -> Option<&str>;
}

impl NamedDestinations for HashMap<String, String> {
    fn get(&self, name: &str) -> Option<&str> {
        HashMap::get(self, name).map(String::as_str)
    }
}

/// Default [`PageResolver`] for text tokens of the form
/// `"<page> XYZ ..."`, as produced by [`OutlineNode::with_page`].
pub struct TokenResolver {
    token: Regex,
}

impl TokenResolver {
    pub fn new() -> Self {
        Self {
            token: Regex::new(r"^([1-9][0-9]*) (.+)$").unwrap(),
        }
    }
}

impl Default for TokenResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl PageResolver for TokenResolver {
    fn resolve(&self, token: &str) -> Result<u32> {
        let caps = self
            .token
            .captures(token)
            .ok_or_else(|| Error::UnsupportedDestination(token.to_string()))?;
        caps[1]
            .parse::<u32>()
            .map_err(|_| Error::UnsupportedDestination(token.to_string()))
    }
}

/// Resolve a destination to its page number.
///
/// Named destinations are looked up first and then resolved like a
/// direct page token. Unsupported destinations always fail.
pub fn destination_page<R, N>(dest: &Destination, resolver: &R, named: &N) -> Result<u32>
where
    R: PageResolver,
    N: NamedDestinations,
{
    match dest {
        Destination::Page(token) => resolver.resolve(token),
        Destination::Named(name) => {
            let token = named
                .get(name)
                .ok_or_else(|| Error::NamedDestinationNotFound(name.clone()))?;
            resolver.resolve(token)
        }
        Destination::Unsupported(what) => Err(Error::UnsupportedDestination(what.clone())),
    }
}

/// Sentinel depth for lines that were dropped: such a slot can never be
/// selected as a parent, but keeps indices aligned for the backward scan.
const DROPPED: usize = usize::MAX;

/// Converter between outline trees and indented text lines.
pub struct OutlineCodec {
    grammar: LineGrammar,
}

impl OutlineCodec {
    pub fn new() -> Self {
        Self {
            grammar: LineGrammar::new(),
        }
    }

    /// Serialize an outline tree to text lines.
    ///
    /// A node whose destination cannot be resolved is skipped together
    /// with its whole subtree (its children's lines would dangle without
    /// the parent line); a diagnostic is logged and the traversal
    /// continues with the node's siblings.
    pub fn to_lines<R, N>(&self, roots: &[OutlineNode], resolver: &R, named: &N) -> Vec<String>
    where
        R: PageResolver,
        N: NamedDestinations,
    {
        let mut lines = Vec::new();
        for node in roots {
            self.emit(node, 0, resolver, named, &mut lines);
        }
        lines
    }

    fn emit<R, N>(
        &self,
        node: &OutlineNode,
        depth: usize,
        resolver: &R,
        named: &N,
        lines: &mut Vec<String>,
    ) where
        R: PageResolver,
        N: NamedDestinations,
    {
        let page = match node.destination() {
            None => None,
            Some(dest) => match destination_page(dest, resolver, named) {
                Ok(page) => Some(page),
                Err(e) => {
                    log::warn!(
                        "skipping bookmark {:?} and its children: {}",
                        node.title(),
                        e
                    );
                    return;
                }
            },
        };

        let mut line = SHIFT.repeat(depth);
        line.push_str(node.title());
        if let Some(page) = page {
            let _ = write!(line, "{}{}", SEPARATOR, page);
        }
        lines.push(line);

        for child in node.children() {
            self.emit(child, depth + 1, resolver, named, lines);
        }
    }

    /// Reconstruct an outline tree from text lines.
    ///
    /// Malformed lines and lines whose title sanitizes to nothing are
    /// dropped with a diagnostic; everything else is kept. The result is
    /// the ordered list of root bookmarks.
    pub fn parse<S: AsRef<str>>(&self, lines: &[S]) -> Vec<OutlineNode> {
        let mut roots: Vec<OutlineNode> = Vec::new();
        // depth of every input line, DROPPED for rejected ones
        let mut depths: Vec<usize> = Vec::with_capacity(lines.len());
        // where the node built from line i ended up (child-index path
        // from the roots), None for dropped lines
        let mut paths: Vec<Option<Vec<usize>>> = Vec::with_capacity(lines.len());

        for line in lines {
            let line = line.as_ref();

            let parsed = match self.grammar.parse(line) {
                Ok(parsed) => parsed,
                Err(e) => {
                    log::warn!("{}", e);
                    depths.push(DROPPED);
                    paths.push(None);
                    continue;
                }
            };

            let (title, page) = self.grammar.split_page_suffix(&parsed.title);
            let node = match page {
                Some(page) => OutlineNode::with_page(title, page),
                None => OutlineNode::new(title),
            };
            let node = match node {
                Ok(node) => node,
                Err(e) => {
                    log::warn!("skipping outline line {:?}: {}", line, e);
                    depths.push(DROPPED);
                    paths.push(None);
                    continue;
                }
            };

            // Backward scan: the parent is the nearest preceding line
            // strictly shallower than this one. Dropped lines carry
            // DROPPED and are scanned over without ever matching.
            let parent = depths.iter().rposition(|&d| d < parsed.depth);

            let path = match parent.and_then(|j| paths[j].clone()) {
                Some(mut parent_path) => {
                    if let Some(parent_node) = node_at_mut(&mut roots, &parent_path) {
                        parent_node.add_child(node);
                        parent_path.push(parent_node.children().len() - 1);
                        parent_path
                    } else {
                        // unreachable: accepted lines always have a live path
                        roots.push(node);
                        vec![roots.len() - 1]
                    }
                }
                None => {
                    roots.push(node);
                    vec![roots.len() - 1]
                }
            };

            depths.push(parsed.depth);
            paths.push(Some(path));
        }

        roots
    }
}

impl Default for OutlineCodec {
    fn default() -> Self {
        Self::new()
    }
}

/// Walk a child-index path down from the root list.
fn node_at_mut<'a>(roots: &'a mut [OutlineNode], path: &[usize]) -> Option<&'a mut OutlineNode> {
    let (&first, rest) = path.split_first()?;
    let mut node = roots.get_mut(first)?;
    for &idx in rest {
        node = node.children_mut().get_mut(idx)?;
    }
    Some(node)
}
