//! Embedded (attached) file extraction, injection, and removal.

use std::path::Path;

use lopdf::{Dictionary, Object, Stream};

use super::info::{decode_text_string, encode_text_string};
use super::PdfFile;
use crate::error::{Error, Result};

/// An embedded file: its name and raw content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub name: String,
    pub data: Vec<u8>,
}

impl Attachment {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Read an attachment from a file on disk, named after the file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| Error::Attachment(format!("not a file: {}", path.display())))?;
        Ok(Self::new(name, std::fs::read(path)?))
    }
}

// EF dictionary keys, in preference order: Unicode name first, the
// plain one last.
const EMBEDDED_FILE_KEYS: [&[u8]; 5] = [b"UF", b"DOS", b"Mac", b"Unix", b"F"];

impl PdfFile {
    /// Collect every embedded file in the document.
    ///
    /// Looks in the `EmbeddedFiles` name tree and in `FileAttachment`
    /// annotations on every page; unreadable entries are skipped with a
    /// diagnostic.
    pub fn attachments(&self) -> Vec<Attachment> {
        let mut found = Vec::new();

        if let Some(tree) = self.embedded_files_tree() {
            self.collect_tree_attachments(tree, &mut found);
        }

        for (page_num, page_id) in self.doc.get_pages() {
            let Ok(page) = self.doc.get_dictionary(page_id) else {
                continue;
            };
            let Some(annots) = page
                .get(b"Annots")
                .ok()
                .map(|a| self.deref(a))
                .and_then(|a| a.as_array().ok())
            else {
                continue;
            };
            for annot in annots {
                let Some(annot) = self.deref_dict(annot) else {
                    continue;
                };
                let subtype = annot
                    .get(b"Subtype")
                    .ok()
                    .and_then(|s| s.as_name_str().ok())
                    .unwrap_or("");
                if subtype != "FileAttachment" {
                    continue;
                }
                match annot.get(b"FS").ok().and_then(|fs| self.deref_dict(fs)) {
                    Some(filespec) => {
                        if let Some(attachment) = self.extract_filespec(filespec) {
                            found.push(attachment);
                        }
                    }
                    None => log::warn!(
                        "file attachment annotation without file spec on page {}",
                        page_num
                    ),
                }
            }
        }

        found
    }

    /// The `EmbeddedFiles` name tree root, if the document has one.
    fn embedded_files_tree(&self) -> Option<&Dictionary> {
        self.doc
            .catalog()
            .ok()
            .and_then(|catalog| catalog.get(b"Names").ok())
            .and_then(|names| self.deref_dict(names))
            .and_then(|names| names.get(b"EmbeddedFiles").ok())
            .and_then(|tree| self.deref_dict(tree))
    }

    fn collect_tree_attachments(&self, node: &Dictionary, found: &mut Vec<Attachment>) {
        if let Some(kids) = node.get(b"Kids").ok().and_then(|k| k.as_array().ok()) {
            for kid in kids {
                if let Some(kid) = self.deref_dict(kid) {
                    self.collect_tree_attachments(kid, found);
                }
            }
        }

        if let Some(names) = node.get(b"Names").ok().and_then(|n| n.as_array().ok()) {
            for pair in names.chunks(2) {
                let [_, filespec] = pair else { continue };
                if let Some(filespec) = self.deref_dict(filespec) {
                    if let Some(attachment) = self.extract_filespec(filespec) {
                        found.push(attachment);
                    }
                }
            }
        }
    }

    /// Pull name and content out of a file specification dictionary.
    fn extract_filespec(&self, filespec: &Dictionary) -> Option<Attachment> {
        let name = [b"UF".as_slice(), b"F".as_slice()]
            .iter()
            .find_map(|key| filespec.get(key).ok())
            .map(|obj| self.deref(obj))
            .and_then(|obj| obj.as_str().ok())
            .map(decode_text_string)?;
        // strip any directory components a hostile file might carry
        let name = Path::new(&name)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or(name);

        let ef = filespec.get(b"EF").ok().and_then(|ef| self.deref_dict(ef))?;
        let stream = EMBEDDED_FILE_KEYS
            .iter()
            .find_map(|key| ef.get(key).ok())
            .map(|obj| self.deref(obj));

        let Some(Object::Stream(stream)) = stream else {
            log::warn!("attachment {:?} has no embedded file stream", name);
            return None;
        };
        let data = stream
            .decompressed_content()
            .unwrap_or_else(|_| stream.content.clone());

        Some(Attachment { name, data })
    }

    /// Embed the given files, replacing any existing `EmbeddedFiles`
    /// name tree.
    pub fn add_attachments(&mut self, files: &[Attachment]) -> Result<()> {
        let mut files: Vec<&Attachment> = files.iter().collect();
        // name trees must be sorted by key
        files.sort_by(|a, b| a.name.cmp(&b.name));

        let mut names = Vec::with_capacity(files.len() * 2);
        for file in files {
            let mut ef_dict = Dictionary::new();
            ef_dict.set("Type", Object::Name(b"EmbeddedFile".to_vec()));
            let stream_id = self
                .doc
                .add_object(Object::Stream(Stream::new(ef_dict, file.data.clone())));

            let mut ef = Dictionary::new();
            ef.set("F", Object::Reference(stream_id));

            let mut filespec = Dictionary::new();
            filespec.set("Type", Object::Name(b"Filespec".to_vec()));
            filespec.set("F", encode_text_string(&file.name));
            filespec.set("UF", encode_text_string(&file.name));
            filespec.set("EF", Object::Dictionary(ef));
            let filespec_id = self.doc.add_object(Object::Dictionary(filespec));

            names.push(encode_text_string(&file.name));
            names.push(Object::Reference(filespec_id));
        }

        let mut tree = Dictionary::new();
        tree.set("Names", Object::Array(names));
        let tree_id = self.doc.add_object(Object::Dictionary(tree));

        let mut names_dict = self
            .doc
            .catalog()
            .ok()
            .and_then(|catalog| catalog.get(b"Names").ok())
            .and_then(|names| self.deref_dict(names))
            .cloned()
            .unwrap_or_else(Dictionary::new);
        names_dict.set("EmbeddedFiles", Object::Reference(tree_id));

        let root_id = self.doc.trailer.get(b"Root")?.as_reference()?;
        let catalog = self.doc.get_object_mut(root_id)?.as_dict_mut()?;
        catalog.set("Names", Object::Dictionary(names_dict));
        Ok(())
    }

    /// Drop the `EmbeddedFiles` name tree, detaching every embedded
    /// file. Attachment annotations on pages are left alone.
    pub fn remove_attachments(&mut self) -> Result<()> {
        let root_id = self.doc.trailer.get(b"Root")?.as_reference()?;

        let names_ref = self
            .doc
            .get_dictionary(root_id)
            .ok()
            .and_then(|catalog| catalog.get(b"Names").ok())
            .and_then(|names| names.as_reference().ok());

        let names_dict = match names_ref {
            Some(names_id) => self.doc.get_object_mut(names_id)?.as_dict_mut()?,
            None => {
                let catalog = self.doc.get_object_mut(root_id)?.as_dict_mut()?;
                match catalog.get_mut(b"Names") {
                    Ok(Object::Dictionary(dict)) => dict,
                    _ => return Ok(()),
                }
            }
        };

        names_dict.remove(b"EmbeddedFiles");
        Ok(())
    }
}
