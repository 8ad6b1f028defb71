//! Info dictionary (document metadata) access and PDF text strings.

use std::collections::BTreeMap;

use lopdf::{Dictionary, Object};

use super::PdfFile;
use crate::error::Result;

impl PdfFile {
    /// Read the trailer `Info` dictionary as a sorted key/value map.
    ///
    /// Only string-valued entries are kept, which covers every standard
    /// Info key (`Title`, `Author`, `Subject`, `Keywords`, dates) as
    /// well as custom ones.
    pub fn metadata(&self) -> BTreeMap<String, String> {
        let mut entries = BTreeMap::new();

        let info = self
            .doc
            .trailer
            .get(b"Info")
            .ok()
            .and_then(|info| self.deref_dict(info));

        if let Some(info) = info {
            for (key, value) in info.iter() {
                let value = match self.deref(value) {
                    Object::String(bytes, _) => decode_text_string(bytes),
                    Object::Name(name) => String::from_utf8_lossy(name).into_owned(),
                    _ => continue,
                };
                entries.insert(String::from_utf8_lossy(key).into_owned(), value);
            }
        }

        entries
    }

    /// Replace the trailer `Info` dictionary with the given entries.
    pub fn set_metadata(&mut self, entries: &BTreeMap<String, String>) -> Result<()> {
        let mut info = Dictionary::new();
        for (key, value) in entries {
            info.set(key.as_bytes().to_vec(), encode_text_string(value));
        }
        let info_id = self.doc.add_object(Object::Dictionary(info));
        self.doc.trailer.set("Info", Object::Reference(info_id));
        Ok(())
    }
}

/// Decode a PDF text string: UTF-16BE with BOM, else byte text.
pub(crate) fn decode_text_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter_map(|c| {
                if c.len() == 2 {
                    Some(u16::from_be_bytes([c[0], c[1]]))
                } else {
                    None
                }
            })
            .collect();
        return String::from_utf16(&utf16).unwrap_or_default();
    }

    match String::from_utf8(bytes.to_vec()) {
        Ok(text) => text,
        // Latin-1 fallback
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// Encode a text string for storage in a PDF: plain literal when ASCII,
/// UTF-16BE with BOM otherwise.
pub(crate) fn encode_text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }

    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, lopdf::StringFormat::Literal)
}
