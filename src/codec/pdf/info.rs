//! Document information dictionary access.

use lopdf::{Dictionary, Document, Object, ObjectId};

/// UTF-16BE byte order mark that starts a PDF text string in Unicode.
const UTF16_BOM: [u8; 2] = [0xFE, 0xFF];

/// Resolve the trailer's `/Info` entry, direct or indirect.
pub fn info_dictionary(doc: &Document) -> Option<&Dictionary> {
    match doc.trailer.get(b"Info").ok()? {
        Object::Reference(id) => doc.get_dictionary(*id).ok(),
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

/// Read `key` from an information dictionary as text.
///
/// Returns `None` when the key is absent or does not hold a string.
pub fn text_value(doc: &Document, info: &Dictionary, key: &str) -> Option<String> {
    let value = match info.get(key.as_bytes()).ok()? {
        Object::Reference(id) => doc.get_object(*id).ok()?,
        direct => direct,
    };

    match value {
        Object::String(bytes, _) => Some(decode_text_string(bytes)),
        Object::Name(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
        _ => None,
    }
}

/// Decode a PDF text string (UTF-16BE with BOM, otherwise byte-per-char).
pub fn decode_text_string(bytes: &[u8]) -> String {
    match bytes.strip_prefix(&UTF16_BOM) {
        Some(rest) => {
            let units: Vec<u16> = rest
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        None => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}

/// Install `entries` as the document's information dictionary.
pub fn replace_info(doc: &mut Document, entries: Dictionary) -> ObjectId {
    let id = doc.add_object(Object::Dictionary(entries));
    doc.trailer.set("Info", id);
    id
}
