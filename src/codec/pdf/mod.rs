//! PDF information-dictionary codec.
//!
//! The payload is stored as a base64 string under a reserved key of the
//! document information dictionary. The pages of the base document are
//! carried over in order into a fresh page tree.

mod info;
mod pages;

pub use pages::flatten_page_tree;

use crate::codec::PayloadCodec;
use crate::config::StegoConfig;
use crate::encoding::{decode_payload, encode_payload};
use crate::error::{Error, Result};
use lopdf::{Dictionary, Document, Object};
use tracing::{debug, warn};

const FORMAT: &str = "pdf";

/// Hides a payload in a PDF's document information dictionary.
#[derive(Debug, Clone)]
pub struct PdfMetadataCodec {
    metadata_key: String,
    legacy_keys: Vec<String>,
    preserve_metadata: bool,
}

impl Default for PdfMetadataCodec {
    fn default() -> Self {
        Self::new(&StegoConfig::default())
    }
}

impl PdfMetadataCodec {
    /// Create a codec from the configured keys.
    pub fn new(config: &StegoConfig) -> Self {
        let config = config.clone().normalized();
        Self {
            metadata_key: config.metadata_key,
            legacy_keys: config.legacy_metadata_keys,
            preserve_metadata: config.preserve_metadata,
        }
    }

    /// The key that receives the payload.
    pub fn metadata_key(&self) -> &str {
        &self.metadata_key
    }

    fn payload_keys(&self) -> impl Iterator<Item = &String> {
        std::iter::once(&self.metadata_key).chain(self.legacy_keys.iter())
    }

    /// Information entries of the base document to carry into the output,
    /// minus any previous payload.
    fn carried_entries(&self, doc: &Document) -> Dictionary {
        let mut entries = Dictionary::new();
        if !self.preserve_metadata {
            return entries;
        }
        let Some(base_info) = info::info_dictionary(doc) else {
            return entries;
        };

        for (key, value) in base_info.iter() {
            if self.payload_keys().any(|k| k.as_bytes() == key.as_slice()) {
                warn!(
                    key = %String::from_utf8_lossy(key),
                    "replacing payload already present in base document"
                );
                continue;
            }
            entries.set(key.clone(), value.clone());
        }
        entries
    }
}

impl PayloadCodec for PdfMetadataCodec {
    fn format(&self) -> &'static str {
        FORMAT
    }

    fn embed_bytes(&self, payload: &[u8], base: &[u8]) -> Result<Vec<u8>> {
        let encoded = encode_payload(payload);
        let mut doc = load_document(base)?;

        let mut entries = self.carried_entries(&doc);
        entries.set(
            self.metadata_key.as_bytes().to_vec(),
            Object::string_literal(encoded),
        );
        info::replace_info(&mut doc, entries);

        let page_count = flatten_page_tree(&mut doc)?;
        debug!(pages = page_count, payload = payload.len(), "prepared pdf carrier");

        let mut output = Vec::new();
        doc.save_to(&mut output)
            .map_err(|e| Error::serialize(FORMAT, e))?;
        Ok(output)
    }

    fn extract_bytes(&self, carrier: &[u8]) -> Result<Vec<u8>> {
        let doc = load_document(carrier)?;
        let info = info::info_dictionary(&doc).ok_or(Error::PayloadNotFound { format: FORMAT })?;

        for key in self.payload_keys() {
            if let Some(text) = info::text_value(&doc, info, key) {
                debug!(key = %key, chars = text.len(), "found pdf payload");
                return decode_payload(&text);
            }
        }

        Err(Error::PayloadNotFound { format: FORMAT })
    }
}

fn load_document(data: &[u8]) -> Result<Document> {
    let doc = Document::load_mem(data).map_err(|e| Error::parse(FORMAT, e))?;
    if doc.trailer.has(b"Encrypt") {
        return Err(Error::parse(FORMAT, "encrypted documents are not supported"));
    }
    Ok(doc)
}
