//! DOCX hidden-run codec.
//!
//! The payload is stored as base64 text in a run marked with the `vanish`
//! (hidden text) property, inside a new paragraph appended to the body. Word
//! keeps the text in the file but does not render it by default.

mod document;
mod package;

pub use document::{Paragraph, RichTextDocument, Run};
pub use package::DOCUMENT_PART;

use crate::codec::PayloadCodec;
use crate::encoding::{decode_payload, encode_payload};
use crate::error::{Error, Result};
use tracing::debug;

const FORMAT: &str = "docx";

/// Hides a payload in a hidden text run of a DOCX document.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxHiddenRunCodec;

impl DocxHiddenRunCodec {
    pub fn new() -> Self {
        Self
    }

    /// Parse the main document part of a DOCX package.
    pub fn parse(&self, package: &[u8]) -> Result<RichTextDocument> {
        self.open(package).map(|(_, document)| document)
    }

    /// Locate and parse the main document part, returning its part name too.
    fn open(&self, package: &[u8]) -> Result<(String, RichTextDocument)> {
        let part = package::main_document_part(package)?;
        let xml = package::read_part(package, &part)?;
        Ok((part, RichTextDocument::parse(xml)?))
    }
}

impl PayloadCodec for DocxHiddenRunCodec {
    fn format(&self) -> &'static str {
        FORMAT
    }

    fn embed_bytes(&self, payload: &[u8], base: &[u8]) -> Result<Vec<u8>> {
        let encoded = encode_payload(payload);
        let (part, document) = self.open(base)?;
        debug!(
            part = %part,
            paragraphs = document.paragraphs().len(),
            payload = payload.len(),
            "prepared docx carrier"
        );

        let updated = document.with_hidden_paragraph(&encoded);
        package::replace_part(base, &part, &updated)
    }

    fn extract_bytes(&self, carrier: &[u8]) -> Result<Vec<u8>> {
        let document = self.parse(carrier)?;
        let run = document
            .first_hidden_run()
            .ok_or(Error::PayloadNotFound { format: FORMAT })?;

        debug!(chars = run.text.len(), "found hidden run");
        decode_payload(&run.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::io::{Cursor, Write};
    use zip::write::FileOptions;
    use zip::ZipWriter;

    fn sample_docx(body: &str) -> Vec<u8> {
        let document = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}<w:sectPr/></w:body></w:document>"#,
            body
        );

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("[Content_Types].xml", FileOptions::default())
            .unwrap();
        writer.write_all(b"<Types/>").unwrap();
        writer.start_file(DOCUMENT_PART, FileOptions::default()).unwrap();
        writer.write_all(document.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    fn paragraphs(count: usize) -> String {
        (1..=count)
            .map(|i| format!("<w:p><w:r><w:t>Paragraph {}</w:t></w:r></w:p>", i))
            .collect()
    }

    #[test]
    fn test_roundtrip() {
        let codec = DocxHiddenRunCodec::new();
        let carrier = codec
            .embed_bytes(b"hidden bytes", &sample_docx(&paragraphs(2)))
            .unwrap();

        assert_eq!(codec.extract_bytes(&carrier).unwrap(), b"hidden bytes");
    }

    #[test]
    fn test_appends_one_hidden_paragraph() {
        let codec = DocxHiddenRunCodec::new();
        let carrier = codec
            .embed_bytes(b"payload", &sample_docx(&paragraphs(5)))
            .unwrap();

        let document = codec.parse(&carrier).unwrap();
        let paras = document.paragraphs();
        assert_eq!(paras.len(), 6);
        for (i, p) in paras[..5].iter().enumerate() {
            assert_eq!(p.text(), format!("Paragraph {}", i + 1));
            assert!(p.runs.iter().all(|r| !r.hidden));
        }
        assert_eq!(paras[5].runs.len(), 1);
        assert!(paras[5].runs[0].hidden);
        assert_eq!(paras[5].runs[0].text, encode_payload(b"payload"));
    }

    #[test]
    fn test_first_hidden_run_wins() {
        let codec = DocxHiddenRunCodec::new();
        let body = r#"<w:p><w:r><w:rPr><w:vanish/></w:rPr><w:t>Zmlyc3Q=</w:t></w:r></w:p>"#;
        let carrier = codec.embed_bytes(b"second", &sample_docx(body)).unwrap();

        assert_eq!(codec.extract_bytes(&carrier).unwrap(), b"first");
    }

    #[test]
    fn test_empty_payload() {
        let codec = DocxHiddenRunCodec::new();
        let carrier = codec.embed_bytes(b"", &sample_docx(&paragraphs(1))).unwrap();

        assert!(codec.extract_bytes(&carrier).unwrap().is_empty());
    }

    #[test]
    fn test_no_hidden_run() {
        let codec = DocxHiddenRunCodec::new();
        let err = codec.extract_bytes(&sample_docx(&paragraphs(3))).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::PayloadNotFound);
    }

    #[test]
    fn test_hidden_prose_is_corrupt_payload() {
        let codec = DocxHiddenRunCodec::new();
        let body = r#"<w:p><w:r><w:rPr><w:vanish/></w:rPr><w:t>just a note</w:t></w:r></w:p>"#;

        let err = codec.extract_bytes(&sample_docx(body)).unwrap_err();
        assert!(matches!(err, Error::CorruptPayload(_)));
    }

    #[test]
    fn test_renamed_main_part() {
        let rels = br#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document2.xml"/></Relationships>"#;
        let document = format!(
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
            paragraphs(2)
        );

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer.start_file("_rels/.rels", FileOptions::default()).unwrap();
        writer.write_all(rels).unwrap();
        writer
            .start_file("word/document2.xml", FileOptions::default())
            .unwrap();
        writer.write_all(document.as_bytes()).unwrap();
        let base = writer.finish().unwrap().into_inner();

        let codec = DocxHiddenRunCodec::new();
        let carrier = codec.embed_bytes(b"renamed", &base).unwrap();

        assert_eq!(codec.parse(&carrier).unwrap().paragraphs().len(), 3);
        assert_eq!(codec.extract_bytes(&carrier).unwrap(), b"renamed");
        assert!(package::read_part(&carrier, DOCUMENT_PART).is_err());
    }

    #[test]
    fn test_empty_body() {
        let document = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body/></w:document>"#;
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer.start_file(DOCUMENT_PART, FileOptions::default()).unwrap();
        writer.write_all(document.as_bytes()).unwrap();
        let base = writer.finish().unwrap().into_inner();

        let codec = DocxHiddenRunCodec::new();
        let carrier = codec.embed_bytes(b"x", &base).unwrap();

        assert_eq!(codec.parse(&carrier).unwrap().paragraphs().len(), 1);
        assert_eq!(codec.extract_bytes(&carrier).unwrap(), b"x");
    }

    #[test]
    fn test_not_a_docx() {
        let codec = DocxHiddenRunCodec::new();
        let err = codec.embed_bytes(b"x", b"PK but not really").unwrap_err();

        assert_eq!(err.kind(), ErrorKind::CodecInput);
    }
}
