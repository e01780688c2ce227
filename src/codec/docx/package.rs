//! DOCX zip package access.

use crate::error::{Error, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read, Write};
use zip::result::ZipError;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

const FORMAT: &str = "docx";

/// Conventional main document part of a WordprocessingML package.
pub const DOCUMENT_PART: &str = "word/document.xml";

/// Package-level relationships part.
const PACKAGE_RELS: &str = "_rels/.rels";

/// Suffix of the relationship type pointing at the main document part, in
/// both the transitional and strict namespaces.
const OFFICE_DOCUMENT_REL: &str = "/officeDocument";

/// Name of the package's main document part.
///
/// Resolved through the `officeDocument` relationship in `_rels/.rels`.
/// Packages without that part or relationship fall back to
/// [`DOCUMENT_PART`].
pub fn main_document_part(package: &[u8]) -> Result<String> {
    let target = match read_optional_part(package, PACKAGE_RELS)? {
        Some(rels) => office_document_target(&rels)?,
        None => None,
    };
    Ok(target.unwrap_or_else(|| DOCUMENT_PART.to_string()))
}

/// Read one part of a package.
pub fn read_part(package: &[u8], name: &str) -> Result<Vec<u8>> {
    read_optional_part(package, name)?
        .ok_or_else(|| Error::parse(FORMAT, format!("package has no {}", name)))
}

fn read_optional_part(package: &[u8], name: &str) -> Result<Option<Vec<u8>>> {
    let mut archive = open(package)?;
    let mut part = match archive.by_name(name) {
        Ok(part) => part,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(Error::parse(FORMAT, format!("{}: {}", name, e))),
    };

    let mut data = Vec::with_capacity(part.size() as usize);
    part.read_to_end(&mut data)
        .map_err(|e| Error::parse(FORMAT, format!("{}: {}", name, e)))?;
    Ok(Some(data))
}

/// Target of the first `officeDocument` relationship, without a leading `/`.
fn office_document_target(rels: &[u8]) -> Result<Option<String>> {
    let mut reader = Reader::from_reader(rels);
    let mut buf = Vec::new();

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| Error::parse(FORMAT, format!("{}: {}", PACKAGE_RELS, e)))?;

        match event {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                let mut kind = None;
                let mut target = None;
                for attr in e.attributes().flatten() {
                    let value = attr
                        .unescape_value()
                        .map_err(|e| Error::parse(FORMAT, format!("{}: {}", PACKAGE_RELS, e)))?;
                    match attr.key.local_name().as_ref() {
                        b"Type" => kind = Some(value.into_owned()),
                        b"Target" => target = Some(value.into_owned()),
                        _ => {}
                    }
                }

                if let (Some(kind), Some(target)) = (kind, target) {
                    if kind.ends_with(OFFICE_DOCUMENT_REL) {
                        return Ok(Some(target.trim_start_matches('/').to_string()));
                    }
                }
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
        buf.clear();
    }
}

/// Rebuild a package with `name` replaced by `content`.
///
/// Every other entry is copied raw, without recompression, in its original
/// position.
pub fn replace_part(package: &[u8], name: &str, content: &[u8]) -> Result<Vec<u8>> {
    let mut archive = open(package)?;
    let mut writer = ZipWriter::new(Cursor::new(Vec::with_capacity(
        package.len() + content.len(),
    )));
    let mut replaced = false;

    for index in 0..archive.len() {
        let entry = archive
            .by_index_raw(index)
            .map_err(|e| Error::parse(FORMAT, e))?;

        if entry.name() == name {
            let options = FileOptions::default()
                .compression_method(CompressionMethod::Deflated)
                .last_modified_time(entry.last_modified())
                .large_file(content.len() as u64 >= u32::MAX as u64);
            drop(entry);

            writer
                .start_file(name, options)
                .map_err(|e| Error::serialize(FORMAT, e))?;
            writer
                .write_all(content)
                .map_err(|e| Error::serialize(FORMAT, e))?;
            replaced = true;
        } else {
            writer
                .raw_copy_file(entry)
                .map_err(|e| Error::serialize(FORMAT, e))?;
        }
    }

    if !replaced {
        return Err(Error::parse(FORMAT, format!("package has no {}", name)));
    }

    let cursor = writer.finish().map_err(|e| Error::serialize(FORMAT, e))?;
    Ok(cursor.into_inner())
}

fn open(package: &[u8]) -> Result<ZipArchive<Cursor<&[u8]>>> {
    ZipArchive::new(Cursor::new(package)).map_err(|e| Error::parse(FORMAT, e))
}
