//! Carrier fixtures shared by the integration tests.

#![allow(dead_code)]

use image::{GrayImage, Luma, Rgb, RgbImage};
use lopdf::{dictionary, Document, Object, Stream};
use rand::RngCore;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use zip::write::FileOptions;
use zip::ZipWriter;

/// Write a PDF with `pages` pages, each showing "Page N".
pub fn write_pdf(path: &Path, pages: usize) -> PathBuf {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::new();
    for i in 1..=pages {
        let content = doc.add_object(Stream::new(dictionary! {}, page_content(i)));
        let page = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content,
        });
        kids.push(Object::Reference(page));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
    doc.trailer.set("Root", catalog);
    let info = doc.add_object(dictionary! {
        "Title" => Object::string_literal("Base document"),
        "Producer" => Object::string_literal("fixture"),
    });
    doc.trailer.set("Info", info);

    doc.save(path).expect("Failed to write PDF fixture");
    path.to_path_buf()
}

/// Content stream of fixture page `n`.
pub fn page_content(n: usize) -> Vec<u8> {
    format!("BT /F1 24 Tf 72 720 Td (Page {}) Tj ET", n).into_bytes()
}

/// Write a DOCX whose body holds `paragraphs` plain paragraphs.
pub fn write_docx(path: &Path, paragraphs: usize) -> PathBuf {
    let body: String = (1..=paragraphs)
        .map(|i| format!("<w:p><w:r><w:t>Paragraph {}</w:t></w:r></w:p>", i))
        .collect();
    write_docx_body(path, &body)
}

/// Write a DOCX with the given body XML (without section properties).
pub fn write_docx_body(path: &Path, body: &str) -> PathBuf {
    write_docx_part(path, "word/document.xml", body)
}

/// Write a DOCX whose main document part is stored under `part`.
pub fn write_docx_renamed(path: &Path, part: &str, paragraphs: usize) -> PathBuf {
    let body: String = (1..=paragraphs)
        .map(|i| format!("<w:p><w:r><w:t>Paragraph {}</w:t></w:r></w:p>", i))
        .collect();
    write_docx_part(path, part, &body)
}

fn write_docx_part(path: &Path, part: &str, body: &str) -> PathBuf {
    let document = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:body>{}
<w:sectPr><w:pgSz w:w="12240" w:h="15840"/></w:sectPr>
</w:body>
</w:document>"#,
        body
    );

    let content_types = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/><Override PartName="/{}" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#,
        part
    );
    let rels = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="/{}"/></Relationships>"#,
        part
    );

    let entries: [(&str, &[u8]); 3] = [
        ("[Content_Types].xml", content_types.as_bytes()),
        ("_rels/.rels", rels.as_bytes()),
        (part, document.as_bytes()),
    ];

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in entries {
        writer
            .start_file(name, FileOptions::default())
            .expect("Failed to start zip entry");
        writer.write_all(data).expect("Failed to write zip entry");
    }
    let data = writer
        .finish()
        .expect("Failed to finish zip")
        .into_inner();

    std::fs::write(path, data).expect("Failed to write DOCX fixture");
    path.to_path_buf()
}

/// Write an RGB gradient image.
pub fn write_cover(path: &Path, width: u32, height: u32) -> PathBuf {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            ((x * 17) % 256) as u8,
            ((y * 23) % 256) as u8,
            (((x + y) * 31) % 256) as u8,
        ])
    });
    img.save(path).expect("Failed to write cover image");
    path.to_path_buf()
}

/// Write a single-color RGB image.
pub fn write_solid_rgb(path: &Path, width: u32, height: u32, value: u8) -> PathBuf {
    RgbImage::from_pixel(width, height, Rgb([value, value, value]))
        .save(path)
        .expect("Failed to write image");
    path.to_path_buf()
}

/// Write a single-color grayscale image.
pub fn write_solid_gray(path: &Path, width: u32, height: u32, value: u8) -> PathBuf {
    GrayImage::from_pixel(width, height, Luma([value]))
        .save(path)
        .expect("Failed to write image");
    path.to_path_buf()
}

/// Write a grayscale gradient image.
pub fn write_gray_gradient(path: &Path, width: u32, height: u32) -> PathBuf {
    GrayImage::from_fn(width, height, |x, y| Luma([((x * 5 + y * 11) % 256) as u8]))
        .save(path)
        .expect("Failed to write image");
    path.to_path_buf()
}

/// Random bytes of the given length.
pub fn random_payload(len: usize) -> Vec<u8> {
    let mut data = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut data);
    data
}
