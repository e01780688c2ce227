//! WordprocessingML body model.
//!
//! Only what the codec needs is modeled: the body's paragraphs, their direct
//! runs, each run's text and whether it carries the `vanish` (hidden text)
//! property. The original XML is kept so a paragraph can be spliced in without
//! re-serializing anything that was already there.

use crate::error::{Error, Result};
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::ops::Range;

const FORMAT: &str = "docx";

/// A text run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Run {
    /// Concatenated text of the run.
    pub text: String,
    /// True when the run is excluded from rendering.
    pub hidden: bool,
}

/// A body paragraph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraph {
    pub runs: Vec<Run>,
}

impl Paragraph {
    /// Text of all runs, hidden ones included.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

/// Parsed `word/document.xml`.
#[derive(Debug, Clone)]
pub struct RichTextDocument {
    xml: Vec<u8>,
    paragraphs: Vec<Paragraph>,
    /// Byte offset where a new last paragraph belongs.
    insert_at: usize,
    /// Namespace prefix of the body element, usually `w`.
    prefix: Option<String>,
    /// Span of a self-closing `<w:body/>`, which has to be opened up.
    empty_body: Option<Range<usize>>,
}

impl RichTextDocument {
    /// Parse a document part.
    pub fn parse(xml: Vec<u8>) -> Result<Self> {
        let mut parser = BodyParser::default();
        let mut reader = Reader::from_reader(xml.as_slice());
        let mut buf = Vec::new();

        loop {
            let position = reader.buffer_position();
            let event = reader.read_event_into(&mut buf).map_err(|e| {
                Error::parse(FORMAT, format!("{} near byte {}", e, reader.buffer_position()))
            })?;
            let end = reader.buffer_position();

            match event {
                Event::Start(e) => parser.start(&e, false, || tag_start(&xml, position)..end),
                Event::Empty(e) => parser.start(&e, true, || tag_start(&xml, position)..end),
                Event::End(e) => {
                    parser.end(e.local_name().as_ref(), || tag_start(&xml, position))
                }
                Event::Text(e) if parser.in_text => {
                    let text = e.unescape().map_err(|e| Error::parse(FORMAT, e))?;
                    parser.push_text(&text);
                }
                Event::CData(e) if parser.in_text => {
                    parser.push_text(&String::from_utf8_lossy(&e));
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        let insert_at = parser
            .insert_at
            .ok_or_else(|| Error::parse(FORMAT, "document part has no body"))?;

        Ok(Self {
            xml,
            paragraphs: parser.paragraphs,
            insert_at,
            prefix: parser.prefix,
            empty_body: parser.empty_body,
        })
    }

    /// Body paragraphs in document order.
    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    /// The first hidden run in document order.
    pub fn first_hidden_run(&self) -> Option<&Run> {
        self.paragraphs
            .iter()
            .flat_map(|p| p.runs.iter())
            .find(|r| r.hidden)
    }

    /// Return the document part with one more paragraph at the end of the
    /// body, holding a single hidden run with `text`.
    ///
    /// The paragraph goes before the body's final section properties, so
    /// everything before it is byte-identical to the parsed part. An empty
    /// `<w:body/>` is rewritten as an open and close tag pair around it.
    pub fn with_hidden_paragraph(&self, text: &str) -> Vec<u8> {
        let paragraph = hidden_paragraph_xml(self.prefix.as_deref(), text);

        let mut out = Vec::with_capacity(self.xml.len() + paragraph.len() + 16);
        match &self.empty_body {
            Some(span) => {
                let tag = &self.xml[span.clone()];
                let open = tag.strip_suffix(b"/>").unwrap_or(tag);
                let close = match &self.prefix {
                    Some(p) => format!("</{}:body>", p),
                    None => "</body>".to_string(),
                };

                out.extend_from_slice(&self.xml[..span.start]);
                out.extend_from_slice(open);
                out.push(b'>');
                out.extend_from_slice(paragraph.as_bytes());
                out.extend_from_slice(close.as_bytes());
                out.extend_from_slice(&self.xml[span.end..]);
            }
            None => {
                out.extend_from_slice(&self.xml[..self.insert_at]);
                out.extend_from_slice(paragraph.as_bytes());
                out.extend_from_slice(&self.xml[self.insert_at..]);
            }
        }
        out
    }
}

/// Streaming state for [`RichTextDocument::parse`].
#[derive(Default)]
struct BodyParser {
    stack: Vec<Vec<u8>>,
    /// Stack depth of the body's direct children.
    body_depth: Option<usize>,
    prefix: Option<String>,
    paragraphs: Vec<Paragraph>,
    paragraph: Option<Paragraph>,
    run: Option<Run>,
    in_text: bool,
    insert_at: Option<usize>,
    empty_body: Option<Range<usize>>,
}

impl BodyParser {
    /// Depth of the current element relative to the body's children.
    fn level(&self) -> Option<usize> {
        self.body_depth
            .and_then(|body| self.stack.len().checked_sub(body))
    }

    fn start(&mut self, e: &BytesStart, empty: bool, span: impl FnOnce() -> Range<usize>) {
        let name = e.local_name().as_ref().to_vec();

        if self.body_depth.is_none() {
            if name == b"body" && self.insert_at.is_none() {
                self.prefix = e
                    .name()
                    .prefix()
                    .map(|p| String::from_utf8_lossy(p.as_ref()).into_owned());
                if empty {
                    let span = span();
                    self.insert_at = Some(span.start);
                    self.empty_body = Some(span);
                } else {
                    self.body_depth = Some(self.stack.len() + 1);
                }
            }
            if !empty {
                self.stack.push(name);
            }
            return;
        }

        match (self.level(), name.as_slice()) {
            (Some(0), b"p") => {
                if empty {
                    self.paragraphs.push(Paragraph::default());
                } else {
                    self.paragraph = Some(Paragraph::default());
                }
            }
            (Some(0), b"sectPr") => {
                if self.insert_at.is_none() {
                    self.insert_at = Some(span().start);
                }
            }
            (Some(1), b"r") => {
                if let Some(paragraph) = self.paragraph.as_mut() {
                    if empty {
                        paragraph.runs.push(Run::default());
                    } else {
                        self.run = Some(Run::default());
                    }
                }
            }
            (Some(2), b"t") if self.run.is_some() && !empty => self.in_text = true,
            (Some(2), b"tab") => self.push_text("\t"),
            (Some(2), b"br") | (Some(2), b"cr") => self.push_text("\n"),
            (Some(3), b"vanish") if self.in_run_properties() => {
                if let Some(run) = self.run.as_mut() {
                    run.hidden = toggle_enabled(e);
                }
            }
            _ => {}
        }

        if !empty {
            self.stack.push(name);
        }
    }

    fn end(&mut self, name: &[u8], offset: impl FnOnce() -> usize) {
        self.stack.pop();

        match (self.level(), name) {
            (Some(0), b"p") => {
                if let Some(paragraph) = self.paragraph.take() {
                    self.paragraphs.push(paragraph);
                }
            }
            (Some(1), b"r") => {
                if let (Some(run), Some(paragraph)) = (self.run.take(), self.paragraph.as_mut()) {
                    paragraph.runs.push(run);
                }
            }
            (Some(2), b"t") => self.in_text = false,
            _ => {}
        }

        if name == b"body" && self.body_depth == Some(self.stack.len() + 1) {
            if self.insert_at.is_none() {
                self.insert_at = Some(offset());
            }
            self.body_depth = None;
        }
    }

    fn in_run_properties(&self) -> bool {
        self.run.is_some() && self.stack.last().map(Vec::as_slice) == Some(b"rPr".as_slice())
    }

    fn push_text(&mut self, text: &str) {
        if let Some(run) = self.run.as_mut() {
            run.text.push_str(text);
        }
    }
}

/// Evaluate an OOXML on/off property such as `<w:vanish w:val="false"/>`.
/// A missing `val` means on.
fn toggle_enabled(e: &BytesStart) -> bool {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == b"val")
        .map(|a| !matches!(a.value.as_ref(), b"false" | b"0" | b"off"))
        .unwrap_or(true)
}

/// Byte offset of the `<` opening the event that starts at or just before
/// `position`.
fn tag_start(xml: &[u8], position: usize) -> usize {
    if xml.get(position) == Some(&b'<') {
        return position;
    }
    xml[..position.min(xml.len())]
        .iter()
        .rposition(|&b| b == b'<')
        .unwrap_or(position)
}

fn hidden_paragraph_xml(prefix: Option<&str>, text: &str) -> String {
    let p = prefix.map(|p| format!("{}:", p)).unwrap_or_default();
    format!(
        "<{p}p><{p}r><{p}rPr><{p}vanish/></{p}rPr><{p}t xml:space=\"preserve\">{text}</{p}t></{p}r></{p}p>",
        p = p,
        text = escape(text)
    )
}
