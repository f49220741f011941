//! Minimal DOCX container: enough of the WordprocessingML object model
//! to enumerate text-bearing paragraphs (including nested table cells),
//! rewrite a paragraph's text while carrying its first run's style, and
//! round-trip the package without touching any other part.
//!
//! The body is kept as a stream of XML events segmented at `<w:p>`
//! boundaries. Paragraphs never nest, and table cells contain ordinary
//! paragraphs, so one flat segmentation covers tables of any depth.

use crate::domain::constants::{DEFAULT_RUN_FONT, DEFAULT_RUN_SIZE_HALF_POINTS};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::io::{Cursor, Read, Write};
use std::path::Path;

const DOCUMENT_PART: &str = "word/document.xml";

#[derive(thiserror::Error, Debug)]
pub enum DocxError {
    #[error("not a docx package: missing {DOCUMENT_PART}")]
    MissingDocumentXml,
    #[error("docx io: {0}")]
    Io(#[from] std::io::Error),
    #[error("docx zip: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("docx xml: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// Style of a paragraph's first run, as far as rendering cares.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStyle {
    pub font: Option<String>,
    pub size_half_points: Option<u32>,
    pub bold: bool,
}

#[derive(Debug)]
enum Node {
    Raw(Vec<Event<'static>>),
    Paragraph(Paragraph),
}

#[derive(Debug)]
pub struct Paragraph {
    events: Vec<Event<'static>>,
    text: String,
    replacement: Option<String>,
}

#[derive(Debug)]
pub struct Document {
    /// Every package part in archive order; the document part's stored
    /// bytes are ignored in favor of the parsed body.
    parts: Vec<(String, Vec<u8>)>,
    nodes: Vec<Node>,
}

impl Document {
    pub fn open(path: &Path) -> Result<Document, DocxError> {
        let bytes = std::fs::read(path)?;
        Document::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Document, DocxError> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
        let mut parts = Vec::new();
        let mut document_xml: Option<String> = None;
        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            let name = file.name().to_string();
            let mut buf = Vec::new();
            file.read_to_end(&mut buf)?;
            if name == DOCUMENT_PART {
                document_xml = Some(String::from_utf8_lossy(&buf).into_owned());
            }
            parts.push((name, buf));
        }
        let xml = document_xml.ok_or(DocxError::MissingDocumentXml)?;
        let nodes = parse_body(&xml)?;
        Ok(Document { parts, nodes })
    }

    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.nodes.iter().filter_map(|n| match n {
            Node::Paragraph(p) => Some(p),
            Node::Raw(_) => None,
        })
    }

    pub fn paragraphs_mut(&mut self) -> impl Iterator<Item = &mut Paragraph> {
        self.nodes.iter_mut().filter_map(|n| match n {
            Node::Paragraph(p) => Some(p),
            Node::Raw(_) => None,
        })
    }

    /// Serialize the package. Written to a temp sibling and renamed so a
    /// failed save never leaves a truncated document behind.
    pub fn save(&self, path: &Path) -> Result<(), DocxError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let bytes = self.to_bytes()?;
        let tmp = path.with_extension("docx.tmp");
        std::fs::write(&tmp, &bytes)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, DocxError> {
        let body = self.serialize_body()?;
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut zip = zip::ZipWriter::new(&mut cursor);
            let options = zip::write::SimpleFileOptions::default();
            for (name, data) in &self.parts {
                zip.start_file(name.clone(), options)?;
                if name == DOCUMENT_PART {
                    zip.write_all(&body)?;
                } else {
                    zip.write_all(data)?;
                }
            }
            zip.finish()?;
        }
        Ok(cursor.into_inner())
    }

    fn serialize_body(&self) -> Result<Vec<u8>, DocxError> {
        let mut writer = Writer::new(Vec::new());
        for node in &self.nodes {
            match node {
                Node::Raw(events) => {
                    for ev in events {
                        writer.write_event(ev.clone())?;
                    }
                }
                Node::Paragraph(p) => p.write(&mut writer)?,
            }
        }
        Ok(writer.into_inner())
    }
}

impl Paragraph {
    fn from_events(events: Vec<Event<'static>>) -> Paragraph {
        let text = concat_text(&events);
        Paragraph {
            events,
            text,
            replacement: None,
        }
    }

    /// Concatenated text of every `<w:t>` in the paragraph, in order.
    pub fn text(&self) -> &str {
        self.replacement.as_deref().unwrap_or(&self.text)
    }

    /// Replace the paragraph's whole text. On save the paragraph is
    /// rewritten as a single run carrying the first original run's
    /// properties (or the default style when none existed).
    pub fn set_text(&mut self, text: String) {
        self.replacement = Some(text);
    }

    pub fn style(&self) -> Option<RunStyle> {
        first_run_properties(&self.events).map(|rpr| parse_run_style(&rpr))
    }

    fn write<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), DocxError> {
        let Some(replacement) = &self.replacement else {
            for ev in &self.events {
                writer.write_event(ev.clone())?;
            }
            return Ok(());
        };

        // <w:p> start with its original attributes.
        if let Some(first) = self.events.first() {
            writer.write_event(first.clone())?;
        }
        if let Some(ppr) = paragraph_properties(&self.events) {
            for ev in ppr {
                writer.write_event(ev)?;
            }
        }

        writer.write_event(Event::Start(BytesStart::new("w:r")))?;
        match first_run_properties(&self.events) {
            Some(rpr) => {
                for ev in rpr {
                    writer.write_event(ev)?;
                }
            }
            None => write_default_run_properties(writer)?,
        }
        let mut t = BytesStart::new("w:t");
        t.push_attribute(("xml:space", "preserve"));
        writer.write_event(Event::Start(t))?;
        writer.write_event(Event::Text(BytesText::new(replacement)))?;
        writer.write_event(Event::End(BytesEnd::new("w:t")))?;
        writer.write_event(Event::End(BytesEnd::new("w:r")))?;
        writer.write_event(Event::End(BytesEnd::new("w:p")))?;
        Ok(())
    }
}

fn parse_body(xml: &str) -> Result<Vec<Node>, DocxError> {
    let mut reader = Reader::from_str(xml);
    let mut nodes = Vec::new();
    let mut raw: Vec<Event<'static>> = Vec::new();
    let mut para: Option<Vec<Event<'static>>> = None;

    loop {
        let ev = reader.read_event()?.into_owned();
        match &ev {
            Event::Eof => break,
            Event::Start(e) if e.name().as_ref() == b"w:p" && para.is_none() => {
                if !raw.is_empty() {
                    nodes.push(Node::Raw(std::mem::take(&mut raw)));
                }
                para = Some(vec![ev]);
            }
            Event::End(e) if e.name().as_ref() == b"w:p" => match para.take() {
                Some(mut events) => {
                    events.push(ev);
                    nodes.push(Node::Paragraph(Paragraph::from_events(events)));
                }
                None => raw.push(ev),
            },
            _ => match para.as_mut() {
                Some(events) => events.push(ev),
                None => raw.push(ev),
            },
        }
    }
    if !raw.is_empty() {
        nodes.push(Node::Raw(raw));
    }
    Ok(nodes)
}

fn concat_text(events: &[Event<'static>]) -> String {
    let mut text = String::new();
    let mut in_t = false;
    for ev in events {
        match ev {
            Event::Start(e) if e.name().as_ref() == b"w:t" => in_t = true,
            Event::End(e) if e.name().as_ref() == b"w:t" => in_t = false,
            Event::Text(t) if in_t => {
                text.push_str(&t.unescape().unwrap_or_default());
            }
            _ => {}
        }
    }
    text
}

/// First `<w:pPr>` subtree of the paragraph, attributes and all.
fn paragraph_properties(events: &[Event<'static>]) -> Option<Vec<Event<'static>>> {
    subtree_after(events, b"w:pPr", 0)
}

/// The `<w:rPr>` subtree of the paragraph's first real run. The run
/// properties inside `<w:pPr>` (paragraph-mark style) do not count.
fn first_run_properties(events: &[Event<'static>]) -> Option<Vec<Event<'static>>> {
    let mut skip_depth = 0usize;
    for (i, ev) in events.iter().enumerate() {
        match ev {
            Event::Start(e) if e.name().as_ref() == b"w:pPr" => skip_depth += 1,
            Event::Start(_) if skip_depth > 0 => skip_depth += 1,
            Event::End(_) if skip_depth > 0 => skip_depth -= 1,
            Event::Start(e) if e.name().as_ref() == b"w:r" => {
                // Bound the search to this run: a later run's rPr must
                // not stand in for an unstyled first run.
                let mut depth = 1usize;
                let mut end = events.len();
                for (j, inner) in events.iter().enumerate().skip(i + 1) {
                    match inner {
                        Event::Start(_) => depth += 1,
                        Event::End(_) => {
                            depth -= 1;
                            if depth == 0 {
                                end = j;
                                break;
                            }
                        }
                        _ => {}
                    }
                }
                return subtree_after(&events[i..end], b"w:rPr", 0);
            }
            _ => {}
        }
    }
    None
}

/// Copy the first subtree rooted at `tag` found at or after `from`.
fn subtree_after(
    events: &[Event<'static>],
    tag: &[u8],
    from: usize,
) -> Option<Vec<Event<'static>>> {
    let mut out: Vec<Event<'static>> = Vec::new();
    let mut depth = 0usize;
    for ev in events.iter().skip(from) {
        if out.is_empty() {
            match ev {
                Event::Empty(e) if e.name().as_ref() == tag => {
                    return Some(vec![ev.clone()]);
                }
                Event::Start(e) if e.name().as_ref() == tag => {
                    out.push(ev.clone());
                    depth = 1;
                }
                _ => {}
            }
        } else {
            out.push(ev.clone());
            match ev {
                Event::Start(_) => depth += 1,
                Event::End(_) => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(out);
                    }
                }
                _ => {}
            }
        }
    }
    None
}

fn parse_run_style(rpr: &[Event<'static>]) -> RunStyle {
    let mut style = RunStyle::default();
    let mut east_asia: Option<String> = None;
    let mut ascii: Option<String> = None;
    for ev in rpr {
        let e = match ev {
            Event::Start(e) | Event::Empty(e) => e,
            _ => continue,
        };
        match e.name().as_ref() {
            b"w:rFonts" => {
                for attr in e.attributes().flatten() {
                    let value = String::from_utf8_lossy(&attr.value).into_owned();
                    match attr.key.as_ref() {
                        b"w:eastAsia" => east_asia = Some(value),
                        b"w:ascii" => ascii = Some(value),
                        _ => {}
                    }
                }
            }
            b"w:sz" => {
                for attr in e.attributes().flatten() {
                    if attr.key.as_ref() == b"w:val" {
                        style.size_half_points =
                            String::from_utf8_lossy(&attr.value).parse().ok();
                    }
                }
            }
            b"w:b" => {
                let mut on = true;
                for attr in e.attributes().flatten() {
                    if attr.key.as_ref() == b"w:val" {
                        let v = String::from_utf8_lossy(&attr.value).into_owned();
                        on = v != "0" && v != "false" && v != "none";
                    }
                }
                style.bold = on;
            }
            _ => {}
        }
    }
    style.font = east_asia.or(ascii);
    style
}

fn write_default_run_properties<W: Write>(writer: &mut Writer<W>) -> Result<(), DocxError> {
    writer.write_event(Event::Start(BytesStart::new("w:rPr")))?;
    let mut fonts = BytesStart::new("w:rFonts");
    fonts.push_attribute(("w:ascii", DEFAULT_RUN_FONT));
    fonts.push_attribute(("w:eastAsia", DEFAULT_RUN_FONT));
    writer.write_event(Event::Empty(fonts))?;
    let mut sz = BytesStart::new("w:sz");
    sz.push_attribute(("w:val", DEFAULT_RUN_SIZE_HALF_POINTS.to_string().as_str()));
    writer.write_event(Event::Empty(sz))?;
    writer.write_event(Event::End(BytesEnd::new("w:rPr")))?;
    Ok(())
}
