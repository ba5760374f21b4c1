//! Raw text extraction from Word (`.docx`) documents.
//!
//! A `.docx` file is a zip container; the body lives in `word/document.xml`.
//! Only visible text is kept: runs are concatenated, tabs and line breaks
//! inside runs are preserved, and every paragraph ends with a blank line.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use crate::intake::IntakeError;

const DOCUMENT_XML: &str = "word/document.xml";

/// Extracts the plain text of a `.docx` file.
pub fn extract_text(bytes: &[u8]) -> Result<String, IntakeError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    let mut xml = Vec::new();
    archive
        .by_name(DOCUMENT_XML)
        .map_err(|_| IntakeError::MissingDocumentXml)?
        .read_to_end(&mut xml)?;

    document_xml_to_text(&xml)
}

fn document_xml_to_text(xml: &[u8]) -> Result<String, IntakeError> {
    let mut reader = Reader::from_reader(xml);
    reader.trim_text(false);

    let mut out = String::new();
    let mut buf = Vec::new();
    let mut in_run = false;
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"r" => in_run = true,
                b"t" => in_text = true,
                _ => {}
            },
            Event::End(e) => match e.local_name().as_ref() {
                b"r" => in_run = false,
                b"t" => in_text = false,
                b"p" => out.push_str("\n\n"),
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"tab" if in_run => out.push('\t'),
                b"br" | b"cr" if in_run => out.push('\n'),
                b"p" => out.push_str("\n\n"),
                _ => {}
            },
            Event::Text(t) if in_text => out.push_str(&t.unescape()?),
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(out)
}
