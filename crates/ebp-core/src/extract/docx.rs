//! DOCX text extraction.
//!
//! A DOCX file is a zip container; the body text lives in
//! `word/document.xml` as `w:t` runs grouped into `w:p` paragraphs.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::DecodeError;

use super::Decoder;

const DOCUMENT_PART: &str = "word/document.xml";

pub struct DocxDecoder;

impl Decoder for DocxDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<String, DecodeError> {
        let xml = read_document_part(bytes)?;
        paragraphs_to_text(&xml)
    }
}

fn read_document_part(bytes: &[u8]) -> Result<String, DecodeError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut part = match archive.by_name(DOCUMENT_PART) {
        Ok(part) => part,
        Err(zip::result::ZipError::FileNotFound) => {
            return Err(DecodeError::MissingPart(DOCUMENT_PART))
        }
        Err(e) => return Err(e.into()),
    };

    let mut xml = String::new();
    part.read_to_string(&mut xml)?;
    Ok(xml)
}

fn paragraphs_to_text(xml: &str) -> Result<String, DecodeError> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut in_run = false;
    let mut in_text_run = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:r" => in_run = true,
                b"w:t" => in_text_run = true,
                _ => {}
            },
            Event::End(e) => match e.name().as_ref() {
                b"w:r" => in_run = false,
                b"w:t" => in_text_run = false,
                b"w:p" => text.push('\n'),
                _ => {}
            },
            // Tab stops in `w:pPr/w:tabs` share the `w:tab` name; only run
            // content counts.
            Event::Empty(e) => match e.name().as_ref() {
                b"w:tab" if in_run => text.push('\t'),
                b"w:br" | b"w:cr" if in_run => text.push('\n'),
                b"w:p" => text.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_text_run => text.push_str(&t.unescape()?),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(text)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    /// Build a minimal DOCX whose body has one paragraph per entry.
    pub(crate) fn create_docx(paragraphs: &[&str]) -> Vec<u8> {
        let body: String = paragraphs
            .iter()
            .map(|p| format!("<w:p><w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>", p))
            .collect();
        let xml = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
             <w:body>{}</w:body></w:document>",
            body
        );
        zip_with_part(DOCUMENT_PART, &xml)
    }

    fn zip_with_part(name: &str, content: &str) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buffer);
            writer.start_file(name, SimpleFileOptions::default()).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
            writer.finish().unwrap();
        }
        buffer.into_inner()
    }

    #[test]
    fn test_extracts_paragraphs_in_order() {
        let bytes = create_docx(&["First paragraph.", "Second paragraph."]);
        let text = DocxDecoder.decode(&bytes).unwrap();
        assert_eq!(text, "First paragraph.\nSecond paragraph.\n");
    }

    #[test]
    fn test_unescapes_entities_and_handles_tabs_and_breaks() {
        let xml = "<w:document><w:body><w:p>\
                   <w:r><w:t>Fish &amp; Wildlife</w:t><w:tab/><w:t>Act</w:t></w:r>\
                   <w:r><w:br/><w:t>Section 2</w:t></w:r>\
                   </w:p></w:body></w:document>";
        let text = paragraphs_to_text(xml).unwrap();
        assert_eq!(text, "Fish & Wildlife\tAct\nSection 2\n");
    }

    #[test]
    fn test_tab_stop_definitions_are_not_content() {
        let xml = "<w:document><w:body><w:p><w:pPr><w:tabs>\
                   <w:tab w:val=\"left\" w:pos=\"720\"/>\
                   <w:tab w:val=\"right\" w:pos=\"9360\"/>\
                   </w:tabs></w:pPr>\
                   <w:r><w:t>Body</w:t><w:tab/><w:t>2</w:t></w:r></w:p></w:body></w:document>";
        assert_eq!(paragraphs_to_text(xml).unwrap(), "Body\t2\n");
    }

    #[test]
    fn test_ignores_text_outside_runs() {
        let xml = "<w:document><w:body><w:p><w:pPr>style</w:pPr>\
                   <w:r><w:t>Body</w:t></w:r></w:p></w:body></w:document>";
        assert_eq!(paragraphs_to_text(xml).unwrap(), "Body\n");
    }

    #[test]
    fn test_missing_document_part() {
        let bytes = zip_with_part("word/styles.xml", "<w:styles/>");
        let err = DocxDecoder.decode(&bytes).unwrap_err();
        assert!(matches!(err, DecodeError::MissingPart(DOCUMENT_PART)));
    }

    #[test]
    fn test_not_a_zip() {
        let err = DocxDecoder.decode(b"plain bytes, not a container").unwrap_err();
        assert!(matches!(err, DecodeError::Zip(_)));
    }

    #[test]
    fn test_malformed_markup() {
        let bytes = zip_with_part(DOCUMENT_PART, "<w:document><w:body></w:p></w:document>");
        assert!(matches!(
            DocxDecoder.decode(&bytes).unwrap_err(),
            DecodeError::Xml(_)
        ));
    }
}
