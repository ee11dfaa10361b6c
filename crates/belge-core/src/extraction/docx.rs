use crate::error::BelgeError;
use crate::extraction::TextExtractor;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::Read;
use std::path::Path;

const DOCUMENT_PART: &str = "word/document.xml";

/// Word (OOXML) extraction backend.
///
/// Reads `word/document.xml` out of the zip container and keeps the text of
/// `w:t` runs. Legacy binary `.doc` files are not zip archives and fail here.
pub struct DocxExtractor;

impl TextExtractor for DocxExtractor {
    fn extract_text(&self, path: &Path) -> Result<String, BelgeError> {
        let file = std::fs::File::open(path)?;
        let mut archive = zip::ZipArchive::new(file)?;
        let mut xml = String::new();
        archive.by_name(DOCUMENT_PART)?.read_to_string(&mut xml)?;
        document_xml_to_text(&xml)
    }

    fn backend_name(&self) -> &str {
        "docx"
    }
}

/// Flatten WordprocessingML body XML to plain text.
fn document_xml_to_text(xml: &str) -> Result<String, BelgeError> {
    let mut reader = Reader::from_str(xml);
    let mut out = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"w:t" => in_text_run = true,
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:p" => out.push('\n'),
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:tab" => out.push('\t'),
                b"w:br" | b"w:cr" => out.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_text_run => {
                out.push_str(&t.unescape().map_err(quick_xml::Error::from)?)
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const BODY: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Yayın Tarihi:</w:t></w:r><w:r><w:tab/><w:t xml:space="preserve"> 01.02.2019</w:t></w:r></w:p>
    <w:p><w:r><w:t>Revizyon Tarihi: 30.03.2020 &amp; sonrası</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

    #[test]
    fn test_document_xml_to_text() {
        let text = document_xml_to_text(BODY).unwrap();
        assert_eq!(
            text,
            "Yayın Tarihi:\t 01.02.2019\nRevizyon Tarihi: 30.03.2020 & sonrası\n"
        );
    }

    #[test]
    fn test_extract_from_zip_container() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.docx");
        let file = std::fs::File::create(&path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        zip.start_file(DOCUMENT_PART, zip::write::SimpleFileOptions::default())
            .unwrap();
        zip.write_all(BODY.as_bytes()).unwrap();
        zip.finish().unwrap();

        let text = DocxExtractor.extract_text(&path).unwrap();
        assert!(text.contains("Revizyon Tarihi: 30.03.2020"));
    }

    #[test]
    fn test_non_zip_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.doc");
        std::fs::write(&path, b"\xD0\xCF\x11\xE0 not a zip").unwrap();
        assert!(DocxExtractor.extract_text(&path).is_err());
    }
}
