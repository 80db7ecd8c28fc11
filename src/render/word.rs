//! Word document (.docx) output.

use quick_xml::escape::escape;

use crate::convert::ContentSerializer;
use crate::error::Result;
use crate::model::{ExtractedContent, TargetFormat};

use super::options::RenderOptions;
use super::package::{xml_safe, PackageWriter, XML_DECLARATION};
use super::unexpected_content;

const TARGET: TargetFormat = TargetFormat::Word;

const DOCUMENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
const WORDPROCESSING_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Writes text as a document with one paragraph per line.
#[derive(Debug, Default, Clone, Copy)]
pub struct WordSerializer;

impl ContentSerializer for WordSerializer {
    fn name(&self) -> &'static str {
        "docx"
    }

    fn target(&self) -> TargetFormat {
        TARGET
    }

    fn serialize(&self, content: &ExtractedContent, _options: &RenderOptions) -> Result<Vec<u8>> {
        match content {
            ExtractedContent::Text(text) => write_docx(&text.lines),
            other => Err(unexpected_content(TARGET, "text", other)),
        }
    }
}

/// Build the document. Tabs inside a line become `w:tab` elements.
pub(crate) fn write_docx(lines: &[String]) -> Result<Vec<u8>> {
    let mut package = PackageWriter::new(TARGET);
    package.add_main_part(
        "word/document.xml",
        DOCUMENT_TYPE,
        document_xml(lines).as_bytes(),
    )?;
    let bytes = package.finish()?;

    log::debug!("Wrote Word document: {} paragraphs", lines.len());
    Ok(bytes)
}

fn document_xml(lines: &[String]) -> String {
    let mut xml = String::from(XML_DECLARATION);
    xml.push_str(&format!(r#"<w:document xmlns:w="{}"><w:body>"#, WORDPROCESSING_NS));

    for line in lines {
        let line = xml_safe(line);
        if line.is_empty() {
            xml.push_str("<w:p/>");
            continue;
        }
        xml.push_str("<w:p><w:r>");
        for (i, segment) in line.split('\t').enumerate() {
            if i > 0 {
                xml.push_str("<w:tab/>");
            }
            if !segment.is_empty() {
                xml.push_str(r#"<w:t xml:space="preserve">"#);
                xml.push_str(&escape(segment));
                xml.push_str("</w:t>");
            }
        }
        xml.push_str("</w:r></w:p>");
    }

    xml.push_str("</w:body></w:document>");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SourceKind, Table, TextContent};
    use crate::parser::extract;

    #[test]
    fn test_document_xml() {
        let xml = document_xml(&["a < b".to_string(), String::new(), "x\ty".to_string()]);
        assert!(xml.contains(r#"<w:t xml:space="preserve">a &lt; b</w:t>"#));
        assert!(xml.contains("<w:p/>"));
        assert!(xml.contains("x</w:t><w:tab/><w:t"));
    }

    #[test]
    fn test_document_reads_back() {
        let lines = vec![
            "First paragraph".to_string(),
            "".to_string(),
            "  indented & spaced  ".to_string(),
            "name\tscore".to_string(),
        ];
        let bytes = write_docx(&lines).unwrap();
        let content = extract(&bytes, SourceKind::DocumentWord).unwrap();
        assert_eq!(content.as_text(), Some(&TextContent::new(lines)));
    }

    #[test]
    fn test_rejects_table() {
        let content = ExtractedContent::Table(Table::new());
        assert!(WordSerializer
            .serialize(&content, &RenderOptions::default())
            .is_err());
    }
}
