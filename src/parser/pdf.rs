//! PDF text extraction using lopdf.

use lopdf::Document as LopdfDocument;

use crate::detect::pdf_version;
use crate::error::{Error, Result};
use crate::model::{SourceKind, TextContent};

use super::options::{ErrorMode, ExtractOptions};

const KIND: SourceKind = SourceKind::DocumentPdf;

/// Extract the text of every page, in page order.
///
/// Each page contributes its lines; a page without extractable text
/// contributes one empty line so no page is skipped.
pub(crate) fn parse_pdf(data: &[u8], options: &ExtractOptions) -> Result<TextContent> {
    let version = pdf_version(data).ok_or_else(|| Error::parse(KIND, "missing %PDF header"))?;

    let doc = LopdfDocument::load_mem(data)?;
    if doc.is_encrypted() {
        return Err(Error::parse(KIND, "document is encrypted"));
    }

    let pages = doc.get_pages();
    log::debug!("Loaded PDF {} with {} pages", version, pages.len());

    let mut lines = Vec::new();
    for page_num in pages.keys() {
        let text = match extract_page_text(&doc, *page_num) {
            Ok(text) => text,
            Err(e) => {
                if options.error_mode == ErrorMode::Strict {
                    return Err(e);
                }
                log::warn!("Failed to extract text from page {}: {}", page_num, e);
                String::new()
            }
        };
        lines.extend(page_lines(&text));
    }

    Ok(TextContent::new(lines))
}

/// Extract text from a page.
fn extract_page_text(doc: &LopdfDocument, page_num: u32) -> Result<String> {
    doc.extract_text(&[page_num])
        .map_err(|e| Error::parse(KIND, format!("page {}: {}", page_num, e)))
}

/// Split one page's text into lines, dropping the trailing newline lopdf
/// emits after each text object.
fn page_lines(text: &str) -> Vec<String> {
    let trimmed = text.trim_end_matches(['\n', '\r']);
    TextContent::from_text(trimmed).lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_lines() {
        assert_eq!(page_lines("a\nb\n"), vec!["a", "b"]);
        assert_eq!(page_lines(""), vec![""]);
        assert_eq!(page_lines("\n"), vec![""]);
    }

    #[test]
    fn test_blank_page_keeps_its_place() {
        use crate::convert::convert;
        use crate::model::{ExtractedContent, TargetFormat};
        use crate::render::RenderOptions;

        let per_page = RenderOptions::default().lines_per_page();
        let mut lines: Vec<String> = (0..per_page).map(|i| format!("a{}", i)).collect();
        lines.extend(std::iter::repeat(String::new()).take(per_page));
        lines.push("z".to_string());

        let artifact = convert(
            &ExtractedContent::Text(TextContent::new(lines)),
            SourceKind::DocumentWord,
            TargetFormat::Pdf,
            "pages.docx",
        )
        .unwrap();
        assert_eq!(LopdfDocument::load_mem(&artifact.bytes).unwrap().get_pages().len(), 3);

        let text = parse_pdf(&artifact.bytes, &ExtractOptions::default()).unwrap();
        let mut expected: Vec<String> = (0..per_page).map(|i| format!("a{}", i)).collect();
        expected.push(String::new());
        expected.push("z".to_string());
        assert_eq!(text.lines, expected);
    }

    #[test]
    fn test_rejects_non_pdf() {
        let result = parse_pdf(b"<html></html>", &ExtractOptions::default());
        assert!(matches!(result, Err(Error::Parse { .. })));
    }

    #[test]
    fn test_rejects_truncated_pdf() {
        let result = parse_pdf(b"%PDF-1.7\n1 0 obj\n<<", &ExtractOptions::default());
        assert!(result.is_err());
    }
}
