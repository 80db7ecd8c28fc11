//! Word document (.docx) paragraph extraction.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{Error, Result};
use crate::model::{SourceKind, TextContent};

use super::ooxml::Package;

const KIND: SourceKind = SourceKind::DocumentWord;
const MAIN_DOCUMENT: &str = "word/document.xml";

/// Extract paragraph text from a Word document, one line per paragraph.
///
/// Runs are concatenated; `w:tab` becomes a tab and `w:br`/`w:cr` start a
/// new line.
pub(crate) fn parse_docx(data: &[u8]) -> Result<TextContent> {
    let mut package = Package::open(data, KIND)?;
    let xml = package.required_part(MAIN_DOCUMENT)?;
    let paragraphs = parse_paragraphs(&xml)?;

    log::debug!("Parsed Word document: {} paragraphs", paragraphs.len());
    Ok(TextContent::from_text(&paragraphs.join("\n")))
}

/// Collect the text of every `w:p` in document order.
///
/// Paragraphs can nest, e.g. inside a text box (`w:txbxContent`). The outer
/// paragraph keeps its own text and the inner one becomes a separate
/// paragraph, ordered by where each starts.
fn parse_paragraphs(xml: &[u8]) -> Result<Vec<String>> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut paragraphs: Vec<String> = Vec::new();
    // Indexes into `paragraphs` of the paragraphs still open, innermost last.
    let mut open: Vec<usize> = Vec::new();
    let mut in_text = false;
    let mut in_properties = false;

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"p" => {
                    open.push(paragraphs.len());
                    paragraphs.push(String::new());
                }
                b"t" => in_text = !open.is_empty(),
                b"pPr" => in_properties = true,
                _ => {}
            },
            Ok(Event::Empty(_)) if in_properties => {}
            Ok(Event::Empty(e)) => {
                let current = open.last().copied();
                match (e.local_name().as_ref(), current) {
                    (b"p", _) => paragraphs.push(String::new()),
                    (b"tab", Some(index)) => paragraphs[index].push('\t'),
                    (b"br" | b"cr", Some(index)) => paragraphs[index].push('\n'),
                    _ => {}
                }
            }
            Ok(Event::Text(e)) if in_text => {
                if let Some(&index) = open.last() {
                    paragraphs[index].push_str(&e.unescape().map_err(|e| Error::parse(KIND, e))?);
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"pPr" => in_properties = false,
                b"p" => {
                    open.pop();
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::parse(KIND, e)),
            _ => {}
        }
    }

    Ok(paragraphs)
}
