//! Content extraction: raw upload bytes to [`ExtractedContent`].

mod delimited;
mod ooxml;
mod options;
mod pdf;
mod raster;
mod word;
mod xlsx;

pub use options::{ErrorMode, ExtractOptions};

use crate::error::Result;
use crate::model::{ExtractedContent, SourceKind, TabularFormat};

/// Extract content from bytes using default options.
///
/// # Example
///
/// ```
/// use filemorph::{extract, ExtractedContent, SourceKind, TabularFormat};
///
/// let content = extract(b"a,b\n1,2\n", SourceKind::Tabular(TabularFormat::Csv)).unwrap();
/// assert!(matches!(content, ExtractedContent::Table(_)));
/// ```
pub fn extract(data: &[u8], kind: SourceKind) -> Result<ExtractedContent> {
    extract_with_options(data, kind, &ExtractOptions::default())
}

/// Extract content from bytes with custom options.
///
/// The variant of the result is fixed by `kind`: tabular kinds yield a
/// table, documents yield text, images yield decoded pixels.
pub fn extract_with_options(
    data: &[u8],
    kind: SourceKind,
    options: &ExtractOptions,
) -> Result<ExtractedContent> {
    let content = match kind {
        SourceKind::Tabular(TabularFormat::Csv) => {
            ExtractedContent::Table(delimited::parse_csv(data, options)?)
        }
        SourceKind::Tabular(TabularFormat::Xlsx) => {
            ExtractedContent::Table(xlsx::parse_xlsx(data, options)?)
        }
        SourceKind::DocumentPdf => ExtractedContent::Text(pdf::parse_pdf(data, options)?),
        SourceKind::DocumentWord => ExtractedContent::Text(word::parse_docx(data)?),
        SourceKind::Image(encoding) => {
            ExtractedContent::Image(raster::parse_image(data, encoding)?)
        }
    };
    Ok(content)
}
