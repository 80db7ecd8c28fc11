//! # filemorph
//!
//! Multi-format file conversion for Rust.
//!
//! An upload is classified by its file name, its content is extracted into
//! one normalized form (a table, document text, or a decoded image), tables
//! can be cleaned on request, and the result is written in another format.
//!
//! ## Quick Start
//!
//! ```no_run
//! use filemorph::{convert_file, TargetFormat};
//!
//! fn main() -> filemorph::Result<()> {
//!     let artifact = convert_file("sales.csv", TargetFormat::Xlsx)?;
//!     std::fs::write(&artifact.filename, &artifact.bytes)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Conversions
//!
//! | Source | Targets |
//! |---|---|
//! | CSV | Excel, PDF, Word |
//! | Excel | CSV, PDF, Word |
//! | PDF | CSV, Excel (tabular text only), Word |
//! | Word | CSV, Excel (tabular text only), PDF |
//! | PNG | PDF |
//! | JPEG | PDF, PNG |

pub mod batch;
pub mod convert;
pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod preview;
pub mod render;
pub mod transform;

// Re-export commonly used types
pub use batch::{convert_batch, convert_batch_parallel, ConversionRequest, FileOutcome};
pub use convert::{
    convert, convert_with_options, legal_targets, output_file_name, Capability,
    ContentSerializer, ConversionRegistry, ConvertOptions,
};
pub use detect::{classify, supported_extensions};
pub use error::{Error, Result};
pub use model::{
    Cell, Column, ColumnType, ExtractedContent, ImageContent, ImageEncoding, OutputArtifact,
    SourceKind, Table, TabularFormat, TargetFormat, TextContent, Upload,
};
pub use parser::{extract, extract_with_options, ErrorMode, ExtractOptions};
pub use preview::{preview, Preview, DEFAULT_PREVIEW_ROWS};
pub use render::{JsonFormat, PageSize, RenderOptions};
pub use transform::{fill_missing_numeric, project_columns, remove_duplicates, TransformOptions};

use std::path::Path;

/// Read, classify and extract a file.
///
/// # Example
///
/// ```no_run
/// use filemorph::open_file;
///
/// let file = open_file("report.pdf").unwrap();
/// println!("{}", file.preview(5).caption());
/// ```
pub fn open_file<P: AsRef<Path>>(path: P) -> Result<LoadedFile> {
    Filemorph::new().open_path(path)
}

/// Convert a file on disk to `target` with default options.
pub fn convert_file<P: AsRef<Path>>(path: P, target: TargetFormat) -> Result<OutputArtifact> {
    open_file(path)?.convert(target)
}

/// Builder for extracting and converting uploads.
///
/// # Example
///
/// ```no_run
/// use filemorph::{Filemorph, TargetFormat, TransformOptions};
///
/// let artifact = Filemorph::new()
///     .strict()
///     .with_sheet_name("Cleaned")
///     .open_path("survey.csv")?
///     .transform(&TransformOptions::new().remove_duplicates(true))?
///     .convert(TargetFormat::Xlsx)?;
/// # Ok::<(), filemorph::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Filemorph {
    extract_options: ExtractOptions,
    convert_options: ConvertOptions,
}

impl Filemorph {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail on the first unreadable PDF page.
    pub fn strict(mut self) -> Self {
        self.extract_options = self.extract_options.strict();
        self
    }

    /// Set the CSV input delimiter.
    pub fn with_csv_delimiter(mut self, delimiter: u8) -> Self {
        self.extract_options = self.extract_options.with_csv_delimiter(delimiter);
        self
    }

    /// Set which worksheet of a workbook is read.
    pub fn with_sheet_index(mut self, index: usize) -> Self {
        self.extract_options = self.extract_options.with_sheet_index(index);
        self
    }

    /// Set the worksheet name of Excel output.
    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.convert_options.render = self.convert_options.render.with_sheet_name(name);
        self
    }

    /// Set rendering options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.convert_options.render = options;
        self
    }

    /// Classify and extract an upload.
    pub fn open(self, upload: &Upload) -> Result<LoadedFile> {
        let kind = classify(&upload.name)?;
        let content = extract_with_options(&upload.bytes, kind, &self.extract_options)?;
        log::debug!("Opened {} as {} content", upload.name, content.variant_name());
        Ok(LoadedFile {
            name: upload.name.clone(),
            kind,
            content,
            convert_options: self.convert_options,
        })
    }

    /// Read a file from disk, then classify and extract it.
    pub fn open_path<P: AsRef<Path>>(self, path: P) -> Result<LoadedFile> {
        let upload = Upload::from_path(path)?;
        self.open(&upload)
    }
}

/// An extracted upload, ready to preview, clean or convert.
#[derive(Debug, Clone)]
pub struct LoadedFile {
    name: String,
    kind: SourceKind,
    content: ExtractedContent,
    convert_options: ConvertOptions,
}

impl LoadedFile {
    /// Upload file name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Kind decided from the file name.
    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    /// Extracted content.
    pub fn content(&self) -> &ExtractedContent {
        &self.content
    }

    /// Take ownership of the extracted content.
    pub fn into_content(self) -> ExtractedContent {
        self.content
    }

    /// Targets this file can be converted to.
    pub fn legal_targets(&self) -> Vec<TargetFormat> {
        legal_targets(self.kind)
    }

    /// Preview with up to `rows` table rows.
    pub fn preview(&self, rows: usize) -> Preview {
        preview(&self.content, rows)
    }

    /// Apply table cleaning. Content that is not a table is returned as is.
    pub fn transform(mut self, options: &TransformOptions) -> Result<Self> {
        if let ExtractedContent::Table(ref table) = self.content {
            self.content = ExtractedContent::Table(transform::apply(table, options)?);
        } else if !options.is_noop() {
            log::debug!("{} has no table to clean", self.name);
        }
        Ok(self)
    }

    /// Convert to `target`.
    pub fn convert(&self, target: TargetFormat) -> Result<OutputArtifact> {
        convert_with_options(
            &self.content,
            self.kind,
            target,
            &self.name,
            &self.convert_options,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_pipeline() {
        let upload = Upload::new("people.csv", b"name;age\nann;31\nann;31\nbob;\n".to_vec());
        let file = Filemorph::new()
            .with_csv_delimiter(b';')
            .open(&upload)
            .unwrap()
            .transform(
                &TransformOptions::new()
                    .remove_duplicates(true)
                    .fill_missing_numeric(true),
            )
            .unwrap();

        assert_eq!(file.kind(), SourceKind::Tabular(TabularFormat::Csv));
        assert_eq!(
            file.legal_targets(),
            vec![TargetFormat::Xlsx, TargetFormat::Pdf, TargetFormat::Word]
        );

        let table = file.content().as_table().unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.columns[1].cells[1], Cell::Number(31.0));

        let artifact = file.convert(TargetFormat::Xlsx).unwrap();
        assert_eq!(artifact.filename, "people.xlsx");
    }

    #[test]
    fn test_open_empty_docx_fails() {
        let upload = Upload::new("a.docx", Vec::new());
        assert!(Filemorph::new().open(&upload).is_err());
    }

    #[test]
    fn test_open_unsupported() {
        let upload = Upload::new("a.gif", vec![0u8; 4]);
        assert!(matches!(
            Filemorph::new().open(&upload),
            Err(Error::UnsupportedFormat { .. })
        ));
    }
}
