//! Extracted content: exactly one of table, text, or image.

use super::{ImageEncoding, SourceKind, Table};
use image::DynamicImage;
use serde::{Deserialize, Serialize};

/// Normalized content of one uploaded file.
///
/// The variant is fixed by the file's [`SourceKind`] at extraction time and
/// never changes afterwards.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractedContent {
    /// Spreadsheet rows
    Table(Table),
    /// Document text
    Text(TextContent),
    /// Decoded raster image
    Image(ImageContent),
}

impl ExtractedContent {
    /// Short name of the variant, for messages and logs.
    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::Table(_) => "table",
            Self::Text(_) => "text",
            Self::Image(_) => "image",
        }
    }

    /// Check whether this variant is the one `kind` extracts to.
    pub fn matches_kind(&self, kind: SourceKind) -> bool {
        matches!(
            (self, kind),
            (Self::Table(_), SourceKind::Tabular(_))
                | (Self::Text(_), SourceKind::DocumentPdf | SourceKind::DocumentWord)
                | (Self::Image(_), SourceKind::Image(_))
        )
    }

    /// Get the table, if this is tabular content.
    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Self::Table(t) => Some(t),
            _ => None,
        }
    }

    /// Get the text, if this is document content.
    pub fn as_text(&self) -> Option<&TextContent> {
        match self {
            Self::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Get the image, if this is image content.
    pub fn as_image(&self) -> Option<&ImageContent> {
        match self {
            Self::Image(i) => Some(i),
            _ => None,
        }
    }
}

/// Document text as an ordered list of lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextContent {
    /// Lines in reading order
    pub lines: Vec<String>,
}

impl TextContent {
    /// Create text content from lines.
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// Split a block of text on newlines. A trailing `\r` on a line is dropped.
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text
                .split('\n')
                .map(|l| l.strip_suffix('\r').unwrap_or(l).to_string())
                .collect(),
        }
    }

    /// Number of lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Check if there is no visible text.
    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(|l| l.trim().is_empty())
    }

    /// Lines joined with newlines.
    pub fn plain_text(&self) -> String {
        self.lines.join("\n")
    }
}

/// A decoded image and the encoding it was uploaded in.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageContent {
    /// Decoded pixels
    pub pixels: DynamicImage,

    /// Original encoding
    pub encoding: ImageEncoding,
}

impl ImageContent {
    /// Wrap decoded pixels.
    pub fn new(pixels: DynamicImage, encoding: ImageEncoding) -> Self {
        Self { pixels, encoding }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}
