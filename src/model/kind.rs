//! Source kinds and target formats.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tabular encodings accepted on upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabularFormat {
    /// Comma-separated values
    Csv,
    /// Office Open XML workbook
    Xlsx,
}

/// Raster encodings accepted on upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageEncoding {
    /// Portable Network Graphics
    Png,
    /// JPEG
    Jpeg,
}

impl ImageEncoding {
    /// The codec used to decode this encoding.
    pub fn image_format(self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Jpeg => image::ImageFormat::Jpeg,
        }
    }
}

impl fmt::Display for ImageEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Png => write!(f, "PNG"),
            Self::Jpeg => write!(f, "JPEG"),
        }
    }
}

/// What an uploaded file is, decided once from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "format")]
pub enum SourceKind {
    /// CSV or Excel spreadsheet
    Tabular(TabularFormat),
    /// PDF document
    DocumentPdf,
    /// Word (.docx) document
    DocumentWord,
    /// PNG or JPEG image
    Image(ImageEncoding),
}

impl SourceKind {
    /// All kinds, in the order the classifier lists them.
    pub const ALL: [SourceKind; 6] = [
        SourceKind::Tabular(TabularFormat::Csv),
        SourceKind::Tabular(TabularFormat::Xlsx),
        SourceKind::DocumentPdf,
        SourceKind::DocumentWord,
        SourceKind::Image(ImageEncoding::Png),
        SourceKind::Image(ImageEncoding::Jpeg),
    ];

    /// File extensions (lowercase, no dot) recognised for this kind.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Tabular(TabularFormat::Csv) => &["csv"],
            Self::Tabular(TabularFormat::Xlsx) => &["xlsx"],
            Self::DocumentPdf => &["pdf"],
            Self::DocumentWord => &["docx"],
            Self::Image(ImageEncoding::Png) => &["png"],
            Self::Image(ImageEncoding::Jpeg) => &["jpg"],
        }
    }

    /// The target format that would reproduce this kind, if any.
    ///
    /// Requesting that target is a no-op conversion. JPEG has no target
    /// counterpart.
    pub fn canonical_target(self) -> Option<TargetFormat> {
        match self {
            Self::Tabular(TabularFormat::Csv) => Some(TargetFormat::Csv),
            Self::Tabular(TabularFormat::Xlsx) => Some(TargetFormat::Xlsx),
            Self::DocumentPdf => Some(TargetFormat::Pdf),
            Self::DocumentWord => Some(TargetFormat::Word),
            Self::Image(ImageEncoding::Png) => Some(TargetFormat::Png),
            Self::Image(ImageEncoding::Jpeg) => None,
        }
    }

    /// Check whether this is a tabular source.
    pub fn is_tabular(self) -> bool {
        matches!(self, Self::Tabular(_))
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tabular(TabularFormat::Csv) => write!(f, "CSV"),
            Self::Tabular(TabularFormat::Xlsx) => write!(f, "Excel"),
            Self::DocumentPdf => write!(f, "PDF"),
            Self::DocumentWord => write!(f, "Word"),
            Self::Image(encoding) => write!(f, "{}", encoding),
        }
    }
}

/// Formats a file can be converted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetFormat {
    Csv,
    Xlsx,
    Pdf,
    Word,
    Png,
}

impl TargetFormat {
    /// All targets.
    pub const ALL: [TargetFormat; 5] = [
        TargetFormat::Csv,
        TargetFormat::Xlsx,
        TargetFormat::Pdf,
        TargetFormat::Word,
        TargetFormat::Png,
    ];

    /// Canonical file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
            Self::Pdf => "pdf",
            Self::Word => "docx",
            Self::Png => "png",
        }
    }

    /// MIME type of the serialized output.
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Self::Pdf => "application/pdf",
            Self::Word => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Self::Png => "image/png",
        }
    }

    /// Parse a user-facing label ("Excel", "xlsx", "word", ...).
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" | "excel" => Some(Self::Xlsx),
            "pdf" => Some(Self::Pdf),
            "word" | "docx" => Some(Self::Word),
            "png" => Some(Self::Png),
            _ => None,
        }
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv => write!(f, "CSV"),
            Self::Xlsx => write!(f, "Excel"),
            Self::Pdf => write!(f, "PDF"),
            Self::Word => write!(f, "Word"),
            Self::Png => write!(f, "PNG"),
        }
    }
}
