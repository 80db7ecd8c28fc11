//! Data model shared by extraction, transformation and conversion.
//!
//! Every upload is described by a [`SourceKind`] and extracted into one
//! [`ExtractedContent`] variant; conversions produce an [`OutputArtifact`].

mod artifact;
mod content;
mod kind;
mod table;

pub use artifact::{OutputArtifact, Upload};
pub use content::{ExtractedContent, ImageContent, TextContent};
pub use kind::{ImageEncoding, SourceKind, TabularFormat, TargetFormat};
pub use table::{format_number, Cell, Column, ColumnType, Table};
