//! Previews shown after extraction: the first rows of a table, the text
//! of a document, or the size of an image.

use serde::Serialize;

use crate::model::{Cell, ColumnType, ExtractedContent, ImageEncoding};

/// Rows shown when the caller does not ask for a number.
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// Summary of extracted content.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Preview {
    /// First rows of a table
    Table {
        columns: Vec<String>,
        column_types: Vec<ColumnType>,
        rows: Vec<Vec<Cell>>,
        total_rows: usize,
    },
    /// Every line of a document
    Text { lines: Vec<String>, line_count: usize },
    /// Image dimensions and encoding
    Image {
        width: u32,
        height: u32,
        encoding: ImageEncoding,
    },
}

impl Preview {
    /// One-line description, as shown under an uploaded image.
    pub fn caption(&self) -> String {
        match self {
            Preview::Table {
                columns,
                total_rows,
                ..
            } => format!("{} rows x {} columns", total_rows, columns.len()),
            Preview::Text { line_count, .. } => format!("{} lines", line_count),
            Preview::Image {
                width,
                height,
                encoding,
            } => format!("{} image, {}x{}", encoding, width, height),
        }
    }
}

/// Build a preview. Tables show their first `rows` rows.
pub fn preview(content: &ExtractedContent, rows: usize) -> Preview {
    match content {
        ExtractedContent::Table(table) => {
            let head = table.head(rows);
            Preview::Table {
                columns: table.column_names().iter().map(|s| s.to_string()).collect(),
                column_types: table.columns.iter().map(|c| c.column_type()).collect(),
                rows: head
                    .rows()
                    .map(|row| row.into_iter().cloned().collect())
                    .collect(),
                total_rows: table.row_count(),
            }
        }
        ExtractedContent::Text(text) => Preview::Text {
            lines: text.lines.clone(),
            line_count: text.line_count(),
        },
        ExtractedContent::Image(image) => Preview::Image {
            width: image.width(),
            height: image.height(),
            encoding: image.encoding,
        },
    }
}
