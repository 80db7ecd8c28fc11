//! Serializers that write extracted content in each target format.

mod delimited;
mod json;
mod options;
mod package;
mod pdf;
mod png;
mod word;
mod xlsx;

pub use delimited::CsvSerializer;
pub use json::{to_json, JsonFormat};
pub use options::{PageSize, RenderOptions};
pub use pdf::PdfSerializer;
pub use png::PngSerializer;
pub use word::WordSerializer;
pub use xlsx::XlsxSerializer;

use crate::error::Error;
use crate::model::{ExtractedContent, TargetFormat};

/// Error for a serializer handed a content variant it cannot write.
fn unexpected_content(target: TargetFormat, expected: &str, got: &ExtractedContent) -> Error {
    Error::serialization(
        target,
        format!("expected {} content, got {}", expected, got.variant_name()),
    )
}
