//! PNG output.

use std::io::Cursor;

use image::ImageFormat;

use crate::convert::ContentSerializer;
use crate::error::{Error, Result};
use crate::model::{ExtractedContent, ImageContent, TargetFormat};

use super::options::RenderOptions;
use super::unexpected_content;

const TARGET: TargetFormat = TargetFormat::Png;

/// Re-encodes decoded pixels as PNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct PngSerializer;

impl ContentSerializer for PngSerializer {
    fn name(&self) -> &'static str {
        "png"
    }

    fn target(&self) -> TargetFormat {
        TARGET
    }

    fn serialize(&self, content: &ExtractedContent, _options: &RenderOptions) -> Result<Vec<u8>> {
        match content {
            ExtractedContent::Image(image) => write_png(image),
            other => Err(unexpected_content(TARGET, "image", other)),
        }
    }
}

pub(crate) fn write_png(image: &ImageContent) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .pixels
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(|e| Error::serialization(TARGET, e))?;

    log::debug!(
        "Encoded {}x{} {} image as PNG",
        image.width(),
        image.height(),
        image.encoding
    );
    Ok(buffer.into_inner())
}
