//! Raster image decoding.

use crate::error::{Error, Result};
use crate::model::{ImageContent, ImageEncoding, SourceKind};

/// Decode an image with the codec its extension calls for.
pub(crate) fn parse_image(data: &[u8], encoding: ImageEncoding) -> Result<ImageContent> {
    let pixels = image::load_from_memory_with_format(data, encoding.image_format())
        .map_err(|e| Error::parse(SourceKind::Image(encoding), e))?;

    log::debug!(
        "Decoded {} image: {}x{}",
        encoding,
        pixels.width(),
        pixels.height()
    );
    Ok(ImageContent::new(pixels, encoding))
}
