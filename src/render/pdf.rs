//! PDF output using lopdf.
//!
//! Text becomes paginated pages set in Helvetica; an image becomes a single
//! page the size of the image with the pixels embedded as an RGB XObject.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

use crate::convert::ContentSerializer;
use crate::error::{Error, Result};
use crate::model::{ExtractedContent, ImageContent, TargetFormat};

use super::options::RenderOptions;
use super::unexpected_content;

const TARGET: TargetFormat = TargetFormat::Pdf;
const PDF_VERSION: &str = "1.5";
const FONT_NAME: &str = "F1";
const IMAGE_NAME: &str = "Im1";

/// Writes text or image content as a PDF document.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfSerializer;

impl ContentSerializer for PdfSerializer {
    fn name(&self) -> &'static str {
        "pdf"
    }

    fn target(&self) -> TargetFormat {
        TARGET
    }

    fn serialize(&self, content: &ExtractedContent, options: &RenderOptions) -> Result<Vec<u8>> {
        match content {
            ExtractedContent::Text(text) => write_text_pdf(&text.lines, options),
            ExtractedContent::Image(image) => write_image_pdf(image),
            other => Err(unexpected_content(TARGET, "text or image", other)),
        }
    }
}

/// Lay out one line per baseline, top to bottom, starting a new page when
/// the current one is full. Empty lines take up a baseline but draw nothing.
pub(crate) fn write_text_pdf(lines: &[String], options: &RenderOptions) -> Result<Vec<u8>> {
    let replaced = unencodable_count(lines);
    if replaced > 0 {
        log::warn!(
            "{} characters outside Latin-1 are written as '?' in the PDF",
            replaced
        );
    }

    let mut doc = Document::with_version(PDF_VERSION);
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            FONT_NAME => font_id,
        },
    });

    let per_page = options.lines_per_page();
    let top = options.page_size.height - options.margin - options.font_size;

    let mut chunks: Vec<&[String]> = lines.chunks(per_page).collect();
    if chunks.is_empty() {
        chunks.push(&[]);
    }

    let mut kids: Vec<Object> = Vec::with_capacity(chunks.len());
    for chunk in &chunks {
        let mut operations = Vec::new();
        for (row, line) in chunk.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let y = top - row as f32 * options.line_height;
            operations.extend([
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec![FONT_NAME.into(), options.font_size.into()]),
                Operation::new("Td", vec![options.margin.into(), y.into()]),
                Operation::new("Tj", vec![Object::string_literal(encode_win_ansi(line))]),
                Operation::new("ET", vec![]),
            ]);
        }
        let page_id = add_page(&mut doc, pages_id, resources_id, operations)?;
        kids.push(page_id.into());
    }

    let page_count = kids.len();
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => page_count as i64,
        "MediaBox" => media_box(options.page_size.width, options.page_size.height),
    };
    let bytes = finish(doc, pages_id, pages)?;

    log::debug!(
        "Wrote PDF: {} lines on {} pages",
        lines.len(),
        page_count
    );
    Ok(bytes)
}

/// One page at 72 dpi holding the whole image. Alpha is dropped.
pub(crate) fn write_image_pdf(image: &ImageContent) -> Result<Vec<u8>> {
    let rgb = image.pixels.to_rgb8();
    let (width, height) = rgb.dimensions();
    if width == 0 || height == 0 {
        return Err(Error::serialization(TARGET, "image has no pixels"));
    }

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(rgb.as_raw())
        .map_err(|e| Error::serialization(TARGET, e))?;
    let data = encoder
        .finish()
        .map_err(|e| Error::serialization(TARGET, e))?;

    let mut doc = Document::with_version(PDF_VERSION);
    let pages_id = doc.new_object_id();

    let image_stream = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "FlateDecode",
        },
        data,
    )
    .with_compression(false);
    let image_id = doc.add_object(image_stream);
    let resources_id = doc.add_object(dictionary! {
        "XObject" => dictionary! {
            IMAGE_NAME => image_id,
        },
    });

    let (w, h) = (width as f32, height as f32);
    let operations = vec![
        Operation::new("q", vec![]),
        Operation::new(
            "cm",
            vec![w.into(), 0.into(), 0.into(), h.into(), 0.into(), 0.into()],
        ),
        Operation::new("Do", vec![IMAGE_NAME.into()]),
        Operation::new("Q", vec![]),
    ];
    let page_id = add_page(&mut doc, pages_id, resources_id, operations)?;

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![Object::Reference(page_id)],
        "Count" => 1,
        "MediaBox" => media_box(w, h),
    };
    let bytes = finish(doc, pages_id, pages)?;

    log::debug!("Wrote PDF: {}x{} {} image", width, height, image.encoding);
    Ok(bytes)
}

fn add_page(
    doc: &mut Document,
    pages_id: ObjectId,
    resources_id: ObjectId,
    operations: Vec<Operation>,
) -> Result<ObjectId> {
    let content = Content { operations };
    let encoded = content
        .encode()
        .map_err(|e| Error::serialization(TARGET, e))?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
    Ok(doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Resources" => resources_id,
        "Contents" => content_id,
    }))
}

fn media_box(width: f32, height: f32) -> Vec<Object> {
    vec![0.into(), 0.into(), width.into(), height.into()]
}

/// Attach the page tree and catalog, compress, and write the file.
fn finish(mut doc: Document, pages_id: ObjectId, pages: Dictionary) -> Result<Vec<u8>> {
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| Error::serialization(TARGET, e))?;
    Ok(buffer)
}

/// Map a line onto WinAnsi bytes. Tabs are kept; characters outside
/// Latin-1 and control characters become `?`.
fn encode_win_ansi(line: &str) -> Vec<u8> {
    line.chars().map(|c| win_ansi_byte(c).unwrap_or(b'?')).collect()
}

fn win_ansi_byte(c: char) -> Option<u8> {
    match c as u32 {
        0x09 => Some(b'\t'),
        0x20..=0x7E | 0xA0..=0xFF => Some(c as u32 as u8),
        _ => None,
    }
}

/// Number of characters the built-in font cannot show.
fn unencodable_count(lines: &[String]) -> usize {
    lines
        .iter()
        .flat_map(|line| line.chars())
        .filter(|c| win_ansi_byte(*c).is_none())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ImageEncoding, SourceKind, TextContent};
    use crate::parser::extract;
    use image::{DynamicImage, Rgba, RgbaImage};

    #[test]
    fn test_encode_win_ansi() {
        assert_eq!(encode_win_ansi("abc"), b"abc");
        assert_eq!(encode_win_ansi("caf\u{e9}"), vec![b'c', b'a', b'f', 0xE9]);
        assert_eq!(encode_win_ansi("\u{4e2d}\u{1}"), b"??");
        assert_eq!(encode_win_ansi("a\tb"), b"a\tb");
    }

    #[test]
    fn test_unencodable_count() {
        let lines = vec!["plain caf\u{e9}".to_string(), "\u{4e2d}\u{6587} ok".to_string()];
        assert_eq!(unencodable_count(&lines), 2);
        assert_eq!(unencodable_count(&[]), 0);
    }

    #[test]
    fn test_text_pdf_reads_back() {
        let lines = vec![
            "First paragraph".to_string(),
            "Second paragraph".to_string(),
            "Third paragraph".to_string(),
        ];
        let bytes = write_text_pdf(&lines, &RenderOptions::default()).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let content = extract(&bytes, SourceKind::DocumentPdf).unwrap();
        assert_eq!(content.as_text(), Some(&TextContent::new(lines)));
    }

    #[test]
    fn test_text_pdf_paginates() {
        let options = RenderOptions::default();
        let lines: Vec<String> = (0..options.lines_per_page() * 2 + 1)
            .map(|i| format!("line {}", i))
            .collect();
        let bytes = write_text_pdf(&lines, &options).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 3);
    }

    #[test]
    fn test_empty_text_has_one_page() {
        let bytes = write_text_pdf(&[], &RenderOptions::default()).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_image_pdf() {
        let pixels = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 3, Rgba([255, 0, 0, 255])));
        let image = ImageContent::new(pixels, ImageEncoding::Png);
        let bytes = write_image_pdf(&image).unwrap();

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);

        let xobject = doc
            .objects
            .values()
            .find_map(|object| match object {
                Object::Stream(stream)
                    if stream.dict.get(b"Subtype").and_then(Object::as_name).ok()
                        == Some(b"Image".as_slice()) =>
                {
                    Some(stream)
                }
                _ => None,
            })
            .unwrap();
        assert_eq!(xobject.dict.get(b"Width").unwrap().as_i64().unwrap(), 4);
        assert_eq!(xobject.dict.get(b"Height").unwrap().as_i64().unwrap(), 3);
    }
}
