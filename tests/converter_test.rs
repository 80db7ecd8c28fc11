//! Integration tests for the conversion registry and dispatcher.

use std::sync::Arc;

use filemorph::convert::{Capability, ContentSerializer, ConversionRegistry, ConvertOptions};
use filemorph::error::{Error, Result};
use filemorph::render::{CsvSerializer, RenderOptions};
use filemorph::{
    convert, legal_targets, output_file_name, Cell, ExtractedContent, ImageContent, ImageEncoding,
    SourceKind, Table, TabularFormat, TargetFormat, TextContent,
};
use image::{DynamicImage, RgbImage};

/// Mock serializer for testing.
struct MockSerializer {
    name: &'static str,
    target: TargetFormat,
}

impl MockSerializer {
    fn new(name: &'static str, target: TargetFormat) -> Self {
        Self { name, target }
    }
}

impl ContentSerializer for MockSerializer {
    fn name(&self) -> &'static str {
        self.name
    }

    fn target(&self) -> TargetFormat {
        self.target
    }

    fn serialize(&self, content: &ExtractedContent, _options: &RenderOptions) -> Result<Vec<u8>> {
        Ok(format!("{} wrote {}", self.name, content.variant_name()).into_bytes())
    }
}

/// Always fails with a non-serialization error.
struct BrokenSerializer;

impl ContentSerializer for BrokenSerializer {
    fn name(&self) -> &'static str {
        "broken"
    }

    fn target(&self) -> TargetFormat {
        TargetFormat::Word
    }

    fn serialize(&self, _content: &ExtractedContent, _options: &RenderOptions) -> Result<Vec<u8>> {
        Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full").into())
    }
}

const CSV: SourceKind = SourceKind::Tabular(TabularFormat::Csv);
const XLSX: SourceKind = SourceKind::Tabular(TabularFormat::Xlsx);
const PNG: SourceKind = SourceKind::Image(ImageEncoding::Png);
const JPEG: SourceKind = SourceKind::Image(ImageEncoding::Jpeg);

fn sample_table() -> ExtractedContent {
    ExtractedContent::Table(Table::from_rows(
        vec!["name".into(), "score".into()],
        vec![
            vec![Cell::Text("a".into()), Cell::Number(1.0)],
            vec![Cell::Text("b".into()), Cell::Missing],
        ],
    ))
}

fn sample_text() -> ExtractedContent {
    ExtractedContent::Text(TextContent::from_text("name\tscore\na\t1\nb\t2"))
}

fn sample_image(encoding: ImageEncoding) -> ExtractedContent {
    ExtractedContent::Image(ImageContent::new(
        DynamicImage::ImageRgb8(RgbImage::from_pixel(3, 2, image::Rgb([1, 2, 3]))),
        encoding,
    ))
}

fn content_for(kind: SourceKind) -> ExtractedContent {
    match kind {
        SourceKind::Tabular(_) => sample_table(),
        SourceKind::DocumentPdf | SourceKind::DocumentWord => sample_text(),
        SourceKind::Image(encoding) => sample_image(encoding),
    }
}

fn name_for(kind: SourceKind) -> String {
    format!("upload.{}", kind.extensions()[0])
}

#[test]
fn test_convert_options_builder() {
    let options = ConvertOptions::new()
        .with_render_options(RenderOptions::new().with_sheet_name("Export").with_csv_delimiter(b'\t'));

    assert_eq!(options.render.sheet_name, "Export");
    assert_eq!(options.render.csv_delimiter, b'\t');
}

#[test]
fn test_registry_new_is_empty() {
    let registry = ConversionRegistry::new();

    // Empty registry should support nothing
    assert!(registry.is_empty());
    assert!(!registry.supports(CSV, TargetFormat::Xlsx));
    assert!(registry.legal_targets(CSV).is_empty());
}

#[test]
fn test_registry_register_mock() {
    let mut registry = ConversionRegistry::new();
    registry.register(
        PNG,
        Capability::Direct,
        Arc::new(MockSerializer::new("mock-docx", TargetFormat::Word)),
    );

    assert!(registry.supports(PNG, TargetFormat::Word));
    assert_eq!(registry.legal_targets(PNG), vec![TargetFormat::Word]);

    let artifact = registry
        .convert(
            &sample_image(ImageEncoding::Png),
            PNG,
            TargetFormat::Word,
            "logo.png",
            &ConvertOptions::default(),
        )
        .unwrap();
    assert_eq!(artifact.bytes, b"mock-docx wrote image");
    assert_eq!(artifact.filename, "logo.docx");
}

#[test]
fn test_registry_still_rejects_noop() {
    let mut registry = ConversionRegistry::new();
    registry.register(CSV, Capability::Direct, Arc::new(CsvSerializer));

    let result = registry.convert(
        &sample_table(),
        CSV,
        TargetFormat::Csv,
        "a.csv",
        &ConvertOptions::default(),
    );
    assert!(matches!(result, Err(Error::NoOpConversion { .. })));
}

#[test]
fn test_codec_failures_become_serialization_errors() {
    let mut registry = ConversionRegistry::new();
    registry.register(CSV, Capability::TextProjection, Arc::new(BrokenSerializer));

    let result = registry.convert(
        &sample_table(),
        CSV,
        TargetFormat::Word,
        "a.csv",
        &ConvertOptions::default(),
    );
    match result {
        Err(Error::Serialization { target, message }) => {
            assert_eq!(target, TargetFormat::Word);
            assert!(message.contains("disk full"));
        }
        other => panic!("expected serialization error, got {:?}", other),
    }
}

#[test]
fn test_every_legal_pair_converts() {
    for kind in SourceKind::ALL {
        let content = content_for(kind);
        for target in legal_targets(kind) {
            let artifact = convert(&content, kind, target, &name_for(kind))
                .unwrap_or_else(|e| panic!("{} -> {} failed: {}", kind, target, e));

            assert!(!artifact.is_empty(), "{} -> {} is empty", kind, target);
            assert_eq!(artifact.mime_type, target.mime_type());
            assert_eq!(
                artifact.filename,
                format!("upload.{}", target.extension())
            );
        }
    }
}

#[test]
fn test_noop_for_every_kind_with_canonical_target() {
    for kind in SourceKind::ALL {
        let Some(target) = kind.canonical_target() else {
            continue;
        };
        let result = convert(&content_for(kind), kind, target, &name_for(kind));
        assert!(
            matches!(result, Err(Error::NoOpConversion { format, .. }) if format == target),
            "{} -> {}",
            kind,
            target
        );
    }
}

#[test]
fn test_unlisted_pairs_are_unsupported() {
    for kind in SourceKind::ALL {
        let legal = legal_targets(kind);
        for target in TargetFormat::ALL {
            if legal.contains(&target) || kind.canonical_target() == Some(target) {
                continue;
            }
            let result = convert(&content_for(kind), kind, target, &name_for(kind));
            assert!(
                matches!(result, Err(Error::UnsupportedConversion { from, to, .. }) if from == kind && to == target),
                "{} -> {}",
                kind,
                target
            );
        }
    }
}

#[test]
fn test_png_to_word_is_unsupported() {
    let result = convert(&sample_image(ImageEncoding::Png), PNG, TargetFormat::Word, "a.png");
    let err = result.unwrap_err();
    assert_eq!(err.to_string(), "Cannot convert PNG to Word: no conversion path");
}

#[test]
fn test_jpeg_has_no_canonical_target() {
    assert_eq!(JPEG.canonical_target(), None);
    assert_eq!(
        legal_targets(JPEG),
        vec![TargetFormat::Pdf, TargetFormat::Png]
    );
}

#[test]
fn test_output_file_names() {
    assert_eq!(output_file_name("Q1.XLSX", XLSX, TargetFormat::Csv), "Q1.csv");
    assert_eq!(output_file_name("scan.jpg", JPEG, TargetFormat::Png), "scan.png");
    assert_eq!(output_file_name("notes", SourceKind::DocumentWord, TargetFormat::Pdf), "notes.pdf");
}
