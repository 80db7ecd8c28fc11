//! Conversion dispatch built on a registry of serializers.
//!
//! Each legal `(source kind, target format)` pair is bound to a
//! [`ContentSerializer`] together with a [`Capability`] saying how the
//! extracted content is adapted first. Anything not in the registry has no
//! conversion path.
//!
//! # Example
//!
//! ```no_run
//! use filemorph::convert::{convert, output_file_name};
//! use filemorph::{classify, extract, TargetFormat};
//!
//! fn main() -> filemorph::Result<()> {
//!     let bytes = std::fs::read("sales.csv")?;
//!     let kind = classify("sales.csv")?;
//!     let content = extract(&bytes, kind)?;
//!
//!     let artifact = convert(&content, kind, TargetFormat::Xlsx, "sales.csv")?;
//!     assert_eq!(artifact.filename, output_file_name("sales.csv", kind, TargetFormat::Xlsx));
//!     std::fs::write(&artifact.filename, &artifact.bytes)?;
//!     Ok(())
//! }
//! ```

mod coerce;
mod registry;

pub use registry::{Binding, Capability, ConversionRegistry};

use std::borrow::Cow;

use crate::error::{Error, Result};
use crate::model::{ExtractedContent, OutputArtifact, SourceKind, TargetFormat, TextContent};
use crate::render::RenderOptions;

/// Options for conversion.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Layout options for the written output
    pub render: RenderOptions,
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set rendering options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render = options;
        self
    }
}

/// Trait for format writers.
///
/// Implement this trait to plug a new writer into a [`ConversionRegistry`].
pub trait ContentSerializer: Send + Sync {
    /// Get the name of this serializer.
    fn name(&self) -> &'static str;

    /// Get the format this serializer writes.
    fn target(&self) -> TargetFormat;

    /// Write content to bytes.
    fn serialize(&self, content: &ExtractedContent, options: &RenderOptions) -> Result<Vec<u8>>;
}

/// Convert extracted content using the default registry.
///
/// `source_name` is the uploaded file name; the artifact's file name is
/// derived from it.
pub fn convert(
    content: &ExtractedContent,
    kind: SourceKind,
    target: TargetFormat,
    source_name: &str,
) -> Result<OutputArtifact> {
    convert_with_options(content, kind, target, source_name, &ConvertOptions::default())
}

/// Convert extracted content using the default registry and explicit options.
pub fn convert_with_options(
    content: &ExtractedContent,
    kind: SourceKind,
    target: TargetFormat,
    source_name: &str,
    options: &ConvertOptions,
) -> Result<OutputArtifact> {
    ConversionRegistry::global().convert(content, kind, target, source_name, options)
}

/// Targets reachable from `kind` in the default registry.
pub fn legal_targets(kind: SourceKind) -> Vec<TargetFormat> {
    ConversionRegistry::global().legal_targets(kind)
}

/// Output file name: the source extension (matched case-insensitively) is
/// replaced by the target's canonical extension, or the canonical extension
/// is appended when the name does not end with a source extension.
pub fn output_file_name(source_name: &str, kind: SourceKind, target: TargetFormat) -> String {
    let stem = kind
        .extensions()
        .iter()
        .find_map(|ext| strip_extension(source_name, ext))
        .unwrap_or(source_name);
    format!("{}.{}", stem, target.extension())
}

fn strip_extension<'a>(name: &'a str, ext: &str) -> Option<&'a str> {
    let split = name.len().checked_sub(ext.len() + 1)?;
    if !name.is_char_boundary(split) {
        return None;
    }
    let (stem, suffix) = name.split_at(split);
    let suffix = suffix.strip_prefix('.')?;
    suffix.eq_ignore_ascii_case(ext).then_some(stem)
}

impl ConversionRegistry {
    /// Convert content extracted from a `kind` file to `target`.
    ///
    /// Fails with `NoOpConversion` when the file already is in the target
    /// format, `UnsupportedConversion` when the pair is not registered or
    /// the text has no tabular shape, and `Serialization` when the writer
    /// fails.
    pub fn convert(
        &self,
        content: &ExtractedContent,
        kind: SourceKind,
        target: TargetFormat,
        source_name: &str,
        options: &ConvertOptions,
    ) -> Result<OutputArtifact> {
        if kind.canonical_target() == Some(target) {
            return Err(Error::NoOpConversion {
                file_name: source_name.to_string(),
                format: target,
            });
        }

        if !content.matches_kind(kind) {
            return Err(unsupported(
                kind,
                target,
                format!("{} content cannot come from a {} file", content.variant_name(), kind),
            ));
        }

        let binding = self
            .get(kind, target)
            .ok_or_else(|| unsupported(kind, target, missing_path_reason(kind, target)))?;

        log::debug!(
            "Converting {} ({}) to {} via {} [{:?}]",
            source_name,
            kind,
            target,
            binding.serializer.name(),
            binding.capability
        );

        let adapted = adapt(content, binding.capability)
            .map_err(|reason| unsupported(kind, target, reason))?;

        let bytes = binding
            .serializer
            .serialize(&adapted, &options.render)
            .map_err(|e| match e {
                Error::Serialization { .. } => e,
                other => Error::serialization(target, other),
            })?;

        let filename = output_file_name(source_name, kind, target);
        log::debug!("Wrote {} ({} bytes)", filename, bytes.len());
        Ok(OutputArtifact::new(bytes, filename, target))
    }
}

/// Shape content the way the capability asks for.
fn adapt(
    content: &ExtractedContent,
    capability: Capability,
) -> std::result::Result<Cow<'_, ExtractedContent>, String> {
    match (capability, content) {
        (Capability::Direct, _) => Ok(Cow::Borrowed(content)),
        (Capability::TextProjection, ExtractedContent::Table(table)) => Ok(Cow::Owned(
            ExtractedContent::Text(TextContent::new(table.text_lines())),
        )),
        (Capability::TabularCoercion, ExtractedContent::Text(text)) => {
            coerce::coerce_to_table(text)
                .map(|table| Cow::Owned(ExtractedContent::Table(table)))
                .map_err(|reason| format!("text is not tabular ({})", reason))
        }
        (capability, content) => Err(format!(
            "{:?} does not apply to {} content",
            capability,
            content.variant_name()
        )),
    }
}

fn missing_path_reason(kind: SourceKind, target: TargetFormat) -> String {
    match (kind, target) {
        (SourceKind::DocumentPdf, TargetFormat::Png) => {
            "PDF content is extracted as text, which cannot be rasterized".to_string()
        }
        _ => "no conversion path".to_string(),
    }
}

fn unsupported(kind: SourceKind, target: TargetFormat, reason: impl Into<String>) -> Error {
    Error::UnsupportedConversion {
        from: kind,
        to: target,
        reason: reason.into(),
    }
}
