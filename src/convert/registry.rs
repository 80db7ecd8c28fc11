//! The table of legal conversions.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::model::{ImageEncoding, SourceKind, TabularFormat, TargetFormat};
use crate::render::{CsvSerializer, PdfSerializer, PngSerializer, WordSerializer, XlsxSerializer};

use super::ContentSerializer;

static DEFAULT_REGISTRY: Lazy<ConversionRegistry> = Lazy::new(ConversionRegistry::with_defaults);

/// How content is adapted before it reaches the serializer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Content is written as extracted
    Direct,
    /// A table is written as text lines
    TextProjection,
    /// Text is read as a table first; fails when it has no tabular shape
    TabularCoercion,
}

/// A registered conversion path.
#[derive(Clone)]
pub struct Binding {
    /// Adaptation applied to the content
    pub capability: Capability,
    /// Writer for the target format
    pub serializer: Arc<dyn ContentSerializer>,
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("capability", &self.capability)
            .field("serializer", &self.serializer.name())
            .finish()
    }
}

/// Registry of `(source kind, target format)` bindings.
///
/// A pair that is not registered has no conversion path.
#[derive(Debug, Clone)]
pub struct ConversionRegistry {
    bindings: HashMap<(SourceKind, TargetFormat), Binding>,
}

impl ConversionRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Create a registry holding every built-in conversion.
    pub fn with_defaults() -> Self {
        use Capability::*;

        let csv: Arc<dyn ContentSerializer> = Arc::new(CsvSerializer);
        let xlsx: Arc<dyn ContentSerializer> = Arc::new(XlsxSerializer);
        let pdf: Arc<dyn ContentSerializer> = Arc::new(PdfSerializer);
        let word: Arc<dyn ContentSerializer> = Arc::new(WordSerializer);
        let png: Arc<dyn ContentSerializer> = Arc::new(PngSerializer);

        let csv_kind = SourceKind::Tabular(TabularFormat::Csv);
        let xlsx_kind = SourceKind::Tabular(TabularFormat::Xlsx);
        let png_kind = SourceKind::Image(ImageEncoding::Png);
        let jpeg_kind = SourceKind::Image(ImageEncoding::Jpeg);

        let mut registry = Self::new();
        for (kind, capability, serializer) in [
            (csv_kind, Direct, &xlsx),
            (csv_kind, TextProjection, &pdf),
            (csv_kind, TextProjection, &word),
            (xlsx_kind, Direct, &csv),
            (xlsx_kind, TextProjection, &pdf),
            (xlsx_kind, TextProjection, &word),
            (SourceKind::DocumentPdf, TabularCoercion, &csv),
            (SourceKind::DocumentPdf, TabularCoercion, &xlsx),
            (SourceKind::DocumentPdf, Direct, &word),
            (SourceKind::DocumentWord, TabularCoercion, &csv),
            (SourceKind::DocumentWord, TabularCoercion, &xlsx),
            (SourceKind::DocumentWord, Direct, &pdf),
            (png_kind, Direct, &pdf),
            (jpeg_kind, Direct, &pdf),
            (jpeg_kind, Direct, &png),
        ] {
            registry.register(kind, capability, Arc::clone(serializer));
        }
        registry
    }

    /// The process-wide default registry, built on first use.
    pub fn global() -> &'static ConversionRegistry {
        &DEFAULT_REGISTRY
    }

    /// Register a serializer for `kind`, under the serializer's target.
    /// Replaces any earlier binding for the same pair.
    pub fn register(
        &mut self,
        kind: SourceKind,
        capability: Capability,
        serializer: Arc<dyn ContentSerializer>,
    ) {
        let target = serializer.target();
        self.bindings.insert(
            (kind, target),
            Binding {
                capability,
                serializer,
            },
        );
    }

    /// Get the binding for a pair.
    pub fn get(&self, kind: SourceKind, target: TargetFormat) -> Option<&Binding> {
        self.bindings.get(&(kind, target))
    }

    /// Check if a pair has a conversion path.
    pub fn supports(&self, kind: SourceKind, target: TargetFormat) -> bool {
        self.bindings.contains_key(&(kind, target))
    }

    /// Targets reachable from `kind`, in [`TargetFormat::ALL`] order.
    pub fn legal_targets(&self, kind: SourceKind) -> Vec<TargetFormat> {
        TargetFormat::ALL
            .iter()
            .copied()
            .filter(|target| self.supports(kind, *target))
            .collect()
    }

    /// Number of registered pairs.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Check if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Default for ConversionRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
