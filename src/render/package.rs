//! Writing minimal Office Open XML packages.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{Error, Result};
use crate::model::TargetFormat;

const RELATIONSHIPS_TYPE: &str = "application/vnd.openxmlformats-package.relationships+xml";
const OFFICE_DOCUMENT_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";

pub(crate) const XML_DECLARATION: &str =
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Builds a package in memory. `[Content_Types].xml` and the root
/// relationships are written by [`PackageWriter::finish`] from the parts
/// added so far.
pub(crate) struct PackageWriter {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    target: TargetFormat,
    overrides: Vec<(String, &'static str)>,
    main_part: Option<String>,
}

impl PackageWriter {
    /// Start a package. Errors are reported against `target`.
    pub(crate) fn new(target: TargetFormat) -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            target,
            overrides: Vec::new(),
            main_part: None,
        }
    }

    /// Add the part the package root relationship points at.
    pub(crate) fn add_main_part(
        &mut self,
        path: &str,
        content_type: &'static str,
        content: &[u8],
    ) -> Result<()> {
        self.main_part = Some(path.to_string());
        self.add_part(path, content_type, content)
    }

    /// Add a part with an explicit content type.
    pub(crate) fn add_part(
        &mut self,
        path: &str,
        content_type: &'static str,
        content: &[u8],
    ) -> Result<()> {
        self.overrides.push((format!("/{}", path), content_type));
        self.write_entry(path, content)
    }

    /// Add a relationships part (`*.rels`); covered by the default type.
    pub(crate) fn add_relationships(&mut self, path: &str, content: &[u8]) -> Result<()> {
        self.write_entry(path, content)
    }

    /// Write the manifest and root relationships, returning the archive bytes.
    pub(crate) fn finish(mut self) -> Result<Vec<u8>> {
        let main_part = self.main_part.take().ok_or_else(|| {
            Error::serialization(self.target, "package has no main document part")
        })?;

        let rels = relationships(&[("rId1", OFFICE_DOCUMENT_REL, main_part.as_str())]);
        self.write_entry("_rels/.rels", rels.as_bytes())?;

        let content_types = self.content_types();
        self.write_entry("[Content_Types].xml", content_types.as_bytes())?;

        let target = self.target;
        let cursor = self
            .zip
            .finish()
            .map_err(|e| Error::serialization(target, e))?;
        Ok(cursor.into_inner())
    }

    fn write_entry(&mut self, path: &str, content: &[u8]) -> Result<()> {
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        self.zip
            .start_file(path, options)
            .map_err(|e| Error::serialization(self.target, e))?;
        self.zip
            .write_all(content)
            .map_err(|e| Error::serialization(self.target, e))
    }

    fn content_types(&self) -> String {
        let mut xml = String::from(XML_DECLARATION);
        xml.push_str(
            r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
        );
        xml.push_str(&format!(
            r#"<Default Extension="rels" ContentType="{}"/>"#,
            RELATIONSHIPS_TYPE
        ));
        xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
        for (part, content_type) in &self.overrides {
            xml.push_str(&format!(
                r#"<Override PartName="{}" ContentType="{}"/>"#,
                part, content_type
            ));
        }
        xml.push_str("</Types>");
        xml
    }
}

/// Build a relationships part from `(id, type, target)` triples.
pub(crate) fn relationships(entries: &[(&str, &str, &str)]) -> String {
    let mut xml = String::from(XML_DECLARATION);
    xml.push_str(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for (id, rel_type, target) in entries {
        xml.push_str(&format!(
            r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
            id, rel_type, target
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

/// Drop characters XML 1.0 cannot carry.
pub(crate) fn xml_safe(text: &str) -> String {
    text.chars()
        .filter(|&c| matches!(c, '\t' | '\n' | '\r') || c >= ' ')
        .filter(|&c| !matches!(c, '\u{FFFE}' | '\u{FFFF}'))
        .collect()
}
