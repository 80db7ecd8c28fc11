//! Inputs and outputs of a conversion request.

use super::TargetFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// An uploaded file: its name and raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    /// Original file name
    pub name: String,

    /// File content
    pub bytes: Vec<u8>,
}

impl Upload {
    /// Create an upload from a name and bytes.
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read an upload from disk, keeping only the file name.
    pub fn from_path<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { name, bytes })
    }
}

/// A fully serialized conversion result, ready for download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputArtifact {
    /// Serialized content
    pub bytes: Vec<u8>,

    /// Suggested download name
    pub filename: String,

    /// MIME type of `bytes`
    pub mime_type: String,
}

impl OutputArtifact {
    /// Create an artifact for `target` named after `filename`.
    pub fn new(bytes: Vec<u8>, filename: String, target: TargetFormat) -> Self {
        Self {
            bytes,
            filename,
            mime_type: target.mime_type().to_string(),
        }
    }

    /// Size of the payload in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
