//! Error types for filemorph.

use crate::model::{SourceKind, TabularFormat, TargetFormat};
use std::io;
use thiserror::Error;

/// Result type alias for filemorph operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while classifying, extracting, transforming
/// or converting a file.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file extension is not one of the supported types.
    #[error("Unsupported file type: {file_name} (extension '{extension}')")]
    UnsupportedFormat {
        file_name: String,
        extension: String,
    },

    /// The payload could not be decoded by the codec its kind calls for.
    #[error("Failed to read {kind} content: {message}")]
    Parse { kind: SourceKind, message: String },

    /// A projection named a column the table does not have.
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// A projection named the same column twice.
    #[error("Column requested more than once: {0}")]
    DuplicateColumn(String),

    /// The requested target is the format the file is already in.
    #[error("{file_name} is already a {format} file")]
    NoOpConversion {
        file_name: String,
        format: TargetFormat,
    },

    /// No conversion path exists for this source and target.
    #[error("Cannot convert {from} to {to}: {reason}")]
    UnsupportedConversion {
        from: SourceKind,
        to: TargetFormat,
        reason: String,
    },

    /// A codec failed while writing the output.
    #[error("Failed to write {target} output: {message}")]
    Serialization {
        target: TargetFormat,
        message: String,
    },

    /// A report (preview, listing) could not be rendered.
    #[error("Rendering error: {0}")]
    Render(String),
}

impl Error {
    /// Build a parse error for `kind` from any displayable cause.
    pub fn parse(kind: SourceKind, err: impl std::fmt::Display) -> Self {
        Error::Parse {
            kind,
            message: err.to_string(),
        }
    }

    /// Build a serialization error for `target` from any displayable cause.
    pub fn serialization(target: TargetFormat, err: impl std::fmt::Display) -> Self {
        Error::Serialization {
            target,
            message: err.to_string(),
        }
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => {
                Error::parse(SourceKind::DocumentPdf, "document is encrypted")
            }
            _ => Error::parse(SourceKind::DocumentPdf, err),
        }
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::parse(SourceKind::Tabular(TabularFormat::Csv), err)
    }
}
