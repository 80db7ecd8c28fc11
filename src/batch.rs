//! Converting several uploads at once.
//!
//! Every file runs through classify, extract, transform and convert on its
//! own. A failure is recorded in that file's outcome and the remaining files
//! are still converted. Outcomes come back in upload order.

use rayon::prelude::*;

use crate::convert::{convert_with_options, ConvertOptions};
use crate::detect::classify;
use crate::error::{Error, Result};
use crate::model::{ExtractedContent, OutputArtifact, TargetFormat, Upload};
use crate::parser::{extract_with_options, ExtractOptions};
use crate::transform::{self, TransformOptions};

/// What to do with every file of a batch.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    /// Format to convert to
    pub target: TargetFormat,

    /// Cleaning applied to tabular files; ignored for others
    pub transforms: TransformOptions,

    /// Extraction options
    pub extract: ExtractOptions,

    /// Conversion options
    pub convert: ConvertOptions,
}

impl ConversionRequest {
    /// Create a request with default options.
    pub fn new(target: TargetFormat) -> Self {
        Self {
            target,
            transforms: TransformOptions::default(),
            extract: ExtractOptions::default(),
            convert: ConvertOptions::default(),
        }
    }

    /// Set the tabular cleaning options.
    pub fn with_transforms(mut self, transforms: TransformOptions) -> Self {
        self.transforms = transforms;
        self
    }

    /// Set extraction options.
    pub fn with_extract_options(mut self, options: ExtractOptions) -> Self {
        self.extract = options;
        self
    }

    /// Set conversion options.
    pub fn with_convert_options(mut self, options: ConvertOptions) -> Self {
        self.convert = options;
        self
    }
}

/// Result for one file of a batch.
#[derive(Debug)]
pub struct FileOutcome {
    /// Name of the uploaded file
    pub file_name: String,

    /// The artifact, or why this file could not be converted
    pub result: Result<OutputArtifact>,
}

impl FileOutcome {
    /// Check if the file was converted.
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    /// The error, if the file failed.
    pub fn error(&self) -> Option<&Error> {
        self.result.as_ref().err()
    }
}

/// Convert uploads one after another.
pub fn convert_batch(uploads: &[Upload], request: &ConversionRequest) -> Vec<FileOutcome> {
    let outcomes: Vec<FileOutcome> = uploads
        .iter()
        .map(|upload| convert_upload(upload, request))
        .collect();
    log_summary(&outcomes);
    outcomes
}

/// Convert uploads in parallel. Outcomes keep upload order.
pub fn convert_batch_parallel(uploads: &[Upload], request: &ConversionRequest) -> Vec<FileOutcome> {
    let outcomes: Vec<FileOutcome> = uploads
        .par_iter()
        .map(|upload| convert_upload(upload, request))
        .collect();
    log_summary(&outcomes);
    outcomes
}

/// Run the whole pipeline for one upload.
pub fn convert_upload(upload: &Upload, request: &ConversionRequest) -> FileOutcome {
    let result = run_pipeline(upload, request);
    if let Err(ref e) = result {
        log::warn!("Failed to convert {}: {}", upload.name, e);
    }
    FileOutcome {
        file_name: upload.name.clone(),
        result,
    }
}

fn run_pipeline(upload: &Upload, request: &ConversionRequest) -> Result<OutputArtifact> {
    let kind = classify(&upload.name)?;
    let content = extract_with_options(&upload.bytes, kind, &request.extract)?;

    let content = match content {
        ExtractedContent::Table(table) if !request.transforms.is_noop() => {
            ExtractedContent::Table(transform::apply(&table, &request.transforms)?)
        }
        other => {
            if !request.transforms.is_noop() && !kind.is_tabular() {
                log::debug!("Skipping table cleaning for {} ({})", upload.name, kind);
            }
            other
        }
    };

    convert_with_options(&content, kind, request.target, &upload.name, &request.convert)
}

fn log_summary(outcomes: &[FileOutcome]) {
    let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
    log::debug!(
        "Batch finished: {} converted, {} failed",
        outcomes.len() - failed,
        failed
    );
}
