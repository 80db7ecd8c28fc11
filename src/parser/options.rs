//! Extraction options and configuration.

/// Options for extracting content from uploaded bytes.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Error handling mode for per-page PDF text extraction
    pub error_mode: ErrorMode,

    /// Field delimiter for CSV input
    pub csv_delimiter: u8,

    /// Zero-based index of the worksheet read from a workbook
    pub sheet_index: usize,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Fail when any PDF page's text cannot be decoded.
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }

    /// Set the CSV field delimiter.
    pub fn with_csv_delimiter(mut self, delimiter: u8) -> Self {
        self.csv_delimiter = delimiter;
        self
    }

    /// Select the worksheet to read from a workbook.
    pub fn with_sheet_index(mut self, index: usize) -> Self {
        self.sheet_index = index;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Lenient,
            csv_delimiter: b',',
            sheet_index: 0,
        }
    }
}

/// Error handling mode during extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any error
    Strict,
    /// Keep the page as an empty line and continue
    #[default]
    Lenient,
}
