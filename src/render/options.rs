//! Output layout options.

/// Page size in PDF points (1/72 inch).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    /// ISO A4 portrait.
    pub const A4: PageSize = PageSize {
        width: 595.0,
        height: 842.0,
    };

    /// US Letter portrait.
    pub const LETTER: PageSize = PageSize {
        width: 612.0,
        height: 792.0,
    };
}

impl Default for PageSize {
    fn default() -> Self {
        Self::A4
    }
}

/// Options for writing output artifacts.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Page size for generated PDF text pages
    pub page_size: PageSize,

    /// Margin on every side of a PDF text page, in points
    pub margin: f32,

    /// Font size for PDF text, in points
    pub font_size: f32,

    /// Distance between PDF baselines, in points
    pub line_height: f32,

    /// Worksheet name for Excel output
    pub sheet_name: String,

    /// Field delimiter for CSV output
    pub csv_delimiter: u8,
}

impl RenderOptions {
    /// Create render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the PDF page size.
    pub fn with_page_size(mut self, size: PageSize) -> Self {
        self.page_size = size;
        self
    }

    /// Set the PDF page margin.
    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin.max(0.0);
        self
    }

    /// Set the PDF font size. Line height follows at 1.25x.
    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = size.clamp(4.0, 72.0);
        self.line_height = self.font_size * 1.25;
        self
    }

    /// Set the worksheet name.
    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = name.into();
        self
    }

    /// Set the CSV delimiter.
    pub fn with_csv_delimiter(mut self, delimiter: u8) -> Self {
        self.csv_delimiter = delimiter;
        self
    }

    /// Number of text lines that fit on one PDF page. Always at least one.
    pub fn lines_per_page(&self) -> usize {
        let usable = self.page_size.height - 2.0 * self.margin;
        if self.line_height <= 0.0 || usable <= 0.0 {
            return 1;
        }
        ((usable / self.line_height).floor() as usize).max(1)
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            page_size: PageSize::A4,
            margin: 56.0,
            font_size: 11.0,
            line_height: 14.0,
            sheet_name: "Sheet1".to_string(),
            csv_delimiter: b',',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = RenderOptions::default();
        assert_eq!(options.page_size, PageSize::A4);
        assert_eq!(options.sheet_name, "Sheet1");
        assert_eq!(options.csv_delimiter, b',');
        // (842 - 112) / 14
        assert_eq!(options.lines_per_page(), 52);
    }

    #[test]
    fn test_builder() {
        let options = RenderOptions::new()
            .with_page_size(PageSize::LETTER)
            .with_font_size(200.0)
            .with_sheet_name("Data")
            .with_csv_delimiter(b';');

        assert_eq!(options.font_size, 72.0);
        assert_eq!(options.line_height, 90.0);
        assert_eq!(options.sheet_name, "Data");
        assert_eq!(options.csv_delimiter, b';');
    }

    #[test]
    fn test_lines_per_page_never_zero() {
        let options = RenderOptions::new().with_margin(500.0);
        assert_eq!(options.lines_per_page(), 1);
    }
}
