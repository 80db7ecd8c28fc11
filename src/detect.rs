//! File classification by extension, plus PDF header validation.
//!
//! Classification looks only at the file name. Content is never sniffed to
//! pick a kind, so a misnamed file is classified by its name and then fails
//! extraction with a parse error.

use crate::error::{Error, Result};
use crate::model::SourceKind;

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const PDF_MAGIC_LEN: usize = 5;
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// Classify an uploaded file by its extension (case-insensitive).
///
/// # Example
/// ```
/// use filemorph::{classify, SourceKind};
///
/// assert_eq!(classify("report.PDF").unwrap(), SourceKind::DocumentPdf);
/// assert!(classify("notes.txt").is_err());
/// ```
pub fn classify(file_name: &str) -> Result<SourceKind> {
    let extension = extension_of(file_name)
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    SourceKind::ALL
        .into_iter()
        .find(|kind| kind.extensions().contains(&extension.as_str()))
        .ok_or_else(|| Error::UnsupportedFormat {
            file_name: file_name.to_string(),
            extension,
        })
}

/// All accepted extensions, lowercase and without the dot.
pub fn supported_extensions() -> Vec<&'static str> {
    SourceKind::ALL
        .iter()
        .flat_map(|kind| kind.extensions().iter().copied())
        .collect()
}

/// The text after the last dot of the file name, if any.
pub(crate) fn extension_of(file_name: &str) -> Option<&str> {
    let base = file_name
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or(file_name);
    match base.rfind('.') {
        Some(idx) if idx + 1 < base.len() => Some(&base[idx + 1..]),
        _ => None,
    }
}

/// Read the version from a PDF header (e.g. "1.7" from "%PDF-1.7").
///
/// Returns `None` when the data does not start with a valid header.
pub fn pdf_version(data: &[u8]) -> Option<String> {
    if data.len() < PDF_MAGIC_LEN + VERSION_LEN || !data.starts_with(PDF_MAGIC) {
        return None;
    }

    let version_bytes = &data[PDF_MAGIC_LEN..PDF_MAGIC_LEN + VERSION_LEN];
    let version = String::from_utf8_lossy(version_bytes).to_string();
    if is_valid_version(&version) {
        Some(version)
    } else {
        None
    }
}

/// Check if bytes start with a valid PDF header.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    pdf_version(data).is_some()
}

fn is_valid_version(version: &str) -> bool {
    let chars: Vec<char> = version.chars().collect();
    chars.len() == 3 && chars[0].is_ascii_digit() && chars[1] == '.' && chars[2].is_ascii_digit()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ImageEncoding, TabularFormat};

    #[test]
    fn test_classify_supported() {
        let cases = [
            ("a.csv", SourceKind::Tabular(TabularFormat::Csv)),
            ("a.xlsx", SourceKind::Tabular(TabularFormat::Xlsx)),
            ("a.pdf", SourceKind::DocumentPdf),
            ("a.docx", SourceKind::DocumentWord),
            ("a.png", SourceKind::Image(ImageEncoding::Png)),
            ("a.jpg", SourceKind::Image(ImageEncoding::Jpeg)),
        ];
        for (name, kind) in cases {
            assert_eq!(classify(name).unwrap(), kind, "{}", name);
        }
    }

    #[test]
    fn test_classify_mixed_case() {
        assert_eq!(classify("report.PDF").unwrap(), SourceKind::DocumentPdf);
        assert_eq!(
            classify("Photo.JpG").unwrap(),
            SourceKind::Image(ImageEncoding::Jpeg)
        );
    }

    #[test]
    fn test_classify_unsupported() {
        for name in ["notes.txt", "legacy.doc", "photo.jpeg", "archive.tar.gz", "README", "dir.csv/", ""] {
            let err = classify(name).unwrap_err();
            assert!(matches!(err, Error::UnsupportedFormat { .. }), "{}", name);
        }
    }

    #[test]
    fn test_classify_uses_last_extension() {
        assert_eq!(
            classify("data.backup.csv").unwrap(),
            SourceKind::Tabular(TabularFormat::Csv)
        );
        assert!(classify("data.csv.bak").is_err());
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("a/b/c.tar.gz"), Some("gz"));
        assert_eq!(extension_of("folder.d/file"), None);
        assert_eq!(extension_of("trailing."), None);
    }

    #[test]
    fn test_supported_extensions() {
        assert_eq!(
            supported_extensions(),
            vec!["csv", "xlsx", "pdf", "docx", "png", "jpg"]
        );
    }

    #[test]
    fn test_pdf_version() {
        assert_eq!(pdf_version(b"%PDF-1.7\n%\xe2\xe3"), Some("1.7".into()));
        assert_eq!(pdf_version(b"%PDF-2.0\n"), Some("2.0".into()));
        assert_eq!(pdf_version(b"%PDF"), None);
        assert_eq!(pdf_version(b"<!DOCTYPE html>"), None);
        assert!(is_pdf_bytes(b"%PDF-1.4\n"));
        assert!(!is_pdf_bytes(b"Not a PDF"));
    }
}
