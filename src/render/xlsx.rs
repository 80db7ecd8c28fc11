//! Excel workbook (.xlsx) output.

use quick_xml::escape::escape;

use crate::convert::ContentSerializer;
use crate::error::Result;
use crate::model::{format_number, Cell, ExtractedContent, Table, TargetFormat};

use super::options::RenderOptions;
use super::package::{relationships, xml_safe, PackageWriter, XML_DECLARATION};
use super::unexpected_content;

const TARGET: TargetFormat = TargetFormat::Xlsx;

const WORKBOOK_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";
const WORKSHEET_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml";
const WORKSHEET_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";
const SPREADSHEET_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";

/// Excel limits sheet names to 31 characters.
const MAX_SHEET_NAME: usize = 31;

/// Writes a table as a single-sheet workbook.
#[derive(Debug, Default, Clone, Copy)]
pub struct XlsxSerializer;

impl ContentSerializer for XlsxSerializer {
    fn name(&self) -> &'static str {
        "xlsx"
    }

    fn target(&self) -> TargetFormat {
        TARGET
    }

    fn serialize(&self, content: &ExtractedContent, options: &RenderOptions) -> Result<Vec<u8>> {
        match content {
            ExtractedContent::Table(table) => write_xlsx(table, &options.sheet_name),
            other => Err(unexpected_content(TARGET, "table", other)),
        }
    }
}

/// Build the workbook: header in row 1, then one row per table row.
/// Numbers are written as numeric cells, text as inline strings and
/// missing cells are left out.
pub(crate) fn write_xlsx(table: &Table, sheet_name: &str) -> Result<Vec<u8>> {
    let workbook = format!(
        r#"{}<workbook xmlns="{}" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
        XML_DECLARATION,
        SPREADSHEET_NS,
        escape(&sheet_title(sheet_name))
    );
    let workbook_rels = relationships(&[("rId1", WORKSHEET_REL, "worksheets/sheet1.xml")]);

    let mut package = PackageWriter::new(TARGET);
    package.add_main_part("xl/workbook.xml", WORKBOOK_TYPE, workbook.as_bytes())?;
    package.add_relationships("xl/_rels/workbook.xml.rels", workbook_rels.as_bytes())?;
    package.add_part(
        "xl/worksheets/sheet1.xml",
        WORKSHEET_TYPE,
        worksheet(table).as_bytes(),
    )?;

    let bytes = package.finish()?;
    log::debug!(
        "Wrote workbook: {} rows x {} columns",
        table.row_count(),
        table.column_count()
    );
    Ok(bytes)
}

fn worksheet(table: &Table) -> String {
    let mut xml = String::from(XML_DECLARATION);
    xml.push_str(&format!(r#"<worksheet xmlns="{}"><sheetData>"#, SPREADSHEET_NS));

    let header: Vec<Cell> = table
        .column_names()
        .into_iter()
        .map(|name| Cell::Text(name.to_string()))
        .collect();
    push_row(&mut xml, 1, header.iter());

    for (index, row) in table.rows().enumerate() {
        push_row(&mut xml, index + 2, row.into_iter());
    }

    xml.push_str("</sheetData></worksheet>");
    xml
}

fn push_row<'a>(xml: &mut String, row_number: usize, cells: impl Iterator<Item = &'a Cell>) {
    xml.push_str(&format!(r#"<row r="{}">"#, row_number));
    for (col, cell) in cells.enumerate() {
        let reference = format!("{}{}", column_letters(col), row_number);
        match cell {
            Cell::Missing => {}
            Cell::Number(value) => {
                xml.push_str(&format!(
                    r#"<c r="{}"><v>{}</v></c>"#,
                    reference,
                    format_number(*value)
                ));
            }
            Cell::Text(text) => {
                xml.push_str(&format!(
                    r#"<c r="{}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
                    reference,
                    escape(&xml_safe(text))
                ));
            }
        }
    }
    xml.push_str("</row>");
}

/// Zero-based column index to spreadsheet letters (0 -> A, 26 -> AA).
fn column_letters(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

/// A sheet name Excel will accept.
fn sheet_title(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .take(MAX_SHEET_NAME)
        .collect();
    let cleaned = cleaned.trim_matches('\'').trim().to_string();
    if cleaned.is_empty() {
        "Sheet1".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SourceKind, TabularFormat};
    use crate::parser::extract;

    #[test]
    fn test_column_letters() {
        assert_eq!(column_letters(0), "A");
        assert_eq!(column_letters(25), "Z");
        assert_eq!(column_letters(26), "AA");
        assert_eq!(column_letters(701), "ZZ");
        assert_eq!(column_letters(702), "AAA");
    }

    #[test]
    fn test_sheet_title() {
        assert_eq!(sheet_title("Data"), "Data");
        assert_eq!(sheet_title("a/b:c"), "abc");
        assert_eq!(sheet_title("[]"), "Sheet1");
        assert_eq!(sheet_title(&"x".repeat(40)).len(), 31);
    }

    #[test]
    fn test_worksheet_cells() {
        let table = Table::from_rows(
            vec!["name".into(), "score".into()],
            vec![vec![Cell::Text("a & b".into()), Cell::Missing]],
        );
        let xml = worksheet(&table);
        assert!(xml.contains(r#"<c r="A1" t="inlineStr"><is><t xml:space="preserve">name</t>"#));
        assert!(xml.contains("a &amp; b"));
        assert!(!xml.contains(r#"r="B2""#));
    }

    #[test]
    fn test_workbook_reads_back() {
        let table = Table::from_rows(
            vec!["name".into(), "score".into()],
            vec![
                vec![Cell::Text("a".into()), Cell::Number(1.5)],
                vec![Cell::Text("b".into()), Cell::Missing],
            ],
        );
        let bytes = write_xlsx(&table, "Sheet1").unwrap();
        let content = extract(&bytes, SourceKind::Tabular(TabularFormat::Xlsx)).unwrap();
        assert_eq!(content.as_table(), Some(&table));
    }
}
