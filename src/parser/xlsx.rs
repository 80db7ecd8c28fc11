//! Excel workbook (.xlsx) extraction.

use std::collections::{BTreeMap, HashMap};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{Error, Result};
use crate::model::{Cell, SourceKind, Table, TabularFormat};

use super::delimited::unique_headers;
use super::ooxml::{attribute, Package};
use super::ExtractOptions;

const KIND: SourceKind = SourceKind::Tabular(TabularFormat::Xlsx);

/// Worksheet limits of Excel 2007 and later (column XFD, row 1048576).
const MAX_COLUMNS: usize = 16_384;
const MAX_ROWS: usize = 1_048_576;

/// Parse one worksheet of a workbook into a table. The first row is the
/// header.
pub(crate) fn parse_xlsx(data: &[u8], options: &ExtractOptions) -> Result<Table> {
    let mut package = Package::open(data, KIND)?;

    let sheet_path = resolve_sheet_path(&mut package, options.sheet_index)?;
    let shared_strings = match package.part("xl/sharedStrings.xml")? {
        Some(xml) => parse_shared_strings(&xml)?,
        None => Vec::new(),
    };

    let sheet_xml = package.required_part(&sheet_path)?;
    let grid = parse_sheet(&sheet_xml, &shared_strings)?;

    log::debug!("Parsed worksheet {}: {} rows", sheet_path, grid.len());
    Ok(grid_to_table(grid))
}

/// Find the part name of the `index`-th worksheet.
fn resolve_sheet_path(package: &mut Package<'_>, index: usize) -> Result<String> {
    let workbook = package.required_part("xl/workbook.xml")?;
    let mut sheet_ids = Vec::new();
    for_each_element(&workbook, |e| {
        if e.local_name().as_ref() == b"sheet" {
            sheet_ids.push(attribute(e, b"id"));
        }
    })?;

    let rel_id = match sheet_ids.get(index) {
        Some(id) => id.clone(),
        None => {
            return Err(Error::parse(
                KIND,
                format!("workbook has no worksheet {}", index + 1),
            ))
        }
    };

    let mut targets = HashMap::new();
    if let Some(rels) = package.part("xl/_rels/workbook.xml.rels")? {
        for_each_element(&rels, |e| {
            if e.local_name().as_ref() == b"Relationship" {
                if let (Some(id), Some(target)) = (attribute(e, b"Id"), attribute(e, b"Target")) {
                    targets.insert(id, target);
                }
            }
        })?;
    }

    let path = rel_id
        .and_then(|id| targets.remove(&id))
        .map(|target| match target.strip_prefix('/') {
            Some(absolute) => absolute.to_string(),
            None => format!("xl/{}", target),
        })
        .unwrap_or_else(|| format!("xl/worksheets/sheet{}.xml", index + 1));
    Ok(path)
}

/// Visit every start or empty element of a document.
fn for_each_element(xml: &[u8], mut visit: impl FnMut(&BytesStart<'_>)) -> Result<()> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => visit(&e),
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::parse(KIND, e)),
            _ => {}
        }
    }
    Ok(())
}

/// Parse `xl/sharedStrings.xml`. Phonetic runs are skipped.
fn parse_shared_strings(xml: &[u8]) -> Result<Vec<String>> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut strings = Vec::new();
    let mut current = String::new();
    let mut in_text = false;
    let mut in_phonetic = false;

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"si" => current.clear(),
                b"t" => in_text = true,
                b"rPh" => in_phonetic = true,
                _ => {}
            },
            Ok(Event::Empty(e)) if e.local_name().as_ref() == b"si" => strings.push(String::new()),
            Ok(Event::Text(e)) if in_text && !in_phonetic => {
                current.push_str(&e.unescape().map_err(|e| Error::parse(KIND, e))?);
            }
            Ok(Event::CData(e)) if in_text && !in_phonetic => {
                current.push_str(&String::from_utf8_lossy(&e));
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"si" => strings.push(std::mem::take(&mut current)),
                b"t" => in_text = false,
                b"rPh" => in_phonetic = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::parse(KIND, e)),
            _ => {}
        }
    }

    Ok(strings)
}

/// A cell being read: its type attribute and raw value.
#[derive(Default)]
struct PendingCell {
    column: usize,
    cell_type: Option<String>,
    value: String,
}

/// Parse a worksheet into sparse rows keyed by zero-based row index.
fn parse_sheet(xml: &[u8], shared_strings: &[String]) -> Result<BTreeMap<usize, Vec<Cell>>> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut rows: BTreeMap<usize, Vec<Cell>> = BTreeMap::new();

    let mut row_index = 0usize;
    let mut next_row = 0usize;
    let mut next_column = 0usize;
    let mut cell: Option<PendingCell> = None;
    let mut in_value = false;

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"row" => {
                    row_index = row_position(&e, next_row)?;
                    next_row = row_index + 1;
                    next_column = 0;
                }
                b"c" => {
                    let column = cell_column(&e, next_column)?;
                    next_column = column + 1;
                    cell = Some(PendingCell {
                        column,
                        cell_type: attribute(&e, b"t"),
                        value: String::new(),
                    });
                }
                b"v" | b"t" => in_value = cell.is_some(),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"row" => {
                    row_index = row_position(&e, next_row)?;
                    next_row = row_index + 1;
                }
                b"c" => {
                    next_column = cell_column(&e, next_column)? + 1;
                }
                _ => {}
            },
            Ok(Event::Text(e)) if in_value => {
                if let Some(pending) = cell.as_mut() {
                    pending
                        .value
                        .push_str(&e.unescape().map_err(|e| Error::parse(KIND, e))?);
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"v" | b"t" => in_value = false,
                b"c" => {
                    if let Some(pending) = cell.take() {
                        let value = cell_value(&pending, shared_strings)?;
                        let row = rows.entry(row_index).or_default();
                        if row.len() <= pending.column {
                            row.resize(pending.column + 1, Cell::Missing);
                        }
                        row[pending.column] = value;
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::parse(KIND, e)),
            _ => {}
        }
    }

    Ok(rows)
}

/// Zero-based index of a row: its one-based `r` attribute, or the row after
/// the previous one.
fn row_position(element: &BytesStart<'_>, next_row: usize) -> Result<usize> {
    let row = attribute(element, b"r")
        .and_then(|r| r.parse::<usize>().ok())
        .and_then(|r| r.checked_sub(1))
        .unwrap_or(next_row);
    if row >= MAX_ROWS {
        return Err(Error::parse(
            KIND,
            format!("row {} is beyond the worksheet limit of {} rows", row + 1, MAX_ROWS),
        ));
    }
    Ok(row)
}

/// Zero-based column of a cell: from its reference, or the column after the
/// previous cell.
fn cell_column(element: &BytesStart<'_>, next_column: usize) -> Result<usize> {
    let column = match attribute(element, b"r") {
        Some(reference) => column_index(&reference)?.unwrap_or(next_column),
        None => next_column,
    };
    if column >= MAX_COLUMNS {
        return Err(Error::parse(
            KIND,
            format!("column {} is beyond the worksheet limit of {} columns", column + 1, MAX_COLUMNS),
        ));
    }
    Ok(column)
}

/// Zero-based column index of a reference like "B7" or "AA12"; `None` when
/// the reference has no column letters.
fn column_index(reference: &str) -> Result<Option<usize>> {
    let letters: Vec<u8> = reference
        .bytes()
        .take_while(|b| b.is_ascii_alphabetic())
        .collect();
    if letters.is_empty() {
        return Ok(None);
    }
    let number = letters.iter().try_fold(0usize, |acc, b| {
        acc.checked_mul(26)?
            .checked_add((b.to_ascii_uppercase() - b'A' + 1) as usize)
    });
    match number {
        Some(number) if number <= MAX_COLUMNS => Ok(Some(number - 1)),
        _ => Err(Error::parse(
            KIND,
            format!("cell reference {} is beyond column XFD", reference),
        )),
    }
}

fn cell_value(cell: &PendingCell, shared_strings: &[String]) -> Result<Cell> {
    let raw = cell.value.as_str();
    let text = |s: &str| {
        if s.is_empty() {
            Cell::Missing
        } else {
            Cell::Text(s.to_string())
        }
    };

    let value = match cell.cell_type.as_deref() {
        Some("s") => {
            let index: usize = raw
                .trim()
                .parse()
                .map_err(|_| Error::parse(KIND, format!("bad shared string index '{}'", raw)))?;
            let s = shared_strings.get(index).ok_or_else(|| {
                Error::parse(KIND, format!("shared string {} out of range", index))
            })?;
            text(s)
        }
        Some("b") => match raw.trim() {
            "1" => Cell::Text("TRUE".into()),
            "0" => Cell::Text("FALSE".into()),
            other => text(other),
        },
        Some("inlineStr") | Some("str") | Some("e") | Some("d") => text(raw),
        _ => match raw.trim() {
            "" => Cell::Missing,
            number => number
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Cell::Number)
                .unwrap_or_else(|| Cell::Text(number.to_string())),
        },
    };
    Ok(value)
}

/// Turn sparse rows into a table, using the first row as the header.
/// Blank rows between data rows are kept as rows of missing cells.
fn grid_to_table(mut grid: BTreeMap<usize, Vec<Cell>>) -> Table {
    let header_index = match grid.keys().next() {
        Some(index) => *index,
        None => return Table::new(),
    };
    let header_cells = grid.remove(&header_index).unwrap_or_default();
    let last_index = grid.keys().next_back().copied().unwrap_or(header_index);

    let width = grid
        .values()
        .map(Vec::len)
        .chain(std::iter::once(header_cells.len()))
        .max()
        .unwrap_or(0);

    let mut header: Vec<String> = header_cells.iter().map(|c| c.to_string()).collect();
    header.resize(width, String::new());

    let rows = (header_index + 1..=last_index)
        .map(|index| grid.remove(&index).unwrap_or_default())
        .collect();

    Table::from_rows(unique_headers(header), rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_index() {
        assert_eq!(column_index("A1").unwrap(), Some(0));
        assert_eq!(column_index("Z9").unwrap(), Some(25));
        assert_eq!(column_index("AA12").unwrap(), Some(26));
        assert_eq!(column_index("XFD1").unwrap(), Some(16_383));
        assert_eq!(column_index("12").unwrap(), None);
        assert!(column_index("XFE1").is_err());
        assert!(column_index("ZZZZZZZZZZZZZZZZZZZZ1").is_err());
    }

    #[test]
    fn test_far_column_reference_is_rejected() {
        let xml = br#"<worksheet><sheetData><row r="1"><c r="ZZZZZZZZ1"><v>1</v></c></row></sheetData></worksheet>"#;
        assert!(matches!(parse_sheet(xml, &[]), Err(Error::Parse { .. })));

        let xml = br#"<worksheet><sheetData><row r="1"><c r="ZZZZZZZZ1"/></row></sheetData></worksheet>"#;
        assert!(matches!(parse_sheet(xml, &[]), Err(Error::Parse { .. })));
    }

    #[test]
    fn test_far_row_reference_is_rejected() {
        let xml = br#"<worksheet><sheetData><row r="1"><c r="A1"><v>1</v></c></row><row r="50000000"><c r="A50000000"><v>2</v></c></row></sheetData></worksheet>"#;
        assert!(matches!(parse_sheet(xml, &[]), Err(Error::Parse { .. })));

        let xml = br#"<worksheet><sheetData><row r="1048576"><c r="A1048576"><v>2</v></c></row></sheetData></worksheet>"#;
        assert_eq!(parse_sheet(xml, &[]).unwrap().len(), 1);
    }

    #[test]
    fn test_shared_strings() {
        let xml = br#"<sst><si><t>plain</t></si><si><r><t>rich </t></r><r><t>text</t></r><rPh><t>skip</t></rPh></si><si/></sst>"#;
        let strings = parse_shared_strings(xml).unwrap();
        assert_eq!(strings, vec!["plain", "rich text", ""]);
    }

    #[test]
    fn test_parse_sheet_cell_types() {
        let shared = vec!["name".to_string(), "Ann".to_string()];
        let xml = br#"<worksheet><sheetData>
            <row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="inlineStr"><is><t>flag</t></is></c><c r="C1" t="str"><v>total</v></c></row>
            <row r="2"><c r="A2" t="s"><v>1</v></c><c r="B2" t="b"><v>1</v></c><c r="C2"><v>2.5</v></c></row>
            <row r="4"><c r="C4"><v>7</v></c></row>
        </sheetData></worksheet>"#;

        let table = grid_to_table(parse_sheet(xml, &shared).unwrap());
        assert_eq!(table.column_names(), vec!["name", "flag", "total"]);
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.columns[0].cells[0], Cell::Text("Ann".into()));
        assert_eq!(table.columns[1].cells[0], Cell::Text("TRUE".into()));
        assert_eq!(table.columns[2].cells[0], Cell::Number(2.5));
        assert_eq!(table.columns[2].cells[1], Cell::Missing);
        assert_eq!(table.columns[2].cells[2], Cell::Number(7.0));
    }

    #[test]
    fn test_cells_without_references() {
        let xml = br#"<worksheet><sheetData><row><c t="inlineStr"><is><t>a</t></is></c><c t="inlineStr"><is><t>b</t></is></c></row><row><c><v>1</v></c><c><v>2</v></c></row></sheetData></worksheet>"#;
        let table = grid_to_table(parse_sheet(xml, &[]).unwrap());
        assert_eq!(table.column_names(), vec!["a", "b"]);
        assert_eq!(table.columns[1].cells, vec![Cell::Number(2.0)]);
    }

    #[test]
    fn test_bad_shared_string_index() {
        let xml = br#"<worksheet><sheetData><row r="1"><c r="A1" t="s"><v>3</v></c></row></sheetData></worksheet>"#;
        assert!(matches!(parse_sheet(xml, &[]), Err(Error::Parse { .. })));
    }

    #[test]
    fn test_empty_sheet() {
        let xml = br#"<worksheet><sheetData/></worksheet>"#;
        let table = grid_to_table(parse_sheet(xml, &[]).unwrap());
        assert_eq!(table.column_count(), 0);
    }
}
