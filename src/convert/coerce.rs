//! Reading extracted text as a table.

use csv::ReaderBuilder;

use crate::model::{Cell, Table, TextContent};

/// Delimiters tried in order; the first that fits every line wins.
const DELIMITERS: [u8; 4] = [b'\t', b',', b';', b'|'];

/// Reinterpret text lines as a table.
///
/// Empty lines are ignored. The first non-empty line is the header and
/// must hold unique, non-blank names. A delimiter fits when it splits every
/// line into the same number of fields, at least two. On failure the reason
/// is returned for the caller's error message.
pub(crate) fn coerce_to_table(text: &TextContent) -> Result<Table, &'static str> {
    let lines: Vec<&str> = text
        .lines
        .iter()
        .map(String::as_str)
        .filter(|line| !line.trim().is_empty())
        .collect();
    if lines.is_empty() {
        return Err("text is empty");
    }

    let records = DELIMITERS
        .iter()
        .find_map(|&delimiter| split_uniform(&lines, delimiter))
        .ok_or("no delimiter splits every line into the same number of fields")?;

    let mut records = records.into_iter();
    let header: Vec<String> = records
        .next()
        .unwrap_or_default()
        .into_iter()
        .map(|name| name.trim().to_string())
        .collect();
    if !valid_header(&header) {
        return Err("first line does not hold unique column names");
    }

    let rows = records
        .map(|fields| fields.iter().map(|f| Cell::parse(f.trim())).collect())
        .collect();

    let table = Table::from_rows(header, rows);
    log::debug!(
        "Read text as table: {} rows x {} columns",
        table.row_count(),
        table.column_count()
    );
    Ok(table)
}

/// Split all lines on `delimiter`; `None` unless each has the same field
/// count of at least two.
fn split_uniform(lines: &[&str], delimiter: u8) -> Option<Vec<Vec<String>>> {
    let mut records = Vec::with_capacity(lines.len());
    let mut width = None;

    for line in lines {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .delimiter(delimiter)
            .from_reader(line.as_bytes());
        let record = reader.records().next()?.ok()?;
        let fields: Vec<String> = record.iter().map(str::to_string).collect();

        if fields.len() < 2 || width.is_some_and(|w| w != fields.len()) {
            return None;
        }
        width = Some(fields.len());
        records.push(fields);
    }

    Some(records)
}

fn valid_header(header: &[String]) -> bool {
    let mut seen = std::collections::HashSet::new();
    header
        .iter()
        .all(|name| !name.is_empty() && seen.insert(name.as_str()))
}
