//! Delimited (CSV) extraction.

use std::io::Cursor;

use crate::error::Result;
use crate::model::{Cell, Table};

use super::ExtractOptions;

/// Parse CSV bytes into a table. The first record is the header.
///
/// Rows whose field count differs from the header are rejected.
pub(crate) fn parse_csv(data: &[u8], options: &ExtractOptions) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(options.csv_delimiter)
        .from_reader(Cursor::new(strip_bom(data)));

    let header: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(Cell::parse).collect());
    }

    log::debug!("Parsed CSV: {} columns, {} rows", header.len(), rows.len());
    Ok(Table::from_rows(unique_headers(header), rows))
}

/// Make header names unique and non-blank.
///
/// Blank names become `Unnamed: <index>`; repeats get `.1`, `.2`, ...
/// appended, skipping suffixes that are already taken.
pub(crate) fn unique_headers(names: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(names.len());
    for (index, name) in names.into_iter().enumerate() {
        let base = if name.trim().is_empty() {
            format!("Unnamed: {}", index)
        } else {
            name
        };

        let mut candidate = base.clone();
        let mut suffix = 1;
        while seen.contains(&candidate) {
            candidate = format!("{}.{}", base, suffix);
            suffix += 1;
        }
        seen.push(candidate);
    }
    seen
}

fn strip_bom(data: &[u8]) -> &[u8] {
    data.strip_prefix(b"\xEF\xBB\xBF".as_slice()).unwrap_or(data)
}
