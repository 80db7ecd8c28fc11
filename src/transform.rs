//! Tabular cleaning operations.
//!
//! Each operation takes a table and returns a new one, so they can be
//! combined in any order. Nothing here runs unless the caller asks for it.

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::model::{Cell, Column, ColumnType, Table};

/// Explicit cleaning choices for one table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformOptions {
    /// Drop rows that repeat an earlier row
    pub remove_duplicates: bool,

    /// Fill missing numeric cells with the column mean
    pub fill_missing_numeric: bool,

    /// Keep only these columns, in this order
    pub columns: Option<Vec<String>>,
}

impl TransformOptions {
    /// Create options that change nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable duplicate removal.
    pub fn remove_duplicates(mut self, enabled: bool) -> Self {
        self.remove_duplicates = enabled;
        self
    }

    /// Enable mean imputation.
    pub fn fill_missing_numeric(mut self, enabled: bool) -> Self {
        self.fill_missing_numeric = enabled;
        self
    }

    /// Restrict the table to the given columns.
    pub fn with_columns<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Check if no operation is requested.
    pub fn is_noop(&self) -> bool {
        !self.remove_duplicates && !self.fill_missing_numeric && self.columns.is_none()
    }
}

/// Run the requested operations: deduplicate, then fill, then project.
pub fn apply(table: &Table, options: &TransformOptions) -> Result<Table> {
    let mut result = table.clone();
    if options.remove_duplicates {
        result = remove_duplicates(&result);
    }
    if options.fill_missing_numeric {
        result = fill_missing_numeric(&result);
    }
    if let Some(ref columns) = options.columns {
        result = project_columns(&result, columns)?;
    }
    Ok(result)
}

/// Hashable identity of a cell. Numbers compare by value, so `0.0` and
/// `-0.0` are the same key.
#[derive(PartialEq, Eq, Hash)]
enum CellKey<'a> {
    Missing,
    Number(u64),
    Text(&'a str),
}

impl<'a> From<&'a Cell> for CellKey<'a> {
    fn from(cell: &'a Cell) -> Self {
        match cell {
            Cell::Missing => CellKey::Missing,
            Cell::Number(v) if *v == 0.0 => CellKey::Number(0),
            Cell::Number(v) => CellKey::Number(v.to_bits()),
            Cell::Text(s) => CellKey::Text(s),
        }
    }
}

/// Drop rows equal in every column to an earlier row. The first occurrence
/// wins and surviving rows keep their order.
pub fn remove_duplicates(table: &Table) -> Table {
    let mut seen: HashSet<Vec<CellKey<'_>>> = HashSet::with_capacity(table.row_count());
    let keep: Vec<bool> = table
        .rows()
        .map(|row| seen.insert(row.into_iter().map(CellKey::from).collect()))
        .collect();

    let mut result = table.clone();
    result.retain_rows(&keep);

    let dropped = table.row_count() - result.row_count();
    if dropped > 0 {
        log::debug!("Removed {} duplicate rows", dropped);
    }
    result
}

/// Replace missing cells of numeric columns with the column mean.
///
/// Text columns and columns without any value are returned unchanged.
pub fn fill_missing_numeric(table: &Table) -> Table {
    let columns = table
        .columns
        .iter()
        .map(|column| {
            if column.column_type() != ColumnType::Numeric {
                return column.clone();
            }
            match column.mean() {
                Some(mean) => Column::new(
                    column.name.clone(),
                    column
                        .cells
                        .iter()
                        .map(|cell| match cell {
                            Cell::Missing => Cell::Number(mean),
                            other => other.clone(),
                        })
                        .collect(),
                ),
                None => column.clone(),
            }
        })
        .collect();

    Table { columns }
}

/// Keep only the named columns, in the requested order. Each name may be
/// requested once.
pub fn project_columns<S: AsRef<str>>(table: &Table, names: &[S]) -> Result<Table> {
    let mut seen = HashSet::with_capacity(names.len());
    let columns = names
        .iter()
        .map(|name| {
            let name = name.as_ref();
            if !seen.insert(name) {
                return Err(Error::DuplicateColumn(name.to_string()));
            }
            table
                .column(name)
                .cloned()
                .ok_or_else(|| Error::UnknownColumn(name.to_string()))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Table { columns })
}
