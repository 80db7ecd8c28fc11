//! Table types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A table of named columns.
///
/// All columns hold the same number of cells; row `i` is the `i`-th cell of
/// every column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Columns in display order
    pub columns: Vec<Column>,
}

impl Table {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from a header and row-major cells.
    ///
    /// Short rows are padded with missing cells and long rows are truncated
    /// to the header width. Header names are taken as given.
    pub fn from_rows(header: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let mut columns: Vec<Column> = header
            .into_iter()
            .map(|name| Column::new(name, Vec::with_capacity(rows.len())))
            .collect();

        for row in rows {
            let mut cells = row.into_iter();
            for column in columns.iter_mut() {
                column.cells.push(cells.next().unwrap_or(Cell::Missing));
            }
        }

        Self { columns }
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.columns.first().map(|c| c.cells.len()).unwrap_or(0)
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Check if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Column names in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Get a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Get a row by index.
    pub fn row(&self, index: usize) -> Option<Vec<&Cell>> {
        if index >= self.row_count() {
            return None;
        }
        Some(self.columns.iter().map(|c| &c.cells[index]).collect())
    }

    /// Iterate over rows.
    pub fn rows(&self) -> impl Iterator<Item = Vec<&Cell>> + '_ {
        (0..self.row_count()).map(move |i| self.columns.iter().map(|c| &c.cells[i]).collect())
    }

    /// Keep only the rows whose index satisfies `keep`.
    pub(crate) fn retain_rows(&mut self, keep: &[bool]) {
        for column in &mut self.columns {
            let mut flags = keep.iter();
            column.cells.retain(|_| *flags.next().unwrap_or(&true));
        }
    }

    /// A copy holding only the first `n` rows.
    pub fn head(&self, n: usize) -> Table {
        Table {
            columns: self
                .columns
                .iter()
                .map(|c| Column::new(c.name.clone(), c.cells.iter().take(n).cloned().collect()))
                .collect(),
        }
    }

    /// Render the table as text lines: the header line, then one line per
    /// row. Cells are tab-separated, missing cells are empty.
    pub fn text_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.row_count() + 1);
        lines.push(self.column_names().join("\t"));
        for row in self.rows() {
            lines.push(
                row.iter()
                    .map(|cell| cell.to_string())
                    .collect::<Vec<_>>()
                    .join("\t"),
            );
        }
        lines
    }
}

/// A named column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column header
    pub name: String,

    /// Cells, top to bottom
    pub cells: Vec<Cell>,
}

impl Column {
    /// Create a column.
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    /// Infer the column type from its non-missing cells.
    ///
    /// A column with no values at all counts as numeric, like an all-NaN
    /// float column.
    pub fn column_type(&self) -> ColumnType {
        let all_numeric = self
            .cells
            .iter()
            .all(|c| matches!(c, Cell::Number(_) | Cell::Missing));
        if all_numeric {
            ColumnType::Numeric
        } else {
            ColumnType::Text
        }
    }

    /// Number of missing cells.
    pub fn missing_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_missing()).count()
    }

    /// Mean of the numeric cells, if there are any.
    pub fn mean(&self) -> Option<f64> {
        let (sum, count) = self
            .cells
            .iter()
            .filter_map(Cell::as_number)
            .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
        if count == 0 {
            None
        } else {
            Some(sum / count as f64)
        }
    }
}

/// Inferred column type, used only to decide which cleaning steps apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Numeric,
    Text,
}

/// A scalar cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// No value
    Missing,
    /// A finite number
    Number(f64),
    /// Anything else
    Text(String),
}

impl Cell {
    /// Interpret a raw field.
    ///
    /// Empty fields are missing. A field is numeric when it parses as a
    /// finite number and is not zero-padded (`007` and `+5` stay text), so
    /// writing the cell back reproduces the same value. Integers that an
    /// `f64` cannot hold exactly, such as 17-digit identifiers, stay text.
    pub fn parse(field: &str) -> Self {
        if field.is_empty() {
            return Cell::Missing;
        }
        if looks_numeric(field) {
            if let Ok(value) = field.parse::<f64>() {
                if value.is_finite() && holds_exactly(field, value) {
                    return Cell::Number(value);
                }
            }
        }
        Cell::Text(field.to_string())
    }

    /// Check if the cell is missing.
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// Numeric value, if any.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Missing => Ok(()),
            Cell::Number(v) => f.write_str(&format_number(*v)),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

/// Format a number the shortest way that parses back to the same value.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// An integer literal must survive the trip through `f64` unchanged.
fn holds_exactly(field: &str, value: f64) -> bool {
    let digits = field.strip_prefix('-').unwrap_or(field);
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return true;
    }
    match field.parse::<i128>() {
        Ok(integer) => value as i128 == integer,
        Err(_) => false,
    }
}

fn looks_numeric(field: &str) -> bool {
    let digits = field.strip_prefix('-').unwrap_or(field);
    let first = match digits.chars().next() {
        Some(c) => c,
        None => return false,
    };
    if !(first.is_ascii_digit() || first == '.') {
        return false;
    }
    // Zero padding marks identifiers, not quantities.
    let bytes = digits.as_bytes();
    !(bytes.len() > 1 && bytes[0] == b'0' && bytes[1].is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_rows(
            vec!["name".into(), "age".into()],
            vec![
                vec![Cell::Text("Alice".into()), Cell::Number(30.0)],
                vec![Cell::Text("Bob".into())],
            ],
        )
    }

    #[test]
    fn test_table_new() {
        let table = Table::new();
        assert!(table.is_empty());
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.column_count(), 0);
    }

    #[test]
    fn test_from_rows_pads_short_rows() {
        let table = sample();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.row(1).unwrap()[1], &Cell::Missing);
        assert!(table.row(2).is_none());
    }

    #[test]
    fn test_cell_parse() {
        assert_eq!(Cell::parse(""), Cell::Missing);
        assert_eq!(Cell::parse("42"), Cell::Number(42.0));
        assert_eq!(Cell::parse("-1.5"), Cell::Number(-1.5));
        assert_eq!(Cell::parse("0.25"), Cell::Number(0.25));
        assert_eq!(Cell::parse("007"), Cell::Text("007".into()));
        assert_eq!(Cell::parse("+5"), Cell::Text("+5".into()));
        assert_eq!(Cell::parse("NaN"), Cell::Text("NaN".into()));
        assert_eq!(Cell::parse("inf"), Cell::Text("inf".into()));
        assert_eq!(Cell::parse("12 apples"), Cell::Text("12 apples".into()));
    }

    #[test]
    fn test_cell_parse_keeps_wide_integers() {
        assert_eq!(
            Cell::parse("9007199254740992"),
            Cell::Number(9_007_199_254_740_992.0)
        );
        assert_eq!(
            Cell::parse("9007199254740993"),
            Cell::Text("9007199254740993".into())
        );
        assert_eq!(
            Cell::parse("-12345678901234567"),
            Cell::Text("-12345678901234567".into())
        );
        assert_eq!(Cell::parse("1e20"), Cell::Number(1e20));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(-2.0), "-2");
        assert_eq!(format_number(2.5), "2.5");
    }

    #[test]
    fn test_column_type_and_mean() {
        let table = sample();
        let age = table.column("age").unwrap();
        assert_eq!(age.column_type(), ColumnType::Numeric);
        assert_eq!(age.mean(), Some(30.0));
        assert_eq!(age.missing_count(), 1);
        assert_eq!(
            table.column("name").unwrap().column_type(),
            ColumnType::Text
        );
    }

    #[test]
    fn test_text_lines() {
        let lines = sample().text_lines();
        assert_eq!(lines, vec!["name\tage", "Alice\t30", "Bob\t"]);
    }

    #[test]
    fn test_head() {
        let head = sample().head(1);
        assert_eq!(head.row_count(), 1);
        assert_eq!(head.column_count(), 2);
    }
}
