//! CSV output.

use csv::{Terminator, WriterBuilder};

use crate::convert::ContentSerializer;
use crate::error::{Error, Result};
use crate::model::{ExtractedContent, Table, TargetFormat};

use super::options::RenderOptions;
use super::unexpected_content;

const TARGET: TargetFormat = TargetFormat::Csv;

/// Writes a table as delimited text with a header row.
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvSerializer;

impl ContentSerializer for CsvSerializer {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn target(&self) -> TargetFormat {
        TARGET
    }

    fn serialize(&self, content: &ExtractedContent, options: &RenderOptions) -> Result<Vec<u8>> {
        match content {
            ExtractedContent::Table(table) => write_csv(table, options.csv_delimiter),
            other => Err(unexpected_content(TARGET, "table", other)),
        }
    }
}

/// Write the header then every row. Missing cells become empty fields.
pub(crate) fn write_csv(table: &Table, delimiter: u8) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer
        .write_record(table.column_names())
        .map_err(|e| Error::serialization(TARGET, e))?;
    for row in table.rows() {
        writer
            .write_record(row.iter().map(|cell| cell.to_string()))
            .map_err(|e| Error::serialization(TARGET, e))?;
    }

    writer
        .into_inner()
        .map_err(|e| Error::serialization(TARGET, e.error()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cell, TextContent};

    #[test]
    fn test_write_csv() {
        let table = Table::from_rows(
            vec!["name".into(), "score".into()],
            vec![
                vec![Cell::Text("a, b".into()), Cell::Number(1.0)],
                vec![Cell::Text("c".into()), Cell::Missing],
                vec![Cell::Text("d".into()), Cell::Number(2.5)],
            ],
        );

        let bytes = write_csv(&table, b',').unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "name,score\n\"a, b\",1\nc,\nd,2.5\n"
        );
    }

    #[test]
    fn test_custom_delimiter() {
        let table = Table::from_rows(
            vec!["a".into(), "b".into()],
            vec![vec![Cell::Number(1.0), Cell::Number(2.0)]],
        );
        let bytes = write_csv(&table, b';').unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "a;b\n1;2\n");
    }

    #[test]
    fn test_rejects_text() {
        let content = ExtractedContent::Text(TextContent::from_text("hello"));
        let result = CsvSerializer.serialize(&content, &RenderOptions::default());
        assert!(matches!(
            result,
            Err(Error::Serialization {
                target: TargetFormat::Csv,
                ..
            })
        ));
    }
}
