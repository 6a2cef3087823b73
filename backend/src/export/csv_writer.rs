//! Comma-separated output.

use crate::error::{ExportError, ExportResult};
use crate::table::Table;

/// Header row of column names, then one line per row, `\n` terminated.
///
/// Missing cells are empty fields; fields are quoted only when needed.
pub fn write_csv(table: &Table) -> ExportResult<Vec<u8>> {
    if table.column_count() == 0 {
        return Ok(Vec::new());
    }

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(table.column_names())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(|cell| cell.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_csv_bytes;
    use crate::table::Column;

    #[test]
    fn test_quotes_when_needed() {
        let table = Table::new(vec![
            Column::texts("full, name", vec![Some("Smith, Al"), Some("say \"hi\"")]),
            Column::floats("v", vec![Some(3.0), None]),
        ])
        .unwrap();

        let text = String::from_utf8(write_csv(&table).unwrap()).unwrap();
        assert_eq!(
            text,
            "\"full, name\",v\n\"Smith, Al\",3.0\n\"say \"\"hi\"\"\",\n"
        );
    }

    #[test]
    fn test_csv_round_trip() {
        let table = Table::new(vec![
            Column::integers("id", vec![Some(1), Some(2), None]),
            Column::floats("price", vec![Some(10.0), Some(2.75), None]),
            Column::booleans("paid", vec![Some(true), None, Some(false)]),
            Column::texts("city", vec![Some("Paris"), Some("São Paulo"), Some("a,b")]),
        ])
        .unwrap();

        let reloaded = parse_csv_bytes(&write_csv(&table).unwrap()).unwrap();
        assert_eq!(reloaded, table);
    }

    #[test]
    fn test_no_columns_writes_nothing() {
        assert!(write_csv(&Table::empty()).unwrap().is_empty());
    }
}
