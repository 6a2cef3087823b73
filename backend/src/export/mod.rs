//! Serializing tables into downloadable buffers.

pub mod csv_writer;
pub mod xlsx_writer;

use std::io::Cursor;

use crate::error::ExportResult;
use crate::format::Format;
use crate::table::Table;

pub use csv_writer::write_csv;
pub use xlsx_writer::write_xlsx;

/// A fully materialized output file.
#[derive(Debug, Clone, PartialEq)]
pub struct Exported {
    pub format: Format,
    pub media_type: &'static str,
    pub bytes: Vec<u8>,
}

impl Exported {
    /// Reader positioned at offset zero.
    pub fn reader(&self) -> Cursor<&[u8]> {
        Cursor::new(&self.bytes)
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Encode `table` as `target`. No index column is written in either format.
pub fn export(table: &Table, target: Format) -> ExportResult<Exported> {
    let bytes = match target {
        Format::Csv => write_csv(table)?,
        Format::Excel => write_xlsx(table)?,
    };
    Ok(Exported {
        format: target,
        media_type: target.media_type(),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::load;
    use crate::table::{Column, DataType};
    use std::io::Read;

    fn sample() -> Table {
        Table::new(vec![
            Column::integers("a", vec![Some(1), Some(2)]),
            Column::texts("b", vec![Some("x"), Some("y")]),
        ])
        .unwrap()
    }

    #[test]
    fn test_export_csv_exact_bytes() {
        let exported = export(&sample(), Format::Csv).unwrap();
        assert_eq!(exported.media_type, "text/csv");
        assert_eq!(String::from_utf8(exported.bytes).unwrap(), "a,b\n1,x\n2,y\n");
    }

    #[test]
    fn test_reader_starts_at_zero() {
        let exported = export(&sample(), Format::Csv).unwrap();
        let mut text = String::new();
        exported.reader().read_to_string(&mut text).unwrap();
        assert!(text.starts_with("a,b"));
    }

    #[test]
    fn test_excel_round_trip() {
        let table = Table::new(vec![
            Column::integers("id", vec![Some(1), Some(2), Some(3)]),
            Column::floats("score", vec![Some(1.5), None, Some(-0.25)]),
            Column::booleans("ok", vec![Some(true), Some(false), None]),
            Column::texts("note", vec![Some("a & b"), Some("<tag>"), Some("two words")]),
        ])
        .unwrap();

        let exported = export(&table, Format::Excel).unwrap();
        assert_eq!(
            exported.media_type,
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );

        let reloaded = load(&exported.bytes, ".xlsx").unwrap();
        assert_eq!(reloaded, table);
        assert_eq!(reloaded.column("score").unwrap().dtype(), DataType::Float);
    }
}
