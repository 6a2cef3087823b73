//! Comma-separated input.

use crate::error::{ParseError, ParseResult};
use crate::table::infer::{column_from_text, normalize_headers};
use crate::table::Table;

use super::{decode_content, detect_encoding};

/// Parse CSV bytes, auto-detecting their text encoding.
pub fn parse_csv_bytes(bytes: &[u8]) -> ParseResult<Table> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding);
    parse_csv_str(&content)
}

/// Parse CSV text into a typed table.
///
/// The first record is the header. Short rows are padded with missing
/// cells; a row with more fields than the header is rejected.
pub fn parse_csv_str(content: &str) -> ParseResult<Table> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    if content.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());
    let mut records = reader.records();

    let header = match records.next() {
        Some(record) => record?,
        None => return Err(ParseError::Empty),
    };
    let names = normalize_headers(header.iter().map(str::to_string).collect());
    let width = names.len();

    let mut columns: Vec<Vec<String>> = vec![Vec::new(); width];
    for record in records {
        let record = record?;
        if record.len() > width {
            return Err(ParseError::RaggedRow {
                line: record.position().map(|p| p.line()).unwrap_or(0),
                expected: width,
                found: record.len(),
            });
        }
        for (i, values) in columns.iter_mut().enumerate() {
            values.push(record.get(i).unwrap_or("").to_string());
        }
    }

    let row_count = columns.first().map(Vec::len).unwrap_or(0);
    let columns = names
        .into_iter()
        .zip(columns)
        .map(|(name, values)| column_from_text(name, values))
        .collect();

    Ok(Table::from_parts(columns, row_count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Cell, DataType};

    #[test]
    fn test_simple_csv() {
        let table = parse_csv_str("name,age\nAlice,30\nBob,25").unwrap();

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_names(), vec!["name", "age"]);
        let age = table.column("age").unwrap();
        assert_eq!(age.dtype(), DataType::Integer);
        assert_eq!(age.cells(), &[Cell::Integer(30), Cell::Integer(25)]);
    }

    #[test]
    fn test_quoted_values() {
        let table = parse_csv_str("name,value\n\"Smith, Alice\",\"say \"\"hi\"\"\"\n").unwrap();
        assert_eq!(
            table.column("name").unwrap().cells(),
            &[Cell::Text("Smith, Alice".into())]
        );
        assert_eq!(
            table.column("value").unwrap().cells(),
            &[Cell::Text("say \"hi\"".into())]
        );
    }

    #[test]
    fn test_short_rows_are_padded() {
        let table = parse_csv_str("a,b,c\n1,2\n4,5,6\n").unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column("c").unwrap().cells(), &[Cell::Missing, Cell::Integer(6)]);
    }

    #[test]
    fn test_long_row_is_rejected() {
        let err = parse_csv_str("a,b\n1,2\n3,4,5\n").unwrap_err();
        assert!(matches!(
            err,
            ParseError::RaggedRow { line: 3, expected: 2, found: 3 }
        ));
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(parse_csv_str(""), Err(ParseError::Empty)));
        assert!(matches!(parse_csv_bytes(b"  \n"), Err(ParseError::Empty)));
    }

    #[test]
    fn test_header_only() {
        let table = parse_csv_str("a,b\n").unwrap();
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.column("a").unwrap().dtype(), DataType::Text);
    }

    #[test]
    fn test_bom_is_stripped() {
        let table = parse_csv_bytes("\u{feff}id,v\n1,2\n".as_bytes()).unwrap();
        assert_eq!(table.column_names(), vec!["id", "v"]);
    }

    #[test]
    fn test_missing_markers_and_floats() {
        let table = parse_csv_str("id,val\n1,10\n2,NA\n3,2.5\n").unwrap();
        let val = table.column("val").unwrap();
        assert_eq!(val.dtype(), DataType::Float);
        assert_eq!(val.cells(), &[Cell::Float(10.0), Cell::Missing, Cell::Float(2.5)]);
    }

    #[test]
    fn test_duplicate_headers_are_renamed() {
        let table = parse_csv_str("x,x,\n1,2,3\n").unwrap();
        assert_eq!(table.column_names(), vec!["x", "x.1", "Unnamed: 2"]);
    }
}
