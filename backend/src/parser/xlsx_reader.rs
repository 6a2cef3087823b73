//! Excel workbook input (first worksheet only).

use calamine::{Data, DataType as _, Reader, Xlsx};
use std::io::Cursor;

use crate::error::{ParseError, ParseResult};
use crate::table::infer::{is_missing_marker, normalize_headers};
use crate::table::{format_float, Cell, Column, DataType, Table};

/// Largest magnitude below which a whole float converts to `i64` exactly.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A workbook cell reduced to the kinds a column can hold.
#[derive(Debug, Clone, PartialEq)]
enum Value {
    Missing,
    Number(f64),
    Boolean(bool),
    Text(String),
}

/// Parse the first worksheet of an `.xlsx` workbook into a typed table.
///
/// The first row is the header. Numeric columns become Integer when every
/// value is whole, Float otherwise; columns mixing kinds become Text. Cells
/// holding spreadsheet errors are rejected.
pub fn parse_xlsx_bytes(bytes: &[u8]) -> ParseResult<Table> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(ParseError::NoWorksheet)??;

    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(Table::empty());
    };

    let names = normalize_headers(header.iter().map(header_text).collect());
    let mut values: Vec<Vec<Value>> = vec![Vec::new(); names.len()];

    for (r, row) in rows.enumerate() {
        for (c, column) in values.iter_mut().enumerate() {
            let value = match row.get(c) {
                Some(cell) => to_value(cell).map_err(|detail| ParseError::CellError {
                    cell: cell_reference(start_row as usize + r + 1, start_col as usize + c),
                    detail,
                })?,
                None => Value::Missing,
            };
            column.push(value);
        }
    }

    let row_count = values.first().map(Vec::len).unwrap_or(0);
    let columns = names
        .into_iter()
        .zip(values)
        .map(|(name, values)| build_column(name, values))
        .collect();

    Ok(Table::from_parts(columns, row_count))
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Empty => String::new(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < MAX_EXACT_INTEGER => {
            format!("{}", *f as i64)
        }
        other => other.to_string(),
    }
}

fn to_value(cell: &Data) -> Result<Value, String> {
    let value = match cell {
        Data::Empty => Value::Missing,
        Data::Int(i) => Value::Number(*i as f64),
        Data::Float(f) if f.is_nan() => Value::Missing,
        Data::Float(f) => Value::Number(*f),
        Data::Bool(b) => Value::Boolean(*b),
        Data::String(s) if is_missing_marker(s) => Value::Missing,
        Data::String(s) => Value::Text(s.clone()),
        Data::DateTime(_) => Value::Text(
            cell.as_datetime()
                .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| cell.to_string()),
        ),
        Data::Error(e) => return Err(e.to_string()),
        other => Value::Text(other.to_string()),
    };
    Ok(value)
}

fn build_column(name: String, values: Vec<Value>) -> Column {
    let present: Vec<&Value> = values.iter().filter(|v| **v != Value::Missing).collect();

    let all_numbers = !present.is_empty() && present.iter().all(|v| matches!(v, Value::Number(_)));
    let all_booleans = !present.is_empty() && present.iter().all(|v| matches!(v, Value::Boolean(_)));

    if all_numbers {
        let all_whole = present.iter().all(|v| match v {
            Value::Number(f) => f.fract() == 0.0 && f.abs() < MAX_EXACT_INTEGER,
            _ => false,
        });
        let (dtype, cells) = if all_whole {
            let cells = values
                .into_iter()
                .map(|v| match v {
                    Value::Number(f) => Cell::Integer(f as i64),
                    _ => Cell::Missing,
                })
                .collect();
            (DataType::Integer, cells)
        } else {
            let cells = values
                .into_iter()
                .map(|v| match v {
                    Value::Number(f) => Cell::Float(f),
                    _ => Cell::Missing,
                })
                .collect();
            (DataType::Float, cells)
        };
        return Column::from_parts(name, dtype, cells);
    }

    if all_booleans {
        let cells = values
            .into_iter()
            .map(|v| match v {
                Value::Boolean(b) => Cell::Boolean(b),
                _ => Cell::Missing,
            })
            .collect();
        return Column::from_parts(name, DataType::Boolean, cells);
    }

    let cells = values
        .into_iter()
        .map(|v| match v {
            Value::Missing => Cell::Missing,
            Value::Number(f) if f.fract() == 0.0 && f.abs() < MAX_EXACT_INTEGER => {
                Cell::Text((f as i64).to_string())
            }
            Value::Number(f) => Cell::Text(format_float(f)),
            Value::Boolean(b) => Cell::Text(b.to_string()),
            Value::Text(s) => Cell::Text(s),
        })
        .collect();
    Column::from_parts(name, DataType::Text, cells)
}

/// A1-style reference for a zero-based (row, column) position.
pub(crate) fn cell_reference(row: usize, column: usize) -> String {
    format!("{}{}", column_letter(column), row + 1)
}

/// Spreadsheet column letters: 0 → A, 25 → Z, 26 → AA.
pub(crate) fn column_letter(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_letter() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
        assert_eq!(column_letter(27), "AB");
        assert_eq!(column_letter(701), "ZZ");
        assert_eq!(column_letter(702), "AAA");
        assert_eq!(cell_reference(1, 2), "C2");
    }

    #[test]
    fn test_whole_numbers_become_integers() {
        let column = build_column(
            "n".into(),
            vec![Value::Number(1.0), Value::Missing, Value::Number(3.0)],
        );
        assert_eq!(column.dtype(), DataType::Integer);
        assert_eq!(column.cells(), &[Cell::Integer(1), Cell::Missing, Cell::Integer(3)]);
    }

    #[test]
    fn test_fractional_numbers_stay_float() {
        let column = build_column("n".into(), vec![Value::Number(1.0), Value::Number(2.5)]);
        assert_eq!(column.dtype(), DataType::Float);
    }

    #[test]
    fn test_mixed_kinds_become_text() {
        let column = build_column(
            "m".into(),
            vec![Value::Number(7.0), Value::Text("x".into()), Value::Boolean(true)],
        );
        assert_eq!(column.dtype(), DataType::Text);
        assert_eq!(
            column.cells(),
            &[Cell::Text("7".into()), Cell::Text("x".into()), Cell::Text("true".into())]
        );
    }

    #[test]
    fn test_all_missing_is_text() {
        let column = build_column("e".into(), vec![Value::Missing, Value::Missing]);
        assert_eq!(column.dtype(), DataType::Text);
        assert_eq!(column.missing_count(), 2);
    }

    #[test]
    fn test_error_cells_are_rejected() {
        let cell = Data::Error(calamine::CellErrorType::Div0);
        assert!(to_value(&cell).is_err());
        assert_eq!(to_value(&Data::String("NA".into())), Ok(Value::Missing));
    }

    #[test]
    fn test_corrupt_workbook() {
        let err = parse_xlsx_bytes(b"definitely not a zip archive").unwrap_err();
        assert!(matches!(err, ParseError::Workbook(_)));
    }
}
