//! Type inference for text cells, shared by the CSV and Excel readers.

use std::collections::HashSet;

use super::{Cell, Column, DataType};

/// Cell contents read as missing.
pub const MISSING_MARKERS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "null", "NULL", "None", "#N/A", "<NA>",
];

pub fn is_missing_marker(value: &str) -> bool {
    MISSING_MARKERS.contains(&value)
}

fn parse_bool(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Pick the narrowest type every non-missing value parses as.
///
/// Integer, then Float, then Boolean, then Text. A column with nothing but
/// missing values is Text.
pub fn infer_data_type<S: AsRef<str>>(values: &[S]) -> DataType {
    let present: Vec<&str> = values
        .iter()
        .map(|v| v.as_ref())
        .filter(|v| !is_missing_marker(v))
        .map(str::trim)
        .collect();
    // Other spellings of NaN (`NAN`, `+nan`, ...) count as gaps in numeric columns
    let numbers: Vec<&str> = present.iter().copied().filter(|v| !is_nan_text(v)).collect();

    if present.is_empty() {
        DataType::Text
    } else if !numbers.is_empty() && numbers.iter().all(|v| v.parse::<i64>().is_ok()) {
        DataType::Integer
    } else if present.iter().all(|v| v.parse::<f64>().is_ok()) {
        DataType::Float
    } else if present.iter().all(|v| parse_bool(v).is_some()) {
        DataType::Boolean
    } else {
        DataType::Text
    }
}

fn is_nan_text(value: &str) -> bool {
    value.parse::<f64>().is_ok_and(f64::is_nan)
}

fn parse_cell(value: String, dtype: DataType) -> Cell {
    if is_missing_marker(&value) {
        return Cell::Missing;
    }
    let trimmed = value.trim();
    match dtype {
        DataType::Integer => trimmed.parse().map(Cell::Integer).unwrap_or(Cell::Missing),
        DataType::Float => match trimmed.parse::<f64>() {
            Ok(f) if !f.is_nan() => Cell::Float(f),
            _ => Cell::Missing,
        },
        DataType::Boolean => parse_bool(trimmed).map(Cell::Boolean).unwrap_or(Cell::Missing),
        DataType::Text => Cell::Text(value),
    }
}

/// Build a typed column from raw text values.
pub fn column_from_text(name: String, values: Vec<String>) -> Column {
    let dtype = infer_data_type(&values);
    let cells = values.into_iter().map(|v| parse_cell(v, dtype)).collect();
    Column::from_parts(name, dtype, cells)
}

/// Make raw header names usable as column names.
///
/// Blank headers become `Unnamed: <index>`; repeats get `.1`, `.2`, ...
/// suffixes so every name is unique.
pub fn normalize_headers(raw: Vec<String>) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::with_capacity(raw.len());
    let mut names = Vec::with_capacity(raw.len());

    for (index, header) in raw.into_iter().enumerate() {
        let base = if header.trim().is_empty() {
            format!("Unnamed: {}", index)
        } else {
            header
        };

        let mut name = base.clone();
        let mut suffix = 0;
        while taken.contains(&name) {
            suffix += 1;
            name = format!("{}.{}", base, suffix);
        }

        taken.insert(name.clone());
        names.push(name);
    }

    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_infer_integer_with_gaps() {
        assert_eq!(infer_data_type(&["1", "", "-3"]), DataType::Integer);
    }

    #[test]
    fn test_infer_float() {
        assert_eq!(infer_data_type(&["1", "2.5", "NaN"]), DataType::Float);
    }

    #[test]
    fn test_infer_boolean() {
        assert_eq!(infer_data_type(&["True", "false", ""]), DataType::Boolean);
    }

    #[test]
    fn test_infer_text_fallback() {
        assert_eq!(infer_data_type(&["1", "x"]), DataType::Text);
        assert_eq!(infer_data_type(&["", "NA"]), DataType::Text);
    }

    #[test]
    fn test_nan_spellings_are_missing() {
        assert_eq!(infer_data_type(&["1", "NAN", "+nan"]), DataType::Integer);

        let column = column_from_text("v".into(), strings(&["1.5", "NAN", "-nan", "Nan", "2"]));
        assert_eq!(column.dtype(), DataType::Float);
        assert_eq!(
            column.cells(),
            &[Cell::Float(1.5), Cell::Missing, Cell::Missing, Cell::Missing, Cell::Float(2.0)]
        );
    }

    #[test]
    fn test_column_from_text_marks_missing() {
        let column = column_from_text("v".into(), strings(&["10", "", " 7 "]));
        assert_eq!(column.dtype(), DataType::Integer);
        assert_eq!(column.cells(), &[Cell::Integer(10), Cell::Missing, Cell::Integer(7)]);
    }

    #[test]
    fn test_text_cells_keep_whitespace() {
        let column = column_from_text("t".into(), strings(&[" a ", "null"]));
        assert_eq!(column.cells(), &[Cell::Text(" a ".into()), Cell::Missing]);
    }

    #[test]
    fn test_normalize_headers() {
        let names = normalize_headers(strings(&["id", "", "id", "id", "id.1"]));
        assert_eq!(names, vec!["id", "Unnamed: 1", "id.1", "id.2", "id.1.1"]);
    }
}
