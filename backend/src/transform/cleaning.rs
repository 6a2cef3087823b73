//! Cleaning operations: duplicate-row removal and numeric mean imputation.
//!
//! Both are pure `Table -> Table` functions that never fail.

use std::collections::HashSet;

use crate::table::{Cell, Column, DataType, Table};

/// Hashable view of a cell. Missing equals missing; floats compare by bit
/// pattern after folding `-0.0` into `0.0` and every NaN into one value.
#[derive(PartialEq, Eq, Hash)]
enum CellKey<'a> {
    Missing,
    Integer(i64),
    Float(u64),
    Boolean(bool),
    Text(&'a str),
}

impl<'a> From<&'a Cell> for CellKey<'a> {
    fn from(cell: &'a Cell) -> Self {
        match cell {
            Cell::Missing => CellKey::Missing,
            Cell::Integer(i) => CellKey::Integer(*i),
            Cell::Float(f) if *f == 0.0 => CellKey::Float(0.0f64.to_bits()),
            Cell::Float(f) if f.is_nan() => CellKey::Float(f64::NAN.to_bits()),
            Cell::Float(f) => CellKey::Float(f.to_bits()),
            Cell::Boolean(b) => CellKey::Boolean(*b),
            Cell::Text(s) => CellKey::Text(s),
        }
    }
}

/// Drop rows that repeat an earlier row across every column.
///
/// The first occurrence is kept and surviving rows keep their order.
pub fn deduplicate(table: Table) -> Table {
    let keep: Vec<usize> = {
        let mut seen: HashSet<Vec<CellKey<'_>>> = HashSet::with_capacity(table.row_count());
        table
            .rows()
            .enumerate()
            .filter(|(_, row)| seen.insert(row.iter().map(|c| CellKey::from(*c)).collect()))
            .map(|(i, _)| i)
            .collect()
    };

    if keep.len() == table.row_count() {
        table
    } else {
        table.take_rows(&keep)
    }
}

/// Fill missing cells in numeric columns with the mean of that column's
/// present values.
///
/// Non-numeric columns are untouched. A column with no present values keeps
/// its missing cells. An Integer column whose mean is fractional becomes a
/// Float column.
pub fn fill_missing_numeric(table: Table) -> Table {
    let (columns, row_count) = table.into_parts();
    let columns = columns.into_iter().map(fill_column).collect();
    Table::from_parts(columns, row_count)
}

/// Arithmetic mean of the present numeric values, `None` when there are none.
///
/// NaN cells are not values and are skipped.
pub fn column_mean(column: &Column) -> Option<f64> {
    if column.dtype() == DataType::Integer {
        return integer_sum(column).map(|(sum, count)| sum as f64 / count as f64);
    }

    let (sum, count) = column
        .cells()
        .iter()
        .filter_map(Cell::as_f64)
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    (count > 0).then(|| sum / count as f64)
}

/// Exact sum and count of an Integer column's present cells.
fn integer_sum(column: &Column) -> Option<(i128, i128)> {
    let (sum, count) = column
        .cells()
        .iter()
        .filter_map(|c| match c {
            Cell::Integer(i) => Some(*i as i128),
            _ => None,
        })
        .fold((0i128, 0i128), |(sum, count), v| (sum + v, count + 1));

    (count > 0).then_some((sum, count))
}

fn fill_column(mut column: Column) -> Column {
    if !column.dtype().is_numeric() || column.missing_count() == 0 {
        return column;
    }

    let fill = match column.dtype() {
        DataType::Integer => {
            let Some((sum, count)) = integer_sum(&column) else {
                return column;
            };
            // A mean of i64 values always fits in i64
            if sum % count == 0 {
                Cell::Integer((sum / count) as i64)
            } else {
                column.cast_to_float();
                Cell::Float(sum as f64 / count as f64)
            }
        }
        _ => match column_mean(&column) {
            Some(mean) => Cell::Float(mean),
            None => return column,
        },
    };

    column.fill_missing(fill);
    column
}
