//! In-memory table model.
//!
//! A [`Table`] is an ordered list of named, typed [`Column`]s of equal
//! length. Each column is homogeneous: every cell is either
//! [`Cell::Missing`] or a value of the column's [`DataType`].
//!
//! - [`infer`] - turns raw text cells into typed columns
//! - [`preview`] - row snapshot and per-column summary

pub mod infer;
pub mod preview;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::error::{TableError, TableResult};

pub use preview::{preview, ColumnSummary, TablePreview, DEFAULT_PREVIEW_ROWS};

// =============================================================================
// Data Types
// =============================================================================

/// Declared or inferred type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// 64-bit signed integers.
    Integer,
    /// 64-bit floats.
    Float,
    /// `true` / `false`.
    Boolean,
    /// Anything else.
    Text,
}

impl DataType {
    /// Integer and Float columns are numeric.
    pub fn is_numeric(self) -> bool {
        matches!(self, DataType::Integer | DataType::Float)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DataType::Integer => "integer",
            DataType::Float => "float",
            DataType::Boolean => "boolean",
            DataType::Text => "text",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Cells
// =============================================================================

/// A single table value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Missing,
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Text(String),
}

impl Cell {
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// Numeric value of the cell, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Integer(i) => Some(*i as f64),
            Cell::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Whether the cell may live in a column of type `dtype`.
    pub fn fits(&self, dtype: DataType) -> bool {
        matches!(
            (self, dtype),
            (Cell::Missing, _)
                | (Cell::Integer(_), DataType::Integer)
                | (Cell::Float(_), DataType::Float)
                | (Cell::Boolean(_), DataType::Boolean)
                | (Cell::Text(_), DataType::Text)
        )
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Integer(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Float(value)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Boolean(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Cell::Missing)
    }
}

/// Text form used by CSV export and previews. Missing renders as empty.
impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Missing => Ok(()),
            Cell::Integer(i) => write!(f, "{}", i),
            Cell::Float(x) => f.write_str(&format_float(*x)),
            Cell::Boolean(b) => write!(f, "{}", b),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

/// Whole floats keep a trailing `.0` so they read back as floats.
pub fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

// =============================================================================
// Columns
// =============================================================================

/// A named, homogeneous sequence of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    dtype: DataType,
    cells: Vec<Cell>,
}

impl Column {
    /// Build a column, checking that every cell fits `dtype`.
    pub fn new(name: impl Into<String>, dtype: DataType, cells: Vec<Cell>) -> TableResult<Self> {
        let name = name.into();
        if let Some(row) = cells.iter().position(|c| !c.fits(dtype)) {
            return Err(TableError::TypeMismatch {
                column: name,
                row,
                expected: dtype,
            });
        }
        Ok(Self { name, dtype, cells })
    }

    /// Caller guarantees every cell fits `dtype`.
    pub(crate) fn from_parts(name: String, dtype: DataType, cells: Vec<Cell>) -> Self {
        debug_assert!(cells.iter().all(|c| c.fits(dtype)));
        Self { name, dtype, cells }
    }

    pub fn integers(name: impl Into<String>, values: Vec<Option<i64>>) -> Self {
        Self::from_parts(name.into(), DataType::Integer, values.into_iter().map(Cell::from).collect())
    }

    pub fn floats(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self::from_parts(name.into(), DataType::Float, values.into_iter().map(Cell::from).collect())
    }

    pub fn booleans(name: impl Into<String>, values: Vec<Option<bool>>) -> Self {
        Self::from_parts(name.into(), DataType::Boolean, values.into_iter().map(Cell::from).collect())
    }

    pub fn texts(name: impl Into<String>, values: Vec<Option<&str>>) -> Self {
        Self::from_parts(name.into(), DataType::Text, values.into_iter().map(Cell::from).collect())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dtype(&self) -> DataType {
        self.dtype
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn missing_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_missing()).count()
    }

    /// New column holding only the rows at `indices`, in that order.
    pub(crate) fn take(&self, indices: &[usize]) -> Self {
        let cells = indices
            .iter()
            .filter_map(|&i| self.cells.get(i).cloned())
            .collect();
        Self::from_parts(self.name.clone(), self.dtype, cells)
    }

    /// Convert an Integer column to Float in place.
    pub(crate) fn cast_to_float(&mut self) {
        if self.dtype != DataType::Integer {
            return;
        }
        for cell in &mut self.cells {
            if let Cell::Integer(i) = *cell {
                *cell = Cell::Float(i as f64);
            }
        }
        self.dtype = DataType::Float;
    }

    /// Replace every missing cell with `value`. Returns how many were filled.
    pub(crate) fn fill_missing(&mut self, value: Cell) -> usize {
        debug_assert!(value.fits(self.dtype));
        let mut filled = 0;
        for cell in self.cells.iter_mut().filter(|c| c.is_missing()) {
            *cell = value.clone();
            filled += 1;
        }
        filled
    }
}

// =============================================================================
// Tables
// =============================================================================

/// An ordered set of uniquely named columns with a common row count.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Build a table, enforcing unique names and equal column lengths.
    pub fn new(columns: Vec<Column>) -> TableResult<Self> {
        let row_count = columns.first().map(Column::len).unwrap_or(0);
        let mut seen = HashSet::with_capacity(columns.len());

        for column in &columns {
            if !seen.insert(column.name()) {
                return Err(TableError::DuplicateColumn(column.name().to_string()));
            }
            if column.len() != row_count {
                return Err(TableError::LengthMismatch {
                    column: column.name().to_string(),
                    expected: row_count,
                    found: column.len(),
                });
            }
        }

        Ok(Self { columns, row_count })
    }

    /// Caller guarantees the table invariants hold.
    pub(crate) fn from_parts(columns: Vec<Column>, row_count: usize) -> Self {
        debug_assert!(columns.iter().all(|c| c.len() == row_count));
        Self { columns, row_count }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    /// Cells of row `index`, in column order.
    pub fn row(&self, index: usize) -> Option<Vec<&Cell>> {
        if index >= self.row_count {
            return None;
        }
        Some(self.columns.iter().map(|c| &c.cells()[index]).collect())
    }

    pub fn rows(&self) -> impl Iterator<Item = Vec<&Cell>> + '_ {
        (0..self.row_count).filter_map(move |i| self.row(i))
    }

    /// Missing cells across all numeric columns.
    pub fn missing_numeric_count(&self) -> usize {
        self.columns
            .iter()
            .filter(|c| c.dtype().is_numeric())
            .map(Column::missing_count)
            .sum()
    }

    /// New table holding only the rows at `indices`, in that order.
    pub(crate) fn take_rows(&self, indices: &[usize]) -> Self {
        let columns = self.columns.iter().map(|c| c.take(indices)).collect();
        Self::from_parts(columns, indices.len())
    }

    pub(crate) fn into_parts(self) -> (Vec<Column>, usize) {
        (self.columns, self.row_count)
    }
}
