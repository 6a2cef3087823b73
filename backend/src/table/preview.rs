//! Table snapshot: shape, column types, and the first few rows.

use serde::{Deserialize, Serialize};

use super::{DataType, Table};

/// Rows shown by default, same as a `head()` call.
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// Summary of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSummary {
    pub name: String,
    pub data_type: DataType,
    pub missing: usize,
}

/// What a user sees before deciding how to clean and convert a file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TablePreview {
    pub row_count: usize,
    pub column_count: usize,
    pub columns: Vec<ColumnSummary>,
    /// First rows, rendered as text. Missing cells are empty strings.
    pub head: Vec<Vec<String>>,
}

pub fn preview(table: &Table, rows: usize) -> TablePreview {
    let columns = table
        .columns()
        .iter()
        .map(|c| ColumnSummary {
            name: c.name().to_string(),
            data_type: c.dtype(),
            missing: c.missing_count(),
        })
        .collect();

    let head = table
        .rows()
        .take(rows)
        .map(|row| row.into_iter().map(ToString::to_string).collect())
        .collect();

    TablePreview {
        row_count: table.row_count(),
        column_count: table.column_count(),
        columns,
        head,
    }
}

impl TablePreview {
    /// Plain-text rendering for terminals: aligned snapshot, then types.
    pub fn render(&self) -> String {
        let names: Vec<&str> = self.columns.iter().map(|c| c.name.as_str()).collect();
        let widths: Vec<usize> = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                self.head
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|v| v.chars().count())
                    .chain(std::iter::once(name.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = String::new();
        out.push_str(&format_row(names.iter().copied(), &widths));
        out.push('\n');
        for row in &self.head {
            out.push_str(&format_row(row.iter().map(String::as_str), &widths));
            out.push('\n');
        }

        out.push_str(&format!(
            "[{} rows x {} columns]\n",
            self.row_count, self.column_count
        ));
        for column in &self.columns {
            out.push_str(&format!(
                "{}: {} ({} missing)\n",
                column.name, column.data_type, column.missing
            ));
        }
        out
    }
}

fn format_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}
