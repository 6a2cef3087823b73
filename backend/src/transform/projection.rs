//! Column projection.

use std::collections::HashSet;

use crate::error::{TableError, TableResult};
use crate::table::Table;

/// Keep only the `selected` columns, in the order given.
///
/// Rows are untouched. A name listed twice is kept once, at its first
/// position. Fails with [`TableError::UnknownColumn`] on the first name the
/// table does not have.
pub fn project<S: AsRef<str>>(table: Table, selected: &[S]) -> TableResult<Table> {
    let mut seen = HashSet::with_capacity(selected.len());
    let mut indices = Vec::with_capacity(selected.len());

    for name in selected.iter().map(|s| s.as_ref()) {
        if !seen.insert(name) {
            continue;
        }
        let index = table
            .columns()
            .iter()
            .position(|c| c.name() == name)
            .ok_or_else(|| TableError::UnknownColumn(name.to_string()))?;
        indices.push(index);
    }

    let (columns, row_count) = table.into_parts();
    let mut slots: Vec<_> = columns.into_iter().map(Some).collect();
    let columns = indices.into_iter().filter_map(|i| slots[i].take()).collect();

    Ok(Table::from_parts(columns, row_count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Cell, Column};

    fn sample() -> Table {
        Table::new(vec![
            Column::integers("a", vec![Some(1), Some(2), Some(3)]),
            Column::texts("b", vec![Some("x"), None, Some("z")]),
            Column::floats("c", vec![Some(0.5), Some(1.5), None]),
        ])
        .unwrap()
    }

    #[test]
    fn test_project_reorders_columns_only() {
        let projected = project(sample(), &["c", "a"]).unwrap();
        assert_eq!(projected.column_names(), vec!["c", "a"]);
        assert_eq!(projected.row_count(), 3);
        assert_eq!(
            projected.column("a").unwrap().cells(),
            &[Cell::Integer(1), Cell::Integer(2), Cell::Integer(3)]
        );
    }

    #[test]
    fn test_project_all_in_order_is_noop() {
        assert_eq!(project(sample(), &["a", "b", "c"]).unwrap(), sample());
    }

    #[test]
    fn test_project_unknown_column() {
        let err = project(sample(), &["a", "missing", "also_missing"]).unwrap_err();
        assert_eq!(err, TableError::UnknownColumn("missing".into()));
    }

    #[test]
    fn test_project_repeated_name_kept_once() {
        let projected = project(sample(), &["b", "a", "b"]).unwrap();
        assert_eq!(projected.column_names(), vec!["b", "a"]);
    }

    #[test]
    fn test_project_owned_names() {
        let names = vec!["b".to_string()];
        let projected = project(sample(), &names).unwrap();
        assert_eq!(projected.column_count(), 1);
        assert_eq!(projected.row_count(), 3);
    }
}
