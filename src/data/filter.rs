use std::collections::{BTreeMap, BTreeSet};

use super::model::{CellValue, Table};
use super::normalize::NormalizedTable;

// ---------------------------------------------------------------------------
// Filter predicate: which values are selected per column
// ---------------------------------------------------------------------------

/// Columns the dashboard lets the user filter on.
pub const FILTERABLE_COLUMNS: [&str; 2] = ["Sex", "Pclass"];

/// Per-column selection state: maps column_name → set of selected values.
///
/// A filterable column missing from the selection is unconstrained; an
/// empty set for a column selects nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSelection {
    selected: BTreeMap<String, BTreeSet<CellValue>>,
}

impl FilterSelection {
    /// Select every distinct value of every filterable column (i.e., show
    /// everything).
    pub fn all_values(table: &Table) -> Self {
        let selected = FILTERABLE_COLUMNS
            .iter()
            .filter(|col| table.has_column(col))
            .map(|col| (col.to_string(), table.distinct_values(col).into_iter().collect()))
            .collect();
        Self { selected }
    }

    /// Builder-style constraint on one column.
    pub fn with<I, V>(mut self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        self.set(column, values.into_iter().map(Into::into).collect());
        self
    }

    pub fn set(&mut self, column: &str, values: BTreeSet<CellValue>) {
        self.selected.insert(column.to_string(), values);
    }

    pub fn get(&self, column: &str) -> Option<&BTreeSet<CellValue>> {
        self.selected.get(column)
    }

    pub fn is_selected(&self, column: &str, value: &CellValue) -> bool {
        self.selected
            .get(column)
            .map_or(true, |set| matches(set, value))
    }

    /// Toggle a single value in a column's selection. Deselecting text also
    /// drops its case variants, otherwise "1ST" would keep "1st" matching.
    pub fn toggle(&mut self, column: &str, value: &CellValue) {
        let selected = self.selected.entry(column.to_string()).or_default();
        if matches(selected, value) {
            selected.retain(|v| !same_value(v, value));
        } else {
            selected.insert(value.clone());
        }
    }

    /// Select all values of `column` present in `table`.
    pub fn select_all(&mut self, table: &Table, column: &str) {
        self.set(column, table.distinct_values(column).into_iter().collect());
    }

    /// Deselect all values in a column.
    pub fn select_none(&mut self, column: &str) {
        self.set(column, BTreeSet::new());
    }
}

/// Membership test. Text compares case-insensitively so a selection of
/// "female" matches the canonical "Female".
fn matches(selected: &BTreeSet<CellValue>, value: &CellValue) -> bool {
    selected.contains(value) || selected.iter().any(|sel| same_value(sel, value))
}

fn same_value(a: &CellValue, b: &CellValue) -> bool {
    match (a, b) {
        (CellValue::Text(x), CellValue::Text(y)) => x.eq_ignore_ascii_case(y),
        _ => a == b,
    }
}

/// Distinct values offered for each filterable column present in `table`,
/// in first-appearance order.
pub fn filter_options(table: &Table) -> Vec<(String, Vec<CellValue>)> {
    FILTERABLE_COLUMNS
        .iter()
        .filter(|col| table.has_column(col))
        .map(|col| (col.to_string(), table.distinct_values(col)))
        .collect()
}

// ---------------------------------------------------------------------------
// Filtered view
// ---------------------------------------------------------------------------

/// Rows of a [`NormalizedTable`] that pass a [`FilterSelection`], copied
/// into a new table.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredView {
    /// Positions of the kept rows in the source table.
    pub indices: Vec<usize>,
    pub table: Table,
}

impl std::ops::Deref for FilteredView {
    type Target = Table;

    fn deref(&self) -> &Table {
        &self.table
    }
}

/// Return indices of rows that pass all active filters.
///
/// A row passes a column filter when:
/// * The column is not filterable or not in the table → passes
/// * The selection does not constrain the column → passes
/// * The row's value for that column is in the selected set → passes
pub fn filtered_indices(table: &Table, selection: &FilterSelection) -> Vec<usize> {
    let active: Vec<(&[CellValue], &BTreeSet<CellValue>)> = FILTERABLE_COLUMNS
        .iter()
        .filter_map(|col| {
            let column = table.column(col)?;
            let selected = selection.get(col)?;
            Some((column.values.as_slice(), selected))
        })
        .collect();

    (0..table.len())
        .filter(|&row| active.iter().all(|(values, selected)| matches(selected, &values[row])))
        .collect()
}

/// Apply `selection` to `table`, producing a new view. The table itself is
/// never touched.
pub fn apply_filter(table: &NormalizedTable, selection: &FilterSelection) -> FilteredView {
    let indices = filtered_indices(table, selection);
    FilteredView {
        table: table.take(&indices),
        indices,
    }
}
