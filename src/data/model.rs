use std::collections::BTreeSet;
use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// CellValue – a single cell of a table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the dtypes a CSV column is inferred as.
/// Using `BTreeMap` / `BTreeSet` downstream so `CellValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// Missing value.
    Null,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                Text(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Text(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            // Whole floats keep one decimal so "22.0" reads as a float.
            CellValue::Float(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{v:.1}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{}", if *b { "True" } else { "False" }),
            CellValue::Null => write!(f, "NaN"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Integer(i)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Float(v)
    }
}

impl CellValue {
    /// Interpret the value as an `f64` for numeric statistics.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Whether the value is numeric (used to decide category ordering).
    pub fn is_numeric(&self) -> bool {
        matches!(self, CellValue::Integer(_) | CellValue::Float(_))
    }
}

// ---------------------------------------------------------------------------
// Column / Table
// ---------------------------------------------------------------------------

/// One named column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<CellValue>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<CellValue>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Number of missing cells.
    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_null()).count()
    }
}

#[derive(Debug, Error)]
#[error("column '{column}' has {found} rows but the table has {expected}")]
pub struct ShapeError {
    pub column: String,
    pub expected: usize,
    pub found: usize,
}

/// An ordered set of equally long columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Table {
    /// Build a table, checking that every column has the same length.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self, ShapeError> {
        let n_rows = columns.first().map_or(0, |c| c.values.len());
        if let Some(bad) = columns.iter().find(|c| c.values.len() != n_rows) {
            return Err(ShapeError {
                column: bad.name.clone(),
                expected: n_rows,
                found: bad.values.len(),
            });
        }
        Ok(Self { columns, n_rows })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.n_rows
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub(crate) fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    pub(crate) fn columns_mut(&mut self) -> &mut Vec<Column> {
        &mut self.columns
    }

    /// Remove a column by name, returning it if it existed.
    pub(crate) fn drop_column(&mut self, name: &str) -> Option<Column> {
        let idx = self.columns.iter().position(|c| c.name == name)?;
        Some(self.columns.remove(idx))
    }

    /// Cell at (`row`, `column`).
    pub fn value(&self, row: usize, column: &str) -> Option<&CellValue> {
        self.column(column)?.values.get(row)
    }

    /// New table holding only the given rows, in the given order.
    pub fn take(&self, rows: &[usize]) -> Table {
        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                values: rows.iter().map(|&r| c.values[r].clone()).collect(),
            })
            .collect();
        Table {
            columns,
            n_rows: rows.len(),
        }
    }

    /// First `n` rows.
    pub fn head(&self, n: usize) -> Table {
        let rows: Vec<usize> = (0..n.min(self.n_rows)).collect();
        self.take(&rows)
    }

    /// Distinct values of a column in order of first appearance.
    pub fn distinct_values(&self, name: &str) -> Vec<CellValue> {
        let Some(col) = self.column(name) else {
            return Vec::new();
        };
        let mut seen = BTreeSet::new();
        col.values
            .iter()
            .filter(|v| seen.insert((*v).clone()))
            .cloned()
            .collect()
    }

    /// Plain-text rendering with a row index column, every field
    /// right-aligned to its widest cell.
    pub fn render_text(&self) -> String {
        let index: Vec<String> = (0..self.n_rows).map(|i| i.to_string()).collect();
        let mut cells: Vec<Vec<String>> = Vec::with_capacity(self.columns.len() + 1);
        cells.push(std::iter::once(String::new()).chain(index).collect());
        for col in &self.columns {
            cells.push(
                std::iter::once(col.name.clone())
                    .chain(col.values.iter().map(|v| v.to_string()))
                    .collect(),
            );
        }

        let widths: Vec<usize> = cells
            .iter()
            .map(|c| c.iter().map(|s| s.chars().count()).max().unwrap_or(0))
            .collect();

        let mut lines = Vec::with_capacity(self.n_rows + 1);
        for row in 0..=self.n_rows {
            let line: Vec<String> = cells
                .iter()
                .zip(&widths)
                .map(|(col, &w)| format!("{:>w$}", col[row]))
                .collect();
            lines.push(line.join("  ").trim_end().to_string());
        }
        lines.join("\n")
    }
}
