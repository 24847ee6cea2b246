use std::io::Read;
use std::path::Path;

use thiserror::Error;

use super::model::{CellValue, Column, ShapeError, Table};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a CSV upload could not be turned into a table.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("opening {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV has no columns")]
    NoColumns,
    #[error(transparent)]
    Shape(#[from] ShapeError),
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a passenger CSV from disk.
pub fn load_file(path: &Path) -> Result<Table, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_csv(file)
}

/// Parse CSV text (header row + records) into a column-typed [`Table`].
///
/// Every record must have as many fields as the header; anything else is
/// reported as [`LoadError::Csv`].
pub fn parse_csv<R: Read>(input: R) -> Result<Table, LoadError> {
    let mut reader = csv::Reader::from_reader(input);
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(LoadError::NoColumns);
    }

    let mut raw: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for result in reader.records() {
        let record = result?;
        for (col_idx, value) in record.iter().enumerate() {
            raw[col_idx].push(value.to_string());
        }
    }

    let columns = headers
        .into_iter()
        .zip(raw)
        .map(|(name, cells)| Column::new(name, infer_column(&cells)))
        .collect();

    Ok(Table::from_columns(columns)?)
}

// ---------------------------------------------------------------------------
// Type inference
// ---------------------------------------------------------------------------

/// Tokens read as a missing value (pandas' default `na_values`).
const MISSING_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn is_missing(s: &str) -> bool {
    MISSING_TOKENS.contains(&s.trim())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Integer,
    Float,
    Bool,
    Text,
}

/// Pick one type for the whole column: the narrowest that every
/// non-missing cell parses as.
fn guess_column_kind(cells: &[String]) -> ColumnKind {
    let present: Vec<&str> = cells
        .iter()
        .map(|s| s.trim())
        .filter(|s| !is_missing(s))
        .collect();

    if present.iter().all(|s| s.parse::<i64>().is_ok()) {
        ColumnKind::Integer
    } else if present.iter().all(|s| s.parse::<f64>().is_ok()) {
        ColumnKind::Float
    } else if present
        .iter()
        .all(|s| s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("false"))
    {
        ColumnKind::Bool
    } else {
        ColumnKind::Text
    }
}

fn infer_column(cells: &[String]) -> Vec<CellValue> {
    let kind = guess_column_kind(cells);
    cells
        .iter()
        .map(|raw| {
            let s = raw.trim();
            if is_missing(s) {
                return CellValue::Null;
            }
            // The kind was chosen so that every present cell parses.
            match kind {
                ColumnKind::Integer => s.parse().map_or(CellValue::Null, CellValue::Integer),
                ColumnKind::Float => s.parse().map_or(CellValue::Null, CellValue::Float),
                ColumnKind::Bool => CellValue::Bool(s.eq_ignore_ascii_case("true")),
                ColumnKind::Text => CellValue::Text(raw.clone()),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(text: &str) -> Table {
        parse_csv(text.as_bytes()).unwrap()
    }

    #[test]
    fn infers_one_type_per_column() {
        let t = parse("id,age,sex,flag\n1,22,male,true\n2,,female,False\n3,4.5,male,TRUE\n");
        assert_eq!(t.len(), 3);
        assert_eq!(t.value(0, "id"), Some(&CellValue::Integer(1)));
        // A single decimal turns the whole column into floats.
        assert_eq!(t.value(0, "age"), Some(&CellValue::Float(22.0)));
        assert_eq!(t.value(1, "age"), Some(&CellValue::Null));
        assert_eq!(t.value(2, "age"), Some(&CellValue::Float(4.5)));
        assert_eq!(t.value(1, "sex"), Some(&CellValue::from("female")));
        assert_eq!(t.value(1, "flag"), Some(&CellValue::Bool(false)));
    }

    #[test]
    fn missing_tokens_become_null() {
        let t = parse("Embarked,Cabin\nS,NA\n,C85\nNaN,None\n");
        assert_eq!(t.value(1, "Embarked"), Some(&CellValue::Null));
        assert_eq!(t.value(2, "Embarked"), Some(&CellValue::Null));
        assert_eq!(t.value(0, "Cabin"), Some(&CellValue::Null));
        assert_eq!(t.value(1, "Cabin"), Some(&CellValue::from("C85")));
    }

    #[test]
    fn spreadsheet_missing_markers_keep_numeric_columns_numeric() {
        let t = parse("Age,Fare\n22,#N/A\nn/a,7.25\n-1.#IND,-nan\n40,1.#QNAN\n");
        assert_eq!(t.value(0, "Age"), Some(&CellValue::Integer(22)));
        assert_eq!(t.value(1, "Age"), Some(&CellValue::Null));
        assert_eq!(t.value(2, "Age"), Some(&CellValue::Null));
        assert_eq!(t.value(1, "Fare"), Some(&CellValue::Float(7.25)));
        assert_eq!(t.column("Fare").unwrap().null_count(), 3);
    }

    #[test]
    fn headers_are_kept_verbatim() {
        let t = parse(" PCLASS ,Sex\n3,male\n");
        assert_eq!(t.column_names(), vec![" PCLASS ", "Sex"]);
    }

    #[test]
    fn header_only_file_has_zero_rows() {
        let t = parse("Survived,Sex\n");
        assert!(t.is_empty());
        assert_eq!(t.columns().len(), 2);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = parse_csv("a,b\n1,2\n3\n".as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::Csv(_)), "{err}");
    }

    #[test]
    fn empty_input_has_no_columns() {
        let err = parse_csv("".as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::NoColumns), "{err}");
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Survived,Sex").unwrap();
        writeln!(file, "0,male").unwrap();
        let t = load_file(file.path()).unwrap();
        assert_eq!(t.len(), 1);

        let missing = load_file(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(missing, LoadError::Io { .. }));
    }
}
