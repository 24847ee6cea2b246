use std::fmt;

use super::model::{CellValue, Table};

/// A scalar count that may not apply to the current table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Count(usize),
    /// The column the count depends on is absent.
    NotAvailable,
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Count(n) => write!(f, "{n}"),
            Metric::NotAvailable => write!(f, "N/A"),
        }
    }
}

/// Headline numbers for the current filtered view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryMetrics {
    pub total: usize,
    pub survived: Metric,
    pub not_survived: Metric,
}

/// Compute the headline numbers. Cheap enough to run on every frame.
pub fn summarize(view: &Table) -> SummaryMetrics {
    let survival = view.column("Survived");
    let count = |label: &str| match survival {
        Some(col) => Metric::Count(
            col.values
                .iter()
                .filter(|v| matches!(v, CellValue::Text(s) if s == label))
                .count(),
        ),
        None => Metric::NotAvailable,
    };

    SummaryMetrics {
        total: view.len(),
        survived: count("Yes"),
        not_survived: count("No"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_csv;
    use crate::data::normalize::normalize;

    #[test]
    fn counts_labels_and_ignores_blanks() {
        let t = normalize(parse_csv("Survived,Sex\n0,male\n1,female\n1,female\n5,male\n".as_bytes()).unwrap());
        let m = summarize(&t);
        assert_eq!(m.total, 4);
        assert_eq!(m.survived, Metric::Count(2));
        assert_eq!(m.not_survived, Metric::Count(1));
    }

    #[test]
    fn missing_column_reports_not_available() {
        let t = normalize(parse_csv("Sex\nmale\n".as_bytes()).unwrap());
        let m = summarize(&t);
        assert_eq!(m.total, 1);
        assert_eq!(m.survived, Metric::NotAvailable);
        assert_eq!(m.not_survived.to_string(), "N/A");
    }

    #[test]
    fn empty_view_counts_zero() {
        let t = normalize(parse_csv("Survived\n".as_bytes()).unwrap());
        let m = summarize(&t);
        assert_eq!(m.total, 0);
        assert_eq!(m.survived, Metric::Count(0));
    }
}
