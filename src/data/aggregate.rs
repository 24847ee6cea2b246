//! Chart-ready summaries of a filtered view. Everything here is pure; the
//! UI only draws what these functions return.

use super::model::{CellValue, Table};
use super::stats::{self, BoxSummary};

/// Number of points a KDE curve is evaluated on.
const KDE_GRID_POINTS: usize = 200;

/// Distinct non-missing levels of a column: numeric levels sorted,
/// everything else in first-appearance order.
pub fn levels(table: &Table, column: &str) -> Vec<CellValue> {
    let mut values: Vec<CellValue> = table
        .distinct_values(column)
        .into_iter()
        .filter(|v| !v.is_null())
        .collect();
    if values.iter().all(CellValue::is_numeric) {
        values.sort();
    }
    values
}

// ---------------------------------------------------------------------------
// Count plot
// ---------------------------------------------------------------------------

/// Row counts per (`x` level, `hue` level).
#[derive(Debug, Clone, PartialEq)]
pub struct CountTable {
    pub x_levels: Vec<CellValue>,
    pub hue_levels: Vec<CellValue>,
    /// `counts[x][hue]`.
    pub counts: Vec<Vec<usize>>,
}

/// Count rows by two categorical columns. Rows missing either value are
/// skipped. `None` if a column is absent.
pub fn count_by(table: &Table, x: &str, hue: &str) -> Option<CountTable> {
    let x_col = table.column(x)?;
    let hue_col = table.column(hue)?;
    let x_levels = levels(table, x);
    let hue_levels = levels(table, hue);

    let mut counts = vec![vec![0usize; hue_levels.len()]; x_levels.len()];
    for (xv, hv) in x_col.values.iter().zip(&hue_col.values) {
        let (Some(xi), Some(hi)) = (
            x_levels.iter().position(|l| l == xv),
            hue_levels.iter().position(|l| l == hv),
        ) else {
            continue;
        };
        counts[xi][hi] += 1;
    }

    Some(CountTable {
        x_levels,
        hue_levels,
        counts,
    })
}

// ---------------------------------------------------------------------------
// Histogram + KDE
// ---------------------------------------------------------------------------

/// One hue group of a histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramGroup {
    pub hue: CellValue,
    pub counts: Vec<usize>,
    /// `(x, y)` density curve scaled to the count axis, if it can be estimated.
    pub kde: Option<Vec<[f64; 2]>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// Bin edges shared by every group.
    pub edges: Vec<f64>,
    pub groups: Vec<HistogramGroup>,
}

impl Histogram {
    pub fn bin_width(&self) -> f64 {
        bin_width(&self.edges)
    }
}

fn bin_width(edges: &[f64]) -> f64 {
    match edges {
        [first, second, ..] => second - first,
        _ => 0.0,
    }
}

/// Histogram of a numeric column split by a categorical one. Missing and
/// non-finite values are skipped.
pub fn histogram_by(table: &Table, value: &str, hue: &str) -> Option<Histogram> {
    let value_col = table.column(value)?;
    let hue_col = table.column(hue)?;
    let hue_levels = levels(table, hue);

    let pairs: Vec<(f64, &CellValue)> = value_col
        .values
        .iter()
        .zip(&hue_col.values)
        .filter(|(_, h)| !h.is_null())
        .filter_map(|(v, h)| Some((v.as_f64()?, h)))
        .filter(|(v, _)| v.is_finite())
        .collect();

    let all: Vec<f64> = pairs.iter().map(|(v, _)| *v).collect();
    let edges = stats::bin_edges(&all);
    let grid = kde_grid(&all);

    let width = bin_width(&edges);

    let groups = hue_levels
        .into_iter()
        .map(|level| {
            let values: Vec<f64> = pairs
                .iter()
                .filter(|(_, h)| **h == level)
                .map(|(v, _)| *v)
                .collect();
            let counts = stats::histogram(&values, &edges);
            // Density × n × bin width puts the curve on the count axis.
            let scale = values.len() as f64 * width;
            let kde = stats::kde(&values, &grid).map(|density| {
                grid.iter()
                    .zip(density)
                    .map(|(&x, d)| [x, d * scale])
                    .collect()
            });
            HistogramGroup {
                hue: level,
                counts,
                kde,
            }
        })
        .collect();

    Some(Histogram { edges, groups })
}

/// Evaluation grid spanning the data plus three bandwidths each side.
fn kde_grid(values: &[f64]) -> Vec<f64> {
    let Some(bw) = stats::scott_bandwidth(values) else {
        return Vec::new();
    };
    let min = values.iter().copied().fold(f64::INFINITY, f64::min) - 3.0 * bw;
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max) + 3.0 * bw;
    let step = (max - min) / (KDE_GRID_POINTS - 1) as f64;
    (0..KDE_GRID_POINTS).map(|i| min + step * i as f64).collect()
}

// ---------------------------------------------------------------------------
// Box plot
// ---------------------------------------------------------------------------

/// Box-plot summary of `value` for every level of `x`. Levels without any
/// numeric value are left out.
pub fn box_by(table: &Table, x: &str, value: &str) -> Option<Vec<(CellValue, BoxSummary)>> {
    let x_col = table.column(x)?;
    let value_col = table.column(value)?;

    let boxes = levels(table, x)
        .into_iter()
        .filter_map(|level| {
            let values: Vec<f64> = x_col
                .values
                .iter()
                .zip(&value_col.values)
                .filter(|(xv, _)| **xv == level)
                .filter_map(|(_, v)| v.as_f64())
                .filter(|v| v.is_finite())
                .collect();
            BoxSummary::from_values(&values).map(|summary| (level, summary))
        })
        .collect();
    Some(boxes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_csv;
    use crate::data::normalize::normalize;
    use crate::data::normalize::NormalizedTable;

    fn passengers() -> NormalizedTable {
        normalize(
            parse_csv(
                "Survived,Pclass,Sex,Age,Fare\n\
                 0,3,male,22,7.25\n\
                 1,1,female,38,71.28\n\
                 1,3,female,26,7.92\n\
                 1,1,female,35,53.1\n\
                 0,3,male,35,8.05\n\
                 0,3,male,,8.46\n\
                 0,1,male,54,51.86\n\
                 0,3,male,2,21.08\n"
                    .as_bytes(),
            )
            .unwrap(),
        )
    }

    #[test]
    fn numeric_levels_are_sorted() {
        let t = passengers();
        assert_eq!(levels(&t, "Pclass"), vec![CellValue::Integer(1), CellValue::Integer(3)]);
        assert_eq!(
            levels(&t, "Survived"),
            vec![CellValue::from("No"), CellValue::from("Yes")]
        );
    }

    #[test]
    fn counts_by_gender_and_survival() {
        let t = passengers();
        let c = count_by(&t, "Sex", "Survived").unwrap();
        assert_eq!(c.x_levels, vec![CellValue::from("Male"), CellValue::from("Female")]);
        assert_eq!(c.counts, vec![vec![5, 0], vec![0, 3]]);
        assert!(count_by(&t, "Embarked", "Survived").is_none());
    }

    #[test]
    fn histogram_groups_share_edges() {
        let t = passengers();
        let h = histogram_by(&t, "Age", "Survived").unwrap();
        assert_eq!(h.groups.len(), 2);
        let total: usize = h.groups.iter().flat_map(|g| g.counts.iter()).sum();
        assert_eq!(total, t.len());
        assert!(h.bin_width() > 0.0);
        assert!(h.groups.iter().all(|g| g.counts.len() == h.edges.len() - 1));
        assert!(h.groups.iter().all(|g| g.kde.is_some()));
    }

    #[test]
    fn infinite_age_does_not_break_the_histogram() {
        let t = normalize(
            parse_csv("Survived,Age\n0,22\n1,24\n0,26\n1,28\n0,30\n1,32\n0,34\n1,inf\n".as_bytes())
                .unwrap(),
        );
        assert_eq!(t.value(7, "Age"), Some(&CellValue::Float(f64::INFINITY)));
        let h = histogram_by(&t, "Age", "Survived").unwrap();
        assert_eq!(h.edges.last(), Some(&34.0));
        let total: usize = h.groups.iter().flat_map(|g| g.counts.iter()).sum();
        assert_eq!(total, 7);
        let curves = h.groups.iter().filter_map(|g| g.kde.as_ref());
        assert!(curves.flatten().all(|[x, y]| x.is_finite() && y.is_finite()));

        let boxes = box_by(&t, "Survived", "Age").unwrap();
        assert!(boxes.iter().all(|(_, b)| b.outliers.iter().all(|v| v.is_finite())));
    }

    #[test]
    fn fare_boxes_per_outcome() {
        let t = passengers();
        let boxes = box_by(&t, "Survived", "Fare").unwrap();
        assert_eq!(boxes.len(), 2);
        assert_eq!(boxes[0].0, CellValue::from("No"));
        assert_eq!(boxes[0].1.median, 8.46);
    }
}
