use std::collections::BTreeMap;

use super::model::CellValue;

/// Median of the values, `None` when empty.
pub fn median(values: &[f64]) -> Option<f64> {
    quantile(values, 0.5)
}

/// Most frequent non-missing value. Ties go to the smallest value in
/// [`CellValue`] ordering.
pub fn mode<'a>(values: impl IntoIterator<Item = &'a CellValue>) -> Option<CellValue> {
    let mut counts: BTreeMap<&CellValue, usize> = BTreeMap::new();
    for v in values.into_iter().filter(|v| !v.is_null()) {
        *counts.entry(v).or_default() += 1;
    }
    // BTreeMap iterates in ascending order; only a strictly larger count
    // replaces the current best.
    let mut best: Option<(&CellValue, usize)> = None;
    for (value, count) in counts {
        if best.map_or(true, |(_, n)| count > n) {
            best = Some((value, count));
        }
    }
    best.map(|(v, _)| v.clone())
}

/// Quantile with linear interpolation between closest ranks.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    Some(quantile_sorted(&sorted, q))
}

fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

// ---------------------------------------------------------------------------
// Box-plot summary
// ---------------------------------------------------------------------------

/// Five-number summary with Tukey whiskers.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    /// Points beyond 1.5 × IQR from the box.
    pub outliers: Vec<f64>,
}

impl BoxSummary {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let q1 = quantile_sorted(&sorted, 0.25);
        let median = quantile_sorted(&sorted, 0.5);
        let q3 = quantile_sorted(&sorted, 0.75);
        let iqr = q3 - q1;
        let lo_fence = q1 - 1.5 * iqr;
        let hi_fence = q3 + 1.5 * iqr;

        let inside = sorted.iter().copied().filter(|v| (lo_fence..=hi_fence).contains(v));
        let lower_whisker = inside.clone().fold(f64::INFINITY, f64::min);
        let upper_whisker = inside.fold(f64::NEG_INFINITY, f64::max);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|v| !(lo_fence..=hi_fence).contains(v))
            .collect();

        Some(Self {
            lower_whisker,
            q1,
            median,
            q3,
            upper_whisker,
            outliers,
        })
    }
}

// ---------------------------------------------------------------------------
// Histogram bins / KDE
// ---------------------------------------------------------------------------

/// Upper bound on the number of histogram bins.
pub const MAX_BINS: usize = 1000;

/// Shared bin edges for `values`, sized with the larger of the Sturges and
/// Freedman–Diaconis bin counts and capped at [`MAX_BINS`]. Non-finite
/// values are ignored.
pub fn bin_edges(values: &[f64]) -> Vec<f64> {
    let values: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if values.is_empty() {
        return Vec::new();
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if (max - min).abs() < f64::EPSILON {
        return vec![min - 0.5, max + 0.5];
    }

    let n = values.len() as f64;
    let range = max - min;
    let sturges = (n.log2() + 1.0).ceil();
    let iqr = quantile(&values, 0.75).unwrap_or(max) - quantile(&values, 0.25).unwrap_or(min);
    let fd_width = 2.0 * iqr / n.cbrt();
    let fd = if fd_width > 0.0 { (range / fd_width).ceil() } else { 0.0 };
    let bins = sturges.max(fd).clamp(1.0, MAX_BINS as f64) as usize;

    let width = range / bins as f64;
    let mut edges: Vec<f64> = (0..bins).map(|i| min + width * i as f64).collect();
    edges.push(max);
    edges
}

/// Count values into the bins described by `edges`. The last bin is closed.
pub fn histogram(values: &[f64], edges: &[f64]) -> Vec<usize> {
    if edges.len() < 2 {
        return Vec::new();
    }
    let bins = edges.len() - 1;
    let mut counts = vec![0usize; bins];
    for &v in values {
        if v < edges[0] || v > edges[bins] {
            continue;
        }
        let idx = edges[1..].partition_point(|&e| e <= v).min(bins - 1);
        counts[idx] += 1;
    }
    counts
}

/// Gaussian kernel density estimate on `grid` using Scott's bandwidth.
/// Returns `None` for fewer than two distinct values.
pub fn kde(values: &[f64], grid: &[f64]) -> Option<Vec<f64>> {
    let bw = scott_bandwidth(values)?;
    let n = values.len() as f64;
    let norm = 1.0 / (n * bw * (2.0 * std::f64::consts::PI).sqrt());
    Some(
        grid.iter()
            .map(|&x| {
                values
                    .iter()
                    .map(|&xi| (-0.5 * ((x - xi) / bw).powi(2)).exp())
                    .sum::<f64>()
                    * norm
            })
            .collect(),
    )
}

pub fn scott_bandwidth(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    let sd = var.sqrt();
    if sd <= 0.0 {
        return None;
    }
    Some(sd * (n as f64).powf(-0.2))
}
