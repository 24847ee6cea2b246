/// Data layer: core types, loading, cleaning, filtering and summaries.
///
/// Architecture:
/// ```text
///      .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse CSV → Table (one type per column)
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ normalize │  canonical headers + cleaning rules → NormalizedTable
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  Sex / Pclass selection → FilteredView
///   └──────────┘
///        │
///        ├──► metrics    total / survived / not survived
///        └──► aggregate  counts, histograms, box plots for the charts
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod metrics;
pub mod model;
pub mod normalize;
pub mod stats;

pub use filter::{apply_filter, FilterSelection, FilteredView};
pub use loader::{load_file, parse_csv, LoadError};
pub use metrics::{summarize, Metric, SummaryMetrics};
pub use model::{CellValue, Column, Table};
pub use normalize::{normalize, NormalizedTable};
