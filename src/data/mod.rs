/// Data layer: core types, loading, filtering, aggregation and export.
///
/// Architecture:
/// ```text
///  countries.ddb / countries_csv/ / .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  read once → Dataset (immutable)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterCriteria → FilteredView (indices)
///   └──────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌──────────┐   ┌──────────┐
///   │  stats    │   │  export   │  view → CSV
///   └──────────┘   └──────────┘
/// ```
pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod stats;

pub use error::{ExportError, FilterError, LoadError};
pub use filter::{apply, FilterCriteria, FilteredView, RangeFilter, YearSelection};
pub use loader::{load, DataSource};
pub use model::{Column, Dataset, Indicator, Record};
pub use stats::{summarize, ColumnStats, ColumnSummary, Descriptive, SummaryStatistics};
