/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .xlsx / .ods / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file, drop unnamed columns, coerce dates → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  columns, rows of CellValue, role positions
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterCriteria → row indices (FilteredView)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  summary  │  trip count, m³ and invoice totals, report text
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod summary;
