/// Data layer: typed rows, loading, caching, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .xlsx / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RawTable → Table<R> (schema binds typed rows)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  cache    │  one Arc<Table<R>> per source for the process lifetime
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterSpec → FilteredView (indices into the table)
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  KPIs + grouped sums, or Summary::NoData
///   └───────────┘
/// ```

pub mod aggregate;
pub mod cache;
pub mod filter;
pub mod loader;
pub mod model;
pub mod schema;

#[cfg(test)]
pub(crate) mod fixtures;
