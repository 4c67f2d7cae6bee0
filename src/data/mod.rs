/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → OrderDataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  date range + status → filtered rows
///   └──────────┘
///        │
///        ▼
///   ┌───────────────┐
///   │ aggregate/rfm │  group-by tables → DashboardSnapshot
///   └───────────────┘
/// ```

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod pipeline;
pub mod rfm;

#[cfg(test)]
pub(crate) mod test_support;
