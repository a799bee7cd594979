/// Data layer: core types, loading, filtering, and aggregation.
///
/// Architecture:
/// ```text
///  sale_*.parquet / rent_*.parquet (.json / .csv)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse shards → concatenated ListingDataset per category
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  region + floor/rooms/size ranges → matching indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ summary   │  group by date → count + central price per day
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ metrics   │  YoY change, sale/rent yield
///   └──────────┘
/// ```
pub mod filter;
pub mod loader;
pub mod metrics;
pub mod model;
pub mod summary;
