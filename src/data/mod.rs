//! Data layer: core types, loading, aggregation and querying.
//!
//! Architecture:
//! ```text
//!  .csv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → RawDataset
//!   └──────────┘
//!        │
//!        ▼
//!   ┌───────────┐
//!   │ normalize │  FieldMap roles → NormalizedRecord + warnings
//!   └───────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  group   │  partition by part id → PartGroup
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  stats   │  mean / variance / std dev / CV / range
//!   └──────────┘
//!        │
//!        ▼
//!   ┌───────────────┐
//!   │ filter + sort │  FilterSet predicates, SortState toggle
//!   └───────────────┘
//! ```
//!
//! `analysis` ties the stages together into one snapshot per load.

pub mod analysis;
pub mod filter;
pub mod group;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod sort;
pub mod stats;

#[cfg(test)]
pub(crate) mod testutil;
