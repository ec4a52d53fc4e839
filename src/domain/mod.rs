//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - fetched and derived series types (`RawRecord`, `MonthlyBucket`, `ChartPoint`, `KpiSummary`)
//! - selection enums (`Metric`, `CategoryFilter`)
//! - vote and identity records (`Stance`, `VoteRecord`, `AuthIdentity`)

pub mod types;

pub use types::*;
