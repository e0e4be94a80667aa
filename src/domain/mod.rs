//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the fetched inputs (`CountryRecord`, `CountryDirectory`, `HistorySnapshot`)
//! - the chart-ready per-date records (`AlignedRecord`)
//! - derived outputs (`Metrics`, `SummaryTotal`)
//! - run configuration (`ChartConfig`, `RefDates`)

pub mod types;

pub use types::*;
