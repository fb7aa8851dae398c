//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the per-interaction request (`SeriesRequest`, `WindowSize`)
//! - provider output (`RawObservation`)
//! - the normalized table (`ShapedSeries`, `SeriesRow`) and its quarter labels
//! - derived outputs (`SummaryStats`, `PercentChange`) and the `ChartStyle` choice

pub mod types;

pub use types::*;
