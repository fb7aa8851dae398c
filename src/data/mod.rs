//! Data retrieval and shaping.
//!
//! - `fred`: the provider adapter (`SeriesProvider` + the FRED HTTP client)
//! - `shape`: raw observations -> chronologically ordered, quarter-labelled table

pub mod fred;
pub mod shape;

pub use fred::{FredClient, FredConfig, SeriesProvider};
pub use shape::shape;
