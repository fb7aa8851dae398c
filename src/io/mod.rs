//! Input/output helpers.
//!
//! - shaped-series exports (CSV) and full run exports (JSON) (`export`)

pub mod export;

pub use export::*;
