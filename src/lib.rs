//! `econ-dashboard` library crate.
//!
//! The binary (`econ`) is a thin wrapper around this library so that:
//!
//! - the fetch -> shape -> summarize -> chart pipeline is testable without a
//!   network or a terminal
//! - the CLI and the TUI share one implementation of every step

pub mod app;
pub mod catalog;
pub mod chart;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod report;
pub mod tui;
