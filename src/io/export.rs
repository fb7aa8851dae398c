//! Export a pipeline run to CSV or JSON.
//!
//! The CSV is meant to be easy to consume in spreadsheets; the JSON carries
//! the stats alongside the rows.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::app::pipeline::DashboardView;
use crate::domain::{SeriesRow, ShapedSeries, SummaryStats};
use crate::error::AppError;

#[derive(Debug, Serialize)]
struct ViewExport<'a> {
    tool: &'static str,
    series_id: &'a str,
    title: &'a str,
    units: &'a str,
    window_quarters: u32,
    rows: &'a [SeriesRow],
    stats: &'a SummaryStats,
}

/// Write `date,quarter,value` rows, oldest first.
pub fn write_series_csv(path: &Path, series: &ShapedSeries) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    let mut out = BufWriter::new(file);

    writeln!(out, "date,quarter,value")
        .map_err(|e| AppError::io(format!("Failed to write export CSV header: {e}")))?;
    for row in &series.rows {
        writeln!(out, "{},{},{}", row.date, row.quarter, row.value)
            .map_err(|e| AppError::io(format!("Failed to write export CSV row: {e}")))?;
    }
    out.flush()
        .map_err(|e| AppError::io(format!("Failed to write export CSV: {e}")))?;

    tracing::info!(path = %path.display(), rows = series.len(), "Wrote CSV export");
    Ok(())
}

/// Write the series, its statistics and the request window as pretty JSON.
pub fn write_view_json(path: &Path, view: &DashboardView) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create export JSON '{}': {e}", path.display())))?;

    let doc = ViewExport {
        tool: "econ",
        series_id: &view.series.series_id,
        title: &view.series.title,
        units: &view.series.units,
        window_quarters: view.window.quarters(),
        rows: &view.series.rows,
        stats: &view.stats,
    };

    serde_json::to_writer_pretty(BufWriter::new(file), &doc)
        .map_err(|e| AppError::io(format!("Failed to write export JSON: {e}")))?;

    tracing::info!(path = %path.display(), "Wrote JSON export");
    Ok(())
}
