//! Summary statistics and formatted terminal output.

pub mod format;

pub use format::*;

use crate::domain::{PercentChange, ShapedSeries, SummaryStats};
use crate::error::AppError;

/// Compute latest / min / max / mean / oldest-to-newest change.
///
/// - latest is the last row in chronological order
/// - min and max report the first occurrence on ties
/// - the change is `Unavailable` below two rows and `Undefined` when the
///   oldest value is exactly zero
pub fn summarize(series: &ShapedSeries) -> Result<SummaryStats, AppError> {
    let (Some(first), Some(last)) = (series.first(), series.last()) else {
        return Err(AppError::no_data(&series.series_id));
    };

    let mut min = first;
    let mut max = first;
    let mut sum = 0.0;
    for row in &series.rows {
        if row.value < min.value {
            min = row;
        }
        if row.value > max.value {
            max = row;
        }
        sum += row.value;
    }

    Ok(SummaryStats {
        latest_value: last.value,
        latest_period: last.quarter.clone(),
        min_value: min.value,
        min_period: min.quarter.clone(),
        max_value: max.value,
        max_period: max.quarter.clone(),
        mean_value: sum / series.len() as f64,
        pct_change: percent_change(series),
    })
}

fn percent_change(series: &ShapedSeries) -> PercentChange {
    if series.len() < 2 {
        return PercentChange::Unavailable;
    }
    let (Some(oldest), Some(newest)) = (series.first(), series.last()) else {
        return PercentChange::Unavailable;
    };
    if oldest.value == 0.0 {
        tracing::warn!(series_id = %series.series_id, "Oldest value is zero; percent change undefined");
        return PercentChange::Undefined;
    }
    PercentChange::Percent((newest.value - oldest.value) / oldest.value * 100.0)
}
