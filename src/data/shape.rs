//! Series shaper: raw observations -> `ShapedSeries`.

use crate::domain::{RawObservation, SeriesRequest, SeriesRow, ShapedSeries, quarter_label};
use crate::error::AppError;

/// Normalize provider output into a quarter-labelled table.
///
/// - absent and non-finite values are dropped
/// - rows are ordered by date (stable, so same-day rows keep provider order)
/// - an empty result is `AppError::NoData`, never an empty table
pub fn shape(observations: &[RawObservation], request: &SeriesRequest) -> Result<ShapedSeries, AppError> {
    let mut rows: Vec<SeriesRow> = observations
        .iter()
        .filter_map(|obs| {
            let value = obs.value.filter(|v| v.is_finite())?;
            Some(SeriesRow {
                date: obs.date,
                quarter: quarter_label(obs.date),
                value,
            })
        })
        .collect();

    let dropped = observations.len() - rows.len();
    if dropped > 0 {
        tracing::debug!(series_id = %request.series_id, dropped, "Dropped observations without a value");
    }

    if rows.is_empty() {
        return Err(AppError::no_data(&request.series_id));
    }

    rows.sort_by_key(|r| r.date);

    Ok(ShapedSeries {
        series_id: request.series_id.clone(),
        title: request.title.clone(),
        units: request.units.clone(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::WindowSize;
    use chrono::NaiveDate;

    fn request() -> SeriesRequest {
        SeriesRequest {
            series_id: "UNRATE".to_string(),
            title: "Unemployment Rate".to_string(),
            units: "Percent".to_string(),
            window: WindowSize::default(),
        }
    }

    fn obs(y: i32, m: u32, value: Option<f64>) -> RawObservation {
        RawObservation::new(NaiveDate::from_ymd_opt(y, m, 1).unwrap(), value)
    }

    #[test]
    fn rows_are_sorted_and_labelled() {
        let input = vec![
            obs(2024, 7, Some(4.2)),
            obs(2023, 12, Some(3.7)),
            obs(2024, 2, Some(3.9)),
        ];
        let series = shape(&input, &request()).unwrap();

        let quarters: Vec<&str> = series.rows.iter().map(|r| r.quarter.as_str()).collect();
        assert_eq!(quarters, vec!["2023Q4", "2024Q1", "2024Q3"]);
        assert!(series.rows.windows(2).all(|w| w[0].date <= w[1].date));
        assert_eq!(series.title, "Unemployment Rate");
        assert_eq!(series.units, "Percent");
        assert_eq!(series.series_id, "UNRATE");
    }

    #[test]
    fn absent_values_are_dropped() {
        let input = vec![
            obs(2024, 1, Some(3.7)),
            obs(2024, 2, None),
            obs(2024, 3, Some(f64::NAN)),
            obs(2024, 4, Some(3.9)),
        ];
        let series = shape(&input, &request()).unwrap();
        let values: Vec<f64> = series.rows.iter().map(|r| r.value).collect();
        assert_eq!(values, vec![3.7, 3.9]);
    }

    #[test]
    fn nothing_usable_means_no_data() {
        let err = shape(&[], &request()).unwrap_err();
        assert_eq!(err.to_string(), "No data available for UNRATE");

        let err = shape(&[obs(2024, 1, None)], &request()).unwrap_err();
        assert!(err.is_no_data());
    }
}
