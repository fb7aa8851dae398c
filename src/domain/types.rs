//! Shared domain types.
//!
//! Nothing here outlives a single render cycle: each user interaction builds a
//! fresh `SeriesRequest` and everything downstream is derived from it.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::error::AppError;

/// Number of quarters to display.
///
/// The request interval is approximated as `quarters * 91` days back from
/// today. This is deliberately not calendar-exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct WindowSize(u32);

impl WindowSize {
    pub const MIN: u32 = 4;
    pub const MAX: u32 = 20;
    pub const DEFAULT: WindowSize = WindowSize(8);
    pub const DAYS_PER_QUARTER: i64 = 91;

    pub fn new(quarters: u32) -> Result<Self, AppError> {
        if !(Self::MIN..=Self::MAX).contains(&quarters) {
            return Err(AppError::config(format!(
                "Window must be between {} and {} quarters (got {quarters}).",
                Self::MIN,
                Self::MAX
            )));
        }
        Ok(Self(quarters))
    }

    pub fn quarters(self) -> u32 {
        self.0
    }

    pub fn lookback(self) -> Duration {
        Duration::days(i64::from(self.0) * Self::DAYS_PER_QUARTER)
    }

    /// One quarter wider, capped at `MAX`.
    pub fn wider(self) -> Self {
        Self((self.0 + 1).min(Self::MAX))
    }

    /// One quarter narrower, floored at `MIN`.
    pub fn narrower(self) -> Self {
        Self(self.0.saturating_sub(1).max(Self::MIN))
    }
}

impl Default for WindowSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// One pipeline invocation: which series, how it is labelled, how far back.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesRequest {
    /// Provider series identifier (opaque, e.g. `UNRATE`).
    pub series_id: String,
    pub title: String,
    pub units: String,
    pub window: WindowSize,
}

impl SeriesRequest {
    /// Closed interval `[today - window * 91 days, today]`.
    pub fn date_range(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        (today - self.window.lookback(), today)
    }
}

/// A single provider observation. `value` is `None` for the provider's
/// missing-value marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawObservation {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

impl RawObservation {
    pub fn new(date: NaiveDate, value: Option<f64>) -> Self {
        Self { date, value }
    }
}

/// One row of the normalized table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesRow {
    pub date: NaiveDate,
    /// Calendar quarter label, e.g. `2024Q1`.
    pub quarter: String,
    pub value: f64,
}

/// Chronologically ordered table consumed by charting and statistics.
///
/// Rows are sorted ascending by date. A `ShapedSeries` produced by
/// `data::shape` is never empty; emptiness is reported as `AppError::NoData`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapedSeries {
    pub series_id: String,
    pub title: String,
    pub units: String,
    pub rows: Vec<SeriesRow>,
}

impl ShapedSeries {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first(&self) -> Option<&SeriesRow> {
        self.rows.first()
    }

    pub fn last(&self) -> Option<&SeriesRow> {
        self.rows.last()
    }

    /// Y-axis label shared by every chart style and the stats panel.
    pub fn value_label(&self) -> String {
        if self.units.trim().is_empty() {
            self.title.clone()
        } else {
            format!("{} ({})", self.title, self.units)
        }
    }
}

/// Calendar-quarter label for a date (`2024-05-01` -> `2024Q2`).
pub fn quarter_label(date: NaiveDate) -> String {
    format!("{}Q{}", date.year(), date.month0() / 3 + 1)
}

/// Oldest-to-newest change of a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum PercentChange {
    /// Fewer than two rows.
    Unavailable,
    /// The oldest value is exactly zero, so the ratio has no meaning.
    Undefined,
    Percent(f64),
}

impl PercentChange {
    pub fn as_percent(self) -> Option<f64> {
        match self {
            PercentChange::Percent(v) => Some(v),
            PercentChange::Unavailable | PercentChange::Undefined => None,
        }
    }
}

/// Summary statistics over a `ShapedSeries`. Derived, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub latest_value: f64,
    pub latest_period: String,
    pub min_value: f64,
    pub min_period: String,
    pub max_value: f64,
    pub max_period: String,
    pub mean_value: f64,
    pub pct_change: PercentChange,
}

/// Chart style selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartStyle {
    #[default]
    Line,
    Bar,
    Area,
}

impl ChartStyle {
    pub const ALL: [ChartStyle; 3] = [ChartStyle::Line, ChartStyle::Bar, ChartStyle::Area];

    /// Resolve a style name. Unrecognized names fall back to `Line`.
    pub fn from_name(name: &str) -> ChartStyle {
        match name.trim().to_ascii_lowercase().as_str() {
            "bar" => ChartStyle::Bar,
            "area" => ChartStyle::Area,
            "line" => ChartStyle::Line,
            other => {
                tracing::debug!(style = other, "Unrecognized chart style, using line");
                ChartStyle::Line
            }
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ChartStyle::Line => "Line",
            ChartStyle::Bar => "Bar",
            ChartStyle::Area => "Area",
        }
    }

    pub fn next(self) -> ChartStyle {
        match self {
            ChartStyle::Line => ChartStyle::Bar,
            ChartStyle::Bar => ChartStyle::Area,
            ChartStyle::Area => ChartStyle::Line,
        }
    }

    pub fn prev(self) -> ChartStyle {
        match self {
            ChartStyle::Line => ChartStyle::Area,
            ChartStyle::Bar => ChartStyle::Line,
            ChartStyle::Area => ChartStyle::Bar,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn quarter_labels_follow_calendar_quarters() {
        assert_eq!(quarter_label(d(2024, 1, 1)), "2024Q1");
        assert_eq!(quarter_label(d(2024, 3, 31)), "2024Q1");
        assert_eq!(quarter_label(d(2024, 4, 1)), "2024Q2");
        assert_eq!(quarter_label(d(2023, 9, 30)), "2023Q3");
        assert_eq!(quarter_label(d(2023, 12, 1)), "2023Q4");
    }

    #[test]
    fn window_bounds_are_enforced() {
        assert!(WindowSize::new(3).is_err());
        assert!(WindowSize::new(21).is_err());
        assert_eq!(WindowSize::new(4).unwrap().quarters(), 4);
        assert_eq!(WindowSize::new(20).unwrap().quarters(), 20);
        assert_eq!(WindowSize::new(20).unwrap().wider().quarters(), 20);
        assert_eq!(WindowSize::new(4).unwrap().narrower().quarters(), 4);
        assert_eq!(WindowSize::default().quarters(), 8);
    }

    #[test]
    fn date_range_uses_91_day_quarters() {
        let request = SeriesRequest {
            series_id: "UNRATE".to_string(),
            title: "Unemployment Rate".to_string(),
            units: "Percent".to_string(),
            window: WindowSize::new(8).unwrap(),
        };
        let (start, end) = request.date_range(d(2024, 12, 31));
        assert_eq!(end, d(2024, 12, 31));
        assert_eq!((end - start).num_days(), 8 * 91);
    }

    #[test]
    fn unknown_style_names_fall_back_to_line() {
        assert_eq!(ChartStyle::from_name("Bar"), ChartStyle::Bar);
        assert_eq!(ChartStyle::from_name(" area "), ChartStyle::Area);
        assert_eq!(ChartStyle::from_name("Line"), ChartStyle::Line);
        assert_eq!(ChartStyle::from_name("scatter"), ChartStyle::Line);
        assert_eq!(ChartStyle::from_name(""), ChartStyle::Line);
    }

    #[test]
    fn style_cycle_visits_every_style() {
        let mut style = ChartStyle::Line;
        for expected in [ChartStyle::Bar, ChartStyle::Area, ChartStyle::Line] {
            style = style.next();
            assert_eq!(style, expected);
        }
        assert_eq!(ChartStyle::Line.prev(), ChartStyle::Area);
    }

    #[test]
    fn value_label_omits_empty_units() {
        let mut series = ShapedSeries {
            series_id: "GDP".to_string(),
            title: "GDP".to_string(),
            units: "Billions of Dollars".to_string(),
            rows: Vec::new(),
        };
        assert_eq!(series.value_label(), "GDP (Billions of Dollars)");
        series.units.clear();
        assert_eq!(series.value_label(), "GDP");
    }
}
