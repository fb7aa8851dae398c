//! Shared dashboard pipeline used by both CLI and TUI front-ends.
//!
//! fetch -> shape -> summarize -> chart
//!
//! Each call is a fresh, stateless run. The CLI and the TUI only differ in how
//! they present the resulting `DashboardView` (printing vs widgets).

use chrono::NaiveDate;

use crate::catalog::Indicator;
use crate::chart::{self, ChartSpec};
use crate::data::{SeriesProvider, shape};
use crate::domain::{ChartStyle, SeriesRequest, ShapedSeries, SummaryStats, WindowSize};
use crate::error::AppError;
use crate::report::summarize;

/// Everything one interaction renders.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub indicator: Indicator,
    pub window: WindowSize,
    pub series: ShapedSeries,
    pub stats: SummaryStats,
    pub chart: ChartSpec,
}

/// Run the full pipeline for one selection.
///
/// Errors are logged here (no-data at warn, everything else at error) and
/// returned for the caller to show; nothing is retried.
pub fn run_pipeline<P: SeriesProvider + ?Sized>(
    provider: &P,
    indicator: &Indicator,
    window: WindowSize,
    style: ChartStyle,
    today: NaiveDate,
) -> Result<DashboardView, AppError> {
    let result = build_view(provider, indicator, window, style, today);
    match &result {
        Ok(view) => tracing::info!(
            indicator = %indicator.name,
            points = view.series.len(),
            "Successfully pulled data points"
        ),
        Err(err) if err.is_no_data() => {
            tracing::warn!(indicator = %indicator.name, "No data returned")
        }
        Err(err) => tracing::error!(indicator = %indicator.name, error = %err, "Pipeline failed"),
    }
    result
}

fn build_view<P: SeriesProvider + ?Sized>(
    provider: &P,
    indicator: &Indicator,
    window: WindowSize,
    style: ChartStyle,
    today: NaiveDate,
) -> Result<DashboardView, AppError> {
    let request = indicator.request(window);
    let series = fetch_series(provider, &request, today)?;
    let stats = summarize(&series)?;
    let chart = chart::render(&series, style)?;

    Ok(DashboardView {
        indicator: indicator.clone(),
        window,
        series,
        stats,
        chart,
    })
}

/// Fetch the request window ending `today` and shape it.
pub fn fetch_series<P: SeriesProvider + ?Sized>(
    provider: &P,
    request: &SeriesRequest,
    today: NaiveDate,
) -> Result<ShapedSeries, AppError> {
    let (start, end) = request.date_range(today);
    tracing::info!(
        title = %request.title,
        series_id = %request.series_id,
        "Fetching data"
    );
    let observations = provider.fetch(&request.series_id, start, end)?;
    let series = shape(&observations, request)?;
    tracing::info!(
        title = %request.title,
        points = series.len(),
        "Successfully retrieved data points"
    );
    Ok(series)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::cell::RefCell;

    use chrono::Months;

    use super::*;
    use crate::domain::{PercentChange, RawObservation};

    /// In-memory provider that records the requested ranges.
    pub(crate) struct FakeProvider {
        pub response: Result<Vec<RawObservation>, AppError>,
        pub calls: RefCell<Vec<(String, NaiveDate, NaiveDate)>>,
    }

    impl FakeProvider {
        pub fn returning(response: Result<Vec<RawObservation>, AppError>) -> Self {
            Self {
                response,
                calls: RefCell::new(Vec::new()),
            }
        }

        pub fn quarterly(values: &[f64]) -> Self {
            let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
            let obs = values
                .iter()
                .enumerate()
                .map(|(i, &v)| RawObservation::new(start + Months::new(3 * i as u32), Some(v)))
                .collect();
            Self::returning(Ok(obs))
        }
    }

    impl SeriesProvider for FakeProvider {
        fn fetch(
            &self,
            series_id: &str,
            start: NaiveDate,
            end: NaiveDate,
        ) -> Result<Vec<RawObservation>, AppError> {
            self.calls.borrow_mut().push((series_id.to_string(), start, end));
            match &self.response {
                Ok(obs) if obs.is_empty() => Err(AppError::no_data(series_id)),
                other => other.clone(),
            }
        }
    }

    pub(crate) fn indicator(series_id: &str) -> Indicator {
        Indicator {
            name: "Unemployment Rate".to_string(),
            series_id: series_id.to_string(),
            units: "Percent".to_string(),
            description: None,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    #[test]
    fn unemployment_scenario_end_to_end() {
        let provider = FakeProvider::quarterly(&[3.5, 3.6, 3.7, 3.9, 4.0, 3.8, 3.7, 3.6]);
        let window = WindowSize::new(8).unwrap();

        let view = run_pipeline(&provider, &indicator("UNRATE"), window, ChartStyle::Line, today()).unwrap();

        assert_eq!(view.series.len(), 8);
        assert_eq!(view.stats.latest_value, 3.6);
        assert_eq!(view.stats.min_value, 3.5);
        assert_eq!(view.stats.max_value, 4.0);
        assert!((view.stats.mean_value - 3.725).abs() < 1e-9);
        match view.stats.pct_change {
            PercentChange::Percent(v) => assert!((v - 2.857).abs() < 1e-3),
            other => panic!("unexpected change: {other:?}"),
        }
        assert_eq!(view.chart.category_count(), 8);
        assert_eq!(view.chart.title, "Unemployment Rate - Last 8 Quarters");

        let calls = provider.calls.borrow();
        assert_eq!(calls.len(), 1);
        let (id, start, end) = &calls[0];
        assert_eq!(id, "UNRATE");
        assert_eq!(*end, today());
        assert_eq!((*end - *start).num_days(), 8 * 91);
    }

    #[test]
    fn empty_provider_answer_yields_no_data_and_no_chart() {
        let provider = FakeProvider::returning(Ok(Vec::new()));
        let result = run_pipeline(
            &provider,
            &indicator("XXXX"),
            WindowSize::default(),
            ChartStyle::Bar,
            today(),
        );

        let err = result.unwrap_err();
        assert!(err.is_no_data());
        assert_eq!(err.to_string(), "No data available for XXXX");
    }

    #[test]
    fn all_absent_values_yield_no_data() {
        let obs = vec![RawObservation::new(today(), None)];
        let provider = FakeProvider::returning(Ok(obs));
        let err = run_pipeline(
            &provider,
            &indicator("XXXX"),
            WindowSize::default(),
            ChartStyle::Line,
            today(),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "No data available for XXXX");
    }

    #[test]
    fn provider_failures_pass_through_unretried() {
        let provider = FakeProvider::returning(Err(AppError::provider("status 400 Bad Request")));
        let err = run_pipeline(
            &provider,
            &indicator("BOGUS"),
            WindowSize::default(),
            ChartStyle::Area,
            today(),
        )
        .unwrap_err();

        assert!(matches!(err, AppError::Provider(_)));
        assert_eq!(provider.calls.borrow().len(), 1);
    }

    #[test]
    fn shaped_rows_are_chronological_regardless_of_provider_order() {
        let mut obs: Vec<RawObservation> = (1..=12)
            .map(|m| RawObservation::new(NaiveDate::from_ymd_opt(2024, m, 1).unwrap(), Some(m as f64)))
            .collect();
        obs.reverse();
        let provider = FakeProvider::returning(Ok(obs));

        let request = indicator("UNRATE").request(WindowSize::new(4).unwrap());
        let series = fetch_series(&provider, &request, today()).unwrap();
        assert!(series.rows.windows(2).all(|w| w[0].date <= w[1].date));
        assert_eq!(series.first().unwrap().quarter, "2024Q1");
        assert_eq!(series.last().unwrap().quarter, "2024Q4");
    }
}
