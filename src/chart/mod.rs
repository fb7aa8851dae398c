//! Chart construction.
//!
//! `render` turns a `ShapedSeries` into a `ChartSpec`: a lightweight,
//! render-only description (title, axis labels, categories, series, theme).
//! Backends draw a `ChartSpec` without further data prep:
//!
//! - `ascii`: fixed-size text grid for `econ show`
//! - `tui::plotters_chart`: Plotters drawn into the Ratatui buffer

pub mod ascii;

pub use ascii::render_ascii_chart;

use crate::domain::{ChartStyle, ShapedSeries};
use crate::error::AppError;

/// 8-bit RGB color, convertible into each backend's color type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Fixed visual theme shared by every chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartTheme {
    /// Series color (`#1E88E5`).
    pub accent: Rgb,
    pub axis: Rgb,
    pub text: Rgb,
    /// Fill opacity for area charts.
    pub area_opacity: f64,
}

pub const THEME: ChartTheme = ChartTheme {
    accent: Rgb(0x1E, 0x88, 0xE5),
    axis: Rgb(0xB0, 0xB0, 0xB0),
    text: Rgb(0xFF, 0xFF, 0xFF),
    area_opacity: 0.3,
};

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub name: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub style: ChartStyle,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// One x-axis category per row (quarter labels).
    pub categories: Vec<String>,
    pub series: Vec<ChartSeries>,
    /// Point markers on top of the line (line style only).
    pub markers: bool,
    pub theme: ChartTheme,
}

impl ChartSpec {
    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    /// Whether the value axis is anchored at zero (bars and filled areas).
    pub fn has_baseline(&self) -> bool {
        matches!(self.style, ChartStyle::Bar | ChartStyle::Area)
    }

    /// Padded value-axis bounds `[lo, hi]`, always with `hi > lo`.
    pub fn y_bounds(&self) -> [f64; 2] {
        let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
        for v in self.series.iter().flat_map(|s| s.values.iter().copied()) {
            lo = lo.min(v);
            hi = hi.max(v);
        }
        if !lo.is_finite() || !hi.is_finite() {
            return [0.0, 1.0];
        }

        let baseline = self.has_baseline();
        if baseline {
            lo = lo.min(0.0);
            hi = hi.max(0.0);
        }
        if (hi - lo).abs() < 1e-12 {
            let spread = (hi.abs() * 0.1).max(1.0);
            lo -= spread;
            hi += spread;
        }

        let pad = (hi - lo) * 0.05;
        let lower = if baseline && lo == 0.0 { 0.0 } else { lo - pad };
        let upper = if baseline && hi == 0.0 { 0.0 } else { hi + pad };
        [lower, upper]
    }

    /// Where bars and areas start: zero, clamped into the value axis.
    pub fn baseline(&self) -> f64 {
        let [lo, hi] = self.y_bounds();
        0.0_f64.clamp(lo, hi)
    }
}

/// Build the chart description for `series` in the requested style.
///
/// Every style goes through the same labelling: title
/// `"<title> - Last <n> Quarters"`, empty x label, y label `"<title> (<units>)"`.
pub fn render(series: &ShapedSeries, style: ChartStyle) -> Result<ChartSpec, AppError> {
    tracing::info!(title = %series.title, style = style.display_name(), "Creating chart");

    if series.is_empty() {
        return Err(AppError::render(format!("no rows to plot for {}", series.series_id)));
    }
    if let Some(row) = series.rows.iter().find(|r| !r.value.is_finite()) {
        return Err(AppError::render(format!(
            "non-finite value for {} in {}",
            series.series_id, row.quarter
        )));
    }

    Ok(ChartSpec {
        style,
        title: format!("{} - Last {} Quarters", series.title, series.len()),
        x_label: String::new(),
        y_label: series.value_label(),
        categories: series.rows.iter().map(|r| r.quarter.clone()).collect(),
        series: vec![ChartSeries {
            name: series.title.clone(),
            values: series.rows.iter().map(|r| r.value).collect(),
        }],
        markers: style == ChartStyle::Line,
        theme: THEME,
    })
}
