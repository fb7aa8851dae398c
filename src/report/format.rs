//! Formatted terminal output: statistics panel, raw data table, catalog list.
//!
//! Formatting lives here so the pipeline and the TUI share one rendering of
//! numbers and labels.

use crate::catalog::{Indicator, IndicatorCatalog};
use crate::domain::{PercentChange, ShapedSeries, SummaryStats};

pub const DATA_SOURCE: &str = "Data source: Federal Reserve Economic Data (FRED)";

/// `1234567.891` -> `1,234,567.89`.
pub fn format_value(v: f64) -> String {
    if !v.is_finite() {
        return v.to_string();
    }
    let fixed = format!("{:.2}", v.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    // Avoid "-0.00".
    let sign = if v < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped}.{frac_part}")
}

/// Percent change as a signed delta (`+2.86%`), or `n/a`.
pub fn format_change(change: PercentChange) -> String {
    match change {
        PercentChange::Percent(v) => format!("{v:+.2}%"),
        PercentChange::Unavailable | PercentChange::Undefined => "n/a".to_string(),
    }
}

/// Key statistics block.
pub fn format_stats(series: &ShapedSeries, stats: &SummaryStats) -> String {
    let mut out = String::new();
    out.push_str("Key Statistics\n");
    out.push_str(&format!(
        "Latest ({}): {} {} ({})\n",
        stats.latest_period,
        format_value(stats.latest_value),
        series.units,
        format_change(stats.pct_change),
    ));
    out.push_str(&format!(
        "Minimum: {} ({})\n",
        format_value(stats.min_value),
        stats.min_period
    ));
    out.push_str(&format!(
        "Maximum: {} ({})\n",
        format_value(stats.max_value),
        stats.max_period
    ));
    out.push_str(&format!("Average: {}\n", format_value(stats.mean_value)));
    out
}

/// Full `show` output header + stats + description.
pub fn format_run_summary(indicator: &Indicator, series: &ShapedSeries, stats: &SummaryStats) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== {} [{}] ===\n", series.title, series.series_id));
    out.push_str(&format!("Units: {}\n", series.units));
    out.push_str(&format!("Points: {}\n\n", series.len()));
    out.push_str(&format_stats(series, stats));
    out.push_str("\nAbout this Indicator\n");
    out.push_str(indicator.description_or_default());
    out.push('\n');
    out
}

/// Raw data table, newest first.
pub fn format_raw_table(series: &ShapedSeries) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<10} {:<8} {:>16}\n", "date", "quarter", "value"));
    out.push_str(&format!("{:-<10} {:-<8} {:->16}\n", "", "", ""));
    for row in series.rows.iter().rev() {
        out.push_str(&format!(
            "{:<10} {:<8} {:>16}\n",
            row.date.format("%Y-%m-%d"),
            row.quarter,
            format_value(row.value)
        ));
    }
    out
}

/// Catalog listing for `econ list`.
pub fn format_catalog(catalog: &IndicatorCatalog) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<18} {:<36} {}\n", "series_id", "name", "units"));
    out.push_str(&format!("{:-<18} {:-<36} {:-<5}\n", "", "", ""));
    for ind in catalog.iter() {
        out.push_str(
            format!("{:<18} {:<36} {}\n", ind.series_id, ind.name, ind.units)
                .trim_end(),
        );
        out.push('\n');
    }
    out
}
