//! Plotters-powered dashboard chart widget for Ratatui.
//!
//! We render Plotters output into the Ratatui buffer using
//! `plotters-ratatui-backend`. All data prep happens in `chart::render`; this
//! widget only maps a `ChartSpec` onto Plotters primitives.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color as TuiColor, Style},
    widgets::Widget,
};

use crate::chart::{ChartSpec, Rgb};
use crate::domain::ChartStyle;

/// Half-width of a bar in category units.
const BAR_HALF_WIDTH: f64 = 0.35;

/// The backend maps 4 Plotters pixels onto one terminal cell.
const PIXELS_PER_CELL: u32 = 4;
const LEFT_LABEL_CELLS: u32 = 10;
const BOTTOM_LABEL_ROWS: u32 = 3;

pub struct DashboardChart<'a> {
    pub spec: &'a ChartSpec,
}

impl<'a> Widget for DashboardChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(TuiColor::Yellow),
            );
            return;
        }

        let spec = self.spec;

        // Rotated axis descriptions don't survive the backend, so the value
        // label sits on its own line above the plot.
        buf.set_stringn(
            area.x,
            area.y,
            &spec.y_label,
            area.width as usize,
            Style::default().fg(TuiColor::Gray),
        );
        let plot_area = Rect {
            y: area.y + 1,
            height: area.height - 1,
            ..area
        };

        let n = spec.category_count();
        let Some(series) = spec.series.first() else {
            return;
        };
        if n == 0 {
            return;
        }

        let x0 = -0.5_f64;
        let x1 = n as f64 - 0.5;
        let [y0, y1] = spec.y_bounds();
        let baseline = spec.baseline();

        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite())
            || x1 <= x0
            || y1 <= y0
        {
            buf.set_string(
                plot_area.x,
                plot_area.y,
                "Values out of plotting range.",
                Style::default().fg(TuiColor::Yellow),
            );
            return;
        }

        let accent = rgb(spec.theme.accent);
        let axis = rgb(spec.theme.axis);
        let text = rgb(spec.theme.text);

        let points: Vec<(f64, f64)> = series
            .values
            .iter()
            .enumerate()
            .map(|(i, &v)| (i as f64, v))
            .collect();

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(
                    LabelAreaPosition::Left,
                    LEFT_LABEL_CELLS * PIXELS_PER_CELL,
                )
                .set_label_area_size(
                    LabelAreaPosition::Bottom,
                    BOTTOM_LABEL_ROWS * PIXELS_PER_CELL,
                )
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_labels(n.min(6))
                .y_labels(5)
                .x_label_formatter(&|v| category_at(&spec.categories, *v))
                .y_label_formatter(&|v| format!("{v:.1}"))
                .label_style(("sans-serif", 10).into_font().color(&text))
                .axis_style(&axis)
                .bold_line_style(&axis)
                .draw()?;

            match spec.style {
                ChartStyle::Line => {
                    chart.draw_series(LineSeries::new(points.iter().copied(), &accent))?;
                    if spec.markers {
                        // `Circle` radii are mis-scaled by the ratatui backend;
                        // a pixel reads as a clean dot.
                        chart.draw_series(points.iter().map(|&p| Pixel::new(p, text)))?;
                    }
                }
                ChartStyle::Bar => {
                    chart.draw_series(points.iter().map(|&(x, y)| {
                        Rectangle::new(
                            [(x - BAR_HALF_WIDTH, baseline), (x + BAR_HALF_WIDTH, y)],
                            accent.filled(),
                        )
                    }))?;
                }
                ChartStyle::Area => {
                    chart.draw_series(
                        AreaSeries::new(
                            points.iter().copied(),
                            baseline,
                            &accent.mix(spec.theme.area_opacity),
                        )
                        .border_style(&accent),
                    )?;
                }
            }

            Ok(())
        });

        widget.render(plot_area, buf);
    }
}

fn rgb(c: Rgb) -> RGBColor {
    RGBColor(c.0, c.1, c.2)
}

/// Tick label for x position `v`: the category when `v` sits on one.
fn category_at(categories: &[String], v: f64) -> String {
    let idx = v.round();
    if (v - idx).abs() > 0.25 || idx < 0.0 {
        return String::new();
    }
    categories.get(idx as usize).cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{ChartSeries, THEME, render};
    use crate::report::tests::quarterly;

    fn draw(spec: &ChartSpec) -> String {
        let area = Rect::new(0, 0, 100, 30);
        let mut buf = Buffer::empty(area);
        DashboardChart { spec }.render(area, &mut buf);
        buf.content().iter().map(|cell| cell.symbol()).collect()
    }

    /// A `d.d` run, as printed by the value-axis formatter.
    fn has_value_tick(text: &str) -> bool {
        let chars: Vec<char> = text.chars().collect();
        chars
            .windows(3)
            .any(|w| w[0].is_ascii_digit() && w[1] == '.' && w[2].is_ascii_digit())
    }

    #[test]
    fn every_style_draws_axis_ticks_and_value_label() {
        for values in [&[3.5][..], &[3.5, 3.6, 3.7, 3.9][..]] {
            for style in ChartStyle::ALL {
                let spec = render(&quarterly(values), style).unwrap();
                let text = draw(&spec);
                assert!(text.contains("Unemployment Rate (Percent)"), "{style:?}");
                assert!(text.contains("2023Q1"), "{style:?} with {} rows", values.len());
                assert!(has_value_tick(&text), "{style:?} with {} rows", values.len());
            }
        }
    }

    #[test]
    fn unplottable_bounds_show_a_hint() {
        let spec = ChartSpec {
            style: ChartStyle::Line,
            title: "Extreme".to_string(),
            x_label: String::new(),
            y_label: "Extreme (Units)".to_string(),
            categories: vec!["2024Q1".to_string(), "2024Q2".to_string()],
            series: vec![ChartSeries {
                name: "Extreme".to_string(),
                values: vec![-f64::MAX, f64::MAX],
            }],
            markers: true,
            theme: THEME,
        };
        let text = draw(&spec);
        assert!(text.contains("Values out of plotting range."));
    }

    #[test]
    fn ticks_only_label_whole_categories() {
        let cats = vec!["2024Q1".to_string(), "2024Q2".to_string()];
        assert_eq!(category_at(&cats, 0.0), "2024Q1");
        assert_eq!(category_at(&cats, 1.1), "2024Q2");
        assert_eq!(category_at(&cats, 0.5), "");
        assert_eq!(category_at(&cats, -0.5), "");
        assert_eq!(category_at(&cats, 2.0), "");
    }
}
