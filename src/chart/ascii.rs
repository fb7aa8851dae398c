//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual checks in a terminal or log
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - line: `-` segments, `o` markers
//! - bar: `#` columns from the baseline
//! - area: `-` outline, `.` fill down to the baseline

use crate::chart::ChartSpec;
use crate::domain::ChartStyle;

/// Render `spec` into a `width` x `height` character grid with a title line,
/// a value-range line and a first/last category footer.
pub fn render_ascii_chart(spec: &ChartSpec, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(4);

    let [y_min, y_max] = spec.y_bounds();
    let mut grid = vec![vec![' '; width]; height];
    let n = spec.category_count();

    if let Some(series) = spec.series.first() {
        let base_row = map_y(spec.baseline(), y_min, y_max, height);
        match spec.style {
            ChartStyle::Bar => draw_bars(&mut grid, &series.values, base_row, y_min, y_max),
            ChartStyle::Line | ChartStyle::Area => {
                let points: Vec<(usize, usize)> = series
                    .values
                    .iter()
                    .enumerate()
                    .map(|(i, &v)| (map_x(i, n, width), map_y(v, y_min, y_max, height)))
                    .collect();

                if spec.style == ChartStyle::Area {
                    fill_area(&mut grid, &points, base_row);
                }
                draw_polyline(&mut grid, &points);
                if spec.markers {
                    for &(x, y) in &points {
                        grid[y][x] = 'o';
                    }
                }
            }
        }
    }

    let mut out = String::new();
    out.push_str(&spec.title);
    out.push('\n');
    out.push_str(&format!("y=[{y_min:.2}, {y_max:.2}] {}\n", spec.y_label));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out.push_str(&category_footer(spec, width));
    out.push('\n');
    out
}

fn category_footer(spec: &ChartSpec, width: usize) -> String {
    let (Some(first), Some(last)) = (spec.categories.first(), spec.categories.last()) else {
        return String::new();
    };
    if spec.categories.len() == 1 || first.len() + last.len() + 1 > width {
        return first.clone();
    }
    let gap = width - first.len() - last.len();
    format!("{first}{}{last}", " ".repeat(gap))
}

fn map_x(i: usize, n: usize, width: usize) -> usize {
    if n <= 1 {
        return width / 2;
    }
    let u = i as f64 / (n as f64 - 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_bars(grid: &mut [Vec<char>], values: &[f64], base_row: usize, y_min: f64, y_max: f64) {
    if values.is_empty() {
        return;
    }
    let height = grid.len();
    let width = grid[0].len();
    let slot = (width / values.len()).max(1);
    let bar_width = if slot > 2 { slot - 1 } else { 1 };

    for (i, &v) in values.iter().enumerate() {
        let x0 = i * slot;
        if x0 >= width {
            break;
        }
        let row = map_y(v, y_min, y_max, height);
        let (top, bottom) = if row <= base_row { (row, base_row) } else { (base_row, row) };
        for line in grid.iter_mut().take(bottom + 1).skip(top) {
            for cell in line.iter_mut().skip(x0).take(bar_width) {
                *cell = '#';
            }
        }
    }
}

fn fill_area(grid: &mut [Vec<char>], points: &[(usize, usize)], base_row: usize) {
    for pair in points.windows(2) {
        let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
        for x in x0..=x1 {
            let u = if x1 == x0 { 0.0 } else { (x - x0) as f64 / (x1 - x0) as f64 };
            let y = (y0 as f64 + u * (y1 as f64 - y0 as f64)).round() as usize;
            let (top, bottom) = if y <= base_row { (y, base_row) } else { (base_row, y) };
            for line in grid.iter_mut().take(bottom + 1).skip(top) {
                line[x] = '.';
            }
        }
    }
}

fn draw_polyline(grid: &mut [Vec<char>], points: &[(usize, usize)]) {
    match points {
        [] => {}
        [(x, y)] => grid[*y][*x] = '-',
        _ => {
            for pair in points.windows(2) {
                draw_line(grid, pair[0], pair[1], '-');
            }
        }
    }
}

/// Integer line drawing (Bresenham-ish). Overwrites blanks and area fill.
fn draw_line(grid: &mut [Vec<char>], from: (usize, usize), to: (usize, usize), ch: char) {
    let (mut x0, mut y0) = (from.0 as isize, from.1 as isize);
    let (x1, y1) = (to.0 as isize, to.1 as isize);

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0 && (y0 as usize) < grid.len() && x0 >= 0 && (x0 as usize) < grid[0].len() {
            let cell = &mut grid[y0 as usize][x0 as usize];
            if *cell == ' ' || *cell == '.' {
                *cell = ch;
            }
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::render;
    use crate::report::tests::quarterly;

    #[test]
    fn bar_golden_snapshot_small() {
        let spec = render(&quarterly(&[1.0, 2.0, 3.0, 4.0]), ChartStyle::Bar).unwrap();
        let txt = render_ascii_chart(&spec, 16, 4);
        let expected = concat!(
            "Unemployment Rate - Last 4 Quarters\n",
            "y=[0.00, 4.20] Unemployment Rate (Percent)\n",
            "            ### \n",
            "        ### ### \n",
            "### ### ### ### \n",
            "### ### ### ### \n",
            "2023Q1    2023Q4\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn line_marks_first_and_last_points() {
        let spec = render(&quarterly(&[1.0, 3.0]), ChartStyle::Line).unwrap();
        let txt = render_ascii_chart(&spec, 10, 5);
        let rows: Vec<&str> = txt.lines().skip(2).take(5).collect();

        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].chars().nth(9), Some('o'));
        assert_eq!(rows[4].chars().next(), Some('o'));
        assert!(rows.iter().any(|r| r.contains('-')));
        assert!(!txt.contains('#'));
    }

    #[test]
    fn area_fills_down_to_baseline() {
        let spec = render(&quarterly(&[2.0, 2.0, 2.0]), ChartStyle::Area).unwrap();
        let txt = render_ascii_chart(&spec, 12, 6);
        let rows: Vec<&str> = txt.lines().skip(2).take(6).collect();

        // Flat line near the top, fill below it, no markers.
        assert!(rows.iter().any(|r| r.trim() == "-".repeat(12)));
        assert_eq!(rows[5], ".".repeat(12));
        assert!(rows.iter().all(|r| !r.contains('o')));
    }

    #[test]
    fn single_point_is_centred() {
        let spec = render(&quarterly(&[7.0]), ChartStyle::Line).unwrap();
        let txt = render_ascii_chart(&spec, 10, 4);
        assert!(txt.lines().skip(2).take(4).any(|r| r.chars().nth(5) == Some('o')));
        assert!(txt.ends_with("2023Q1\n"));
    }
}
