//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - monthly values: `o`
//! - connecting line: `.`

use crate::domain::ChartPoint;

/// Render the monthly series, one column slot per month.
pub fn render_ascii_plot(points: &[ChartPoint], width: usize, height: usize) -> String {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return "Plot: no data for the selected filter.\n".to_string();
    };

    let width = width.max(10);
    let height = height.max(5);

    let (y_min, y_max) = y_range(points).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];
    let cells: Vec<(usize, usize)> = points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            (
                map_x(i, points.len(), width),
                map_y(p.value, y_min, y_max, height),
            )
        })
        .collect();

    // Line first so the markers overlay it.
    for pair in cells.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        draw_line(&mut grid, x0, y0, x1, y1, '.');
    }
    for &(x, y) in &cells {
        grid[y][x] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: {} → {} | y=[{y_min:.2}, {y_max:.2}]\n",
        first.label, last.label
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

fn y_range(points: &[ChartPoint]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for p in points.iter().filter(|p| p.value.is_finite()) {
        min_y = min_y.min(p.value);
        max_y = max_y.max(p.value);
    }

    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else if min_y.is_finite() {
        // Flat series: center it.
        Some((min_y - 1.0, min_y + 1.0))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(index: usize, count: usize, width: usize) -> usize {
    let width = width.max(2);
    if count <= 1 {
        return width / 2;
    }
    let u = index as f64 / (count as f64 - 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let y = if y.is_finite() { y } else { y_min };
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
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

    fn point(label: &str, value: f64) -> ChartPoint {
        ChartPoint {
            key: label.to_string(),
            label: label.to_string(),
            full_label: label.to_string(),
            value,
        }
    }

    #[test]
    fn plot_golden_snapshot_small() {
        let points = vec![point("Jan '23", 0.0), point("Feb '23", 10.0)];

        let txt = render_ascii_plot(&points, 10, 5);
        let expected = concat!(
            "Plot: Jan '23 → Feb '23 | y=[-0.50, 10.50]\n",
            "        .o\n",
            "      ..  \n",
            "    ..    \n",
            "  ..      \n",
            "o.        \n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn single_point_is_centered() {
        let txt = render_ascii_plot(&[point("Mar '24", 42.0)], 10, 5);
        let rows: Vec<&str> = txt.lines().skip(1).collect();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[2], "     o    ");
    }

    #[test]
    fn empty_series_has_a_notice() {
        assert!(render_ascii_plot(&[], 40, 10).contains("no data"));
    }
}
