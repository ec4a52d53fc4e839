//! Plotters-powered monthly sales chart widget for Ratatui.
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.
//! Axis labels and the tooltip are drawn by the caller as plain Ratatui text, so
//! the plotted area covers the whole widget rect and cell positions map directly
//! to month indices.

use plotters::prelude::*;
use plotters::style::Color as _;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// Render-only chart description; all series and bounds are computed outside.
pub struct SalesPlottersChart<'a> {
    /// `(month index, value)` pairs in display order.
    pub series: &'a [(f64, f64)],
    /// The hovered point, if any.
    pub hovered: Option<(f64, f64)>,
    /// Y values that get a faint horizontal grid line.
    pub y_ticks: &'a [f64],
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub color: RGBColor,
}

impl<'a> Widget for SalesPlottersChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 10 || area.height < 4 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite())
            || x1 <= x0
            || y1 <= y0
        {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root).margin(0).build_cartesian_2d(x0..x1, y0..y1)?;

            let grid_color = RGBColor(70, 70, 70);
            for &v in self.y_ticks {
                chart.draw_series(LineSeries::new([(x0, v), (x1, v)], &grid_color))?;
            }

            // Area under the line, then the line on top.
            chart.draw_series(AreaSeries::new(
                self.series.iter().copied(),
                y0,
                self.color.mix(0.3).filled(),
            ))?;
            chart.draw_series(LineSeries::new(self.series.iter().copied(), &self.color))?;

            if let Some((x, y)) = self.hovered {
                let guide = RGBColor(150, 150, 150);
                chart.draw_series(LineSeries::new([(x, y0), (x, y1)], &guide))?;
                // `Circle` radii are mis-scaled by the ratatui backend; a pixel reads fine.
                chart.draw_series(std::iter::once(Pixel::new((x, y), WHITE)))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}
