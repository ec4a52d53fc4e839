//! SVG rendering of the monthly line/area chart.
//!
//! The output is a self-contained `<svg>` document on the fixed logical canvas
//! of [`ChartLayout::SVG`]; it scales to its container through `viewBox`.
//!
//! Drawing order matters (later elements paint on top):
//! grid + y labels, axes, area, line, x labels, markers + hit regions, tooltip.

use std::fmt::Write;

use crate::domain::ChartPoint;

use super::hover::hit_regions;
use super::scale::{ChartLayout, YDomain, format_compact, shows_x_label};

pub const DEFAULT_COLOR: &str = "#7c5cff";
pub const EMPTY_MESSAGE: &str = "No chart data to display.";

const TOOLTIP_WIDTH: f64 = 180.0;
const TOOLTIP_HEIGHT: f64 = 56.0;
const MARKER_RADIUS: f64 = 4.0;
const MARKER_RADIUS_HOVER: f64 = 6.0;

/// Presentation options for [`render_svg`].
#[derive(Debug, Clone)]
pub struct SvgStyle {
    /// Series color (any SVG color string).
    pub color: String,
    /// Rendered height attribute in CSS pixels; width is always 100%.
    pub height: u32,
}

impl Default for SvgStyle {
    fn default() -> Self {
        Self {
            color: DEFAULT_COLOR.to_string(),
            height: 280,
        }
    }
}

/// Top-left corner of the tooltip box for the hovered point at `x`.
///
/// The box is centered on the point and clamped so it never leaves the plot.
pub fn tooltip_origin(layout: &ChartLayout, x: f64) -> (f64, f64) {
    let min_x = layout.pad_left;
    let max_x = layout.plot_right() - TOOLTIP_WIDTH;
    let tx = (x - TOOLTIP_WIDTH / 2.0).max(min_x).min(max_x);
    (tx, layout.pad_top + 8.0)
}

/// SVG path through the points in order (`M x y L x y ...`).
pub fn line_path(layout: &ChartLayout, points: &[ChartPoint], domain: YDomain) -> String {
    let n = points.len();
    points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let cmd = if i == 0 { 'M' } else { 'L' };
            format!("{cmd} {:.2} {:.2}", layout.x_at(i, n), layout.y_at(p.value, domain))
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// The line path closed down to the plot's bottom edge.
pub fn area_path(layout: &ChartLayout, points: &[ChartPoint], domain: YDomain) -> String {
    let n = points.len();
    let bottom = layout.plot_bottom();
    format!(
        "{} L {:.2} {bottom:.2} L {:.2} {bottom:.2} Z",
        line_path(layout, points, domain),
        layout.x_at(n.saturating_sub(1), n),
        layout.x_at(0, n),
    )
}

/// Render the chart, optionally with `hovered` highlighted.
///
/// An out-of-range hover index is ignored.
pub fn render_svg(points: &[ChartPoint], hovered: Option<usize>, style: &SvgStyle) -> String {
    let layout = ChartLayout::SVG;
    let mut svg = String::new();

    // Writing into a `String` cannot fail.
    let _ = write_document(&mut svg, &layout, points, hovered, style);
    svg
}

fn write_document(
    out: &mut String,
    layout: &ChartLayout,
    points: &[ChartPoint],
    hovered: Option<usize>,
    style: &SvgStyle,
) -> std::fmt::Result {
    let (w, h) = (layout.width, layout.height);
    let color = escape(&style.color);

    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="100%" height="{}" role="img" aria-label="Monthly chart">"#,
        style.height
    )?;

    if points.is_empty() {
        writeln!(
            out,
            r#"  <text x="{:.2}" y="{:.2}" text-anchor="middle" font-size="14" fill="rgba(255,255,255,0.70)">{EMPTY_MESSAGE}</text>"#,
            w / 2.0,
            h / 2.0
        )?;
        return writeln!(out, "</svg>");
    }

    let n = points.len();
    let values: Vec<f64> = points.iter().map(|p| p.value).collect();
    let domain = YDomain::from_values(&values);
    let bottom = layout.plot_bottom();
    let right = layout.plot_right();

    writeln!(out, "  <defs>")?;
    writeln!(out, r#"    <linearGradient id="areaFill" x1="0" y1="0" x2="0" y2="1">"#)?;
    writeln!(out, r#"      <stop offset="0%" stop-color="{color}" stop-opacity="0.30"/>"#)?;
    writeln!(out, r#"      <stop offset="100%" stop-color="{color}" stop-opacity="0.02"/>"#)?;
    writeln!(out, "    </linearGradient>")?;
    writeln!(out, "  </defs>")?;

    for tick in domain.ticks() {
        let y = layout.y_at(tick, domain);
        writeln!(
            out,
            r#"  <line x1="{:.2}" x2="{right:.2}" y1="{y:.2}" y2="{y:.2}" stroke="rgba(255,255,255,0.08)"/>"#,
            layout.pad_left
        )?;
        writeln!(
            out,
            r#"  <text x="{:.2}" y="{:.2}" text-anchor="end" font-size="12" fill="rgba(255,255,255,0.65)">{}</text>"#,
            layout.pad_left - 10.0,
            y + 4.0,
            format_compact(tick)
        )?;
    }

    writeln!(
        out,
        r#"  <line x1="{:.2}" x2="{right:.2}" y1="{bottom:.2}" y2="{bottom:.2}" stroke="rgba(255,255,255,0.12)"/>"#,
        layout.pad_left
    )?;
    writeln!(
        out,
        r#"  <line x1="{0:.2}" x2="{0:.2}" y1="{1:.2}" y2="{bottom:.2}" stroke="rgba(255,255,255,0.12)"/>"#,
        layout.pad_left, layout.pad_top
    )?;

    writeln!(out, r#"  <path d="{}" fill="url(#areaFill)"/>"#, area_path(layout, points, domain))?;
    writeln!(
        out,
        r#"  <path d="{}" fill="none" stroke="{color}" stroke-width="3" stroke-linejoin="round" stroke-linecap="round"/>"#,
        line_path(layout, points, domain)
    )?;

    for (i, p) in points.iter().enumerate() {
        if !shows_x_label(i, n) {
            continue;
        }
        writeln!(
            out,
            r#"  <text x="{:.2}" y="{:.2}" text-anchor="middle" font-size="12" fill="rgba(255,255,255,0.62)">{}</text>"#,
            layout.x_at(i, n),
            h - 18.0,
            escape(&p.label)
        )?;
    }

    let hovered = hovered.filter(|&i| i < n);
    for (p, region) in points.iter().zip(hit_regions(layout, n)) {
        let i = region.index;
        let is_hovered = hovered == Some(i);
        let (radius, fill, opacity) = if is_hovered {
            (MARKER_RADIUS_HOVER, "#ffffff".to_string(), "1")
        } else {
            (MARKER_RADIUS, color.clone(), "0.85")
        };
        writeln!(out, r#"  <g data-index="{i}">"#)?;
        writeln!(
            out,
            r#"    <circle cx="{:.2}" cy="{:.2}" r="{radius}" fill="{fill}" opacity="{opacity}"/>"#,
            layout.x_at(i, n),
            layout.y_at(p.value, domain)
        )?;
        writeln!(
            out,
            r#"    <rect class="hit" x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="transparent"/>"#,
            region.x, region.y, region.width, region.height
        )?;
        writeln!(out, "  </g>")?;
    }

    if let Some(i) = hovered {
        write_tooltip(out, layout, &points[i], layout.x_at(i, n))?;
    }

    writeln!(out, "</svg>")
}

fn write_tooltip(out: &mut String, layout: &ChartLayout, point: &ChartPoint, x: f64) -> std::fmt::Result {
    let (tx, ty) = tooltip_origin(layout, x);
    writeln!(out, r#"  <g class="tooltip">"#)?;
    writeln!(
        out,
        r#"    <line x1="{x:.2}" x2="{x:.2}" y1="{:.2}" y2="{:.2}" stroke="rgba(255,255,255,0.10)"/>"#,
        layout.pad_top,
        layout.plot_bottom()
    )?;
    writeln!(out, r#"    <g transform="translate({tx:.2}, {ty:.2})">"#)?;
    writeln!(
        out,
        r#"      <rect width="{TOOLTIP_WIDTH}" height="{TOOLTIP_HEIGHT}" rx="12" fill="rgba(0,0,0,0.55)" stroke="rgba(255,255,255,0.16)"/>"#
    )?;
    let label = if point.full_label.is_empty() {
        &point.label
    } else {
        &point.full_label
    };
    writeln!(
        out,
        r#"      <text x="12" y="22" font-size="12" fill="rgba(255,255,255,0.72)">{}</text>"#,
        escape(label)
    )?;
    writeln!(
        out,
        r#"      <text x="12" y="42" font-size="16" fill="rgba(255,255,255,0.92)">{}</text>"#,
        format_compact(point.value)
    )?;
    writeln!(out, "    </g>")?;
    writeln!(out, "  </g>")
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(label: &str, value: f64) -> ChartPoint {
        ChartPoint {
            key: label.to_string(),
            label: label.to_string(),
            full_label: format!("{label} full"),
            value,
        }
    }

    #[test]
    fn empty_series_renders_placeholder() {
        let svg = render_svg(&[], None, &SvgStyle::default());
        assert!(svg.contains(EMPTY_MESSAGE));
        assert!(!svg.contains("<path"));
    }

    #[test]
    fn line_path_visits_points_in_order() {
        let layout = ChartLayout::SVG;
        let points = vec![point("a", 0.0), point("b", 10.0)];
        let domain = YDomain { min: 0.0, max: 10.0 };
        assert_eq!(
            line_path(&layout, &points, domain),
            "M 70.00 268.00 L 982.00 22.00"
        );
        assert_eq!(
            area_path(&layout, &points, domain),
            "M 70.00 268.00 L 982.00 22.00 L 982.00 268.00 L 70.00 268.00 Z"
        );
    }

    #[test]
    fn renders_five_tick_labels_and_gradient() {
        let svg = render_svg(&[point("a", 100.0), point("b", 200.0)], None, &SvgStyle::default());
        assert_eq!(svg.matches(r#"text-anchor="end""#).count(), 5);
        assert!(svg.contains(r#"<linearGradient id="areaFill""#));
        assert!(svg.contains(r##"stop-color="#7c5cff""##));
        assert!(!svg.contains(r#"class="tooltip""#));
    }

    #[test]
    fn hovered_point_gets_large_white_marker_and_tooltip() {
        let points = vec![point("Jan '24", 1_500.0), point("Feb '24", 2_500.0)];
        let svg = render_svg(&points, Some(1), &SvgStyle::default());
        assert_eq!(svg.matches(r##"r="6" fill="#ffffff""##).count(), 1);
        assert_eq!(svg.matches(r#"r="4""#).count(), 1);
        assert!(svg.contains(r#"class="tooltip""#));
        assert!(svg.contains("Feb &#39;24 full"));
        assert!(svg.contains(">2.5K</text>"));
    }

    #[test]
    fn out_of_range_hover_is_ignored() {
        let svg = render_svg(&[point("a", 1.0)], Some(7), &SvgStyle::default());
        assert!(!svg.contains(r#"class="tooltip""#));
    }

    #[test]
    fn tooltip_is_clamped_to_plot() {
        let layout = ChartLayout::SVG;
        assert_eq!(tooltip_origin(&layout, 70.0), (70.0, 30.0));
        assert_eq!(tooltip_origin(&layout, 982.0), (802.0, 30.0));
        assert_eq!(tooltip_origin(&layout, 500.0), (410.0, 30.0));
    }

    #[test]
    fn long_series_labels_are_sparse() {
        let points: Vec<ChartPoint> = (0..20).map(|i| point(&format!("p{i}"), i as f64)).collect();
        let svg = render_svg(&points, None, &SvgStyle::default());
        assert_eq!(svg.matches(r#"text-anchor="middle""#).count(), 8);
        assert_eq!(svg.matches(r#"class="hit""#).count(), 20);
    }

    #[test]
    fn labels_are_xml_escaped() {
        assert_eq!(escape("A&B <C>"), "A&amp;B &lt;C&gt;");
    }
}
