//! Value ↔ position mapping for the monthly chart.

/// Fraction of the value span added above and below the data.
pub const DOMAIN_PAD_FRAC: f64 = 0.12;

/// Number of y-axis intervals (ticks = intervals + 1).
pub const Y_TICK_INTERVALS: usize = 4;

/// Series longer than this get sparse x labels.
pub const DENSE_LABEL_LIMIT: usize = 12;

/// Target number of x labels on long series.
pub const SPARSE_LABEL_TARGET: usize = 8;

/// Plot geometry: a fixed logical canvas with padding reserved for axis labels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartLayout {
    pub width: f64,
    pub height: f64,
    pub pad_left: f64,
    pub pad_right: f64,
    pub pad_top: f64,
    pub pad_bottom: f64,
}

impl ChartLayout {
    /// The 1000×320 logical canvas used by the SVG renderer.
    pub const SVG: ChartLayout = ChartLayout {
        width: 1000.0,
        height: 320.0,
        pad_left: 70.0,
        pad_right: 18.0,
        pad_top: 22.0,
        pad_bottom: 52.0,
    };

    pub fn inner_width(&self) -> f64 {
        self.width - self.pad_left - self.pad_right
    }

    pub fn inner_height(&self) -> f64 {
        self.height - self.pad_top - self.pad_bottom
    }

    /// Y coordinate of the plot's bottom edge.
    pub fn plot_bottom(&self) -> f64 {
        self.pad_top + self.inner_height()
    }

    pub fn plot_right(&self) -> f64 {
        self.width - self.pad_right
    }

    /// X position of point `index` in a series of `count` points.
    ///
    /// Points are evenly spaced; a single point is centered.
    pub fn x_at(&self, index: usize, count: usize) -> f64 {
        if count <= 1 {
            self.pad_left + self.inner_width() / 2.0
        } else {
            self.pad_left + self.inner_width() * index as f64 / (count - 1) as f64
        }
    }

    /// Y position of `value`, clamped to the plot area.
    pub fn y_at(&self, value: f64, domain: YDomain) -> f64 {
        let span = domain.span();
        let span = if span == 0.0 { 1.0 } else { span };
        let t = ((value - domain.min) / span).clamp(0.0, 1.0);
        self.pad_top + self.inner_height() * (1.0 - t)
    }

    /// Width of each point's hover hit region.
    pub fn slot_width(&self, count: usize) -> f64 {
        self.inner_width() / count.max(1) as f64
    }
}

/// Padded y-axis domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YDomain {
    pub min: f64,
    pub max: f64,
}

impl YDomain {
    /// Domain covering `values` with 12% padding on both sides.
    ///
    /// A flat series (or an empty one) gets a fixed pad of 1 so the domain never
    /// collapses to zero height.
    pub fn from_values(values: &[f64]) -> Self {
        let finite = values.iter().copied().filter(|v| v.is_finite());
        let (raw_min, raw_max) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        let (raw_min, raw_max) = if raw_min.is_finite() && raw_max.is_finite() {
            (raw_min, raw_max)
        } else {
            (0.0, 1.0)
        };

        let pad = (raw_max - raw_min) * DOMAIN_PAD_FRAC;
        let pad = if pad == 0.0 { 1.0 } else { pad };

        Self {
            min: raw_min - pad,
            max: raw_max + pad,
        }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Evenly spaced tick values from `min` to `max` inclusive.
    pub fn ticks(&self) -> Vec<f64> {
        (0..=Y_TICK_INTERVALS)
            .map(|i| self.min + self.span() * i as f64 / Y_TICK_INTERVALS as f64)
            .collect()
    }
}

/// Compact axis/tooltip number format (`2.5M`, `1.5K`, `42`, `5.00`).
///
/// The magnitude band is chosen from the absolute value; the sign is kept.
pub fn format_compact(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("{:.1}K", value / 1_000.0)
    } else if abs >= 10.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

/// Whether the x label of point `index` is drawn.
///
/// Every label is shown on short series; longer ones show every
/// `ceil(count / 8)`-th label plus the last one.
pub fn shows_x_label(index: usize, count: usize) -> bool {
    if count <= DENSE_LABEL_LIMIT {
        return true;
    }
    let stride = count.div_ceil(SPARSE_LABEL_TARGET);
    index % stride == 0 || index + 1 == count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_format_bands() {
        assert_eq!(format_compact(1_500.0), "1.5K");
        assert_eq!(format_compact(2_500_000.0), "2.5M");
        assert_eq!(format_compact(5.0), "5.00");
        assert_eq!(format_compact(500.0), "500");
        assert_eq!(format_compact(-2_000.0), "-2.0K");
        assert_eq!(format_compact(0.126), "0.13");
    }

    #[test]
    fn domain_pads_twelve_percent() {
        let d = YDomain::from_values(&[100.0, 200.0]);
        assert!((d.min - 88.0).abs() < 1e-9);
        assert!((d.max - 212.0).abs() < 1e-9);
    }

    #[test]
    fn flat_series_gets_unit_pad() {
        let d = YDomain::from_values(&[42.0, 42.0]);
        assert_eq!(d.min, 41.0);
        assert_eq!(d.max, 43.0);
    }

    #[test]
    fn five_ticks_span_domain() {
        let d = YDomain { min: 0.0, max: 100.0 };
        assert_eq!(d.ticks(), vec![0.0, 25.0, 50.0, 75.0, 100.0]);
    }

    #[test]
    fn x_positions_are_even_and_single_point_centered() {
        let l = ChartLayout::SVG;
        assert_eq!(l.x_at(0, 1), 70.0 + 912.0 / 2.0);
        assert_eq!(l.x_at(0, 3), 70.0);
        assert_eq!(l.x_at(1, 3), 70.0 + 456.0);
        assert_eq!(l.x_at(2, 3), 982.0);
    }

    #[test]
    fn y_positions_are_clamped_to_plot() {
        let l = ChartLayout::SVG;
        let d = YDomain { min: 0.0, max: 10.0 };
        assert_eq!(l.y_at(10.0, d), 22.0);
        assert_eq!(l.y_at(0.0, d), l.plot_bottom());
        assert_eq!(l.y_at(50.0, d), 22.0);
        assert_eq!(l.y_at(-5.0, d), l.plot_bottom());
    }

    #[test]
    fn sparse_labels_on_long_series() {
        assert!((0..12).all(|i| shows_x_label(i, 12)));

        // 20 points -> stride 3, plus the final index.
        let shown: Vec<usize> = (0..20).filter(|&i| shows_x_label(i, 20)).collect();
        assert_eq!(shown, vec![0, 3, 6, 9, 12, 15, 18, 19]);
    }
}
