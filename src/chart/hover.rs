//! Hover hit-testing and the single hovered-index state.

use super::scale::ChartLayout;

/// Invisible rectangle owned by one point; entering it hovers that point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRegion {
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl HitRegion {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

/// One hit region per point, centered on the point's x and spanning the plot height.
pub fn hit_regions(layout: &ChartLayout, count: usize) -> Vec<HitRegion> {
    let width = layout.slot_width(count);
    (0..count)
        .map(|index| HitRegion {
            index,
            x: layout.x_at(index, count) - width / 2.0,
            y: layout.pad_top,
            width,
            height: layout.inner_height(),
        })
        .collect()
}

/// Ephemeral hover state: at most one hovered point.
///
/// Moving through a gap between regions keeps the current index; only leaving
/// the chart area clears it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HoverState {
    hovered: Option<usize>,
}

impl HoverState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// Pointer entered the region of `index`.
    pub fn enter(&mut self, index: usize) {
        self.hovered = Some(index);
    }

    /// Pointer left the whole chart area.
    pub fn leave(&mut self) {
        self.hovered = None;
    }

    /// Route a pointer position (layout coordinates) to the region under it.
    ///
    /// Returns `true` when the hovered index changed.
    pub fn pointer_moved(&mut self, layout: &ChartLayout, count: usize, x: f64, y: f64) -> bool {
        let before = self.hovered;
        if let Some(region) = hit_regions(layout, count).into_iter().find(|r| r.contains(x, y)) {
            self.enter(region.index);
        }
        before != self.hovered
    }

    /// Keyboard navigation: move the hovered index by `delta`, starting from the
    /// last point when nothing is hovered yet.
    pub fn step(&mut self, delta: isize, count: usize) {
        if count == 0 {
            self.hovered = None;
            return;
        }
        let next = match self.hovered {
            None if delta < 0 => count - 1,
            None => 0,
            Some(current) => current.saturating_add_signed(delta).min(count - 1),
        };
        self.hovered = Some(next);
    }

    /// Drop a hovered index that no longer exists after the series changed.
    pub fn clamp_to(&mut self, count: usize) {
        if matches!(self.hovered, Some(i) if i >= count) {
            self.hovered = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hover_then_leave_clears_index() {
        let layout = ChartLayout::SVG;
        let mut hover = HoverState::new();
        let x = layout.x_at(2, 5);
        assert!(hover.pointer_moved(&layout, 5, x, 100.0));
        assert_eq!(hover.hovered(), Some(2));
        hover.leave();
        assert_eq!(hover.hovered(), None);
    }

    #[test]
    fn regions_are_centered_with_slot_width() {
        let layout = ChartLayout::SVG;
        let regions = hit_regions(&layout, 4);
        assert_eq!(regions.len(), 4);
        let slot = layout.inner_width() / 4.0;
        for (i, r) in regions.iter().enumerate() {
            assert!((r.width - slot).abs() < 1e-9);
            assert!((r.x + r.width / 2.0 - layout.x_at(i, 4)).abs() < 1e-9);
            assert_eq!(r.y, layout.pad_top);
        }
    }

    #[test]
    fn single_point_region_covers_inner_width() {
        let layout = ChartLayout::SVG;
        let regions = hit_regions(&layout, 1);
        assert_eq!(regions[0].x, layout.pad_left);
        assert_eq!(regions[0].width, layout.inner_width());
    }

    #[test]
    fn gaps_and_axis_area_keep_previous_index() {
        let layout = ChartLayout::SVG;
        let mut hover = HoverState::new();
        hover.pointer_moved(&layout, 3, layout.x_at(0, 3), 50.0);
        assert_eq!(hover.hovered(), Some(0));

        // Halfway between points 0 and 1 lies outside both regions for n=3.
        let gap_x = (layout.x_at(0, 3) + layout.x_at(1, 3)) / 2.0;
        assert!(!hover.pointer_moved(&layout, 3, gap_x, 50.0));
        assert_eq!(hover.hovered(), Some(0));

        // Below the plot (x-axis labels).
        assert!(!hover.pointer_moved(&layout, 3, layout.x_at(2, 3), 310.0));
        assert_eq!(hover.hovered(), Some(0));
    }

    #[test]
    fn keyboard_steps_are_clamped() {
        let mut hover = HoverState::new();
        hover.step(1, 3);
        assert_eq!(hover.hovered(), Some(0));
        hover.step(-1, 3);
        assert_eq!(hover.hovered(), Some(0));
        hover.step(5, 3);
        assert_eq!(hover.hovered(), Some(2));

        let mut fresh = HoverState::new();
        fresh.step(-1, 4);
        assert_eq!(fresh.hovered(), Some(3));

        fresh.clamp_to(2);
        assert_eq!(fresh.hovered(), None);
    }
}
