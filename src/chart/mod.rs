//! Monthly line/area chart.
//!
//! - value ↔ position mapping, ticks, compact labels (`scale`)
//! - hit regions and hover state (`hover`)
//! - SVG document rendering (`svg`)
//!
//! The terminal dashboard draws the same geometry through Plotters; see
//! `tui::plotters_chart`.

pub mod hover;
pub mod scale;
pub mod svg;

pub use hover::*;
pub use scale::*;
pub use svg::*;
