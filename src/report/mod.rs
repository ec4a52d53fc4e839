//! Terminal reports for the `summary` command and the dashboard KPI row.

pub mod format;

pub use format::*;
