//! The chartable series pipeline.
//!
//! Responsibilities:
//!
//! - group raw rows into a chronological monthly series (`aggregate`)
//! - project the series onto the selected metric with display labels (`project`)
//! - derive KPIs from the projected series (`kpi`)
//! - cache derivations keyed by input identity (`memo`)

pub mod aggregate;
pub mod kpi;
pub mod memo;
pub mod project;

pub use aggregate::*;
pub use kpi::*;
pub use memo::*;
pub use project::*;
