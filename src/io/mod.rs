//! Output helpers (CSV export of the monthly series).

pub mod export;

pub use export::*;
