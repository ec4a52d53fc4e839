//! `warehouse-sales` library crate.
//!
//! The binary (`wrs`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the aggregation and chart code is reusable outside the terminal front-ends

pub mod app;
pub mod chart;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod gateway;
pub mod io;
pub mod logging;
pub mod plot;
pub mod report;
pub mod series;
pub mod store;
pub mod tui;
