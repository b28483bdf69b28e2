//! `exo-class` library crate.
//!
//! The binary (`exo`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the classification and prediction stages can be driven from other tools

pub mod app;
pub mod classify;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod math;
pub mod plot;
pub mod predict;
pub mod report;
