//! Numeric building blocks: the calibration interpolant and feature scaling.

pub mod interp;
pub mod scaling;

pub use interp::*;
pub use scaling::*;
