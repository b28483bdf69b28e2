//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - catalog records and their derived fields (`CelestialObjectRecord`)
//! - label enums (`Disposition`, `PlanetClass`)
//! - prediction bookkeeping (`PredictionRecord`, `Provenance`, `Fold`)
//! - fixed physical thresholds and run parameters (`PipelineConfig`)

pub mod types;

pub use types::*;
