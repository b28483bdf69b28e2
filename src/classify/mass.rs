//! Mass estimation from radius.
//!
//! The radius lookup across catalog schemas is resolved at ingest (see
//! `io::schema`); here every record already carries a canonical `radius`.

use crate::domain::{CelestialObjectRecord, RADIUS_SATURATION};
use crate::math::CalibrationInterpolator;

/// Estimates planet mass (Earth masses) from radius (Earth radii).
#[derive(Debug, Clone)]
pub struct MassEstimator {
    interp: CalibrationInterpolator,
    saturation: f64,
}

impl MassEstimator {
    pub fn new(interp: CalibrationInterpolator) -> Self {
        Self {
            interp,
            saturation: RADIUS_SATURATION,
        }
    }

    /// Mass for a radius. Radii at or above the saturation point all map to
    /// the mass at the saturation point.
    pub fn mass_for_radius(&self, radius: f64) -> f64 {
        if radius >= self.saturation {
            self.interp.mass_of(self.saturation)
        } else {
            self.interp.mass_of(radius)
        }
    }

    /// Mass for a record, or `None` when the record has no radius.
    pub fn estimate(&self, record: &CelestialObjectRecord) -> Option<f64> {
        record.radius.map(|r| self.mass_for_radius(r))
    }

    pub fn interpolator(&self) -> &CalibrationInterpolator {
        &self.interp
    }
}

/// Return copies of `records` with `estimated_mass` set.
pub fn annotate_masses(estimator: &MassEstimator, records: &[CelestialObjectRecord]) -> Vec<CelestialObjectRecord> {
    records
        .iter()
        .map(|r| CelestialObjectRecord {
            estimated_mass: estimator.estimate(r),
            ..r.clone()
        })
        .collect()
}
