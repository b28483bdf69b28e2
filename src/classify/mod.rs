//! Physical classification: radius → estimated mass → planet class.
//!
//! Both stages are pure and return annotated copies of their input records.

pub mod mass;
pub mod rules;

pub use mass::*;
pub use rules::*;

use crate::domain::CelestialObjectRecord;

/// Run mass estimation followed by classification.
pub fn classify_records(estimator: &MassEstimator, records: &[CelestialObjectRecord]) -> Vec<CelestialObjectRecord> {
    let with_mass = annotate_masses(estimator, records);
    let classified = annotate_classes(&with_mass);

    tracing::debug!(
        records = classified.len(),
        classified = classified.iter().filter(|r| r.planet_class.is_some()).count(),
        "classified records"
    );
    classified
}
