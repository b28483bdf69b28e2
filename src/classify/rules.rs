//! Rule-based planet classification.
//!
//! Rules are checked in order and the first match wins:
//!
//! 1. `radius > 8.1`          → Gas Giant (mass is not consulted)
//! 2. `mass > 4.4`            → Neptune-Like
//! 3. `2.04 < mass <= 4.4`    → Super Earth
//! 4. otherwise               → Terrestrial
//!
//! Boundaries: `mass == 4.4` is a Super Earth, `mass == 2.04` is Terrestrial.

use crate::domain::{
    CelestialObjectRecord, GAS_GIANT_MIN_RADIUS, NEPTUNE_LIKE_MIN_MASS, PlanetClass, SUPER_EARTH_MIN_MASS,
};

/// Classify a planet from its measured radius and estimated mass.
pub fn classify(radius: Option<f64>, mass: Option<f64>) -> Option<PlanetClass> {
    let (radius, mass) = (radius?, mass?);

    let class = if radius > GAS_GIANT_MIN_RADIUS {
        PlanetClass::GasGiant
    } else if mass > NEPTUNE_LIKE_MIN_MASS {
        PlanetClass::NeptuneLike
    } else if mass > SUPER_EARTH_MIN_MASS {
        PlanetClass::SuperEarth
    } else {
        PlanetClass::Terrestrial
    };
    Some(class)
}

/// Return copies of `records` with `planet_class` set from radius and estimated mass.
pub fn annotate_classes(records: &[CelestialObjectRecord]) -> Vec<CelestialObjectRecord> {
    records
        .iter()
        .map(|r| CelestialObjectRecord {
            planet_class: classify(r.radius, r.estimated_mass),
            ..r.clone()
        })
        .collect()
}
