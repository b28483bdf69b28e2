//! Shared domain types.
//!
//! These types are intentionally kept lightweight so they can be:
//!
//! - passed between pipeline stages as plain values
//! - exported to CSV/JSON
//! - constructed directly in tests without any I/O

use serde::{Deserialize, Serialize};

/// Mass is evaluated at this radius for every object at or above it
/// (Earth radii). The calibration relation is not valid past this point.
pub const RADIUS_SATURATION: f64 = 12.1;

/// Radius above which an object is a gas giant regardless of mass (Earth radii).
pub const GAS_GIANT_MIN_RADIUS: f64 = 8.1;

/// Mass above which an object is Neptune-like (Earth masses).
pub const NEPTUNE_LIKE_MIN_MASS: f64 = 4.4;

/// Mass above which an object is a super earth (Earth masses).
pub const SUPER_EARTH_MIN_MASS: f64 = 2.04;

/// Identity of a record: its zero-based data-row position in the source catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RowId(pub usize);

impl std::fmt::Display for RowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "row {}", self.0)
    }
}

/// Catalog disposition of a candidate object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Disposition {
    #[serde(rename = "FALSE POSITIVE")]
    FalsePositive,
    #[serde(rename = "CONFIRMED")]
    Confirmed,
    #[serde(rename = "CANDIDATE")]
    Candidate,
}

impl Disposition {
    /// Parse a catalog disposition cell (case-insensitive).
    ///
    /// Both `FALSE POSITIVE` (catalog spelling) and `FALSE_POSITIVE` are accepted.
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_ascii_uppercase().replace('_', " ");
        match normalized.as_str() {
            "CONFIRMED" => Some(Disposition::Confirmed),
            "CANDIDATE" => Some(Disposition::Candidate),
            "FALSE POSITIVE" => Some(Disposition::FalsePositive),
            _ => None,
        }
    }

    /// Spelling used by the source catalogs (and our exports).
    pub fn catalog_label(self) -> &'static str {
        match self {
            Disposition::Confirmed => "CONFIRMED",
            Disposition::Candidate => "CANDIDATE",
            Disposition::FalsePositive => "FALSE POSITIVE",
        }
    }

    /// Whether this disposition is ground truth the predictor can learn from.
    ///
    /// `Candidate` is pending review, so those rows are what we predict.
    pub fn is_resolved(self) -> bool {
        !matches!(self, Disposition::Candidate)
    }
}

/// Rule-based physical class of a planet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PlanetClass {
    #[serde(rename = "Gas Giant")]
    GasGiant,
    #[serde(rename = "Neptune-Like")]
    NeptuneLike,
    #[serde(rename = "Super Earth")]
    SuperEarth,
    #[serde(rename = "Terrestrial")]
    Terrestrial,
}

impl PlanetClass {
    pub const ALL: [PlanetClass; 4] = [
        PlanetClass::GasGiant,
        PlanetClass::NeptuneLike,
        PlanetClass::SuperEarth,
        PlanetClass::Terrestrial,
    ];

    /// Human-readable label (also the exported CSV value).
    pub fn label(self) -> &'static str {
        match self {
            PlanetClass::GasGiant => "Gas Giant",
            PlanetClass::NeptuneLike => "Neptune-Like",
            PlanetClass::SuperEarth => "Super Earth",
            PlanetClass::Terrestrial => "Terrestrial",
        }
    }

    /// Single-character marker for terminal plots.
    pub fn marker(self) -> char {
        match self {
            PlanetClass::GasGiant => 'G',
            PlanetClass::NeptuneLike => 'N',
            PlanetClass::SuperEarth => 'S',
            PlanetClass::Terrestrial => 'T',
        }
    }
}

/// False-positive diagnostic flags published with transit catalogs.
///
/// Each flag is `None` when the cell is missing or unparseable.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DiagnosticFlags {
    /// Light curve is not transit-like.
    pub not_transit_like: Option<bool>,
    /// Significant secondary event (stellar eclipse).
    pub stellar_eclipse: Option<bool>,
    /// Source of the signal is offset from the target star.
    pub centroid_offset: Option<bool>,
    /// Ephemeris matches a known object (contamination).
    pub ephemeris_match: Option<bool>,
}

/// One candidate object from a survey catalog, plus the fields derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct CelestialObjectRecord {
    pub row: RowId,
    /// Catalog designation, when the schema has one (for reporting only).
    pub name: Option<String>,
    /// Planet radius in Earth radii.
    pub radius: Option<f64>,
    /// Orbital period in days.
    pub period: Option<f64>,
    pub flags: DiagnosticFlags,
    pub disposition: Option<Disposition>,

    /// Set by the mass estimator; defined iff `radius` is.
    pub estimated_mass: Option<f64>,
    /// Set by the planet classifier; defined iff both radius and mass are.
    pub planet_class: Option<PlanetClass>,
    /// Set by the prediction assembler.
    pub predicted_label: Option<Disposition>,

    /// Raw cells of the source row, in source column order (for exports).
    pub fields: Vec<String>,
}

impl CelestialObjectRecord {
    /// A record with only an identity; everything else absent.
    pub fn new(row: RowId) -> Self {
        Self {
            row,
            name: None,
            radius: None,
            period: None,
            flags: DiagnosticFlags::default(),
            disposition: None,
            estimated_mass: None,
            planet_class: None,
            predicted_label: None,
            fields: Vec::new(),
        }
    }
}

/// Where a prediction came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// Predicted by a fold model that never saw the row.
    OutOfFold,
    /// Predicted by the model trained on every labeled row.
    FinalModel,
}

/// A single prediction for one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredictionRecord {
    pub row: RowId,
    pub label: Disposition,
    pub provenance: Provenance,
}

/// One cross-validation fold: validation positions into the labeled subset.
///
/// The training subset is the complement of `validation`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fold {
    pub index: usize,
    pub validation: Vec<usize>,
}

impl Fold {
    /// Positions (into a labeled subset of size `n`) not in this fold's validation set.
    pub fn training(&self, n: usize) -> Vec<usize> {
        let mut in_validation = vec![false; n];
        for &i in &self.validation {
            if i < n {
                in_validation[i] = true;
            }
        }
        (0..n).filter(|&i| !in_validation[i]).collect()
    }
}

/// Fixed run parameters.
///
/// `Default` carries the values the pipeline is defined with; tests may build
/// smaller configurations directly.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Number of cross-validation folds.
    pub folds: usize,
    /// Seed shared by the fold splitter and every ensemble.
    pub seed: u64,
    /// Trees per ensemble.
    pub n_trees: usize,
    /// Maximum tree depth (root is depth 0).
    pub max_depth: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            folds: 5,
            seed: 42,
            n_trees: 50,
            max_depth: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disposition_parse_accepts_catalog_spellings() {
        assert_eq!(Disposition::parse("CONFIRMED"), Some(Disposition::Confirmed));
        assert_eq!(Disposition::parse(" candidate "), Some(Disposition::Candidate));
        assert_eq!(Disposition::parse("FALSE POSITIVE"), Some(Disposition::FalsePositive));
        assert_eq!(Disposition::parse("false_positive"), Some(Disposition::FalsePositive));
        assert_eq!(Disposition::parse("PC"), None);
        assert_eq!(Disposition::parse(""), None);
    }

    #[test]
    fn fold_training_is_complement_of_validation() {
        let fold = Fold {
            index: 0,
            validation: vec![1, 4],
        };
        assert_eq!(fold.training(6), vec![0, 2, 3, 5]);
    }
}
