//! Feature extraction for the disposition predictor.
//!
//! The feature set is fixed. Columns, in order:
//!
//! | idx | feature                    |
//! |-----|----------------------------|
//! | 0   | not-transit-like flag      |
//! | 1   | `ln(period)`               |
//! | 2   | stellar-eclipse flag       |
//! | 3   | centroid-offset flag       |
//! | 4   | ephemeris-match flag       |
//!
//! Missing values are encoded as `NaN` and handled by the standardizer.

use nalgebra::DMatrix;

use crate::domain::{CelestialObjectRecord, Disposition, RowId};

pub const FEATURE_NAMES: [&str; 5] = [
    "fpflag_nt",
    "log_period",
    "fpflag_ss",
    "fpflag_co",
    "fpflag_ec",
];

pub const N_FEATURES: usize = FEATURE_NAMES.len();

/// Natural log of the period; `NaN` when the period is absent or not positive.
pub fn log_period(period: Option<f64>) -> f64 {
    match period {
        Some(p) if p.is_finite() && p > 0.0 => p.ln(),
        _ => f64::NAN,
    }
}

fn flag_value(flag: Option<bool>) -> f64 {
    match flag {
        Some(true) => 1.0,
        Some(false) => 0.0,
        None => f64::NAN,
    }
}

/// Feature vector for one record.
pub fn feature_row(record: &CelestialObjectRecord) -> [f64; N_FEATURES] {
    [
        flag_value(record.flags.not_transit_like),
        log_period(record.period),
        flag_value(record.flags.stellar_eclipse),
        flag_value(record.flags.centroid_offset),
        flag_value(record.flags.ephemeris_match),
    ]
}

/// A feature matrix plus the identity of the record behind each row.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    pub rows: Vec<RowId>,
    pub values: DMatrix<f64>,
}

impl FeatureTable {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a CelestialObjectRecord>) -> Self {
        let mut rows = Vec::new();
        let mut flat = Vec::new();
        for record in records {
            rows.push(record.row);
            flat.extend_from_slice(&feature_row(record));
        }
        let values = DMatrix::from_row_slice(rows.len(), N_FEATURES, &flat);
        Self { rows, values }
    }

    /// Copy out the given rows (positions into this table) as a new matrix.
    pub fn select(&self, positions: &[usize]) -> DMatrix<f64> {
        DMatrix::from_fn(positions.len(), self.values.ncols(), |i, j| self.values[(positions[i], j)])
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Records split by what the predictor does with them.
#[derive(Debug, Clone)]
pub struct DispositionSplit {
    /// Rows with a resolved disposition (confirmed or false positive).
    pub labeled: FeatureTable,
    /// Ground-truth labels, aligned with `labeled.rows`.
    pub labels: Vec<Disposition>,
    /// Rows still marked as candidates.
    pub unlabeled: FeatureTable,
}

/// Split records into the labeled (training) and unlabeled (candidate) subsets.
///
/// Records without any disposition belong to neither subset.
pub fn split_by_disposition(records: &[CelestialObjectRecord]) -> DispositionSplit {
    let labeled_records: Vec<&CelestialObjectRecord> = records
        .iter()
        .filter(|r| r.disposition.is_some_and(Disposition::is_resolved))
        .collect();
    let labels = labeled_records.iter().filter_map(|r| r.disposition).collect();
    let unlabeled_records = records
        .iter()
        .filter(|r| r.disposition == Some(Disposition::Candidate));

    DispositionSplit {
        labeled: FeatureTable::from_records(labeled_records.iter().copied()),
        labels,
        unlabeled: FeatureTable::from_records(unlabeled_records),
    }
}
