//! Catalog schema adapter.
//!
//! Transit catalogs publish the same physical quantities under different
//! column names (e.g. KOI `koi_prad` vs TOI `pl_rade`). Each canonical field
//! lists its candidate columns in priority order; the first one present in a
//! file's header wins. Resolution happens once per file, at ingest.

use std::collections::HashMap;

use crate::error::PipelineError;

/// A quantity the pipeline reads from catalogs, independent of column naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CanonicalField {
    Name,
    Radius,
    Period,
    Disposition,
    NotTransitLike,
    StellarEclipse,
    CentroidOffset,
    EphemerisMatch,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 8] = [
        CanonicalField::Name,
        CanonicalField::Radius,
        CanonicalField::Period,
        CanonicalField::Disposition,
        CanonicalField::NotTransitLike,
        CanonicalField::StellarEclipse,
        CanonicalField::CentroidOffset,
        CanonicalField::EphemerisMatch,
    ];

    /// Fields the disposition predictor cannot run without.
    pub const PREDICTION_INPUTS: [CanonicalField; 6] = [
        CanonicalField::Disposition,
        CanonicalField::NotTransitLike,
        CanonicalField::Period,
        CanonicalField::StellarEclipse,
        CanonicalField::CentroidOffset,
        CanonicalField::EphemerisMatch,
    ];

    /// Candidate column names (lowercase), highest priority first.
    pub fn candidates(self) -> &'static [&'static str] {
        match self {
            CanonicalField::Name => &["kepoi_name", "toi", "pl_name"],
            CanonicalField::Radius => &["koi_prad", "pl_rade"],
            CanonicalField::Period => &["koi_period", "pl_orbper"],
            CanonicalField::Disposition => &["koi_disposition", "disposition"],
            CanonicalField::NotTransitLike => &["koi_fpflag_nt"],
            CanonicalField::StellarEclipse => &["koi_fpflag_ss"],
            CanonicalField::CentroidOffset => &["koi_fpflag_co"],
            CanonicalField::EphemerisMatch => &["koi_fpflag_ec"],
        }
    }
}

/// Which column (if any) each canonical field maps to in one catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogSchema {
    columns: HashMap<CanonicalField, (usize, &'static str)>,
}

impl CatalogSchema {
    /// Resolve every canonical field against a normalized header map.
    pub fn resolve(header_map: &HashMap<String, usize>) -> Self {
        let mut columns = HashMap::new();
        for field in CanonicalField::ALL {
            let found = field
                .candidates()
                .iter()
                .find_map(|&name| header_map.get(name).map(|&idx| (idx, name)));
            if let Some(hit) = found {
                columns.insert(field, hit);
            }
        }
        Self { columns }
    }

    /// Column index for a field.
    pub fn column(&self, field: CanonicalField) -> Option<usize> {
        self.columns.get(&field).map(|&(idx, _)| idx)
    }

    /// Source column name a field resolved to.
    pub fn column_name(&self, field: CanonicalField) -> Option<&'static str> {
        self.columns.get(&field).map(|&(_, name)| name)
    }

    /// Fail with `MissingFeature` on the first prediction input this catalog lacks.
    pub fn require_prediction_inputs(&self, catalog: &str) -> Result<(), PipelineError> {
        for field in CanonicalField::PREDICTION_INPUTS {
            if self.column(field).is_none() {
                return Err(PipelineError::MissingFeature {
                    column: field.candidates().join(" | "),
                    catalog: catalog.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> HashMap<String, usize> {
        names.iter().enumerate().map(|(i, n)| (n.to_string(), i)).collect()
    }

    #[test]
    fn primary_radius_column_wins_over_fallback() {
        let schema = CatalogSchema::resolve(&headers(&["pl_rade", "koi_prad"]));
        assert_eq!(schema.column(CanonicalField::Radius), Some(1));
        assert_eq!(schema.column_name(CanonicalField::Radius), Some("koi_prad"));
    }

    #[test]
    fn falls_back_to_secondary_radius_column() {
        let schema = CatalogSchema::resolve(&headers(&["toi", "pl_rade", "pl_orbper"]));
        assert_eq!(schema.column_name(CanonicalField::Radius), Some("pl_rade"));
        assert_eq!(schema.column_name(CanonicalField::Period), Some("pl_orbper"));
        assert_eq!(schema.column_name(CanonicalField::Name), Some("toi"));
    }

    #[test]
    fn missing_prediction_inputs_are_reported() {
        let schema = CatalogSchema::resolve(&headers(&["toi", "pl_rade", "pl_orbper"]));
        let err = schema.require_prediction_inputs("toi.csv").unwrap_err();
        assert!(matches!(err, PipelineError::MissingFeature { .. }));

        let full = CatalogSchema::resolve(&headers(&[
            "koi_disposition",
            "koi_period",
            "koi_fpflag_nt",
            "koi_fpflag_ss",
            "koi_fpflag_co",
            "koi_fpflag_ec",
        ]));
        assert!(full.require_prediction_inputs("koi.csv").is_ok());
    }
}
